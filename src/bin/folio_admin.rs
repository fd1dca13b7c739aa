//! Folio Admin Tool
//!
//! Seeds admin accounts directly into the SQLite database.
//!
//! Usage:
//!   cargo run --bin folio-admin -- create-user --name Ana --email ana@x.com --password secret1
//!   cargo run --bin folio-admin -- --db-path ./folio.db users

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use folio_backend::auth::{
    models::RegisterRequest, user_store::CreateUserError, PasswordHasher, UserStore,
};
use folio_backend::config::{DEFAULT_DATABASE_PATH, SEED_BCRYPT_COST};
use folio_backend::db::Database;
use validator::Validate;

/// Account seeding for the Folio backend
#[derive(Parser, Debug)]
#[command(name = "folio-admin")]
#[command(about = "Create admin accounts in the Folio database")]
struct Cli {
    /// Path to the SQLite database
    #[arg(short, long, env = "DATABASE_PATH", default_value = DEFAULT_DATABASE_PATH)]
    db_path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a user; an existing email is reported and left untouched
    CreateUser {
        #[arg(long, env = "ADMIN_NAME")]
        name: String,

        #[arg(long, env = "ADMIN_EMAIL")]
        email: String,

        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show how many accounts exist
    Users,
}

fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    let cli = Cli::parse();

    let db = Database::open(&cli.db_path)?;
    let users = UserStore::new(db);

    match cli.command {
        Commands::CreateUser {
            name,
            email,
            password,
        } => {
            let request = RegisterRequest {
                name: name.trim().to_string(),
                email: email.trim().to_string(),
                password,
            };
            if let Err(errors) = request.validate() {
                bail!("Invalid account details: {}", errors);
            }

            let hash = PasswordHasher::new(SEED_BCRYPT_COST)
                .hash(&request.password)
                .context("Failed to hash password")?;

            match users.create_user(&request.name, &request.email, hash) {
                Ok(user) => println!("✅ Created user {} ({})", user.email, user.id),
                Err(CreateUserError::DuplicateEmail) => {
                    println!("⚠️  User {} already exists, nothing changed", request.email)
                }
                Err(CreateUserError::Storage(e)) => return Err(e),
            }
        }
        Commands::Users => {
            println!("{} user(s) in {}", users.count()?, cli.db_path);
        }
    }

    Ok(())
}
