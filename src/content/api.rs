//! Portfolio Content API Endpoints
//! Mission: Public landing-page data and the admin CRUD surface

use crate::auth::Identity;
use crate::content::{
    error::ContentError,
    models::{
        DashboardStats, Experience, ExperienceInput, PersonalInfo, PersonalInfoInput,
        PortfolioData, Project, ProjectInput, Skill, SkillInput,
    },
    store::ContentStore,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info};

/// GET /api/portfolio
pub async fn get_portfolio(
    State(store): State<ContentStore>,
) -> Result<Json<PortfolioData>, ContentError> {
    Ok(Json(store.portfolio()?))
}

/// GET /api/admin/stats
pub async fn get_stats(
    State(store): State<ContentStore>,
    identity: Identity,
) -> Result<Json<DashboardStats>, ContentError> {
    debug!("Dashboard stats requested by {}", identity.email);
    Ok(Json(store.stats(Utc::now())?))
}

// ===== Personal info =====

pub async fn get_personal_info(
    State(store): State<ContentStore>,
    _identity: Identity,
) -> Result<Json<Option<PersonalInfo>>, ContentError> {
    Ok(Json(store.personal_info()?))
}

pub async fn put_personal_info(
    State(store): State<ContentStore>,
    _identity: Identity,
    Json(payload): Json<PersonalInfoInput>,
) -> Result<Json<PersonalInfo>, ContentError> {
    Ok(Json(store.upsert_personal_info(payload)?))
}

// ===== Projects =====

pub async fn list_projects(
    State(store): State<ContentStore>,
    _identity: Identity,
) -> Result<Json<Vec<Project>>, ContentError> {
    Ok(Json(store.list_projects()?))
}

pub async fn get_project(
    State(store): State<ContentStore>,
    _identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Project>, ContentError> {
    Ok(Json(store.get_project(&id)?))
}

pub async fn create_project(
    State(store): State<ContentStore>,
    _identity: Identity,
    Json(payload): Json<ProjectInput>,
) -> Result<(StatusCode, Json<Project>), ContentError> {
    let project = store.create_project(payload)?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update_project(
    State(store): State<ContentStore>,
    _identity: Identity,
    Path(id): Path<String>,
    Json(payload): Json<ProjectInput>,
) -> Result<Json<Project>, ContentError> {
    Ok(Json(store.update_project(&id, payload)?))
}

pub async fn delete_project(
    State(store): State<ContentStore>,
    Path(id): Path<String>,
    identity: Identity,
) -> Result<Json<Value>, ContentError> {
    store.delete_project(&id)?;
    info!("Project {} deleted by {}", id, identity.email);
    Ok(Json(json!({ "message": "Project deleted" })))
}

// ===== Skills =====

pub async fn list_skills(
    State(store): State<ContentStore>,
    _identity: Identity,
) -> Result<Json<Vec<Skill>>, ContentError> {
    Ok(Json(store.list_skills()?))
}

pub async fn create_skill(
    State(store): State<ContentStore>,
    _identity: Identity,
    Json(payload): Json<SkillInput>,
) -> Result<(StatusCode, Json<Skill>), ContentError> {
    let skill = store.create_skill(payload)?;
    Ok((StatusCode::CREATED, Json(skill)))
}

pub async fn update_skill(
    State(store): State<ContentStore>,
    _identity: Identity,
    Path(id): Path<String>,
    Json(payload): Json<SkillInput>,
) -> Result<Json<Skill>, ContentError> {
    Ok(Json(store.update_skill(&id, payload)?))
}

pub async fn delete_skill(
    State(store): State<ContentStore>,
    _identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Value>, ContentError> {
    store.delete_skill(&id)?;
    Ok(Json(json!({ "message": "Skill deleted" })))
}

// ===== Experiences =====

pub async fn list_experiences(
    State(store): State<ContentStore>,
    _identity: Identity,
) -> Result<Json<Vec<Experience>>, ContentError> {
    Ok(Json(store.list_experiences()?))
}

pub async fn get_experience(
    State(store): State<ContentStore>,
    _identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Experience>, ContentError> {
    Ok(Json(store.get_experience(&id)?))
}

pub async fn create_experience(
    State(store): State<ContentStore>,
    _identity: Identity,
    Json(payload): Json<ExperienceInput>,
) -> Result<(StatusCode, Json<Experience>), ContentError> {
    let experience = store.create_experience(payload)?;
    Ok((StatusCode::CREATED, Json(experience)))
}

pub async fn update_experience(
    State(store): State<ContentStore>,
    _identity: Identity,
    Path(id): Path<String>,
    Json(payload): Json<ExperienceInput>,
) -> Result<Json<Experience>, ContentError> {
    Ok(Json(store.update_experience(&id, payload)?))
}

pub async fn delete_experience(
    State(store): State<ContentStore>,
    _identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Value>, ContentError> {
    store.delete_experience(&id)?;
    Ok(Json(json!({ "message": "Experience deleted" })))
}

/// Public and admin content routes. Admin handlers also require an `Identity`,
/// so they stay closed even if the gate's prefixes miss them.
pub fn router(store: ContentStore) -> Router {
    Router::new()
        .route("/api/portfolio", get(get_portfolio))
        .route("/api/admin/stats", get(get_stats))
        .route(
            "/api/admin/personal",
            get(get_personal_info).put(put_personal_info),
        )
        .route(
            "/api/admin/projects",
            get(list_projects).post(create_project),
        )
        .route(
            "/api/admin/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/api/admin/skills", get(list_skills).post(create_skill))
        .route(
            "/api/admin/skills/:id",
            put(update_skill).delete(delete_skill),
        )
        .route(
            "/api/admin/experiences",
            get(list_experiences).post(create_experience),
        )
        .route(
            "/api/admin/experiences/:id",
            get(get_experience)
                .put(update_experience)
                .delete(delete_experience),
        )
        .with_state(store)
}
