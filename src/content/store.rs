//! Portfolio Content Storage
//! Mission: SQLite persistence for the profile, projects, skills and experiences

use crate::content::error::ContentError;
use crate::content::models::{
    CategoryCount, CurrentJob, DashboardStats, Experience, ExperienceInput, PersonalInfo,
    PersonalInfoInput, PortfolioData, Project, ProjectInput, RecentActivity, RecentProject, Skill,
    SkillInput, SkillLevel, StatsOverview, StatsSummary,
};
use crate::db::Database;
use anyhow::Context;
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub const PUBLIC_PROJECT_LIMIT: usize = 6;
pub const PUBLIC_SKILL_LIMIT: usize = 9;
pub const PUBLIC_EXPERIENCE_LIMIT: usize = 5;
pub const RECENT_PROJECT_LIMIT: usize = 5;

const DATE_FMT: &str = "%Y-%m-%d";
const SECONDS_PER_MONTH: i64 = 30 * 24 * 3600;

const PROJECT_COLUMNS: &str = "id, title, description, image_url, demo_url, github_url,
    technologies, featured, start_date, end_date, created_at";
const SKILL_COLUMNS: &str = "id, name, category, level, icon, featured, created_at";
const EXPERIENCE_COLUMNS: &str =
    "id, company, position, description, start_date, end_date, current, featured, created_at";
const EXPERIENCE_ORDER: &str = "ORDER BY current DESC, start_date DESC";

fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        msg.into(),
    )
}

fn date_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FMT)
        .map_err(|e| conversion_error(idx, format!("bad date {:?}: {}", raw, e)))
}

fn opt_date_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| {
        NaiveDate::parse_from_str(&raw, DATE_FMT)
            .map_err(|e| conversion_error(idx, format!("bad date {:?}: {}", raw, e)))
    })
    .transpose()
}

fn fmt_date(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

fn personal_from_row(row: &Row<'_>) -> rusqlite::Result<PersonalInfo> {
    Ok(PersonalInfo {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        title: row.get(4)?,
        description: row.get(5)?,
        location: row.get(6)?,
        github: row.get(7)?,
        linked_in: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        image_url: row.get(3)?,
        demo_url: row.get(4)?,
        github_url: row.get(5)?,
        technologies: row.get(6)?,
        featured: row.get(7)?,
        start_date: date_at(row, 8)?,
        end_date: opt_date_at(row, 9)?,
        created_at: row.get(10)?,
    })
}

fn skill_from_row(row: &Row<'_>) -> rusqlite::Result<Skill> {
    let level: String = row.get(3)?;
    Ok(Skill {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        level: SkillLevel::parse(&level)
            .ok_or_else(|| conversion_error(3, format!("unknown skill level {:?}", level)))?,
        icon: row.get(4)?,
        featured: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn experience_from_row(row: &Row<'_>) -> rusqlite::Result<Experience> {
    Ok(Experience {
        id: row.get(0)?,
        company: row.get(1)?,
        position: row.get(2)?,
        description: row.get(3)?,
        start_date: date_at(row, 4)?,
        end_date: opt_date_at(row, 5)?,
        current: row.get(6)?,
        featured: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn query_all<T, F>(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
    map: F,
) -> rusqlite::Result<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, map)?
        .collect::<rusqlite::Result<Vec<T>>>()?;
    Ok(rows)
}

fn count(conn: &Connection, sql: &str) -> rusqlite::Result<i64> {
    conn.query_row(sql, [], |row| row.get(0))
}

/// Content storage with SQLite backend
#[derive(Clone)]
pub struct ContentStore {
    db: Database,
}

impl ContentStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // ===== Public portfolio =====

    pub fn portfolio(&self) -> Result<PortfolioData, ContentError> {
        let conn = self.db.conn();
        Ok(PortfolioData {
            personal_info: Self::personal_info_in(&conn)?,
            projects: query_all(
                &conn,
                &format!(
                    "SELECT {} FROM projects WHERE featured = 1 ORDER BY created_at DESC LIMIT ?1",
                    PROJECT_COLUMNS
                ),
                params![PUBLIC_PROJECT_LIMIT as i64],
                project_from_row,
            )?,
            skills: query_all(
                &conn,
                &format!(
                    "SELECT {} FROM skills WHERE featured = 1 ORDER BY created_at DESC LIMIT ?1",
                    SKILL_COLUMNS
                ),
                params![PUBLIC_SKILL_LIMIT as i64],
                skill_from_row,
            )?,
            experiences: query_all(
                &conn,
                &format!(
                    "SELECT {} FROM experiences {} LIMIT ?1",
                    EXPERIENCE_COLUMNS, EXPERIENCE_ORDER
                ),
                params![PUBLIC_EXPERIENCE_LIMIT as i64],
                experience_from_row,
            )?,
        })
    }

    // ===== Personal info =====

    fn personal_info_in(conn: &Connection) -> rusqlite::Result<Option<PersonalInfo>> {
        conn.query_row(
            "SELECT id, name, email, phone, title, description, location, github, linked_in,
                    updated_at
             FROM personal_info LIMIT 1",
            [],
            personal_from_row,
        )
        .optional()
    }

    pub fn personal_info(&self) -> Result<Option<PersonalInfo>, ContentError> {
        Ok(Self::personal_info_in(&self.db.conn())?)
    }

    /// Update the single profile record, creating it on first write.
    pub fn upsert_personal_info(
        &self,
        input: PersonalInfoInput,
    ) -> Result<PersonalInfo, ContentError> {
        let input = input.normalize();
        input.validate()?;

        let conn = self.db.conn();
        let id = match Self::personal_info_in(&conn)? {
            Some(existing) => existing.id,
            None => Uuid::new_v4().to_string(),
        };

        conn.execute(
            "INSERT INTO personal_info
                (id, name, email, phone, title, description, location, github, linked_in,
                 updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name, email = excluded.email, phone = excluded.phone,
                title = excluded.title, description = excluded.description,
                location = excluded.location, github = excluded.github,
                linked_in = excluded.linked_in, updated_at = excluded.updated_at",
            params![
                id,
                input.name,
                input.email,
                input.phone,
                input.title,
                input.description,
                input.location,
                input.github,
                input.linked_in,
                now_stamp(),
            ],
        )
        .context("Failed to save personal info")?;

        Self::personal_info_in(&conn)?
            .ok_or_else(|| ContentError::Internal(anyhow::anyhow!("personal info vanished")))
    }

    // ===== Projects =====

    pub fn list_projects(&self) -> Result<Vec<Project>, ContentError> {
        Ok(query_all(
            &self.db.conn(),
            &format!("SELECT {} FROM projects ORDER BY created_at DESC", PROJECT_COLUMNS),
            [],
            project_from_row,
        )?)
    }

    fn project_in(conn: &Connection, id: &str) -> rusqlite::Result<Option<Project>> {
        conn.query_row(
            &format!("SELECT {} FROM projects WHERE id = ?1", PROJECT_COLUMNS),
            params![id],
            project_from_row,
        )
        .optional()
    }

    pub fn get_project(&self, id: &str) -> Result<Project, ContentError> {
        Self::project_in(&self.db.conn(), id)?.ok_or(ContentError::NotFound("Project"))
    }

    fn title_taken(conn: &Connection, title: &str, except_id: &str) -> rusqlite::Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE title = ?1 AND id != ?2)",
            params![title, except_id],
            |row| row.get(0),
        )
    }

    pub fn create_project(&self, input: ProjectInput) -> Result<Project, ContentError> {
        let input = input.normalize();
        input.validate()?;
        let (start, end) = input.dates()?;

        let conn = self.db.conn();
        if Self::title_taken(&conn, &input.title, "")? {
            return Err(ContentError::Conflict(
                "A project with this title already exists".to_string(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        conn.execute(
            &format!(
                "INSERT INTO projects ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                PROJECT_COLUMNS
            ),
            params![
                id,
                input.title,
                input.description,
                input.image_url,
                input.demo_url,
                input.github_url,
                input.technologies,
                input.featured,
                fmt_date(start),
                end.map(fmt_date),
                now_stamp(),
            ],
        )
        .context("Failed to insert project")?;

        info!("Created project: {} ({})", input.title, id);
        Self::project_in(&conn, &id)?.ok_or(ContentError::NotFound("Project"))
    }

    pub fn update_project(&self, id: &str, input: ProjectInput) -> Result<Project, ContentError> {
        let conn = self.db.conn();
        if Self::project_in(&conn, id)?.is_none() {
            return Err(ContentError::NotFound("Project"));
        }

        let input = input.normalize();
        input.validate()?;
        let (start, end) = input.dates()?;

        if Self::title_taken(&conn, &input.title, id)? {
            return Err(ContentError::Conflict(
                "Another project with this title already exists".to_string(),
            ));
        }

        conn.execute(
            "UPDATE projects SET title = ?2, description = ?3, image_url = ?4, demo_url = ?5,
                github_url = ?6, technologies = ?7, featured = ?8, start_date = ?9, end_date = ?10
             WHERE id = ?1",
            params![
                id,
                input.title,
                input.description,
                input.image_url,
                input.demo_url,
                input.github_url,
                input.technologies,
                input.featured,
                fmt_date(start),
                end.map(fmt_date),
            ],
        )
        .context("Failed to update project")?;

        Self::project_in(&conn, id)?.ok_or(ContentError::NotFound("Project"))
    }

    pub fn delete_project(&self, id: &str) -> Result<(), ContentError> {
        let removed = self
            .db
            .conn()
            .execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Err(ContentError::NotFound("Project"));
        }
        info!("Deleted project: {}", id);
        Ok(())
    }

    // ===== Skills =====

    pub fn list_skills(&self) -> Result<Vec<Skill>, ContentError> {
        Ok(query_all(
            &self.db.conn(),
            &format!("SELECT {} FROM skills ORDER BY name ASC", SKILL_COLUMNS),
            [],
            skill_from_row,
        )?)
    }

    fn skill_in(conn: &Connection, id: &str) -> rusqlite::Result<Option<Skill>> {
        conn.query_row(
            &format!("SELECT {} FROM skills WHERE id = ?1", SKILL_COLUMNS),
            params![id],
            skill_from_row,
        )
        .optional()
    }

    pub fn create_skill(&self, input: SkillInput) -> Result<Skill, ContentError> {
        let input = input.normalize();
        input.validate()?;

        let conn = self.db.conn();
        let id = Uuid::new_v4().to_string();
        conn.execute(
            &format!(
                "INSERT INTO skills ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                SKILL_COLUMNS
            ),
            params![
                id,
                input.name,
                input.category,
                input.level.as_str(),
                input.icon,
                input.featured,
                now_stamp(),
            ],
        )
        .context("Failed to insert skill")?;

        Self::skill_in(&conn, &id)?.ok_or(ContentError::NotFound("Skill"))
    }

    pub fn update_skill(&self, id: &str, input: SkillInput) -> Result<Skill, ContentError> {
        let input = input.normalize();
        input.validate()?;

        let conn = self.db.conn();
        let updated = conn
            .execute(
                "UPDATE skills SET name = ?2, category = ?3, level = ?4, icon = ?5, featured = ?6
                 WHERE id = ?1",
                params![
                    id,
                    input.name,
                    input.category,
                    input.level.as_str(),
                    input.icon,
                    input.featured,
                ],
            )
            .context("Failed to update skill")?;
        if updated == 0 {
            return Err(ContentError::NotFound("Skill"));
        }

        Self::skill_in(&conn, id)?.ok_or(ContentError::NotFound("Skill"))
    }

    pub fn delete_skill(&self, id: &str) -> Result<(), ContentError> {
        let removed = self
            .db
            .conn()
            .execute("DELETE FROM skills WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Err(ContentError::NotFound("Skill"));
        }
        Ok(())
    }

    // ===== Experiences =====

    pub fn list_experiences(&self) -> Result<Vec<Experience>, ContentError> {
        Ok(query_all(
            &self.db.conn(),
            &format!(
                "SELECT {} FROM experiences {}",
                EXPERIENCE_COLUMNS, EXPERIENCE_ORDER
            ),
            [],
            experience_from_row,
        )?)
    }

    fn experience_in(conn: &Connection, id: &str) -> rusqlite::Result<Option<Experience>> {
        conn.query_row(
            &format!("SELECT {} FROM experiences WHERE id = ?1", EXPERIENCE_COLUMNS),
            params![id],
            experience_from_row,
        )
        .optional()
    }

    pub fn get_experience(&self, id: &str) -> Result<Experience, ContentError> {
        Self::experience_in(&self.db.conn(), id)?.ok_or(ContentError::NotFound("Experience"))
    }

    /// Marking an experience current clears the flag on every other one.
    pub fn create_experience(&self, input: ExperienceInput) -> Result<Experience, ContentError> {
        let input = input.normalize();
        input.validate()?;
        let (start, end) = input.dates()?;

        let mut conn = self.db.conn();
        let id = Uuid::new_v4().to_string();

        let tx = conn.transaction()?;
        if input.current {
            tx.execute("UPDATE experiences SET current = 0 WHERE current = 1", [])?;
        }
        tx.execute(
            &format!(
                "INSERT INTO experiences ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                EXPERIENCE_COLUMNS
            ),
            params![
                id,
                input.company,
                input.position,
                input.description,
                fmt_date(start),
                end.map(fmt_date),
                input.current,
                input.featured,
                now_stamp(),
            ],
        )?;
        tx.commit().context("Failed to insert experience")?;

        info!("Created experience: {} at {}", input.position, input.company);
        Self::experience_in(&conn, &id)?.ok_or(ContentError::NotFound("Experience"))
    }

    pub fn update_experience(
        &self,
        id: &str,
        input: ExperienceInput,
    ) -> Result<Experience, ContentError> {
        let mut conn = self.db.conn();
        if Self::experience_in(&conn, id)?.is_none() {
            return Err(ContentError::NotFound("Experience"));
        }

        let input = input.normalize();
        input.validate()?;
        let (start, end) = input.dates()?;

        let tx = conn.transaction()?;
        if input.current {
            tx.execute(
                "UPDATE experiences SET current = 0 WHERE current = 1 AND id != ?1",
                params![id],
            )?;
        }
        tx.execute(
            "UPDATE experiences SET company = ?2, position = ?3, description = ?4,
                start_date = ?5, end_date = ?6, current = ?7, featured = ?8
             WHERE id = ?1",
            params![
                id,
                input.company,
                input.position,
                input.description,
                fmt_date(start),
                end.map(fmt_date),
                input.current,
                input.featured,
            ],
        )?;
        tx.commit().context("Failed to update experience")?;

        Self::experience_in(&conn, id)?.ok_or(ContentError::NotFound("Experience"))
    }

    pub fn delete_experience(&self, id: &str) -> Result<(), ContentError> {
        let removed = self
            .db
            .conn()
            .execute("DELETE FROM experiences WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Err(ContentError::NotFound("Experience"));
        }
        Ok(())
    }

    // ===== Dashboard =====

    pub fn stats(&self, now: DateTime<Utc>) -> Result<DashboardStats, ContentError> {
        let conn = self.db.conn();

        let total_projects = count(&conn, "SELECT COUNT(*) FROM projects")?;
        let featured_projects = count(&conn, "SELECT COUNT(*) FROM projects WHERE featured = 1")?;
        let total_skills = count(&conn, "SELECT COUNT(*) FROM skills")?;
        let featured_skills = count(&conn, "SELECT COUNT(*) FROM skills WHERE featured = 1")?;
        let total_experiences = count(&conn, "SELECT COUNT(*) FROM experiences")?;
        let has_personal_info = count(&conn, "SELECT COUNT(*) FROM personal_info")? > 0;

        let projects_completion_rate = if total_projects > 0 {
            ((featured_projects as f64 / total_projects as f64) * 100.0).round() as i64
        } else {
            0
        };

        let current_job = conn
            .query_row(
                &format!(
                    "SELECT {} FROM experiences WHERE current = 1 LIMIT 1",
                    EXPERIENCE_COLUMNS
                ),
                [],
                experience_from_row,
            )
            .optional()?
            .map(|exp| CurrentJob {
                duration_months: months_since(exp.start_date, now),
                id: exp.id,
                company: exp.company,
                position: exp.position,
                start_date: exp.start_date,
            });

        let recent_projects = query_all(
            &conn,
            "SELECT id, title, featured, created_at FROM projects
             ORDER BY created_at DESC LIMIT ?1",
            params![RECENT_PROJECT_LIMIT as i64],
            |row| {
                Ok(RecentProject {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    featured: row.get(2)?,
                    created_at: row.get(3)?,
                })
            },
        )?;

        let skills_distribution = query_all(
            &conn,
            "SELECT category, COUNT(*) AS n FROM skills
             GROUP BY category ORDER BY n DESC, category ASC",
            [],
            |row| {
                Ok(CategoryCount {
                    category: row.get(0)?,
                    count: row.get(1)?,
                })
            },
        )?;

        Ok(DashboardStats {
            overview: StatsOverview {
                total_projects,
                featured_projects,
                total_skills,
                featured_skills,
                total_experiences,
                projects_completion_rate,
            },
            current_job,
            recent_activity: RecentActivity { recent_projects },
            skills_distribution,
            summary: StatsSummary {
                last_updated: now.to_rfc3339_opts(SecondsFormat::Millis, true),
                has_personal_info,
            },
        })
    }
}

/// Whole 30-day months between `start` (midnight UTC) and `now`, rounded up.
pub fn months_since(start: NaiveDate, now: DateTime<Utc>) -> i64 {
    let secs = match start.and_hms_opt(0, 0, 0) {
        Some(midnight) => (now - Utc.from_utc_datetime(&midnight)).num_seconds().abs(),
        None => 0,
    };
    (secs + SECONDS_PER_MONTH - 1) / SECONDS_PER_MONTH
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ContentStore {
        ContentStore::new(Database::in_memory().unwrap())
    }

    fn project(title: &str, featured: bool) -> ProjectInput {
        ProjectInput {
            title: title.to_string(),
            description: "Budget tracking".to_string(),
            image_url: Some(String::new()),
            demo_url: None,
            github_url: Some("https://github.com/x/y".to_string()),
            technologies: r#"["Excel","VBA"]"#.to_string(),
            featured,
            start_date: "2024-01-01".to_string(),
            end_date: Some("2024-02-28".to_string()),
        }
    }

    fn experience(company: &str, start: &str, current: bool) -> ExperienceInput {
        ExperienceInput {
            company: company.to_string(),
            position: "Developer".to_string(),
            description: "Built apps".to_string(),
            start_date: start.to_string(),
            end_date: Some("2024-10-31".to_string()),
            current,
            featured: false,
        }
    }

    fn skill(name: &str, category: &str, featured: bool) -> SkillInput {
        SkillInput {
            name: name.to_string(),
            category: category.to_string(),
            level: SkillLevel::Advanced,
            icon: None,
            featured,
        }
    }

    #[test]
    fn test_personal_info_upsert_keeps_single_record() {
        let store = store();
        assert!(store.personal_info().unwrap().is_none());

        let input = PersonalInfoInput {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            phone: "555".to_string(),
            title: "Engineer".to_string(),
            description: "Builds things".to_string(),
            location: None,
            github: Some(String::new()),
            linked_in: None,
        };
        let first = store.upsert_personal_info(input.clone()).unwrap();
        assert_eq!(first.github, None);

        let second = store
            .upsert_personal_info(PersonalInfoInput {
                title: "Staff Engineer".to_string(),
                ..input
            })
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.title, "Staff Engineer");
    }

    #[test]
    fn test_project_crud() {
        let store = store();
        let created = store.create_project(project("Budget", true)).unwrap();
        assert_eq!(created.image_url, None);
        assert_eq!(
            created.end_date,
            Some(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap())
        );

        let mut changed = project("Budget v2", false);
        changed.end_date = None;
        let updated = store.update_project(&created.id, changed).unwrap();
        assert_eq!(updated.title, "Budget v2");
        assert_eq!(updated.end_date, None);
        assert!(!updated.featured);

        store.delete_project(&created.id).unwrap();
        assert!(matches!(
            store.get_project(&created.id),
            Err(ContentError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_project(&created.id),
            Err(ContentError::NotFound(_))
        ));
    }

    #[test]
    fn test_project_title_conflicts() {
        let store = store();
        let a = store.create_project(project("Alpha", false)).unwrap();
        store.create_project(project("Beta", false)).unwrap();

        assert!(matches!(
            store.create_project(project("Alpha", true)),
            Err(ContentError::Conflict(_))
        ));
        assert!(matches!(
            store.update_project(&a.id, project("Beta", false)),
            Err(ContentError::Conflict(_))
        ));
        // keeping its own title is fine
        assert!(store.update_project(&a.id, project("Alpha", true)).is_ok());
    }

    #[test]
    fn test_invalid_project_dates() {
        let store = store();
        let mut input = project("Broken", false);
        input.start_date = "someday".to_string();
        assert!(matches!(
            store.create_project(input),
            Err(ContentError::Validation(_))
        ));
    }

    #[test]
    fn test_single_current_experience() {
        let store = store();
        let first = store
            .create_experience(experience("Acme", "2023-01-01", true))
            .unwrap();
        assert_eq!(first.end_date, None);

        let second = store
            .create_experience(experience("Globex", "2024-08-01", true))
            .unwrap();
        assert!(!store.get_experience(&first.id).unwrap().current);

        store
            .update_experience(&first.id, experience("Acme", "2023-01-01", true))
            .unwrap();
        assert!(!store.get_experience(&second.id).unwrap().current);

        let listed = store.list_experiences().unwrap();
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed.iter().filter(|e| e.current).count(), 1);
    }

    #[test]
    fn test_skill_crud_and_ordering() {
        let store = store();
        let react = store.create_skill(skill("React", "Frontend", true)).unwrap();
        store.create_skill(skill("Laravel", "Backend", false)).unwrap();

        let names: Vec<String> = store
            .list_skills()
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Laravel", "React"]);

        let mut changed = skill("React", "Frontend", false);
        changed.level = SkillLevel::Expert;
        let updated = store.update_skill(&react.id, changed).unwrap();
        assert_eq!(updated.level, SkillLevel::Expert);

        store.delete_skill(&react.id).unwrap();
        assert!(matches!(
            store.update_skill(&react.id, skill("React", "Frontend", true)),
            Err(ContentError::NotFound(_))
        ));
    }

    #[test]
    fn test_portfolio_only_featured() {
        let store = store();
        for i in 0..8 {
            store
                .create_project(project(&format!("Project {}", i), i % 2 == 0))
                .unwrap();
        }
        store.create_skill(skill("React", "Frontend", true)).unwrap();
        store.create_skill(skill("Laravel", "Backend", false)).unwrap();
        for year in 2015..2022 {
            store
                .create_experience(experience("Co", &format!("{}-01-01", year), false))
                .unwrap();
        }

        let data = store.portfolio().unwrap();
        assert_eq!(data.projects.len(), 4);
        assert!(data.projects.iter().all(|p| p.featured));
        assert_eq!(data.skills.len(), 1);
        assert_eq!(data.experiences.len(), PUBLIC_EXPERIENCE_LIMIT);
        assert_eq!(
            data.experiences[0].start_date,
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_dashboard_stats() {
        let store = store();
        store.create_project(project("A", true)).unwrap();
        store.create_project(project("B", false)).unwrap();
        store.create_project(project("C", false)).unwrap();
        store.create_skill(skill("React", "Frontend", true)).unwrap();
        store.create_skill(skill("Vue", "Frontend", false)).unwrap();
        store.create_skill(skill("Laravel", "Backend", false)).unwrap();
        store
            .create_experience(experience("Acme", "2024-01-01", true))
            .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let stats = store.stats(now).unwrap();

        assert_eq!(
            stats.overview,
            StatsOverview {
                total_projects: 3,
                featured_projects: 1,
                total_skills: 3,
                featured_skills: 1,
                total_experiences: 1,
                projects_completion_rate: 33,
            }
        );
        assert_eq!(stats.current_job.unwrap().duration_months, 2);
        assert_eq!(stats.recent_activity.recent_projects.len(), 3);
        assert_eq!(
            stats.skills_distribution[0],
            CategoryCount {
                category: "Frontend".to_string(),
                count: 2
            }
        );
        assert!(!stats.summary.has_personal_info);
    }

    #[test]
    fn test_months_since_rounds_up() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let at = |y, m, d| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap();

        assert_eq!(months_since(start, at(2024, 1, 1)), 0);
        assert_eq!(months_since(start, at(2024, 1, 2)), 1);
        assert_eq!(months_since(start, at(2024, 1, 31)), 1);
        assert_eq!(months_since(start, at(2024, 2, 1)), 2);
    }
}
