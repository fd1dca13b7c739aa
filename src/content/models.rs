//! Portfolio Content Models
//! Mission: Profile, projects, skills and work experience records plus their inputs

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::FieldError;

/// Singleton profile record
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub github: Option<String>,
    pub linked_in: Option<String>,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub demo_url: Option<String>,
    pub github_url: Option<String>,
    pub technologies: String,
    pub featured: bool,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SkillLevel {
    #[serde(alias = "Principiante")]
    Beginner,
    #[serde(alias = "Intermedio")]
    Intermediate,
    #[serde(alias = "Avanzado")]
    Advanced,
    #[serde(alias = "Experto")]
    Expert,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
        }
    }

    /// Accepts the canonical names and the legacy Spanish labels found in seeded data.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Beginner" | "Principiante" => Some(SkillLevel::Beginner),
            "Intermediate" | "Intermedio" => Some(SkillLevel::Intermediate),
            "Advanced" | "Avanzado" => Some(SkillLevel::Advanced),
            "Expert" | "Experto" => Some(SkillLevel::Expert),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub category: String,
    pub level: SkillLevel,
    pub icon: Option<String>,
    pub featured: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub position: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub current: bool,
    pub featured: bool,
    pub created_at: String,
}

/// Treat `""` the same as an absent optional field.
fn blank_to_none(value: &mut Option<String>) {
    if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
        *value = None;
    }
}

/// `YYYY-MM-DD`, or an RFC 3339 timestamp truncated to its date.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, FieldError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| FieldError {
            field: field.to_string(),
            message: format!("Invalid date: {}", raw),
        })
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoInput {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 1000, message = "Description is required"))]
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    #[validate(url(message = "Invalid GitHub URL"))]
    pub github: Option<String>,
    #[serde(default)]
    #[validate(url(message = "Invalid LinkedIn URL"))]
    pub linked_in: Option<String>,
}

impl PersonalInfoInput {
    pub fn normalize(mut self) -> Self {
        blank_to_none(&mut self.location);
        blank_to_none(&mut self.github);
        blank_to_none(&mut self.linked_in);
        self
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 1000, message = "Description is required"))]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[validate(length(min = 1, message = "Technologies are required"))]
    pub technologies: String,
    #[serde(default)]
    pub featured: bool,
    #[validate(length(min = 1, message = "Start date is required"))]
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl ProjectInput {
    pub fn normalize(mut self) -> Self {
        blank_to_none(&mut self.image_url);
        blank_to_none(&mut self.demo_url);
        blank_to_none(&mut self.github_url);
        blank_to_none(&mut self.end_date);
        self
    }

    pub fn dates(&self) -> Result<(NaiveDate, Option<NaiveDate>), FieldError> {
        let start = parse_date("startDate", &self.start_date)?;
        let end = self
            .end_date
            .as_deref()
            .map(|d| parse_date("endDate", d))
            .transpose()?;
        Ok((start, end))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SkillInput {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,
    pub level: SkillLevel,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

impl SkillInput {
    pub fn normalize(mut self) -> Self {
        blank_to_none(&mut self.icon);
        self
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceInput {
    #[validate(length(min = 1, max = 200, message = "Company is required"))]
    pub company: String,
    #[validate(length(min = 1, max = 200, message = "Position is required"))]
    pub position: String,
    #[validate(length(min = 1, max = 1000, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Start date is required"))]
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub featured: bool,
}

impl ExperienceInput {
    pub fn normalize(mut self) -> Self {
        blank_to_none(&mut self.end_date);
        self
    }

    /// A current position never has an end date.
    pub fn dates(&self) -> Result<(NaiveDate, Option<NaiveDate>), FieldError> {
        let start = parse_date("startDate", &self.start_date)?;
        if self.current {
            return Ok((start, None));
        }
        let end = self
            .end_date
            .as_deref()
            .map(|d| parse_date("endDate", d))
            .transpose()?;
        Ok((start, end))
    }
}

/// Public landing-page payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioData {
    pub personal_info: Option<PersonalInfo>,
    pub projects: Vec<Project>,
    pub skills: Vec<Skill>,
    pub experiences: Vec<Experience>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub total_projects: i64,
    pub featured_projects: i64,
    pub total_skills: i64,
    pub featured_skills: i64,
    pub total_experiences: i64,
    pub projects_completion_rate: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentJob {
    pub id: String,
    pub company: String,
    pub position: String,
    pub start_date: NaiveDate,
    pub duration_months: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentProject {
    pub id: String,
    pub title: String,
    pub featured: bool,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub recent_projects: Vec<RecentProject>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub last_updated: String,
    pub has_personal_info: bool,
}

/// Admin dashboard payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub overview: StatsOverview,
    pub current_job: Option<CurrentJob>,
    pub recent_activity: RecentActivity,
    pub skills_distribution: Vec<CategoryCount>,
    pub summary: StatsSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        assert_eq!(parse_date("startDate", "2024-08-01").unwrap(), expected);
        assert_eq!(
            parse_date("startDate", "2024-08-01T10:00:00Z").unwrap(),
            expected
        );

        let err = parse_date("endDate", "yesterday").unwrap_err();
        assert_eq!(err.field, "endDate");
    }

    #[test]
    fn test_skill_level_accepts_legacy_labels() {
        let level: SkillLevel = serde_json::from_str(r#""Avanzado""#).unwrap();
        assert_eq!(level, SkillLevel::Advanced);
        assert_eq!(serde_json::to_string(&level).unwrap(), r#""Advanced""#);
        assert_eq!(SkillLevel::parse("Intermedio"), Some(SkillLevel::Intermediate));
        assert_eq!(SkillLevel::parse("Guru"), None);
    }

    #[test]
    fn test_blank_urls_skip_validation() {
        let input: PersonalInfoInput = serde_json::from_value(serde_json::json!({
            "name": "Ana",
            "email": "ana@x.com",
            "phone": "555",
            "title": "Engineer",
            "description": "Builds things",
            "github": "",
            "linkedIn": "https://linkedin.com/in/ana"
        }))
        .unwrap();

        let input = input.normalize();
        assert!(input.validate().is_ok());
        assert_eq!(input.github, None);
        assert_eq!(input.linked_in.as_deref(), Some("https://linkedin.com/in/ana"));
    }

    #[test]
    fn test_current_experience_drops_end_date() {
        let input = ExperienceInput {
            company: "Acme".to_string(),
            position: "Dev".to_string(),
            description: "Work".to_string(),
            start_date: "2024-01-01".to_string(),
            end_date: Some("2024-06-01".to_string()),
            current: true,
            featured: false,
        };
        let (_, end) = input.dates().unwrap();
        assert_eq!(end, None);
    }

    #[test]
    fn test_project_input_defaults() {
        let input: ProjectInput = serde_json::from_value(serde_json::json!({
            "title": "Budget tool",
            "description": "Tracks spend",
            "technologies": "[\"Rust\"]",
            "startDate": "2024-01-01",
            "endDate": ""
        }))
        .unwrap();

        let input = input.normalize();
        assert!(!input.featured);
        assert_eq!(input.end_date, None);
        assert!(input.validate().is_ok());
    }
}
