use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo::Child;

/// Request body for creating a child profile (end of the setup wizard).
#[derive(Debug, Deserialize)]
pub struct CreateChildRequest {
    pub display_name: String,
    pub date_of_birth: Date,
    pub grade: Option<String>,
    pub avatar: Option<String>,
    #[serde(default)]
    pub learning_styles: Vec<String>,
    #[serde(default)]
    pub sel_strengths: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub story_preferences: Vec<String>,
    #[serde(default)]
    pub sel_challenges: Vec<String>,
    pub relationship_to_parent: Option<String>,
}

/// Full profile replace; gamification state is not editable through this path.
#[derive(Debug, Deserialize)]
pub struct UpdateChildRequest {
    pub display_name: String,
    pub date_of_birth: Date,
    pub grade: Option<String>,
    pub avatar: Option<String>,
    #[serde(default)]
    pub learning_styles: Vec<String>,
    #[serde(default)]
    pub sel_strengths: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub story_preferences: Vec<String>,
    #[serde(default)]
    pub sel_challenges: Vec<String>,
    pub relationship_to_parent: Option<String>,
    #[serde(default = "default_status")]
    pub creation_status: String,
}

fn default_status() -> String {
    "completed".to_string()
}

#[derive(Debug, Serialize)]
pub struct ChildResponse {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub display_name: String,
    pub date_of_birth: Date,
    pub grade: Option<String>,
    pub avatar: Option<String>,
    pub learning_styles: Vec<String>,
    pub sel_strengths: Vec<String>,
    pub interests: Vec<String>,
    pub story_preferences: Vec<String>,
    pub sel_challenges: Vec<String>,
    pub relationship_to_parent: Option<String>,
    pub streak_count: i32,
    pub xp_points: i32,
    pub badges: Vec<String>,
    pub daily_check_in_completed: bool,
    pub last_check_in_date: Option<Date>,
    pub creation_status: String,
    pub created_at: OffsetDateTime,
}

impl From<Child> for ChildResponse {
    fn from(c: Child) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            display_name: c.display_name,
            date_of_birth: c.date_of_birth,
            grade: c.grade,
            avatar: c.avatar,
            learning_styles: c.learning_styles,
            sel_strengths: c.sel_strengths,
            interests: c.interests,
            story_preferences: c.story_preferences,
            sel_challenges: c.sel_challenges,
            relationship_to_parent: c.relationship_to_parent,
            streak_count: c.streak_count,
            xp_points: c.xp_points,
            badges: c.badges,
            daily_check_in_completed: c.daily_check_in_completed,
            last_check_in_date: c.last_check_in_date,
            creation_status: c.creation_status,
            created_at: c.created_at,
        }
    }
}

/// Response for a daily check-in. `new_badges` holds only the badges this
/// check-in awarded.
#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub child: ChildResponse,
    pub new_badges: Vec<String>,
    pub already_completed: bool,
}
