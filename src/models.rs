use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::questionnaire::Question;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StressLevel {
    Low,
    Mild,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressScore {
    pub total: u32,
    pub level: StressLevel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerSelection {
    pub position: u32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentAnswer {
    pub position: u32,
    pub label: String,
    pub value: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub total: u32,
    pub level: StressLevel,
    pub answers: Vec<AssessmentAnswer>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(default)]
    pub last_activity_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Calm,
    Anxious,
    Sad,
    Irritable,
    Chill,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodLog {
    pub mood: Mood,
    pub intensity: u8,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub streak: StreakState,
    #[serde(default)]
    pub assessments: Vec<AssessmentRecord>,
    #[serde(default)]
    pub mood_logs: Vec<MoodLog>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppData {
    pub schema_version: u32,
    #[serde(default)]
    pub users: BTreeMap<String, UserRecord>,
}

impl Default for AppData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            users: BTreeMap::new(),
        }
    }
}

impl AppData {
    pub fn user(&self, user: &str) -> Option<&UserRecord> {
        self.users.get(user)
    }

    pub fn user_mut(&mut self, user: &str) -> &mut UserRecord {
        self.users.entry(user.to_string()).or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitAssessmentRequest {
    pub user: String,
    pub answers: Vec<AnswerSelection>,
}

#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub user: String,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user: String,
}

#[derive(Debug, Deserialize)]
pub struct MoodLogRequest {
    pub user: String,
    pub mood: Mood,
    pub intensity: Option<u8>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub scale: Vec<&'static str>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StreakResponse {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_date: Option<NaiveDate>,
}

impl From<StreakState> for StreakResponse {
    fn from(state: StreakState) -> Self {
        Self {
            current_streak: state.current_streak,
            longest_streak: state.longest_streak,
            last_activity_date: state.last_activity_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StreakStatusResponse {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_date: Option<NaiveDate>,
    pub lapsed: bool,
}

#[derive(Debug, Serialize)]
pub struct DailyMoodPoint {
    pub date: String,
    pub entries: u32,
    pub avg_intensity: f64,
}

#[derive(Debug, Serialize)]
pub struct WeeklyMoodPoint {
    pub week: String,
    pub start_date: String,
    pub end_date: String,
    pub entries: u32,
    pub days_counted: u8,
    pub avg_intensity: f64,
    pub avg_entries_per_day: f64,
}

#[derive(Debug, Serialize)]
pub struct MoodSummary {
    pub last_7_days: Vec<DailyMoodPoint>,
    pub weekly: Vec<WeeklyMoodPoint>,
}
