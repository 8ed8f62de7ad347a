// Several accessors exist for library callers and JSON consumers rather than the CLI
#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub type UserId = Uuid;
pub type ModuleId = Uuid;
pub type ScenarioId = Uuid;

/// A module counts as completed at or above this percentage.
pub const COMPLETION_THRESHOLD: f64 = 90.0;

pub const MAX_ETHICS_SCORE: u8 = 10;

/// Parses an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    s.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}

// Written as RFC 3339; read back from any form `parse_timestamp` accepts
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Teacher,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Teacher => "teacher",
            UserRole::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "student" | "s" => Some(UserRole::Student),
            "teacher" | "t" => Some(UserRole::Teacher),
            "admin" | "a" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    // Ordering used by the learning path
    pub fn rank(&self) -> u8 {
        match self {
            DifficultyLevel::Beginner => 1,
            DifficultyLevel::Intermediate => 2,
            DifficultyLevel::Advanced => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "beginner",
            DifficultyLevel::Intermediate => "intermediate",
            DifficultyLevel::Advanced => "advanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "beginner" | "1" => Some(DifficultyLevel::Beginner),
            "intermediate" | "2" => Some(DifficultyLevel::Intermediate),
            "advanced" | "3" => Some(DifficultyLevel::Advanced),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "Beginner",
            DifficultyLevel::Intermediate => "Intermediate",
            DifficultyLevel::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleCategory {
    AiBasics,
    Applications,
    EthicsBias,
    CriticalThinking,
    PracticalSkills,
}

impl ModuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleCategory::AiBasics => "ai_basics",
            ModuleCategory::Applications => "applications",
            ModuleCategory::EthicsBias => "ethics_bias",
            ModuleCategory::CriticalThinking => "critical_thinking",
            ModuleCategory::PracticalSkills => "practical_skills",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "ai_basics" | "basics" => Some(ModuleCategory::AiBasics),
            "applications" => Some(ModuleCategory::Applications),
            "ethics_bias" | "ethics" => Some(ModuleCategory::EthicsBias),
            "critical_thinking" => Some(ModuleCategory::CriticalThinking),
            "practical_skills" => Some(ModuleCategory::PracticalSkills),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModuleCategory::AiBasics => "AI Basics",
            ModuleCategory::Applications => "Applications",
            ModuleCategory::EthicsBias => "Ethics & Bias",
            ModuleCategory::CriticalThinking => "Critical Thinking",
            ModuleCategory::PracticalSkills => "Practical Skills",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    pub learning_preferences: BTreeMap<String, serde_json::Value>,
    // module id -> last reported completion percentage
    pub progress: BTreeMap<ModuleId, f64>,
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            role,
            created_at: Utc::now(),
            learning_preferences: BTreeMap::new(),
            progress: BTreeMap::new(),
        }
    }

    pub fn has_completed(&self, module_id: &ModuleId) -> bool {
        self.progress
            .get(module_id)
            .is_some_and(|p| *p >= COMPLETION_THRESHOLD)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    Interactive,
    Video,
    CaseStudy,
}

impl ContentKind {
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Text => "Text",
            ContentKind::Interactive => "Interactive",
            ContentKind::Video => "Video",
            ContentKind::CaseStudy => "Case Study",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub title: String,
    pub content: String,
}

impl ContentBlock {
    pub fn new(kind: ContentKind, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            content: content.into(),
        }
    }
}

// Multiple choice question; `correct` indexes into `options`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssessmentQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct: usize,
    pub explanation: String,
}

impl AssessmentQuestion {
    pub fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LearningModule {
    pub id: ModuleId,
    pub title: String,
    pub description: String,
    pub category: ModuleCategory,
    pub difficulty: DifficultyLevel,
    pub prerequisites: Vec<ModuleId>,
    pub content_blocks: Vec<ContentBlock>,
    pub scenarios: Vec<ScenarioId>,
    pub assessment_questions: Vec<AssessmentQuestion>,
    // minutes
    pub estimated_duration: u32,
}

impl LearningModule {
    pub const DEFAULT_DURATION: u32 = 30;

    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: ModuleCategory,
        difficulty: DifficultyLevel,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            category,
            difficulty,
            prerequisites: Vec::new(),
            content_blocks: Vec::new(),
            scenarios: Vec::new(),
            assessment_questions: Vec::new(),
            estimated_duration: Self::DEFAULT_DURATION,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioOption {
    pub text: String,
    pub consequence: String,
    // higher is more ethical, at most MAX_ETHICS_SCORE
    pub ethics_score: u8,
}

impl ScenarioOption {
    pub fn has_valid_score(&self) -> bool {
        self.ethics_score <= MAX_ETHICS_SCORE
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub id: ScenarioId,
    pub title: String,
    pub description: String,
    pub context: String,
    pub challenge: String,
    pub options: Vec<ScenarioOption>,
    pub ethical_considerations: Vec<String>,
    pub learning_objectives: Vec<String>,
}

impl Scenario {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            context: String::new(),
            challenge: String::new(),
            options: Vec::new(),
            ethical_considerations: Vec::new(),
            learning_objectives: Vec::new(),
        }
    }

    /// Highest scoring option, first one wins on ties.
    pub fn most_ethical_option(&self) -> Option<&ScenarioOption> {
        self.options
            .iter()
            .reduce(|best, o| if o.ethics_score > best.ethics_score { o } else { best })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProgress {
    pub user_id: UserId,
    pub module_id: ModuleId,
    pub completion_percentage: f64,
    // minutes
    pub time_spent: u32,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub last_accessed: DateTime<Utc>,
    pub quiz_scores: Vec<f64>,
    pub scenario_completions: Vec<ScenarioId>,
}

impl UserProgress {
    pub fn new(user_id: UserId, module_id: ModuleId) -> Self {
        Self {
            user_id,
            module_id,
            completion_percentage: 0.0,
            time_spent: 0,
            last_accessed: Utc::now(),
            quiz_scores: Vec::new(),
            scenario_completions: Vec::new(),
        }
    }

    pub fn average_quiz_score(&self) -> Option<f64> {
        mean(&self.quiz_scores)
    }

    pub fn is_completed(&self) -> bool {
        self.completion_percentage >= COMPLETION_THRESHOLD
    }

    pub fn is_in_progress(&self) -> bool {
        self.completion_percentage > 0.0 && !self.is_completed()
    }
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

// What the learner just submitted; only the known fields are typed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearnerResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub message: String,
    pub suggestions: Vec<String>,
    pub next_steps: Vec<String>,
    pub difficulty_adjustment: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentProgressSummary {
    pub student_id: UserId,
    pub student_name: String,
    pub completion_rate: f64,
    pub time_spent: u32,
    pub last_active: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleCompletionRate {
    pub module_id: ModuleId,
    pub title: String,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeacherDashboard {
    pub total_students: usize,
    pub student_progress: Vec<StudentProgressSummary>,
    pub module_completion_rates: Vec<ModuleCompletionRate>,
    pub common_challenges: Vec<String>,
    pub recommendations: Vec<String>,
}

impl TeacherDashboard {
    pub fn completion_rate_for(&self, module_id: &ModuleId) -> Option<f64> {
        self.module_completion_rates
            .iter()
            .find(|m| &m.module_id == module_id)
            .map(|m| m.completion_rate)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentInfo {
    pub name: String,
    pub email: String,
    pub join_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentAnalytics {
    pub student_info: StudentInfo,
    pub overall_progress: f64,
    pub total_time_spent: u32,
    pub modules_completed: usize,
    pub modules_in_progress: usize,
    pub average_quiz_score: f64,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub next_recommendations: Vec<String>,
}

// JSON output wrapper for CLI
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
