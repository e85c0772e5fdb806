use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of the catalog listing: a program joined with its university
///
/// University fields are never optional as a whole because the listing uses
/// an inner join; programs without a university never become cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramCard {
    pub id: Uuid,
    pub title: String,
    pub degree_level: String,
    pub field: String,
    pub language: String,
    pub tuition_amount: Option<f64>,
    pub tuition_currency: Option<String>,
    pub has_scholarship: bool,
    pub scholarship_type: Option<String>,
    pub scholarship_percent_min: Option<i32>,
    pub scholarship_percent_max: Option<i32>,
    pub university_id: Uuid,
    pub university_name: String,
    pub country_code: String,
    pub city: Option<String>,
    pub qs_rank: Option<i32>,
    pub the_rank: Option<i32>,
}

/// Applicant profile, one per user
///
/// GPA is only meaningful together with `gpa_scale`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub gpa: Option<f64>,
    pub gpa_scale: Option<f64>,
    pub ielts: Option<f64>,
    pub toefl: Option<i32>,
    pub sat: Option<i32>,
    pub budget_year: Option<f64>,
    pub budget_currency: Option<String>,
    pub awards: Option<String>,
    pub achievements_summary: Option<String>,
}

/// Minimum admission thresholds for one program
///
/// Every field is an independent floor; `None` means the program states no
/// floor for that metric. A missing record is the same as `Requirements::default()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    pub min_gpa: Option<f64>,
    pub min_ielts: Option<f64>,
    pub min_toefl: Option<i32>,
    pub min_sat: Option<i32>,
}

/// Output of the fit-scoring engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub reasons: Vec<String>,
}

/// Point weights of the fit-scoring axes
///
/// The axes never add up to more than 100; whatever is left is reserved and
/// always scores zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub academic: f64,
    pub language: f64,
    pub test: f64,
}

impl ScoringWeights {
    pub const MAX_TOTAL: f64 = 100.0;

    /// Points that no axis can earn
    pub fn reserved(&self) -> f64 {
        (Self::MAX_TOTAL - self.academic - self.language - self.test).max(0.0)
    }

    pub fn is_valid(&self) -> bool {
        let axes = [self.academic, self.language, self.test];
        axes.iter().all(|w| w.is_finite() && *w >= 0.0)
            && axes.iter().sum::<f64>() <= Self::MAX_TOTAL
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            academic: 40.0,
            language: 30.0,
            test: 20.0,
        }
    }
}

/// University with its links and a capped list of programs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct University {
    pub id: Uuid,
    pub name: String,
    pub country_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qs_rank: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub the_rank: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub links: Vec<UniversityLink>,
    pub programs: Vec<ProgramSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniversityLink {
    pub id: Uuid,
    pub link_type: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub is_official: bool,
    pub priority: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_verified_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramSummary {
    pub id: Uuid,
    pub title: String,
    pub degree_level: String,
    pub field: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuition_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuition_currency: Option<String>,
    pub has_scholarship: bool,
}

/// Program saved in a user's shortlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortlistItem {
    pub program_id: Uuid,
    pub title: String,
    pub university: String,
    pub country: String,
    pub degree: String,
    pub field: String,
    pub tuition_amount: Option<f64>,
    pub tuition_currency: Option<String>,
    pub has_scholarship: bool,
    pub qs_rank: Option<i32>,
    pub the_rank: Option<i32>,
}
