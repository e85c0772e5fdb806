use serde::{Deserialize, Serialize};
use validator::Validate;

/// Raw catalog listing query string
///
/// Every field is kept as text so that malformed values never reject the
/// request; `Filter::from_params` decides what is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogParams {
    pub q: Option<String>,
    pub countries: Option<String>,
    pub levels: Option<String>,
    pub fields: Option<String>,
    pub currency: Option<String>,
    pub min_tuition: Option<String>,
    pub max_tuition: Option<String>,
    pub scholarship: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl CatalogParams {
    /// Collect decoded query pairs; the first occurrence of a key wins and
    /// unknown keys are ignored
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "q" => &mut params.q,
                "countries" => &mut params.countries,
                "levels" => &mut params.levels,
                "fields" => &mut params.fields,
                "currency" => &mut params.currency,
                "min_tuition" => &mut params.min_tuition,
                "max_tuition" => &mut params.max_tuition,
                "scholarship" => &mut params.scholarship,
                "sort" => &mut params.sort,
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

/// Request to score the caller's profile against a program
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub program_id: Option<String>,
}

/// Request to add a program to the caller's shortlist
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShortlistAddRequest {
    #[serde(default)]
    pub program_id: Option<String>,
}

/// Full replacement of the caller's profile
///
/// Omitted fields are stored as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileInput {
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub gpa: Option<f64>,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub gpa_scale: Option<f64>,
    #[validate(range(min = 0.0, max = 9.0))]
    #[serde(default)]
    pub ielts: Option<f64>,
    #[validate(range(min = 0, max = 120))]
    #[serde(default)]
    pub toefl: Option<i32>,
    #[validate(range(min = 0, max = 1600))]
    #[serde(default)]
    pub sat: Option<i32>,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub budget_year: Option<f64>,
    #[validate(length(equal = 3))]
    #[serde(default)]
    pub budget_currency: Option<String>,
    #[serde(default)]
    pub awards: Option<String>,
    #[serde(default)]
    pub achievements_summary: Option<String>,
}

impl ProfileInput {
    /// Blank currency is the same as no currency
    pub fn normalized(mut self) -> Self {
        self.budget_currency = self
            .budget_currency
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty());
        self
    }
}
