use std::collections::BTreeSet;
use std::fmt;

use crate::models::CatalogParams;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 50;

/// Explicit sort keys accepted by the catalog listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Relevance,
    TuitionAsc,
    TuitionDesc,
    Qs,
    The,
}

impl SortKey {
    /// Parse a `sort` query value; unknown keys are treated as unset
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "relevance" => Some(SortKey::Relevance),
            "tuition_asc" => Some(SortKey::TuitionAsc),
            "tuition_desc" => Some(SortKey::TuitionDesc),
            "qs" => Some(SortKey::Qs),
            "the" => Some(SortKey::The),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::TuitionAsc => "tuition_asc",
            SortKey::TuitionDesc => "tuition_desc",
            SortKey::Qs => "qs",
            SortKey::The => "the",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical catalog search request
///
/// Built once per request by [`Filter::from_params`]. Empty sets and `None`
/// values mean "no constraint on this axis".
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub query: Option<String>,
    pub countries: BTreeSet<String>,
    pub levels: BTreeSet<String>,
    pub fields: BTreeSet<String>,
    pub currency: Option<String>,
    pub min_tuition: Option<f64>,
    pub max_tuition: Option<f64>,
    pub scholarship: Option<bool>,
    pub sort: Option<SortKey>,
    pub page: u32,
    pub limit: u32,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            query: None,
            countries: BTreeSet::new(),
            levels: BTreeSet::new(),
            fields: BTreeSet::new(),
            currency: None,
            min_tuition: None,
            max_tuition: None,
            scholarship: None,
            sort: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Filter {
    /// Build a canonical filter from raw query parameters
    ///
    /// Never fails: malformed numbers and booleans are dropped, page and limit
    /// fall back to their defaults.
    pub fn from_params(params: &CatalogParams) -> Self {
        Self {
            query: params.q.clone(),
            countries: split_csv(params.countries.as_deref()),
            levels: split_csv(params.levels.as_deref()),
            fields: split_csv(params.fields.as_deref()),
            currency: params.currency.clone(),
            min_tuition: parse_decimal(params.min_tuition.as_deref()),
            max_tuition: parse_decimal(params.max_tuition.as_deref()),
            scholarship: parse_flag(params.scholarship.as_deref()),
            sort: params.sort.as_deref().and_then(SortKey::parse),
            page: clamp_page(parse_integer(params.page.as_deref())),
            limit: clamp_limit(parse_integer(params.limit.as_deref())),
        }
        .normalized()
    }

    /// Bring every field into canonical form. Idempotent.
    pub fn normalized(self) -> Self {
        Self {
            query: non_blank(self.query),
            countries: clean_set(self.countries),
            levels: clean_set(self.levels),
            fields: clean_set(self.fields),
            currency: non_blank(self.currency),
            min_tuition: self.min_tuition.filter(|v| v.is_finite()),
            max_tuition: self.max_tuition.filter(|v| v.is_finite()),
            scholarship: self.scholarship,
            sort: self.sort,
            page: clamp_page(Some(i64::from(self.page))),
            limit: clamp_limit(Some(i64::from(self.limit))),
        }
    }

    /// Search phrase, if the request carries one
    pub fn search_phrase(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

/// Split a comma-separated set, trimming entries and dropping blanks
pub fn split_csv(raw: Option<&str>) -> BTreeSet<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Page numbers below 1 (or unparseable) become 1
pub fn clamp_page(raw: Option<i64>) -> u32 {
    match raw {
        Some(p) if p >= 1 => u32::try_from(p).unwrap_or(u32::MAX),
        _ => DEFAULT_PAGE,
    }
}

/// Non-positive limits become the default, oversized ones the maximum
pub fn clamp_limit(raw: Option<i64>) -> u32 {
    match raw {
        Some(l) if l <= 0 => DEFAULT_LIMIT,
        Some(l) if l > i64::from(MAX_LIMIT) => MAX_LIMIT,
        Some(l) => l as u32,
        None => DEFAULT_LIMIT,
    }
}

fn parse_integer(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

fn parse_decimal(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

// "true" is true, any other non-blank value is false, blank is unset
fn parse_flag(raw: Option<&str>) -> Option<bool> {
    let value = raw?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value == "true")
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_set(set: BTreeSet<String>) -> BTreeSet<String> {
    set.into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
