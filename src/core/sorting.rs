use crate::core::filters::SortKey;

/// Rank-based ordering used when nothing else applies, and as the
/// tie-break after relevance
pub const DEFAULT_ORDER: &str =
    "universities.qs_rank ASC NULLS LAST, universities.the_rank ASC NULLS LAST, programs.title ASC";

/// Appended to every ordering so equal sort keys still page deterministically
pub const FINAL_TIE_BREAK: &str = "programs.id ASC";

/// Resolved ORDER BY for a catalog listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    /// `ts_rank` descending against the search phrase bound at `slot`
    Relevance { slot: usize },
    TuitionAsc,
    TuitionDesc,
    QsRank,
    TheRank,
    Default,
}

impl OrderBy {
    /// Pick the ordering for a request; first match wins
    ///
    /// `relevance_slot` is the parameter slot of the compiled text match,
    /// present only when the request searches.
    pub fn resolve(sort: Option<SortKey>, relevance_slot: Option<usize>) -> Self {
        match (relevance_slot, sort) {
            (Some(slot), None | Some(SortKey::Relevance)) => OrderBy::Relevance { slot },
            (_, Some(SortKey::TuitionAsc)) => OrderBy::TuitionAsc,
            (_, Some(SortKey::TuitionDesc)) => OrderBy::TuitionDesc,
            (_, Some(SortKey::Qs)) => OrderBy::QsRank,
            (_, Some(SortKey::The)) => OrderBy::TheRank,
            _ => OrderBy::Default,
        }
    }

    pub fn to_sql(&self) -> String {
        let primary = match self {
            OrderBy::Relevance { slot } => format!(
                "ts_rank(programs.search_vector, plainto_tsquery('simple', ${slot})) DESC, {DEFAULT_ORDER}"
            ),
            OrderBy::TuitionAsc => "programs.tuition_amount ASC NULLS LAST".to_string(),
            OrderBy::TuitionDesc => "programs.tuition_amount DESC NULLS LAST".to_string(),
            OrderBy::QsRank => "universities.qs_rank ASC NULLS LAST".to_string(),
            OrderBy::TheRank => "universities.the_rank ASC NULLS LAST".to_string(),
            OrderBy::Default => DEFAULT_ORDER.to_string(),
        };
        format!("{primary}, {FINAL_TIE_BREAK}")
    }
}
