// Core algorithm exports
pub mod filters;
pub mod pagination;
pub mod predicates;
pub mod scoring;
pub mod sorting;

pub use filters::{Filter, SortKey, DEFAULT_LIMIT, MAX_LIMIT};
pub use pagination::{CatalogQuery, PageWindow};
pub use predicates::{BindValue, Predicate, PredicateSet};
pub use scoring::{calculate_fit_score, FitScorer};
pub use sorting::OrderBy;
