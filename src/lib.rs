//! UniChance - program catalog search and admission fit scoring
//!
//! The library holds the catalog query engine (filter normalization,
//! predicate compilation, sort resolution, pagination) and the fit-scoring
//! engine, plus the PostgreSQL store and HTTP routes that expose them.

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_fit_score, CatalogQuery, Filter, FitScorer};
pub use models::{CatalogParams, Profile, ProgramCard, Requirements, ScoreResult, ScoringWeights};
