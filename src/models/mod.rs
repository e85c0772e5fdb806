// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ProgramCard, Profile, Requirements, ScoreResult, ScoringWeights, University, UniversityLink, ProgramSummary, ShortlistItem};
pub use requests::{CatalogParams, ScoreRequest, ShortlistAddRequest, ProfileInput};
pub use responses::{CatalogResponse, ScoreResponse, ProfileResponse, ShortlistResponse, HealthResponse, ErrorResponse};
