// Service exports
pub mod fit;
pub mod postgres;

pub use fit::{AdmissionStore, FitError, FitService};
pub use postgres::{PostgresClient, PostgresError};
