pub mod calculations;
pub mod db;
pub mod models;
pub mod services;

pub use db::repository::{CalculationRepository, RepositoryError};
pub use models::*;
