pub mod data;
pub mod health;
pub mod index;

pub use data::get_data;
pub use health::{health_check, HealthResponse};
pub use index::index;
