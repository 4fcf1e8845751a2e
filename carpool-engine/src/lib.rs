pub mod engine;
pub mod error;
pub mod filters;

pub use engine::RideEngine;
pub use error::RideError;
pub use filters::RideFilters;
