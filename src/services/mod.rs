pub mod error;
pub mod metadata;
pub mod playlist;
pub mod rating;

pub use error::ServiceError;
