pub mod cache;
pub mod film;
pub mod playlist;
pub mod rating;
pub mod user;
