pub mod prelude;

pub mod films;
pub mod metadata_cache;
pub mod playlist_films;
pub mod playlists;
pub mod user_ratings;
pub mod users;
