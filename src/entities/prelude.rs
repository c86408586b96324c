pub use super::films::Entity as Films;
pub use super::metadata_cache::Entity as MetadataCache;
pub use super::playlist_films::Entity as PlaylistFilms;
pub use super::playlists::Entity as Playlists;
pub use super::user_ratings::Entity as UserRatings;
pub use super::users::Entity as Users;
