//! Ownership rules for playlists. Every playlist is private to its
//! owner; there is no sharing or admin override.

use crate::entities::playlists;

#[must_use]
pub const fn can_view(user_id: i32, playlist: &playlists::Model) -> bool {
    playlist.user_id == user_id
}

#[must_use]
pub const fn can_update(user_id: i32, playlist: &playlists::Model) -> bool {
    playlist.user_id == user_id
}

#[must_use]
pub const fn can_delete(user_id: i32, playlist: &playlists::Model) -> bool {
    playlist.user_id == user_id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist_owned_by(user_id: i32) -> playlists::Model {
        playlists::Model {
            id: 1,
            user_id,
            name: "Favorites".to_string(),
            description: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn owner_has_full_access() {
        let playlist = playlist_owned_by(7);
        assert!(can_view(7, &playlist));
        assert!(can_update(7, &playlist));
        assert!(can_delete(7, &playlist));
    }

    #[test]
    fn non_owner_has_no_access() {
        let playlist = playlist_owned_by(7);
        assert!(!can_view(8, &playlist));
        assert!(!can_update(8, &playlist));
        assert!(!can_delete(8, &playlist));
    }
}
