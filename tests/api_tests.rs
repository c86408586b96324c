//! Integration tests for auth, playlist CRUD, and ownership rules.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{delete_json, get_json, post_json, put_json, register_user, spawn_app};

#[tokio::test]
async fn requests_without_credentials_are_rejected() {
    let app = spawn_app().await;

    get_json(&app, "/api/playlists", None, StatusCode::UNAUTHORIZED).await;
    get_json(
        &app,
        "/api/playlists",
        Some("not-a-real-key"),
        StatusCode::UNAUTHORIZED,
    )
    .await;
}

#[tokio::test]
async fn register_login_and_me() {
    let app = spawn_app().await;

    let api_key = register_user(&app, "alice").await;

    // Duplicate username is rejected.
    post_json(
        &app,
        "/api/auth/register",
        None,
        json!({ "username": "alice", "password": "hunter2hunter2" }),
        StatusCode::CONFLICT,
    )
    .await;

    post_json(
        &app,
        "/api/auth/login",
        None,
        json!({ "username": "alice", "password": "wrong-password" }),
        StatusCode::UNAUTHORIZED,
    )
    .await;

    let body = post_json(
        &app,
        "/api/auth/login",
        None,
        json!({ "username": "alice", "password": "hunter2hunter2" }),
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["api_key"], api_key.as_str());

    let body = get_json(&app, "/api/auth/me", Some(&api_key), StatusCode::OK).await;
    assert_eq!(body["data"]["username"], "alice");
}

#[tokio::test]
async fn register_validates_input() {
    let app = spawn_app().await;

    post_json(
        &app,
        "/api/auth/register",
        None,
        json!({ "username": "ab", "password": "hunter2hunter2" }),
        StatusCode::BAD_REQUEST,
    )
    .await;

    post_json(
        &app,
        "/api/auth/register",
        None,
        json!({ "username": "bob", "password": "short" }),
        StatusCode::BAD_REQUEST,
    )
    .await;
}

#[tokio::test]
async fn playlist_crud_round_trip() {
    let app = spawn_app().await;
    let key = register_user(&app, "alice").await;

    let body = post_json(
        &app,
        "/api/playlists",
        Some(&key),
        json!({ "name": "  Watch Later  ", "description": "rainy days" }),
        StatusCode::CREATED,
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["name"], "Watch Later");
    assert_eq!(body["data"]["films"].as_array().unwrap().len(), 0);

    let body = get_json(&app, "/api/playlists", Some(&key), StatusCode::OK).await;
    let list = body["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["film_count"], 0);
    assert_eq!(list[0]["description"], "rainy days");

    let body = put_json(
        &app,
        &format!("/api/playlists/{id}"),
        Some(&key),
        json!({ "name": "Weekend", "description": null }),
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["data"]["name"], "Weekend");
    assert!(body["data"]["description"].is_null());

    delete_json(
        &app,
        &format!("/api/playlists/{id}"),
        Some(&key),
        StatusCode::OK,
    )
    .await;

    get_json(
        &app,
        &format!("/api/playlists/{id}"),
        Some(&key),
        StatusCode::NOT_FOUND,
    )
    .await;
}

#[tokio::test]
async fn playlist_name_validation() {
    let app = spawn_app().await;
    let key = register_user(&app, "alice").await;

    post_json(
        &app,
        "/api/playlists",
        Some(&key),
        json!({ "name": "   " }),
        StatusCode::BAD_REQUEST,
    )
    .await;

    post_json(
        &app,
        "/api/playlists",
        Some(&key),
        json!({ "name": "x".repeat(256) }),
        StatusCode::BAD_REQUEST,
    )
    .await;

    post_json(
        &app,
        "/api/playlists",
        Some(&key),
        json!({ "name": "ok", "description": "d".repeat(1001) }),
        StatusCode::BAD_REQUEST,
    )
    .await;
}

#[tokio::test]
async fn duplicate_names_are_scoped_per_owner() {
    let app = spawn_app().await;
    let alice = register_user(&app, "alice").await;
    let bob = register_user(&app, "bob").await;

    post_json(
        &app,
        "/api/playlists",
        Some(&alice),
        json!({ "name": "Favorites" }),
        StatusCode::CREATED,
    )
    .await;

    // Same owner, same name: rejected.
    post_json(
        &app,
        "/api/playlists",
        Some(&alice),
        json!({ "name": "Favorites" }),
        StatusCode::CONFLICT,
    )
    .await;

    // Different owner, same name: fine.
    post_json(
        &app,
        "/api/playlists",
        Some(&bob),
        json!({ "name": "Favorites" }),
        StatusCode::CREATED,
    )
    .await;

    // Renaming onto your own other playlist is rejected too.
    let body = post_json(
        &app,
        "/api/playlists",
        Some(&alice),
        json!({ "name": "Second" }),
        StatusCode::CREATED,
    )
    .await;
    let second_id = body["data"]["id"].as_i64().unwrap();

    put_json(
        &app,
        &format!("/api/playlists/{second_id}"),
        Some(&alice),
        json!({ "name": "Favorites" }),
        StatusCode::CONFLICT,
    )
    .await;

    // A no-op rename of the same playlist keeps its own name.
    put_json(
        &app,
        &format!("/api/playlists/{second_id}"),
        Some(&alice),
        json!({ "name": "Second" }),
        StatusCode::OK,
    )
    .await;
}

#[tokio::test]
async fn playlists_are_private_to_their_owner() {
    let app = spawn_app().await;
    let alice = register_user(&app, "alice").await;
    let bob = register_user(&app, "bob").await;

    let body = post_json(
        &app,
        "/api/playlists",
        Some(&alice),
        json!({ "name": "Favorites" }),
        StatusCode::CREATED,
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();

    get_json(
        &app,
        &format!("/api/playlists/{id}"),
        Some(&bob),
        StatusCode::FORBIDDEN,
    )
    .await;

    put_json(
        &app,
        &format!("/api/playlists/{id}"),
        Some(&bob),
        json!({ "name": "Hijacked" }),
        StatusCode::FORBIDDEN,
    )
    .await;

    delete_json(
        &app,
        &format!("/api/playlists/{id}"),
        Some(&bob),
        StatusCode::FORBIDDEN,
    )
    .await;

    post_json(
        &app,
        &format!("/api/playlists/{id}/films"),
        Some(&bob),
        json!({ "imdb_id": "tt1375666" }),
        StatusCode::FORBIDDEN,
    )
    .await;

    // Nothing changed for the owner.
    let body = get_json(
        &app,
        &format!("/api/playlists/{id}"),
        Some(&alice),
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["data"]["name"], "Favorites");
    assert_eq!(body["data"]["films"].as_array().unwrap().len(), 0);

    // Bob's own listing is empty.
    let body = get_json(&app, "/api/playlists", Some(&bob), StatusCode::OK).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    get_json(
        &app,
        "/api/playlists/9999",
        Some(&bob),
        StatusCode::NOT_FOUND,
    )
    .await;
}

#[tokio::test]
async fn membership_is_idempotent() {
    let app = spawn_app().await;
    let key = register_user(&app, "alice").await;

    let body = post_json(
        &app,
        "/api/playlists",
        Some(&key),
        json!({ "name": "Favorites" }),
        StatusCode::CREATED,
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let body = post_json(
        &app,
        &format!("/api/playlists/{id}/films"),
        Some(&key),
        json!({ "imdb_id": "tt1375666" }),
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["data"]["message"], "Film added to playlist.");
    let film_id = body["data"]["film"]["id"].as_i64().unwrap();

    let body = post_json(
        &app,
        &format!("/api/playlists/{id}/films"),
        Some(&key),
        json!({ "imdb_id": "tt1375666" }),
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["data"]["message"], "Film is already in this playlist.");

    let body = get_json(
        &app,
        &format!("/api/playlists/{id}"),
        Some(&key),
        StatusCode::OK,
    )
    .await;
    let films = body["data"]["films"].as_array().unwrap();
    assert_eq!(films.len(), 1);
    assert_eq!(films[0]["imdb_id"], "tt1375666");

    delete_json(
        &app,
        &format!("/api/playlists/{id}/films/{film_id}"),
        Some(&key),
        StatusCode::OK,
    )
    .await;

    // Removing a film that is not in the playlist is an error.
    delete_json(
        &app,
        &format!("/api/playlists/{id}/films/{film_id}"),
        Some(&key),
        StatusCode::NOT_FOUND,
    )
    .await;
}

#[tokio::test]
async fn deleting_a_playlist_keeps_films_and_ratings() {
    let app = spawn_app().await;
    let key = register_user(&app, "alice").await;

    let body = post_json(
        &app,
        "/api/playlists",
        Some(&key),
        json!({ "name": "Favorites" }),
        StatusCode::CREATED,
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let body = post_json(
        &app,
        &format!("/api/playlists/{id}/films"),
        Some(&key),
        json!({ "imdb_id": "tt1375666" }),
        StatusCode::OK,
    )
    .await;
    let film_id = body["data"]["film"]["id"].as_i64().unwrap();

    post_json(
        &app,
        &format!("/api/films/{film_id}/rate"),
        Some(&key),
        json!({ "rating": 8 }),
        StatusCode::OK,
    )
    .await;

    delete_json(
        &app,
        &format!("/api/playlists/{id}"),
        Some(&key),
        StatusCode::OK,
    )
    .await;

    // Catalog row and the rating both survive.
    let film = app
        .state
        .store
        .find_film_by_imdb_id("tt1375666")
        .await
        .unwrap();
    assert!(film.is_some());

    let body = get_json(
        &app,
        &format!("/api/films/{film_id}/my-rating"),
        Some(&key),
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["data"]["rating"], 8);
}

#[tokio::test]
async fn system_status_reports_database_health() {
    let app = spawn_app().await;

    let body = get_json(&app, "/api/system/status", None, StatusCode::OK).await;
    assert_eq!(body["data"]["database"], "ok");
    assert!(body["data"]["version"].is_string());
}
