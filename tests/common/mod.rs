//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use bookshelf::config::Config;
use bookshelf::db::Database;
use bookshelf::services::{CatalogService, NewBook, NewUser, Principal};

pub const PASSWORD: &str = "salainen";

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some("integration-test-secret".to_string()),
        // bcrypt minimum, keeps the suite fast
        "BCRYPT_COST" => Some("4".to_string()),
        _ => None,
    })
    .expect("test config")
}

pub async fn catalog() -> Arc<CatalogService> {
    catalog_with_db().await.0
}

/// A catalog plus a handle on its database, for tests that tamper with the store
pub async fn catalog_with_db() -> (Arc<CatalogService>, Database) {
    let db = Database::connect_in_memory().await.expect("in-memory database");
    let catalog = Arc::new(CatalogService::from_config(db.clone(), &test_config()));
    (catalog, db)
}

/// Create a user, log in, and resolve the issued token
pub async fn login_as(catalog: &CatalogService, username: &str) -> Principal {
    catalog
        .create_user(NewUser {
            username: username.to_string(),
            password: Some(PASSWORD.to_string()),
            favorite_genre: Some("sci-fi".to_string()),
        })
        .await
        .expect("create user");

    let token = catalog.login(username, PASSWORD).await.expect("login");
    catalog
        .credentials()
        .resolve_principal(&token)
        .expect("token resolves")
}

pub fn new_book(title: &str, author: &str, genres: &[&str]) -> NewBook {
    NewBook {
        title: title.to_string(),
        author: author.to_string(),
        published: 1965,
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}
