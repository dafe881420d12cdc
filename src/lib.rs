//! Bookshelf: a GraphQL catalog of books, authors and users
//!
//! The resolver engine lives in [`services::CatalogService`]. The GraphQL
//! schema in [`graphql`] and the HTTP routes in [`api`] are thin layers on top.

pub mod api;
pub mod config;
pub mod db;
pub mod graphql;
pub mod services;

use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::graphql::CatalogSchema;
use crate::services::CatalogService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub catalog: Arc<CatalogService>,
    pub schema: CatalogSchema,
}

impl AppState {
    /// Compose the services and schema on top of an open database
    pub fn new(config: Arc<Config>, db: Database) -> Self {
        let catalog = Arc::new(CatalogService::from_config(db.clone(), &config));
        let schema = graphql::build_schema(catalog.clone());

        Self {
            config,
            db,
            catalog,
            schema,
        }
    }
}
