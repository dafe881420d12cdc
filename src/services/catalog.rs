//! Catalog service: the resolver engine behind every schema operation
//!
//! Each method is one operation. State-changing operations run
//! authorization, then validation, then persistence, and finally publish a
//! domain event. The acting principal is always passed in explicitly.

use std::sync::Arc;

use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::db::{
    AuthorRecord, BookFilter, BookRecord, CreateAuthor, CreateBook, CreateUser, Database,
    UserRecord,
};
use crate::db::sqlite_helpers::is_unique_violation;

use super::credentials::{CredentialService, CredentialsConfig, Principal};
use super::error::CatalogError;
use super::events::{BookEvent, BookEventBus, EventBusConfig};
use super::guard::require_authenticated;
use super::validation::{validate_author_edit, validate_book_input, validate_user_input};

type CatalogResult<T> = Result<T, CatalogError>;

/// Arguments of `addBook`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    /// Author name; the author is created if it does not exist yet
    pub author: String,
    pub published: i32,
    pub genres: Vec<String>,
}

/// Arguments of `createUser`
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: Option<String>,
    pub favorite_genre: Option<String>,
}

/// A user as returned to callers; never includes the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub favorite_genre: String,
}

impl UserProfile {
    fn from_record(record: UserRecord, default_favorite_genre: &str) -> Self {
        Self {
            id: record.id,
            username: record.username,
            favorite_genre: record
                .favorite_genre
                .filter(|g| !g.is_empty())
                .unwrap_or_else(|| default_favorite_genre.to_string()),
        }
    }
}

/// Treat an empty filter argument like an absent one
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

pub struct CatalogService {
    db: Database,
    credentials: CredentialService,
    events: Arc<BookEventBus>,
    default_favorite_genre: String,
}

impl CatalogService {
    pub fn new(
        db: Database,
        credentials: CredentialService,
        events: Arc<BookEventBus>,
        default_favorite_genre: impl Into<String>,
    ) -> Self {
        Self {
            db,
            credentials,
            events,
            default_favorite_genre: default_favorite_genre.into(),
        }
    }

    /// Wire the service from application configuration
    pub fn from_config(db: Database, config: &Config) -> Self {
        let events = BookEventBus::new(EventBusConfig {
            channel_capacity: config.event_bus_capacity,
        });
        Self::new(
            db,
            CredentialService::new(CredentialsConfig::from(config)),
            Arc::new(events),
            config.default_favorite_genre.clone(),
        )
    }

    pub fn credentials(&self) -> &CredentialService {
        &self.credentials
    }

    pub fn events(&self) -> &Arc<BookEventBus> {
        &self.events
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub async fn book_count(&self) -> CatalogResult<i64> {
        self.db.books().count().await.map_err(CatalogError::internal)
    }

    pub async fn author_count(&self) -> CatalogResult<i64> {
        self.db.authors().count().await.map_err(CatalogError::internal)
    }

    /// Books, optionally restricted to one author (by exact name) and/or
    /// to those listing `genre` among their genres.
    ///
    /// An author name that matches nobody yields an empty list.
    pub async fn all_books(
        &self,
        author: Option<&str>,
        genre: Option<&str>,
    ) -> CatalogResult<Vec<BookRecord>> {
        let mut filter = BookFilter {
            genre: non_empty(genre).map(str::to_string),
            ..Default::default()
        };

        if let Some(name) = non_empty(author) {
            let found = self
                .db
                .authors()
                .get_by_name(name)
                .await
                .map_err(CatalogError::internal)?;
            match found {
                Some(author) => filter.author_id = Some(author.id),
                None => {
                    debug!(author = %name, "No such author, returning no books");
                    return Ok(Vec::new());
                }
            }
        }

        self.db
            .books()
            .list(&filter)
            .await
            .map_err(CatalogError::internal)
    }

    pub async fn all_authors(&self) -> CatalogResult<Vec<AuthorRecord>> {
        self.db.authors().list().await.map_err(CatalogError::internal)
    }

    /// Number of books referencing the author
    pub async fn author_book_count(&self, author_id: &str) -> CatalogResult<i64> {
        self.db
            .books()
            .count_by_author(author_id)
            .await
            .map_err(CatalogError::internal)
    }

    /// Profile of the current principal, or `None` when unauthenticated
    pub async fn me(&self, principal: Option<&Principal>) -> CatalogResult<Option<UserProfile>> {
        let Some(principal) = principal else {
            return Ok(None);
        };

        let user = self
            .db
            .users()
            .get_by_id(&principal.id)
            .await
            .map_err(CatalogError::internal)?;

        Ok(user.map(|u| UserProfile::from_record(u, &self.default_favorite_genre)))
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub async fn add_book(
        &self,
        principal: Option<&Principal>,
        input: NewBook,
    ) -> CatalogResult<BookRecord> {
        let principal = require_authenticated(principal)?;
        validate_book_input(&input.title, &input.author, &input.genres)?;

        let invalid_args = serde_json::to_value(&input).unwrap_or(JsonValue::Null);
        let persist_failed =
            |e: anyhow::Error| CatalogError::persist_failed("Could not add book", e, invalid_args.clone());

        let existing = self
            .db
            .authors()
            .get_by_name(&input.author)
            .await
            .map_err(CatalogError::internal)?;

        let author = match existing {
            Some(author) => author,
            None => {
                let author = self
                    .db
                    .authors()
                    .create(CreateAuthor {
                        name: input.author.clone(),
                        born: None,
                    })
                    .await
                    .map_err(&persist_failed)?;
                info!(author_id = %author.id, author = %author.name, "Author created");
                author
            }
        };

        let book = self
            .db
            .books()
            .create(CreateBook {
                title: input.title,
                published: input.published,
                author_id: author.id,
                genres: input.genres,
            })
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to persist book");
                persist_failed(e)
            })?;

        info!(
            book_id = %book.id,
            title = %book.title,
            user = %principal.username,
            "Book added"
        );

        self.events.publish(BookEvent::Added { book: book.clone() });

        Ok(book)
    }

    /// Set an author's birth year; `None` if no author has that name
    pub async fn edit_author(
        &self,
        principal: Option<&Principal>,
        name: &str,
        set_born_to: i32,
    ) -> CatalogResult<Option<AuthorRecord>> {
        let principal = require_authenticated(principal)?;
        validate_author_edit(name, set_born_to)?;

        let found = self
            .db
            .authors()
            .get_by_name(name)
            .await
            .map_err(CatalogError::internal)?;

        let Some(mut author) = found else {
            debug!(author = %name, "editAuthor: no such author");
            return Ok(None);
        };

        author.born = Some(set_born_to);
        let updated = self
            .db
            .authors()
            .update(&author)
            .await
            .map_err(|e| CatalogError::persist_failed("Editing Author failed", e, json!(name)))?;

        info!(
            author_id = %updated.id,
            born = set_born_to,
            user = %principal.username,
            "Author edited"
        );

        Ok(Some(updated))
    }

    pub async fn create_user(&self, input: NewUser) -> CatalogResult<UserProfile> {
        let password = validate_user_input(input.password.as_deref())?;

        let password_hash = self
            .credentials
            .hash_password(password)
            .await
            .map_err(CatalogError::internal)?;

        let user = self
            .db
            .users()
            .create(CreateUser {
                username: input.username.clone(),
                password_hash,
                favorite_genre: input.favorite_genre,
            })
            .await
            .map_err(|e| {
                let duplicate = e
                    .downcast_ref::<sqlx::Error>()
                    .is_some_and(is_unique_violation);
                warn!(username = %input.username, duplicate, error = %e, "User creation failed");

                let err = CatalogError::persist_failed(
                    "Creating the user failed",
                    e,
                    json!(input.username),
                );
                if duplicate {
                    err.with_diagnostic("reason", json!("duplicate"))
                } else {
                    err
                }
            })?;

        info!(user_id = %user.id, username = %user.username, "User created");

        Ok(UserProfile::from_record(user, &self.default_favorite_genre))
    }

    /// Check credentials and issue a token.
    ///
    /// An unknown username and a wrong password fail identically.
    pub async fn login(&self, username: &str, password: &str) -> CatalogResult<String> {
        let user = self
            .db
            .users()
            .get_by_username(username)
            .await
            .map_err(CatalogError::internal)?;

        let stored_hash = user.as_ref().map(|u| u.password_hash.as_str());
        let is_correct_password = self
            .credentials
            .verify_password_or_dummy(password, stored_hash)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Password hash could not be checked");
                false
            });

        let Some(user) = user.filter(|_| is_correct_password) else {
            debug!("Login rejected");
            return Err(CatalogError::invalid_credentials());
        };

        let token = self
            .credentials
            .issue_token(&Principal {
                id: user.id,
                username: user.username,
            })
            .map_err(CatalogError::internal)?;

        info!(username = %username, "User logged in");
        Ok(token)
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Books added after this call, in publication order
    pub fn book_added(&self) -> impl Stream<Item = BookRecord> + Send + use<> {
        self.events.book_added_stream()
    }
}
