//! Catalog services: credentials, validation, authorization, events and the
//! resolver engine that ties them together.

pub mod catalog;
pub mod credentials;
pub mod error;
pub mod events;
pub mod guard;
pub mod validation;

pub use catalog::{CatalogService, NewBook, NewUser, UserProfile};
pub use credentials::{CredentialService, CredentialsConfig, Principal, TokenClaims};
pub use error::{CatalogError, Diagnostics, ErrorKind};
pub use events::{BOOK_ADDED, BookEvent, BookEventBus, EventBusConfig};
pub use guard::require_authenticated;
pub use validation::{ValidationError, validate_author_edit, validate_book_input};
