//! Error taxonomy for catalog operations
//!
//! Every failure carries a fixed [`ErrorKind`] plus an open diagnostic map.
//! When surfaced through GraphQL, the kind becomes stable extension codes and
//! the diagnostics and cause are attached as extra extension values.

use std::collections::BTreeMap;

use async_graphql::ErrorExtensions;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::validation::ValidationError;

/// Extension code shared by every caller-facing failure
pub const BAD_USER_INPUT: &str = "BAD_USER_INPUT";

/// Extension code for infrastructure failures on reads
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A mutation was attempted without a valid principal
    Unauthenticated,
    /// Title, author or genre constraints were violated
    InvalidInput,
    /// Login failed; unknown user and wrong password look the same
    InvalidCredentials,
    /// The store rejected a write
    PersistFailed,
    /// The store failed on a read, or another infrastructure failure
    Internal,
}

impl ErrorKind {
    /// Stable, machine-readable name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidInput => "INVALID_INPUT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::PersistFailed => "PERSIST_FAILED",
            Self::Internal => "INTERNAL",
        }
    }

    /// Extension `code` reported to clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::Internal => INTERNAL_SERVER_ERROR,
            _ => BAD_USER_INPUT,
        }
    }
}

/// Diagnostic context attached to an error; never used for control flow
pub type Diagnostics = BTreeMap<String, JsonValue>;

#[derive(Debug, Error)]
#[error("{message}")]
pub struct CatalogError {
    kind: ErrorKind,
    message: String,
    diagnostics: Diagnostics,
    #[source]
    cause: Option<anyhow::Error>,
}

impl CatalogError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            diagnostics: Diagnostics::new(),
            cause: None,
        }
    }

    pub fn unauthenticated() -> Self {
        Self::new(ErrorKind::Unauthenticated, "not authenticated")
    }

    pub fn invalid_input(err: ValidationError) -> Self {
        Self::new(ErrorKind::InvalidInput, err.to_string())
            .with_diagnostic("field", JsonValue::from(err.field()))
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "wrong credentials")
    }

    /// A rejected write, carrying the cause and the offending input
    pub fn persist_failed(
        message: impl Into<String>,
        cause: anyhow::Error,
        invalid_args: JsonValue,
    ) -> Self {
        let mut err = Self::new(ErrorKind::PersistFailed, message)
            .with_diagnostic("invalidArgs", invalid_args);
        err.cause = Some(cause);
        err
    }

    pub fn internal(cause: anyhow::Error) -> Self {
        let mut err = Self::new(ErrorKind::Internal, "internal error");
        err.cause = Some(cause);
        err
    }

    pub fn with_diagnostic(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.diagnostics.insert(key.into(), value);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_ref()
    }
}

impl From<ValidationError> for CatalogError {
    fn from(err: ValidationError) -> Self {
        Self::invalid_input(err)
    }
}

impl ErrorExtensions for CatalogError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.message.clone()).extend_with(|_, e| {
            e.set("code", self.kind.code());
            e.set("kind", self.kind.as_str());
            for (key, value) in &self.diagnostics {
                let value = async_graphql::Value::from_json(value.clone())
                    .unwrap_or(async_graphql::Value::Null);
                e.set(key.as_str(), value);
            }
            if let Some(cause) = &self.cause {
                e.set("error", format!("{:#}", cause));
            }
        })
    }
}
