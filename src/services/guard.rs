//! Authorization guard for state-changing operations

use super::credentials::Principal;
use super::error::CatalogError;

/// Reject the operation unless a principal is present
pub fn require_authenticated(principal: Option<&Principal>) -> Result<&Principal, CatalogError> {
    principal.ok_or_else(CatalogError::unauthenticated)
}
