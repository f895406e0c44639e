//! Public share tokens
//!
//! Thin passthrough to the access-token endpoints. Token management is
//! admin-only; the caller supplies its admin flag, and authentication itself
//! is out of scope for this layer.

use crate::error::SessionError;
use easel_client::{AccessToken, Backend};
use easel_document::FileId;
use std::sync::Arc;

/// Manages public share tokens
#[derive(Clone)]
pub struct Sharing {
    backend: Arc<dyn Backend>,
}

impl Sharing {
    /// Create a sharing manager over a backend handle
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Create a public share token for a file
    ///
    /// # Errors
    /// - [`SessionError::Forbidden`] for non-admin callers
    /// - [`SessionError::SaveFailed`] on backend rejection
    pub async fn create_public_link(
        &self,
        file_id: FileId,
        is_admin: bool,
    ) -> Result<AccessToken, SessionError> {
        if !is_admin {
            return Err(SessionError::Forbidden);
        }
        self.backend
            .create_access_token(file_id)
            .await
            .map_err(SessionError::save_failed)
    }

    /// Revoke a public share token
    ///
    /// # Errors
    /// Same failure modes as [`Sharing::create_public_link`]
    pub async fn revoke(&self, token_id: &str, is_admin: bool) -> Result<(), SessionError> {
        if !is_admin {
            return Err(SessionError::Forbidden);
        }
        self.backend
            .revoke_access_token(token_id)
            .await
            .map_err(SessionError::save_failed)
    }
}

impl std::fmt::Debug for Sharing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sharing").finish_non_exhaustive()
    }
}
