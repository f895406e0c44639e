//! The backend port
//!
//! [`Backend`] is the seam between client state and the document service.
//! Production uses the HTTP implementation; tests inject in-memory or
//! scripted fakes. Save/run coordinators depend on this trait only.

use crate::error::ApiError;
use crate::types::{
    AccessToken, AgentInvocation, ConversationId, FileQuery, PublishRequest,
};
use async_trait::async_trait;
use easel_document::content::ConnectionContent;
use easel_document::{FileId, FileRecord};

/// Document service operations used by the client state layer
#[async_trait]
pub trait Backend: Send + Sync {
    /// List files by path and kind
    async fn list_files(&self, query: FileQuery) -> Result<Vec<FileRecord>, ApiError>;

    /// Load one file with content
    async fn fetch_file(&self, id: FileId) -> Result<FileRecord, ApiError>;

    /// Create or update a file; returns the canonical record
    ///
    /// Creation happens when the request id is virtual; the returned
    /// record carries the real id assigned by the backend.
    async fn publish_file(&self, request: PublishRequest) -> Result<FileRecord, ApiError>;

    /// Move a file to a new folder path
    async fn move_file(&self, id: FileId, new_path: &str) -> Result<FileRecord, ApiError>;

    /// Delete a file
    async fn delete_file(&self, id: FileId) -> Result<(), ApiError>;

    /// Invoke an agent; the task result is retrieved later from the
    /// conversation file
    async fn invoke_agent(&self, invocation: AgentInvocation)
        -> Result<ConversationId, ApiError>;

    /// Test a connection definition without saving it
    async fn test_connection(&self, connection: &ConnectionContent) -> Result<(), ApiError>;

    /// Create a public share token for a file
    async fn create_access_token(&self, file_id: FileId) -> Result<AccessToken, ApiError>;

    /// Revoke a public share token
    async fn revoke_access_token(&self, token_id: &str) -> Result<(), ApiError>;
}
