//! HTTP implementation of the backend port

use crate::backend::Backend;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::types::{
    AccessToken, AccessTokenRequest, AgentInvocation, ChatResponse, ConversationId, ErrorBody,
    FileQuery, MoveRequest, PublishRequest,
};
use async_trait::async_trait;
use easel_document::content::ConnectionContent;
use easel_document::{FileId, FileRecord};
use reqwest::StatusCode;
use url::Url;

/// [`Backend`] over HTTP (reqwest, JSON bodies)
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpBackend {
    /// Build a backend from configuration
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be constructed
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.config.base_url.join(path)?)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.config.bearer_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_error(status, &body))
    }
}

/// Map an error response onto the taxonomy
///
/// The backend marks trusted messages with `kind: "user"`; anything else
/// keeps its message internal.
fn classify_error(status: StatusCode, body: &str) -> ApiError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|parsed| parsed.error);

    if let Some(detail) = detail {
        return match detail.kind.as_str() {
            "user" => ApiError::UserFacing {
                message: detail.message,
            },
            "conflict" => ApiError::Conflict {
                message: detail.message,
            },
            _ if status == StatusCode::NOT_FOUND => ApiError::NotFound {
                message: detail.message,
            },
            _ => ApiError::Http {
                status: status.as_u16(),
                message: detail.message,
            },
        };
    }

    match status {
        StatusCode::NOT_FOUND => ApiError::NotFound {
            message: body.trim().to_string(),
        },
        StatusCode::CONFLICT => ApiError::Conflict {
            message: body.trim().to_string(),
        },
        _ => ApiError::Http {
            status: status.as_u16(),
            message: body.trim().to_string(),
        },
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_files(&self, query: FileQuery) -> Result<Vec<FileRecord>, ApiError> {
        let url = self.endpoint("/api/files")?;
        tracing::debug!(paths = ?query.paths, "listing files");
        let response = self
            .request(reqwest::Method::GET, url)
            .query(&query.to_query_pairs())
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn fetch_file(&self, id: FileId) -> Result<FileRecord, ApiError> {
        let url = self.endpoint(&format!("/api/documents/{id}"))?;
        tracing::debug!(%id, "fetching file");
        let response = self.request(reqwest::Method::GET, url).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn publish_file(&self, request: PublishRequest) -> Result<FileRecord, ApiError> {
        let url = self.endpoint(&format!("/api/documents/{}", request.id))?;
        tracing::debug!(id = %request.id, name = %request.name, "publishing file");
        let response = self
            .request(reqwest::Method::POST, url)
            .json(&request)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn move_file(&self, id: FileId, new_path: &str) -> Result<FileRecord, ApiError> {
        let url = self.endpoint(&format!("/api/documents/{id}"))?;
        tracing::debug!(%id, new_path, "moving file");
        let response = self
            .request(reqwest::Method::PATCH, url)
            .json(&MoveRequest {
                path: new_path.to_string(),
            })
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete_file(&self, id: FileId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/api/documents/{id}"))?;
        tracing::debug!(%id, "deleting file");
        let response = self.request(reqwest::Method::DELETE, url).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn invoke_agent(
        &self,
        invocation: AgentInvocation,
    ) -> Result<ConversationId, ApiError> {
        let url = self.endpoint("/api/chat")?;
        tracing::debug!(agent = %invocation.agent, "invoking agent");
        let response = self
            .request(reqwest::Method::POST, url)
            .json(&invocation)
            .send()
            .await?;
        let chat: ChatResponse = Self::check(response).await?.json().await?;
        Ok(chat.conversation_id)
    }

    async fn test_connection(&self, connection: &ConnectionContent) -> Result<(), ApiError> {
        let url = self.endpoint("/api/connections/test")?;
        let response = self
            .request(reqwest::Method::POST, url)
            .json(connection)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn create_access_token(&self, file_id: FileId) -> Result<AccessToken, ApiError> {
        let url = self.endpoint("/api/access-tokens")?;
        let response = self
            .request(reqwest::Method::POST, url)
            .json(&AccessTokenRequest { file_id })
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn revoke_access_token(&self, token_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/api/access-tokens/{token_id}"))?;
        let response = self.request(reqwest::Method::DELETE, url).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}
