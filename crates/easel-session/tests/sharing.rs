//! Public share tokens are admin-gated passthroughs

use easel_session::{SessionError, Sharing};
use easel_test_utils::{question_record, InMemoryBackend};
use std::sync::Arc;

#[tokio::test]
async fn admins_create_and_revoke_tokens() {
    let backend = Arc::new(InMemoryBackend::new());
    let record = question_record(7, "Signups", "SELECT 1");
    backend.seed(record.clone());
    let sharing = Sharing::new(backend.clone());

    let token = sharing.create_public_link(record.id, true).await.unwrap();
    assert_eq!(token.file_id, record.id);
    assert!(!token.token.is_empty());

    sharing.revoke(&token.id, true).await.unwrap();

    // Revoking twice fails: the token is gone.
    let error = sharing.revoke(&token.id, true).await.unwrap_err();
    assert!(matches!(error, SessionError::SaveFailed { .. }));
}

#[tokio::test]
async fn non_admins_are_refused() {
    let backend = Arc::new(InMemoryBackend::new());
    let record = question_record(7, "Signups", "SELECT 1");
    backend.seed(record.clone());
    let sharing = Sharing::new(backend);

    let error = sharing
        .create_public_link(record.id, false)
        .await
        .unwrap_err();
    assert!(matches!(error, SessionError::Forbidden));

    let error = sharing.revoke("tok-1", false).await.unwrap_err();
    assert!(matches!(error, SessionError::Forbidden));
}
