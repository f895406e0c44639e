//! Save lifecycle: publish success, failure, conflicts, draft promotion

use easel_client::{ApiError, CONFLICT_MESSAGE};
use easel_document::content::QuestionContent;
use easel_document::{
    DocumentContent, DocumentKind, DocumentPatch, Patch, QuestionPatch,
};
use easel_session::{DocumentSession, EditPhase, SaveCoordinator};
use easel_state::Workbench;
use easel_test_utils::{question_record, InMemoryBackend};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn query_patch(query: &str) -> DocumentPatch {
    DocumentPatch::Question(QuestionPatch {
        query: Some(query.to_string()),
        ..QuestionPatch::default()
    })
}

fn setup(record: easel_document::FileRecord) -> (Workbench, Arc<InMemoryBackend>) {
    let workbench = Workbench::new();
    let backend = Arc::new(InMemoryBackend::new());
    backend.seed(record.clone());
    workbench.set_file(record);
    (workbench, backend)
}

#[tokio::test]
async fn publish_success_clears_buffer_and_adopts_canonical_content() {
    let record = question_record(7, "Signups", "SELECT 1");
    let (workbench, backend) = setup(record.clone());
    let coordinator = SaveCoordinator::new(workbench.clone(), backend.clone());

    workbench
        .edit_content(record.id, query_patch("SELECT 2"))
        .unwrap();
    assert!(workbench.is_dirty(record.id));

    let outcome = coordinator.publish(record.id).await.unwrap();

    assert!(!workbench.is_dirty(record.id));
    assert_eq!(
        workbench.merged_content(record.id),
        Some(outcome.file.content.clone())
    );
    let DocumentContent::Question(question) = outcome.file.content else {
        panic!("kind changed");
    };
    assert_eq!(question.query, "SELECT 2");
    // Same id and slug: no navigation.
    assert_eq!(outcome.navigate_to, None);
}

#[tokio::test]
async fn publish_failure_preserves_buffer_verbatim() {
    let record = question_record(7, "Signups", "SELECT 1");
    let (workbench, backend) = setup(record.clone());
    let coordinator = SaveCoordinator::new(workbench.clone(), backend.clone());

    workbench
        .edit_content(record.id, query_patch("SELECT 2"))
        .unwrap();
    let buffered = workbench.pending_patch(record.id);

    backend.fail_next_publish(ApiError::UserFacing {
        message: "query references a missing table".to_string(),
    });
    let error = coordinator.publish(record.id).await.unwrap_err();

    assert_eq!(error.surface_message(), "query references a missing table");
    assert_eq!(workbench.pending_patch(record.id), buffered);
    assert!(workbench.is_dirty(record.id));
    // The stored snapshot is untouched.
    assert_eq!(
        workbench.file(record.id).unwrap().content,
        record.content
    );
}

#[tokio::test]
async fn revision_conflict_preserves_buffer() {
    let record = question_record(7, "Signups", "SELECT 1");
    let (workbench, backend) = setup(record.clone());
    let coordinator = SaveCoordinator::new(workbench.clone(), backend.clone());

    // Another writer updates the backend copy behind our back.
    let mut elsewhere = record.clone();
    if let DocumentContent::Question(question) = &mut elsewhere.content {
        question.query = "SELECT 'other tab'".to_string();
    }
    backend.seed(elsewhere);

    workbench
        .edit_content(record.id, query_patch("SELECT 2"))
        .unwrap();
    let error = coordinator.publish(record.id).await.unwrap_err();

    assert_eq!(error.surface_message(), CONFLICT_MESSAGE);
    assert!(workbench.is_dirty(record.id));
}

#[tokio::test]
async fn virtual_draft_promotes_and_navigates() {
    let workbench = Workbench::new();
    let backend = Arc::new(InMemoryBackend::new());

    let draft_id = workbench
        .create_draft(DocumentKind::Question, "New Question", "/drafts")
        .unwrap();
    assert!(draft_id.is_virtual());

    let mut session = DocumentSession::new(workbench.clone(), backend.clone(), draft_id);
    session.begin_editing();
    session.on_change(query_patch("SELECT 1")).unwrap();

    let outcome = session.save().await.unwrap();

    // The publish payload carried the buffered query.
    let publishes = backend.publishes();
    assert_eq!(publishes.len(), 1);
    let DocumentContent::Question(QuestionContent { query, .. }) = &publishes[0].content else {
        panic!("question payload expected");
    };
    assert_eq!(query, "SELECT 1");
    assert!(publishes[0].base_revision.is_none());

    // Draft promoted to a real id; navigation to the canonical URL.
    let new_id = outcome.file.id;
    assert!(new_id.is_persisted());
    assert_eq!(
        outcome.navigate_to.as_deref(),
        Some(format!("/f/{}-new-question", new_id.raw()).as_str())
    );
    assert_eq!(session.file_id(), new_id);
    assert_eq!(session.phase(), EditPhase::Viewing);

    // The old virtual snapshot is gone; the canonical one is clean.
    assert!(!workbench.is_loaded(draft_id));
    assert!(!workbench.is_dirty(new_id));
}

#[tokio::test]
async fn rename_changes_slug_and_navigates() {
    let record = question_record(7, "Signups", "SELECT 1");
    let (workbench, backend) = setup(record.clone());
    let coordinator = SaveCoordinator::new(workbench.clone(), backend.clone());

    workbench.edit_name(record.id, "Weekly Signups").unwrap();
    let outcome = coordinator.publish(record.id).await.unwrap();

    assert_eq!(outcome.file.name, "Weekly Signups");
    assert_eq!(outcome.navigate_to.as_deref(), Some("/f/7-weekly-signups"));
    assert_eq!(
        workbench.effective_name(record.id).as_deref(),
        Some("Weekly Signups")
    );
}

#[tokio::test]
async fn ephemeral_changes_never_reach_the_publish_payload() {
    let record = question_record(7, "Signups", "SELECT 1");
    let (workbench, backend) = setup(record.clone());
    let coordinator = SaveCoordinator::new(workbench.clone(), backend.clone());

    workbench
        .set_ephemeral(
            record.id,
            DocumentPatch::Question(QuestionPatch {
                query: Some("SELECT 'preview only'".to_string()),
                ..QuestionPatch::default()
            }),
        )
        .unwrap();
    workbench
        .edit_content(
            record.id,
            DocumentPatch::Question(QuestionPatch {
                connection: Patch::Set("warehouse".to_string()),
                ..QuestionPatch::default()
            }),
        )
        .unwrap();

    coordinator.publish(record.id).await.unwrap();

    let publishes = backend.publishes();
    let DocumentContent::Question(question) = &publishes[0].content else {
        panic!("question payload expected");
    };
    // Persistable change included, ephemeral overlay excluded.
    assert_eq!(question.connection.as_deref(), Some("warehouse"));
    assert_eq!(question.query, "SELECT 1");
}

#[tokio::test]
async fn validation_failure_blocks_publish_locally() {
    use easel_document::content::{ConnectionContent, ConnectionDriver};
    use easel_document::{FileId, FileRecord};

    let record = FileRecord::new(
        FileId::new(9).unwrap(),
        "Prod DB",
        "/connections",
        DocumentKind::Connection,
        DocumentContent::Connection(ConnectionContent {
            driver: ConnectionDriver::Postgres,
            host: None,
            port: None,
            database: "analytics".to_string(),
            username: None,
            options: Default::default(),
        }),
        chrono::Utc::now(),
    )
    .unwrap();
    let (workbench, backend) = setup(record.clone());
    let coordinator = SaveCoordinator::new(workbench.clone(), backend.clone());

    // Missing host: validation refuses the save before any request.
    let error = coordinator.publish(record.id).await.unwrap_err();
    assert!(matches!(error, easel_session::SessionError::Validation(_)));
    assert!(backend.publishes().is_empty());
}

#[tokio::test]
async fn load_move_and_delete_reconcile_local_state() {
    let record = question_record(7, "Signups", "SELECT 1");
    let workbench = Workbench::new();
    let backend = Arc::new(InMemoryBackend::new());
    backend.seed(record.clone());
    let coordinator = SaveCoordinator::new(workbench.clone(), backend.clone());

    // Load fills the store.
    assert!(!workbench.is_loaded(record.id));
    coordinator.load(record.id).await.unwrap();
    assert!(workbench.is_loaded(record.id));

    // Move updates the snapshot's path.
    let moved = coordinator.move_to(record.id, "/archive").await.unwrap();
    assert_eq!(moved.path, "/archive");
    assert_eq!(workbench.file(record.id).unwrap().path, "/archive");

    // Delete drops the snapshot.
    coordinator.delete(record.id).await.unwrap();
    assert!(!workbench.is_loaded(record.id));
    assert!(backend.stored(record.id).is_none());
}

#[tokio::test]
async fn load_failure_surfaces_and_leaves_retry_to_the_caller() {
    let workbench = Workbench::new();
    let backend = Arc::new(InMemoryBackend::new());
    let coordinator = SaveCoordinator::new(workbench.clone(), backend.clone());

    let missing = easel_document::FileId::new(404).unwrap();
    let error = coordinator.load(missing).await.unwrap_err();
    assert!(matches!(
        error,
        easel_session::SessionError::LoadFailed { .. }
    ));
    assert!(!workbench.is_loaded(missing));

    // A later retry can succeed; nothing was poisoned.
    backend.seed(question_record(404, "Late", "SELECT 1"));
    assert!(coordinator.load(missing).await.is_ok());
}
