//! Property tests for the merge resolver laws

use chrono::Utc;
use easel_document::content::QuestionContent;
use easel_document::{
    DocumentContent, DocumentKind, DocumentPatch, FileId, FileRecord, Patch, QuestionPatch,
};
use easel_state::Workbench;
use proptest::prelude::*;

fn seed_question(workbench: &Workbench, query: &str) -> FileId {
    let record = FileRecord::new(
        FileId::new(1).unwrap(),
        "Seed",
        "/",
        DocumentKind::Question,
        DocumentContent::Question(QuestionContent {
            query: query.to_string(),
            ..QuestionContent::default()
        }),
        Utc::now(),
    )
    .unwrap();
    let id = record.id;
    workbench.set_file(record);
    id
}

fn arb_patch() -> impl Strategy<Value = DocumentPatch> {
    (
        proptest::option::of("[a-zA-Z0-9][a-zA-Z0-9 ]{0,11}"),
        proptest::option::of(proptest::option::of("[a-z]{1,8}")),
    )
        .prop_map(|(query, connection)| {
            DocumentPatch::Question(QuestionPatch {
                query,
                connection: match connection {
                    None => Patch::Keep,
                    Some(None) => Patch::Clear,
                    Some(Some(name)) => Patch::Set(name),
                },
                ..QuestionPatch::default()
            })
        })
}

proptest! {
    // Empty buffer: merged content is exactly the stored content.
    #[test]
    fn identity_law(query in "[a-zA-Z0-9 ]{0,20}") {
        let workbench = Workbench::new();
        let id = seed_question(&workbench, &query);
        let stored = workbench.file(id).unwrap().content;
        prop_assert_eq!(workbench.merged_content(id), Some(stored));
        prop_assert!(!workbench.is_dirty(id));
    }

    // Any edit sequence followed by clear_changes restores the identity.
    #[test]
    fn revert_law(patches in proptest::collection::vec(arb_patch(), 0..6)) {
        let workbench = Workbench::new();
        let id = seed_question(&workbench, "SELECT 1");
        let stored = workbench.file(id).unwrap().content;

        for patch in patches {
            workbench.edit_content(id, patch).unwrap();
        }
        workbench.clear_changes(id);

        prop_assert_eq!(workbench.merged_content(id), Some(stored));
        prop_assert!(!workbench.is_dirty(id));
    }

    // The last set value per field wins regardless of what preceded it.
    #[test]
    fn last_write_wins(
        patches in proptest::collection::vec(arb_patch(), 0..6),
        final_query in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,11}",
    ) {
        let workbench = Workbench::new();
        let id = seed_question(&workbench, "SELECT 1");

        for patch in patches {
            workbench.edit_content(id, patch).unwrap();
        }
        workbench
            .edit_content(
                id,
                DocumentPatch::Question(QuestionPatch {
                    query: Some(final_query.clone()),
                    ..QuestionPatch::default()
                }),
            )
            .unwrap();

        let Some(DocumentContent::Question(merged)) = workbench.merged_content(id) else {
            panic!("question content expected");
        };
        prop_assert_eq!(merged.query, final_query);
        prop_assert!(workbench.is_dirty(id));
    }

    // Merging buffered edits agrees with applying each patch in turn.
    #[test]
    fn buffered_merge_matches_sequential_application(
        patches in proptest::collection::vec(arb_patch(), 1..6),
    ) {
        let workbench = Workbench::new();
        let id = seed_question(&workbench, "SELECT 1");
        let mut expected = workbench.file(id).unwrap().content;

        for patch in patches {
            patch.apply_to(&mut expected).unwrap();
            workbench.edit_content(id, patch).unwrap();
        }

        prop_assert_eq!(workbench.merged_content(id), Some(expected));
    }
}
