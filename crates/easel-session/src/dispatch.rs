//! View dispatch
//!
//! Document kinds map to view components through a pure lookup:
//! tagged-variant dispatch table, not a class hierarchy.

use easel_document::DocumentKind;

/// What a view layer needs to know to render a document kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewDescriptor {
    /// Component name the host UI resolves
    pub component: &'static str,
    /// Whether the kind participates in the edit/save lifecycle
    pub supports_editing: bool,
    /// Whether the kind exposes "Run Now" / "Check Now"
    pub supports_runs: bool,
}

/// Resolve the view descriptor for a document kind
#[must_use]
pub const fn view_for(kind: DocumentKind) -> ViewDescriptor {
    match kind {
        DocumentKind::Question => ViewDescriptor {
            component: "QuestionView",
            supports_editing: true,
            supports_runs: false,
        },
        DocumentKind::Dashboard => ViewDescriptor {
            component: "DashboardView",
            supports_editing: true,
            supports_runs: false,
        },
        DocumentKind::Report => ViewDescriptor {
            component: "ReportView",
            supports_editing: true,
            supports_runs: true,
        },
        DocumentKind::Alert => ViewDescriptor {
            component: "AlertView",
            supports_editing: true,
            supports_runs: true,
        },
        DocumentKind::Presentation => ViewDescriptor {
            component: "PresentationView",
            supports_editing: true,
            supports_runs: false,
        },
        DocumentKind::Connection => ViewDescriptor {
            component: "ConnectionView",
            supports_editing: true,
            supports_runs: false,
        },
        DocumentKind::RunLog => ViewDescriptor {
            component: "RunLogView",
            supports_editing: false,
            supports_runs: false,
        },
        DocumentKind::Conversation => ViewDescriptor {
            component: "ConversationView",
            supports_editing: false,
            supports_runs: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runnable_kinds_support_runs() {
        for kind in DocumentKind::ALL {
            assert_eq!(view_for(kind).supports_runs, kind.is_runnable());
        }
    }

    #[test]
    fn immutable_kinds_are_read_only() {
        assert!(!view_for(DocumentKind::RunLog).supports_editing);
        assert!(!view_for(DocumentKind::Conversation).supports_editing);
    }

    #[test]
    fn every_kind_has_a_component() {
        for kind in DocumentKind::ALL {
            assert!(!view_for(kind).component.is_empty());
        }
    }
}
