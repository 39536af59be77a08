//! Catalog re-indexing on modification.
//!
//! The catalog itself is a collaborator; this module only wires the
//! modification event to a metadata stamp and a reindex call.

use crate::content::Content;
use crate::security::SecurityPolicy;
use uuid::Uuid;

/// External catalog contract.
pub trait Catalog: Send + Sync {
    fn reindex(&self, content: &Content);
}

/// A content-modified notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modified {
    pub object_uid: Uuid,
}

impl Modified {
    pub fn for_content(content: &Content) -> Self {
        Self {
            object_uid: content.uid(),
        }
    }
}

/// When content is modified, stamp its metadata and re-index it.
///
/// Events that target a different object (a child firing through its
/// parent, say) are ignored. Field names may not match index names, so
/// the whole object is re-indexed rather than a per-field subset.
pub fn reindex_on_modify(
    content: &mut Content,
    event: &Modified,
    policy: &dyn SecurityPolicy,
    catalog: &dyn Catalog,
) {
    if event.object_uid != content.uid() {
        return;
    }
    content.notify_modified(policy);
    catalog.reindex(content);
}
