//! Integration tests: the full content stack wired the way a host
//! framework would wire it — one schema cache, one type registry, one
//! permission registry, one policy, shared by the resolver, the
//! projector, and the paste validator.

use protean_content::{
    Catalog, Content, FieldProjector, Modified, PasteValidator, SecurityPolicy,
    TypeConstraintValidator, VIEW_PERMISSION, reindex_on_modify,
};
use chrono::Duration;
use protean_kernel::{
    CapabilityResolver, CapabilitySet, CapabilityTag, InMemoryPermissionRegistry,
    InMemorySchemaCache, InMemoryTypeRegistry, Permission, Schema, TypeInfo,
};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

struct Stack {
    types: Arc<InMemoryTypeRegistry>,
    schemas: Arc<InMemorySchemaCache>,
    permissions: Arc<InMemoryPermissionRegistry>,
    policy: Arc<TitleAllowList>,
    resolver: CapabilityResolver,
    projector: FieldProjector,
}

struct TitleAllowList(BTreeSet<&'static str>);

impl SecurityPolicy for TitleAllowList {
    fn check_permission(&self, title: &str, _content: &Content) -> bool {
        self.0.contains(title)
    }

    fn current_user_id(&self) -> Option<String> {
        Some("editor".to_string())
    }
}

fn stack(allowed: &[&'static str]) -> Stack {
    let types = Arc::new(InMemoryTypeRegistry::new());
    types.register(
        TypeInfo::new("document", "Document").with_add_permission("protean.AddDocument"),
    );

    let schemas = Arc::new(InMemorySchemaCache::new());
    schemas.set_schema(
        "document",
        Schema::builder(CapabilityTag::new("content.document"))
            .field("title", json!(""))
            .field("body", json!(""))
            .field("internal_notes", json!(""))
            .read_permission("internal_notes", "protean.ViewInternal")
            .build()
            .expect("document schema builds"),
    );
    schemas.set_subtypes(
        "document",
        vec![
            Schema::builder(CapabilityTag::new("behavior.taggable"))
                .field("keywords", json!([]))
                .build()
                .expect("taggable schema builds"),
        ],
    );

    let permissions = Arc::new(InMemoryPermissionRegistry::new());
    permissions.register(Permission::new("protean.ViewInternal", "View internal"));
    permissions.register(Permission::new("protean.AddDocument", "Add document"));

    let policy = Arc::new(TitleAllowList(allowed.iter().copied().collect()));

    let resolver = CapabilityResolver::new(Arc::clone(&types) as _, Arc::clone(&schemas) as _);
    let projector = FieldProjector::new(
        Arc::clone(&schemas) as _,
        Arc::clone(&permissions) as _,
        Arc::clone(&policy) as _,
    );

    Stack {
        types,
        schemas,
        permissions,
        policy,
        resolver,
        projector,
    }
}

fn document(id: &str) -> Content {
    let mut content = Content::new(id, CapabilitySet::from_names(["kind.item"]));
    content.set_type_id("document");
    content
}

#[test]
fn resolution_through_content_is_cached_and_invalidated_by_metadata() {
    let stack = stack(&[VIEW_PERMISSION]);
    let mut content = document("doc-1");

    let first = stack.resolver.resolve(&content);
    let names: Vec<&str> = first.iter().map(CapabilityTag::name).collect();
    assert_eq!(
        names,
        vec!["content.document", "behavior.taggable", "kind.item"]
    );
    assert!(Arc::ptr_eq(&first, &stack.resolver.resolve(&content)));

    // A metadata stamp is a modification: the cache must miss.
    let stamped = content.metadata().modified() + Duration::seconds(1);
    content.metadata_mut().set_modification_date(Some(stamped));
    let second = stack.resolver.resolve(&content);
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(*first, *second);

    // Re-assigned direct capabilities replace the base set entirely.
    content.set_direct_capabilities(Some(CapabilitySet::from_names(["assigned.frontpage"])));
    let third = stack.resolver.resolve(&content);
    assert!(third.contains("assigned.frontpage"));
    assert!(third.contains("content.document"));
    assert!(!third.contains("kind.item"));
}

#[test]
fn projection_and_attribute_fallback_agree_on_defaults() {
    let stack = stack(&[VIEW_PERMISSION, "View internal"]);
    let mut content = document("doc-1");
    content.set_value("title", json!("Front page"));

    let projected = stack.projector.project(&content, true);
    assert_eq!(projected.get("title"), Some(&json!("Front page")));
    assert_eq!(projected.get("body"), Some(&json!("")));
    assert_eq!(projected.get("keywords"), Some(&json!([])));
    assert_eq!(projected.get("internal_notes"), Some(&json!("")));

    // The attribute fallback sees the same schema defaults.
    assert_eq!(
        content
            .value("keywords", stack.schemas.as_ref())
            .expect("subtype default resolves"),
        json!([])
    );
}

#[test]
fn restricted_reader_sees_a_filtered_projection() {
    let stack = stack(&[VIEW_PERMISSION]);
    let content = document("doc-1");

    let projected = stack.projector.project(&content, true);
    assert!(projected.contains_key("title"));
    assert!(!projected.contains_key("internal_notes"));

    // Unconstrained projection still carries everything.
    let all = stack.projector.project(&content, false);
    assert!(all.contains_key("internal_notes"));
}

#[test]
fn schema_invalidation_degrades_without_blocking_content() {
    let stack = stack(&[VIEW_PERMISSION]);
    let content = document("doc-1");
    assert!(stack.resolver.resolve(&content).contains("content.document"));

    stack.schemas.invalidate("document");

    // Resolution degrades to the static set; projection turns empty;
    // attribute access reports not-found instead of failing hard.
    let degraded = stack.resolver.resolve(&content);
    let names: Vec<&str> = degraded.iter().map(CapabilityTag::name).collect();
    assert_eq!(names, vec!["kind.item"]);
    assert!(stack.projector.project(&content, true).is_empty());
    assert!(content.value("title", stack.schemas.as_ref()).is_err());
}

#[test]
fn paste_validation_consults_the_same_type_registry() {
    let stack = stack(&["Add document"]);
    let validator = TypeConstraintValidator::new(
        Arc::clone(&stack.types) as _,
        Arc::clone(&stack.permissions) as _,
        Arc::clone(&stack.policy) as _,
    );
    let target = Content::new("folder", CapabilitySet::empty());
    assert!(validator.validate(&document("copy"), &target).is_ok());

    let denying = stack_policy_denies();
    assert!(denying.validate(&document("copy"), &target).is_err());
}

fn stack_policy_denies() -> TypeConstraintValidator {
    let stack = stack(&[]);
    TypeConstraintValidator::new(
        Arc::clone(&stack.types) as _,
        Arc::clone(&stack.permissions) as _,
        Arc::clone(&stack.policy) as _,
    )
}

#[test]
fn modification_event_reindexes_and_invalidates_resolution() {
    let stack = stack(&[VIEW_PERMISSION]);

    struct RecordingCatalog(Mutex<usize>);

    impl Catalog for RecordingCatalog {
        fn reindex(&self, _content: &Content) {
            *self.0.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        }
    }

    let catalog = RecordingCatalog(Mutex::new(0));
    let mut content = document("doc-1");
    let before = stack.resolver.resolve(&content);

    let event = Modified::for_content(&content);
    reindex_on_modify(&mut content, &event, stack.policy.as_ref(), &catalog);

    assert_eq!(*catalog.0.lock().unwrap_or_else(|e| e.into_inner()), 1);
    assert_eq!(content.metadata().creators, vec!["editor"]);

    // The stamp moved the modification date: resolution recomputes.
    let after = stack.resolver.resolve(&content);
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(*before, *after);
}
