//! Dynamic capability resolution with an invalidation-aware cache.
//!
//! Given a content instance, the resolver computes the complete ordered
//! set of capability tags the instance should be treated as providing:
//! the tag of its type's primary schema, then each subtype schema's tag
//! in registry order, then the instance's prior static set. Resolution
//! runs at every capability-check site — hundreds of times per logical
//! request in a host system — so the cached fast path and the exactness
//! of its invalidation are the whole design.
//!
//! A cache entry is valid only while all four inputs are unchanged:
//! the instance's modification timestamp (compared by equality) and the
//! schema, subtype list, and directly-assigned capability set (compared
//! by `Arc` identity, not deep equality — a reloaded-but-equal schema is
//! a new generation and must recompute).

use crate::cache::SchemaCache;
use crate::capability::CapabilitySet;
use crate::registry::TypeRegistry;
use crate::schema::Schema;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// The content surface the resolver consumes.
///
/// Deliberately minimal: a carrier only exposes its typing inputs and a
/// transient slot for the cached resolution. The slot must never be
/// persisted; on restart the resolution is simply recomputed lazily.
pub trait CapabilityCarrier {
    /// When the carrier was last modified.
    fn modified_at(&self) -> DateTime<Utc>;

    /// The carrier's type identifier, if it has been typed yet.
    fn type_id(&self) -> Option<&str>;

    /// Capability set assigned directly to this instance, if any.
    fn direct_capabilities(&self) -> Option<Arc<CapabilitySet>>;

    /// Capability set implied by the carrier's concrete kind.
    fn static_capabilities(&self) -> Arc<CapabilitySet>;

    /// Read the transient cache slot.
    fn cached_resolution(&self) -> Option<Arc<ResolvedCapabilities>>;

    /// Store into the transient cache slot. Must be a single reference
    /// swap: racing writers may each recompute, and last-writer-wins is
    /// sufficient because recomputation is idempotent.
    fn store_resolution(&self, entry: Arc<ResolvedCapabilities>);
}

/// A cached resolution together with the inputs that produced it.
#[derive(Debug, Clone)]
pub struct ResolvedCapabilities {
    mtime: DateTime<Utc>,
    schema: Option<Arc<Schema>>,
    subtypes: Arc<[Arc<Schema>]>,
    direct: Option<Arc<CapabilitySet>>,
    resolved: Arc<CapabilitySet>,
}

impl ResolvedCapabilities {
    pub fn resolved(&self) -> &Arc<CapabilitySet> {
        &self.resolved
    }

    fn matches(
        &self,
        mtime: DateTime<Utc>,
        schema: &Option<Arc<Schema>>,
        subtypes: &Arc<[Arc<Schema>]>,
        direct: &Option<Arc<CapabilitySet>>,
    ) -> bool {
        self.mtime == mtime
            && option_ptr_eq(&self.schema, schema)
            && Arc::ptr_eq(&self.subtypes, subtypes)
            && option_ptr_eq(&self.direct, direct)
    }
}

fn option_ptr_eq<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Resolves the capability set a carrier provides, consulting the type
/// registry and schema cache it was constructed with.
pub struct CapabilityResolver {
    types: Arc<dyn TypeRegistry>,
    schemas: Arc<dyn SchemaCache>,
}

impl CapabilityResolver {
    pub fn new(types: Arc<dyn TypeRegistry>, schemas: Arc<dyn SchemaCache>) -> Self {
        Self { types, schemas }
    }

    /// Resolve the complete capability set for `carrier`.
    ///
    /// Never fails: a missing type-registry entry or missing schema
    /// degrades to static resolution.
    pub fn resolve(&self, carrier: &dyn CapabilityCarrier) -> Arc<CapabilitySet> {
        let direct = carrier.direct_capabilities();

        // Starting point: the direct assignment if present, otherwise
        // the set implied by the concrete kind.
        let base = match direct.clone() {
            Some(direct) => direct,
            None => carrier.static_capabilities(),
        };

        // Dynamic extension only applies to typed content.
        let Some(type_id) = carrier.type_id() else {
            return base;
        };
        if self.types.lookup(type_id).is_none() {
            return base;
        }

        // Fetch both exactly once so the key reflects one generation.
        let schema = self.schemas.get(type_id);
        let subtypes = self.schemas.subtypes(type_id);
        let mtime = carrier.modified_at();

        if let Some(cached) = carrier.cached_resolution()
            && cached.matches(mtime, &schema, &subtypes, &direct)
        {
            return Arc::clone(cached.resolved());
        }

        // Nothing dynamic to contribute: return the base set without
        // writing a cache entry (caching a no-op buys nothing).
        if schema.is_none() && subtypes.is_empty() {
            return base;
        }

        let leading = schema
            .iter()
            .chain(subtypes.iter())
            .filter_map(|s| s.tag().cloned());
        let resolved = Arc::new(CapabilitySet::compose(leading, &base));

        carrier.store_resolution(Arc::new(ResolvedCapabilities {
            mtime,
            schema,
            subtypes,
            direct,
            resolved: Arc::clone(&resolved),
        }));

        resolved
    }
}
