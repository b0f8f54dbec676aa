//! Instance type catalog
//!
//! In-memory mapping from instance type identifier to its static
//! metadata, loaded once per run from the metadata feed and pruned to the
//! identifiers purchasable under the spot strategy.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::AdvisorError;
use crate::models::InstanceMeta;

/// Identifier-keyed instance metadata, immutable after construction
#[derive(Debug, Clone, Default)]
pub struct InstanceCatalog {
    entries: HashMap<String, InstanceMeta>,
}

impl InstanceCatalog {
    /// Build a catalog from the metadata feed
    ///
    /// A zero core count is an upstream contract violation and fails the
    /// whole load; every per-core computation divides by it.
    pub fn from_metadata(
        metas: impl IntoIterator<Item = InstanceMeta>,
    ) -> Result<Self, AdvisorError> {
        let mut entries = HashMap::new();
        for meta in metas {
            if meta.cpu_core_count == 0 {
                return Err(AdvisorError::ZeroCoreCount(meta.instance_type_id));
            }
            entries.insert(meta.instance_type_id.clone(), meta);
        }
        Ok(Self { entries })
    }

    /// Prune to identifiers purchasable under the spot strategy
    ///
    /// Produces a new catalog and leaves `self` untouched.
    pub fn retain_purchasable(&self, available: &HashSet<String>) -> Self {
        let entries: HashMap<String, InstanceMeta> = self
            .entries
            .iter()
            .filter(|(id, _)| available.contains(*id))
            .map(|(id, meta)| (id.clone(), meta.clone()))
            .collect();
        debug!(
            before = self.entries.len(),
            after = entries.len(),
            "Pruned catalog to purchasable instance types"
        );
        Self { entries }
    }

    pub fn get(&self, instance_type_id: &str) -> Option<&InstanceMeta> {
        self.entries.get(instance_type_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &InstanceMeta)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
