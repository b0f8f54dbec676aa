//! Eligibility filtering over the instance catalog
//!
//! Selects the instance types matching caller-supplied core, memory,
//! family and architecture constraints. Pure and deterministic; an empty
//! result is an answer, not an error.

use tracing::info;

use crate::catalog::InstanceCatalog;
use crate::config::AnalysisConfig;
use crate::models::InstanceMeta;

/// ARM generation tokens checked when the metadata feed leaves the
/// architecture blank
const ARM_SERIES_TOKENS: &[&str] = &["c6g", "g6g", "r6g", "c8y", "g8y", "r8y"];

/// Constraints an instance type must satisfy to enter price analysis
#[derive(Debug, Clone)]
pub struct FilterCriteria {
    pub min_cores: u32,
    pub max_cores: u32,
    pub min_memory_gb: f64,
    pub max_memory_gb: f64,
    /// At least one substring must occur in the identifier; an empty
    /// string element matches everything
    pub families: Vec<String>,
    /// Blank disables the architecture check
    pub arch: String,
}

impl From<&AnalysisConfig> for FilterCriteria {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            min_cores: config.min_cores,
            max_cores: config.max_cores,
            min_memory_gb: config.min_memory_gb,
            max_memory_gb: config.max_memory_gb,
            families: config.families.clone(),
            arch: config.arch.clone(),
        }
    }
}

impl FilterCriteria {
    /// Instance type identifiers matching every supplied bound, sorted
    /// for determinism
    pub fn eligible(&self, catalog: &InstanceCatalog) -> Vec<String> {
        let mut matched: Vec<String> = catalog
            .iter()
            .filter(|(id, meta)| self.matches(id, meta))
            .map(|(id, _)| id.clone())
            .collect();
        matched.sort();
        info!(
            matched = matched.len(),
            total = catalog.len(),
            "Filtered instance types"
        );
        matched
    }

    fn matches(&self, instance_type_id: &str, meta: &InstanceMeta) -> bool {
        if meta.cpu_core_count < self.min_cores || meta.cpu_core_count > self.max_cores {
            return false;
        }
        if meta.memory_size_gb < self.min_memory_gb || meta.memory_size_gb > self.max_memory_gb {
            return false;
        }
        if !self.arch.trim().is_empty() && instance_arch(meta) != normalize_arch(&self.arch) {
            return false;
        }
        self.families
            .iter()
            .any(|family| instance_type_id.contains(family.as_str()))
    }
}

/// Canonicalize an architecture alias
///
/// Case-insensitive, whitespace-trimming. Unrecognized values pass
/// through lowercased; a mismatch on them is a non-match, not a failure.
pub fn normalize_arch(arch: &str) -> String {
    let lowered = arch.trim().to_lowercase();
    match lowered.as_str() {
        "amd64" | "x86_64" | "x86" | "x86-64" | "x64" => "x86_64".to_string(),
        "arm64" | "aarch64" | "arm" => "arm64".to_string(),
        _ => lowered,
    }
}

/// Canonical architecture of an instance type
///
/// Prefers the explicit metadata field. When blank, falls back to ARM
/// generation tokens in the identifier or family, defaulting to x86_64.
pub fn instance_arch(meta: &InstanceMeta) -> String {
    if !meta.cpu_architecture.trim().is_empty() {
        return normalize_arch(&meta.cpu_architecture);
    }
    let id = meta.instance_type_id.to_lowercase();
    let family = meta.instance_family.to_lowercase();
    for token in ARM_SERIES_TOKENS {
        if id.contains(&format!(".{token}")) || family.contains(token) {
            return "arm64".to_string();
        }
    }
    "x86_64".to_string()
}
