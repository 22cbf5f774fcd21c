//! Region endpoint table with alias canonicalization.
//!
//! Deployments serve several regions from a handful of physical clusters, so
//! incoming region codes pass through an alias map before lookup. The table
//! is plain data, deserializable from configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, Result};

/// Endpoint set for one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEndpoints {
    /// URL for informational-read traffic.
    pub inspect_url: String,
    /// URL for mutating-action traffic.
    pub engage_url: String,
    /// Credential namespace to fetch tokens from for this region.
    pub credential_namespace: String,
}

/// Mapping of region codes to endpoint sets.
///
/// Lookup is strict; [`RegionTable::canonicalize`] first folds aliases and
/// unknown codes into a configured fallback region (when one is set).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionTable {
    regions: HashMap<String, RegionEndpoints>,
    #[serde(default)]
    aliases: HashMap<String, String>,
    #[serde(default)]
    fallback: Option<String>,
}

impl RegionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a region, returning the table for chaining.
    #[must_use]
    pub fn with_region(mut self, code: impl Into<String>, endpoints: RegionEndpoints) -> Self {
        self.regions.insert(code.into().to_uppercase(), endpoints);
        self
    }

    /// Maps an alias code onto a canonical region code.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.aliases.insert(alias.into().to_uppercase(), canonical.into().to_uppercase());
        self
    }

    /// Sets the region unknown codes canonicalize to.
    #[must_use]
    pub fn with_fallback(mut self, code: impl Into<String>) -> Self {
        self.fallback = Some(code.into().to_uppercase());
        self
    }

    /// Folds a caller-supplied code into a canonical region code.
    ///
    /// Uppercases, then resolves aliases; codes that are neither known
    /// regions nor aliases become the fallback region when one is set,
    /// otherwise pass through unchanged (and fail strict lookup later).
    pub fn canonicalize(&self, code: &str) -> String {
        let code = code.to_uppercase();
        if let Some(canonical) = self.aliases.get(&code) {
            return canonical.clone();
        }
        if self.regions.contains_key(&code) {
            return code;
        }
        self.fallback.clone().unwrap_or(code)
    }

    /// Strict lookup of a region's endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownRegion`] when `code` (uppercased,
    /// no alias folding) is not in the table.
    pub fn get(&self, code: &str) -> Result<&RegionEndpoints> {
        let code = code.to_uppercase();
        self.regions.get(&code).ok_or_else(|| DispatchError::unknown_region(code))
    }
}
