//! District naming and location models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::GpsCoordinates;

/// Raw → canonical district name table.
///
/// Boundary files, forecast locations and yield tables spell several Sindh
/// districts differently. Every join key goes through [`DistrictAliases::resolve`]
/// before a lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistrictAliases {
    /// Lowercased raw name → canonical name
    entries: BTreeMap<String, String>,
}

impl DistrictAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut aliases = Self::new();
        for (raw, canonical) in pairs {
            aliases.insert(raw, canonical);
        }
        aliases
    }

    pub fn insert(&mut self, raw: &str, canonical: &str) {
        self.entries
            .insert(raw.trim().to_lowercase(), canonical.trim().to_string());
    }

    /// Canonical name for `raw`; unknown names are their own canonical name
    pub fn resolve<'a>(&'a self, raw: &'a str) -> &'a str {
        let trimmed = raw.trim();
        self.entries
            .get(&trimmed.to_lowercase())
            .map(String::as_str)
            .unwrap_or(trimmed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonical district name → forecast coordinates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistrictLocations {
    entries: BTreeMap<String, GpsCoordinates>,
}

impl DistrictLocations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, canonical: &str, coordinates: GpsCoordinates) {
        self.entries.insert(canonical.to_string(), coordinates);
    }

    pub fn get(&self, canonical: &str) -> Option<GpsCoordinates> {
        self.entries.get(canonical).copied()
    }

    /// Locations in canonical-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, GpsCoordinates)> {
        self.entries.iter().map(|(name, coords)| (name.as_str(), *coords))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// District summary exposed to clients (no geometry)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistrictSummary {
    pub name: String,
    pub canonical_name: String,
    pub coordinates: Option<GpsCoordinates>,
}
