//! Crop yield reference data

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::district::DistrictAliases;
use crate::types::Crop;

/// Reference yield of one crop in one district (tons/hectare)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YieldRecord {
    pub crop: Crop,
    pub district: String,
    pub yield_t_ha: Decimal,
}

/// (crop, canonical district) → yield
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YieldTable {
    entries: BTreeMap<Crop, BTreeMap<String, Decimal>>,
}

impl YieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, crop: Crop, canonical_district: &str, yield_t_ha: Decimal) {
        self.entries
            .entry(crop)
            .or_default()
            .insert(canonical_district.to_string(), yield_t_ha);
    }

    /// Yield for a district given under any of its names
    pub fn lookup(&self, aliases: &DistrictAliases, crop: Crop, district: &str) -> Option<Decimal> {
        let canonical = aliases.resolve(district);
        self.entries.get(&crop)?.get(canonical).copied()
    }

    /// All records for a crop, ordered by district
    pub fn records_for(&self, crop: Crop) -> Vec<YieldRecord> {
        self.entries
            .get(&crop)
            .map(|districts| {
                districts
                    .iter()
                    .map(|(district, value)| YieldRecord {
                        crop,
                        district: district.clone(),
                        yield_t_ha: *value,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<YieldRecord> for YieldTable {
    fn from_iter<I: IntoIterator<Item = YieldRecord>>(iter: I) -> Self {
        let mut table = YieldTable::new();
        for record in iter {
            table.insert(record.crop, &record.district, record.yield_t_ha);
        }
        table
    }
}
