// Geocode lookup table and the exact-then-fuzzy address matcher.
use crate::address::{extract_street_portion, normalize};
use crate::types::RawGeocodeRow;
use crate::util::parse_f64_safe;
use std::collections::BTreeMap;

/// Normalized address -> `(latitude, longitude)`, built once from the
/// geocoded-address table and read-only afterwards.
///
/// Backed by a `BTreeMap` so the fuzzy scan walks entries in sorted key
/// order; substring matches are first-hit, and an unordered map would make
/// the winner depend on hash iteration order.
#[derive(Debug, Default)]
pub struct GeocodeIndex {
    entries: BTreeMap<String, (f64, f64)>,
}

impl GeocodeIndex {
    /// Rows with a missing address or unparseable coordinates are skipped.
    /// Duplicate normalized keys keep the last row seen.
    pub fn build(rows: &[RawGeocodeRow]) -> Self {
        let mut entries = BTreeMap::new();
        for row in rows {
            let key = normalize(row.address.as_deref());
            if key.is_empty() {
                continue;
            }
            let (Some(lat), Some(lon)) = (
                parse_f64_safe(row.latitude.as_deref()),
                parse_f64_safe(row.longitude.as_deref()),
            ) else {
                continue;
            };
            entries.insert(key, (lat, lon));
        }
        GeocodeIndex { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a raw trip address to `(latitude, longitude)`. Resolution
    /// order, first success wins:
    /// 1. exact probe on the normalized full address,
    /// 2. exact probe on the normalized street portion,
    /// 3. fuzzy scan: first indexed entry containing the street portion as a
    ///    substring, then first entry containing the street portion's text
    ///    before its first comma (only when longer than 5 characters).
    ///
    /// Never fails; an address with no candidate yields `None`.
    pub fn find_coordinates(&self, address: Option<&str>) -> Option<(f64, f64)> {
        let address = address?;

        let normalized = normalize(Some(address));
        if let Some(&coords) = self.entries.get(&normalized) {
            return Some(coords);
        }

        let street = extract_street_portion(Some(address));
        let normalized_street = normalize(Some(&street));
        if let Some(&coords) = self.entries.get(&normalized_street) {
            return Some(coords);
        }
        if normalized_street.is_empty() {
            return None;
        }

        for (geo_addr, &coords) in &self.entries {
            if geo_addr.contains(&normalized_street) {
                return Some(coords);
            }
        }

        // Fall back to the street text before the first comma; short stems
        // match too much to be trusted.
        let stem = normalized_street
            .split(',')
            .next()
            .unwrap_or("")
            .trim_end();
        if stem.len() > 5 {
            for (geo_addr, &coords) in &self.entries {
                if geo_addr.contains(stem) {
                    return Some(coords);
                }
            }
        }

        None
    }
}
