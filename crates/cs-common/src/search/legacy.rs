//! AND-only compiler behind the original `/candidates/search` endpoint.
//!
//! The legacy query is a flat document: every logical filter claims one
//! top-level key, and a later filter claiming the same key replaces the
//! earlier one. Two collisions are long-standing behaviour that clients rely
//! on and are reproduced here:
//!
//! * `keywords` and `showCandidatesWith` both claim `$or`; the status tags win.
//! * `excludeKeywords` claims `professional.skills` and drops a `skills` filter;
//!   `excludeAnywhereInIndia` likewise replaces `preferredCities`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::compiler::{Dialect, active_only, emit_clauses};
use super::fields;
use super::filter_spec::FilterSpec;
use super::storage_filter::StorageFilter;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegacyFilter {
    slots: BTreeMap<String, StorageFilter>,
}

impl LegacyFilter {
    /// Top-level keys that survived, in document order.
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn get(&self, slot: &str) -> Option<&StorageFilter> {
        self.slots.get(slot)
    }

    pub fn to_document(&self) -> Value {
        let mut flat = Map::new();
        for filter in self.slots.values() {
            if let Value::Object(entries) = filter.to_document() {
                flat.extend(entries);
            }
        }
        Value::Object(flat)
    }

    /// Conjunction of the surviving slots, ready for a [`crate::CandidateStore`].
    pub fn into_filter(self) -> StorageFilter {
        let mut filters: Vec<_> = self.slots.into_values().collect();
        match filters.len() {
            1 => filters.remove(0),
            _ => StorageFilter::All(filters),
        }
    }
}

pub fn compile_legacy_filter(spec: &FilterSpec) -> LegacyFilter {
    compile_legacy_filter_at(spec, Utc::now())
}

pub fn compile_legacy_filter_at(spec: &FilterSpec, now: DateTime<Utc>) -> LegacyFilter {
    let mut slots = BTreeMap::new();
    for clause in emit_clauses(spec, Dialect::Legacy, now) {
        slots.insert(clause.slot, clause.filter);
    }

    if !spec.include_inactive {
        slots.insert(fields::IS_ACTIVE.to_string(), active_only());
    }

    LegacyFilter { slots }
}
