//! Risk Registry
//!
//! Ordered in-memory collection of evaluated assets. Owns the key counter.
//!
//! Every mutation builds the next collection and swaps it in, so a caller
//! holding a `list()` snapshot never sees a half-applied change.

use crate::models::{RiskProfile, RiskRow, RiskRowPatch, TREATMENT_PLACEHOLDER};

#[derive(Debug, Clone)]
pub struct RiskRegistry {
    rows: Vec<RiskRow>,
    next_key: u64,
}

impl RiskRegistry {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            next_key: 1,
        }
    }

    /// Key the next `create` will hand out
    pub fn next_key(&self) -> u64 {
        self.next_key
    }

    /// Append a freshly evaluated asset. Keys are never reused, even after deletes.
    pub fn create(&mut self, profile: RiskProfile, activo: &str) -> RiskRow {
        let row = RiskRow {
            key: self.next_key.to_string(),
            activo: activo.to_string(),
            riesgo: profile.riesgo,
            impacto: profile.impacto,
            probabilidad: profile.probabilidad,
            categoria: profile.categoria,
            tratamiento: TREATMENT_PLACEHOLDER.to_string(),
        };
        self.next_key += 1;

        let mut next = self.rows.clone();
        next.push(row.clone());
        self.rows = next;

        tracing::debug!(key = %row.key, activo = %row.activo, "Risk row created");
        row
    }

    /// Merge `patch` into the row with `key`. Missing key is a no-op.
    pub fn update(&mut self, key: &str, patch: RiskRowPatch) {
        let Some(index) = self.rows.iter().position(|row| row.key == key) else {
            tracing::debug!(key, "Update ignored, no such row");
            return;
        };

        let mut next = self.rows.clone();
        next[index].apply(patch);
        self.rows = next;
    }

    /// Remove the row with `key`, keeping the order of the rest. Missing key is a no-op.
    pub fn delete(&mut self, key: &str) {
        let next: Vec<RiskRow> = self.rows.iter().filter(|row| row.key != key).cloned().collect();
        if next.len() == self.rows.len() {
            tracing::debug!(key, "Delete ignored, no such row");
        }
        self.rows = next;
    }

    /// Replace every row with `mapper(row)` in one pass.
    pub fn bulk_update<F>(&mut self, mapper: F)
    where
        F: Fn(&RiskRow) -> RiskRow,
    {
        self.rows = self.rows.iter().map(mapper).collect();
    }

    pub fn list(&self) -> Vec<RiskRow> {
        self.rows.clone()
    }

    pub fn get(&self, key: &str) -> Option<&RiskRow> {
        self.rows.iter().find(|row| row.key == key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for RiskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
