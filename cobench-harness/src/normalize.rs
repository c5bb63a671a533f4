use std::collections::HashMap;

/// Published best-known objective values, keyed by instance label. Passed
/// into the runner explicitly; a missing entry just skips normalization for
/// that instance.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    values: HashMap<String, f64>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: HashMap<String, f64>) -> Self {
        ReferenceTable { values }
    }

    pub fn insert(&mut self, label: impl Into<String>, value: f64) {
        self.values.insert(label.into(), value);
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.values.get(label).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Express a raw objective relative to a reference value. 1.0 matches the
/// reference and anything above 1.0 beats it; better-than-reference results
/// keep their meaningful ratio instead of being clamped.
pub fn normalize(raw: f64, reference: f64, sense: Sense) -> f64 {
    match sense {
        Sense::Minimize => {
            if raw == 0.0 {
                if reference == 0.0 {
                    1.0
                } else {
                    f64::INFINITY
                }
            } else {
                reference / raw
            }
        }
        Sense::Maximize => {
            if reference == 0.0 {
                if raw == 0.0 {
                    1.0
                } else {
                    f64::INFINITY
                }
            } else {
                raw / reference
            }
        }
    }
}
