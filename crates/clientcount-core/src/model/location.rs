// ── Location catalog ──
//
// Location keys are open-ended strings; the operator configures which
// ones are valid. Labels are a partial map with a deterministic fallback.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;

const BUILTIN_LABELS: &[(&str, &str)] = &[
    ("gatsu", "Gatot Subroto"),
    ("ancol", "Ancol"),
    ("pejaten", "Pejaten"),
    ("thamrin", "Thamrin"),
    ("agam", "Agam"),
];

/// The configured allow-list of locations plus their display labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationCatalog {
    keys: Vec<String>,
    labels: HashMap<String, String>,
}

impl LocationCatalog {
    /// Build a catalog from a non-empty key list. Duplicates are dropped,
    /// first occurrence wins the position.
    pub fn new(keys: impl IntoIterator<Item = impl Into<String>>) -> Result<Self, CoreError> {
        let mut unique: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into();
            if !key.is_empty() && !unique.contains(&key) {
                unique.push(key);
            }
        }
        if unique.is_empty() {
            return Err(CoreError::Config {
                message: "location list cannot be empty".into(),
            });
        }
        let labels = BUILTIN_LABELS
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Ok(Self {
            keys: unique,
            labels,
        })
    }

    /// Add or override labels.
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = (String, String)>) -> Self {
        self.labels.extend(labels);
        self
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The first configured location.
    pub fn first(&self) -> &str {
        self.keys.first().map_or("", String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Validate a key against the allow-list.
    pub fn validate(&self, key: &str) -> Result<(), CoreError> {
        if self.contains(key) {
            Ok(())
        } else {
            Err(CoreError::UnknownLocation {
                location: key.to_owned(),
                available: self.keys.join(", "),
            })
        }
    }

    /// Display label; unknown keys get their first letter capitalised.
    pub fn label(&self, key: &str) -> String {
        self.labels
            .get(key)
            .cloned()
            .unwrap_or_else(|| capitalize(key))
    }

    /// `(key, label)` pairs in configured order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.keys.iter().map(|k| (k.as_str(), self.label(k)))
    }
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_is_rejected() {
        let err = LocationCatalog::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
        assert!(LocationCatalog::new([""]).is_err());
    }

    #[test]
    fn labels_fall_back_to_capitalised_key() {
        let catalog = LocationCatalog::new(["gatsu", "cibinong"]).unwrap();
        assert_eq!(catalog.label("gatsu"), "Gatot Subroto");
        assert_eq!(catalog.label("cibinong"), "Cibinong");
        assert_eq!(catalog.label(""), "");
    }

    #[test]
    fn configured_labels_override_builtins() {
        let catalog = LocationCatalog::new(["gatsu"])
            .unwrap()
            .with_labels([("gatsu".to_owned(), "Gatsu HQ".to_owned())]);
        assert_eq!(catalog.label("gatsu"), "Gatsu HQ");
    }

    #[test]
    fn validate_checks_allow_list() {
        let catalog = LocationCatalog::new(["gatsu", "ancol", "gatsu"]).unwrap();
        assert_eq!(catalog.keys(), ["gatsu", "ancol"]);
        assert!(catalog.validate("ancol").is_ok());
        match catalog.validate("bogor") {
            Err(CoreError::UnknownLocation { available, .. }) => {
                assert_eq!(available, "gatsu, ancol");
            }
            other => panic!("expected UnknownLocation, got {other:?}"),
        }
    }
}
