use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dropdown fields whose choices users can extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionField {
    Vendor,
    Concentration,
    Storage,
    Host,
    Isotype,
    Conjugate,
}

pub const VENDOR_OPTIONS: &[&str] = &[
    "Abcam",
    "Cell Signaling Technology (CST)",
    "Proteintech",
    "Santa Cruz",
    "Thermo Fisher",
    "Sigma-Aldrich",
    "BD Biosciences",
    "BioLegend",
    "Jackson ImmunoResearch",
];

pub const CONCENTRATION_OPTIONS: &[&str] = &[
    "0.05 mg/mL",
    "0.1 mg/mL",
    "0.2 mg/mL",
    "0.5 mg/mL",
    "1 mg/mL",
    "2 mg/mL",
    "5 mg/mL",
    "Unknown",
];

pub const STORAGE_OPTIONS: &[&str] = &["4°C", "-20°C", "-80°C", "Room temperature", "Protect from light"];

pub const HOST_OPTIONS: &[&str] = &[
    "Mouse", "Rabbit", "Rat", "Goat", "Sheep", "Chicken", "Human",
];

pub const ISOTYPE_OPTIONS: &[&str] = &[
    "IgG", "IgG1", "IgG2a", "IgG2b", "IgM", "IgA", "IgE", "IgY", "Unknown",
];

pub const CONJUGATE_OPTIONS: &[&str] = &[
    "Unconjugated (secondary required)",
    "HRP",
    "AP",
    "Biotin",
    "FITC",
    "PE",
    "APC",
    "Alexa Fluor 488",
    "Alexa Fluor 555",
    "Alexa Fluor 594",
    "Alexa Fluor 647",
];

impl OptionField {
    pub const ALL: [OptionField; 6] = [
        OptionField::Vendor,
        OptionField::Concentration,
        OptionField::Storage,
        OptionField::Host,
        OptionField::Isotype,
        OptionField::Conjugate,
    ];

    /// Key under which the custom list is persisted
    pub fn key(&self) -> &'static str {
        match self {
            OptionField::Vendor => "vendor",
            OptionField::Concentration => "conc",
            OptionField::Storage => "storage",
            OptionField::Host => "host",
            OptionField::Isotype => "isotype",
            OptionField::Conjugate => "conjugate",
        }
    }

    pub fn builtin(&self) -> &'static [&'static str] {
        match self {
            OptionField::Vendor => VENDOR_OPTIONS,
            OptionField::Concentration => CONCENTRATION_OPTIONS,
            OptionField::Storage => STORAGE_OPTIONS,
            OptionField::Host => HOST_OPTIONS,
            OptionField::Isotype => ISOTYPE_OPTIONS,
            OptionField::Conjugate => CONJUGATE_OPTIONS,
        }
    }
}

/// User-contributed dropdown values, most recent first, per field key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomOptions(pub BTreeMap<String, Vec<String>>);

impl CustomOptions {
    pub fn values(&self, field: OptionField) -> &[String] {
        self.0.get(field.key()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Put `value` at the front of the field's list, keeping at most `limit`
    /// entries. Returns false when the value is blank or already first.
    pub fn remember(&mut self, field: OptionField, value: &str, limit: usize) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }

        let list = self.0.entry(field.key().to_string()).or_default();
        if list.first().map(String::as_str) == Some(value) {
            return false;
        }
        list.retain(|existing| existing != value);
        list.insert(0, value.to_string());
        list.truncate(limit);
        true
    }

    /// Custom values first, then the built-in catalogue, without repeats
    pub fn choices(&self, field: OptionField) -> Vec<String> {
        self.values(field)
            .iter()
            .map(String::as_str)
            .chain(field.builtin().iter().copied())
            .unique()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remember_is_most_recent_first() {
        let mut options = CustomOptions::default();
        assert!(options.remember(OptionField::Vendor, "Acme Bio", 50));
        assert!(options.remember(OptionField::Vendor, "Zeta Labs", 50));
        assert!(options.remember(OptionField::Vendor, " Acme Bio ", 50));

        assert_eq!(options.values(OptionField::Vendor), ["Acme Bio", "Zeta Labs"]);
        assert!(!options.remember(OptionField::Vendor, "Acme Bio", 50));
        assert!(!options.remember(OptionField::Vendor, "   ", 50));
    }

    #[test]
    fn test_remember_caps_list() {
        let mut options = CustomOptions::default();
        for i in 0..60 {
            options.remember(OptionField::Host, &format!("Host {}", i), 50);
        }
        let values = options.values(OptionField::Host);
        assert_eq!(values.len(), 50);
        assert_eq!(values[0], "Host 59");
        assert_eq!(values[49], "Host 10");
    }

    #[test]
    fn test_choices_merge_custom_and_builtin() {
        let mut options = CustomOptions::default();
        options.remember(OptionField::Host, "Rabbit", 50);
        options.remember(OptionField::Host, "Llama", 50);

        let choices = options.choices(OptionField::Host);
        assert_eq!(&choices[..3], ["Llama", "Rabbit", "Mouse"]);
        assert_eq!(choices.iter().filter(|c| *c == "Rabbit").count(), 1);
        assert_eq!(choices.len(), HOST_OPTIONS.len() + 1);
    }

    #[test]
    fn test_persisted_shape_uses_field_keys() {
        let mut options = CustomOptions::default();
        options.remember(OptionField::Concentration, "3 mg/mL", 50);
        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value, serde_json::json!({ "conc": ["3 mg/mL"] }));
    }
}
