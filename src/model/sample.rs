use serde::{Deserialize, Deserializer, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// One antibody aliquot held in a single grid position.
///
/// Text fields are stored exactly as entered. The quantity fields
/// (`total_amount`, `amount_per_use`, `warn_threshold`) stay as text too and
/// are interpreted by `logic::quantity`, so a malformed value is kept and
/// reported as unknown rather than silently rewritten.
///
/// A record is only an occupant when its `name` is non-blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sample {
    pub name: String,
    #[serde(alias = "p")]
    pub clone_id: String,
    pub vendor: String,
    #[serde(alias = "catalog")]
    pub catalog_number: String,
    #[serde(alias = "lot")]
    pub lot_number: String,
    #[serde(alias = "conc")]
    pub concentration: String,
    #[serde(alias = "kda")]
    pub molecular_weight: String,
    #[serde(alias = "host")]
    pub host_species: String,
    pub isotype: String,
    pub conjugate: String,
    #[serde(alias = "storage")]
    pub storage_condition: String,
    #[serde(alias = "expiry")]
    pub expiry_date: String,
    #[serde(alias = "date")]
    pub received_date: String,
    #[serde(alias = "amount")]
    pub total_amount: String,
    pub amount_unit: AmountUnit,
    #[serde(alias = "usePer")]
    pub amount_per_use: String,
    #[serde(alias = "usedCount", deserialize_with = "lenient_count")]
    pub uses_consumed: u32,
    pub warn_threshold: String,
    pub remark: String,
}

impl Sample {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether this record counts as an occupant of its position
    pub fn is_occupied(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Copy with one more use counted ("use once")
    pub fn with_use_recorded(&self) -> Self {
        Self {
            uses_consumed: self.uses_consumed.saturating_add(1),
            ..self.clone()
        }
    }

    /// Copy with one use taken back, never below zero
    pub fn with_use_undone(&self) -> Self {
        Self {
            uses_consumed: self.uses_consumed.saturating_sub(1),
            ..self.clone()
        }
    }

    /// Fields scanned by the free-text search, in display order
    pub fn searchable_fields(&self) -> [&str; 13] {
        [
            self.name.as_str(),
            self.clone_id.as_str(),
            self.vendor.as_str(),
            self.catalog_number.as_str(),
            self.lot_number.as_str(),
            self.concentration.as_str(),
            self.molecular_weight.as_str(),
            self.host_species.as_str(),
            self.isotype.as_str(),
            self.conjugate.as_str(),
            self.storage_condition.as_str(),
            self.expiry_date.as_str(),
            self.remark.as_str(),
        ]
    }
}

/// Unit the total amount is expressed in.
///
/// Values outside the fixed catalogue are preserved verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum AmountUnit {
    #[default]
    Unset,
    Microliter,
    Milliliter,
    Milligram,
    Microgram,
    Unknown,
    Other(String),
}

impl AmountUnit {
    pub const CATALOGUE: [AmountUnit; 5] = [
        AmountUnit::Microliter,
        AmountUnit::Milliliter,
        AmountUnit::Milligram,
        AmountUnit::Microgram,
        AmountUnit::Unknown,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            AmountUnit::Unset => "",
            AmountUnit::Microliter => "µL",
            AmountUnit::Milliliter => "mL",
            AmountUnit::Milligram => "mg",
            AmountUnit::Microgram => "µg",
            AmountUnit::Unknown => "Unknown",
            AmountUnit::Other(other) => other,
        }
    }

    /// Text shown after a quantity; empty for unset and unknown units
    pub fn label(&self) -> &str {
        match self {
            AmountUnit::Unset | AmountUnit::Unknown => "",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for AmountUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmountUnit {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" => AmountUnit::Unset,
            "µL" => AmountUnit::Microliter,
            "mL" => AmountUnit::Milliliter,
            "mg" => AmountUnit::Milligram,
            "µg" => AmountUnit::Microgram,
            "Unknown" => AmountUnit::Unknown,
            other => AmountUnit::Other(other.to_string()),
        })
    }
}

/// Accepts an integer, a numeric string or junk; junk and negatives read as 0.
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64))
            .map(|n| n.min(u32::MAX as u64) as u32)
            .unwrap_or(0),
        serde_json::Value::String(s) => crate::logic::parse_count(&s),
        _ => 0,
    })
}
