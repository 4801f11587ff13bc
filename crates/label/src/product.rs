//! Product type codes and the data derived from them.
//!
//! A type code such as `WARP2-CS-22KW-75` encodes the model tier, the power
//! rating, and the attached cable length. Everything printed on the label
//! besides the per-instance serial number derives from the code via pure
//! lookups, so two runs with the same type code always produce the same
//! description and EAN13 code.

use std::fmt;
use std::str::FromStr;

use crate::request::ValidationError;

/// Model tier of a WARP2 Charger (the `B`/`S`/`P` in the type code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    /// Entry model without network connectivity.
    Basic,
    /// Networked model.
    Smart,
    /// Networked model with an energy meter.
    Pro,
}

impl ModelTier {
    /// The tier word as it appears in the label description.
    pub fn word(self) -> &'static str {
        match self {
            ModelTier::Basic => "Basic",
            ModelTier::Smart => "Smart",
            ModelTier::Pro => "Pro",
        }
    }
}

/// Rated charging power (the `11KW`/`22KW` segment of the type code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerRating {
    /// 11 kW, single-phase 16 A.
    Kw11,
    /// 22 kW, three-phase 32 A.
    Kw22,
}

impl PowerRating {
    /// Power as printed in the description, e.g. `11 kW`.
    pub fn label(self) -> &'static str {
        match self {
            PowerRating::Kw11 => "11 kW",
            PowerRating::Kw22 => "22 kW",
        }
    }

    /// Rated current for this power class, e.g. `16 A`.
    pub fn current_label(self) -> &'static str {
        match self {
            PowerRating::Kw11 => "16 A",
            PowerRating::Kw22 => "32 A",
        }
    }
}

/// Length of the attached charging cable (the `50`/`75` suffix).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CableLength {
    /// 5 m cable.
    M5,
    /// 7.5 m cable.
    M75,
}

impl CableLength {
    /// Cable length as printed in the description.
    ///
    /// Labels use the decimal comma: `7,5 m`.
    pub fn label(self) -> &'static str {
        match self {
            CableLength::M5 => "5 m",
            CableLength::M75 => "7,5 m",
        }
    }
}

/// A validated WARP2 Charger type code.
///
/// Keeps the literal spelling (including an optional `TF-` order-number
/// prefix) for the type line on the label, plus the decoded model, power,
/// and cable fields that drive the description and EAN13 lookups.
///
/// Accepted grammar: optional `TF-` prefix, then
/// `WARP2-C{B|S|P}-{11|22}KW-{50|75}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCode {
    literal: String,
    tier: ModelTier,
    power: PowerRating,
    cable: CableLength,
}

impl FromStr for ProductCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::Type(s.to_string());

        let base = s.strip_prefix("TF-").unwrap_or(s);
        let mut parts = base.split('-');
        let (Some("WARP2"), Some(model), Some(power), Some(cable), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(invalid());
        };

        let tier = match model {
            "CB" => ModelTier::Basic,
            "CS" => ModelTier::Smart,
            "CP" => ModelTier::Pro,
            _ => return Err(invalid()),
        };
        let power = match power {
            "11KW" => PowerRating::Kw11,
            "22KW" => PowerRating::Kw22,
            _ => return Err(invalid()),
        };
        let cable = match cable {
            "50" => CableLength::M5,
            "75" => CableLength::M75,
            _ => return Err(invalid()),
        };

        Ok(Self {
            literal: s.to_string(),
            tier,
            power,
            cable,
        })
    }
}

impl ProductCode {
    /// The literal type code as passed in, `TF-` prefix included.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// The type code without the `TF-` prefix; key for the EAN13 lookup.
    pub fn base_key(&self) -> &str {
        self.literal.strip_prefix("TF-").unwrap_or(&self.literal)
    }

    /// Model tier.
    pub fn tier(&self) -> ModelTier {
        self.tier
    }

    /// Power rating.
    pub fn power(&self) -> PowerRating {
        self.power
    }

    /// Cable length.
    pub fn cable(&self) -> CableLength {
        self.cable
    }

    /// The description line printed on the label, e.g.
    /// `WARP2 Charger Smart, 11 kW, 5 m`.
    pub fn description(&self) -> String {
        format!(
            "WARP2 Charger {}, {}, {}",
            self.tier.word(),
            self.power.label(),
            self.cable.label()
        )
    }

    /// The 13-digit EAN code assigned to this product variant.
    ///
    /// The mapping is total: every parseable type code has exactly one entry.
    pub fn ean13(&self) -> &'static [u8] {
        use CableLength::{M5, M75};
        use ModelTier::{Basic, Pro, Smart};
        use PowerRating::{Kw11, Kw22};

        match (self.tier, self.power, self.cable) {
            (Basic, Kw11, M5) => b"4251640704773",
            (Basic, Kw11, M75) => b"4251640704780",
            (Basic, Kw22, M5) => b"4251640704797",
            (Basic, Kw22, M75) => b"4251640704803",

            (Smart, Kw11, M5) => b"4251640704810",
            (Smart, Kw11, M75) => b"4251640704827",
            (Smart, Kw22, M5) => b"4251640704834",
            (Smart, Kw22, M75) => b"4251640704841",

            (Pro, Kw11, M5) => b"4251640704858",
            (Pro, Kw11, M75) => b"4251640704865",
            (Pro, Kw22, M5) => b"4251640704872",
            (Pro, Kw22, M75) => b"4251640704889",
        }
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}
