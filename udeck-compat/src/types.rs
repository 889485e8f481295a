//! Domain types for the compatibility pipeline

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Community compatibility rating, as aggregated by ProtonDB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Platinum,
    Gold,
    Silver,
    Bronze,
    Borked,
    Pending,
    Native,
}

impl Tier {
    /// Parse a tier value reported by the API.
    ///
    /// Anything outside the recognized set is treated as not rated.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "platinum" => Some(Self::Platinum),
            "gold" => Some(Self::Gold),
            "silver" => Some(Self::Silver),
            "bronze" => Some(Self::Bronze),
            "borked" => Some(Self::Borked),
            "pending" => Some(Self::Pending),
            "native" => Some(Self::Native),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Platinum => "platinum",
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Bronze => "bronze",
            Self::Borked => "borked",
            Self::Pending => "pending",
            Self::Native => "native",
        }
    }
}

/// Steam Deck compatibility category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckSupport {
    #[default]
    Unknown,
    Unsupported,
    Playable,
    Verified,
}

impl DeckSupport {
    /// Map the numeric category code reported by the deck compatibility
    /// endpoint. Codes outside the table collapse to `Unknown`.
    pub fn from_category(code: i64) -> Self {
        match code {
            1 => Self::Unknown,
            2 => Self::Unsupported,
            3 => Self::Playable,
            4 => Self::Verified,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Unsupported => "unsupported",
            Self::Playable => "playable",
            Self::Verified => "verified",
        }
    }
}

/// One cached compatibility record per normalized title
///
/// Field names match the persisted cache file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatRecord {
    /// ProtonDB tier, absent when the title has no rating
    pub tier: Option<Tier>,
    /// Deck compatibility category, never absent
    #[serde(rename = "deckVerified")]
    pub deck_verified: DeckSupport,
    /// Steam AppID, absent only when title resolution failed
    #[serde(rename = "steamAppId")]
    pub steam_app_id: Option<u32>,
    /// Seconds since the epoch at the time the record was produced
    pub timestamp: i64,
}

impl CompatRecord {
    /// Record for a title the store search could not resolve.
    ///
    /// No app id means no downstream lookups were attempted.
    pub fn unresolved(timestamp: i64) -> Self {
        Self {
            tier: None,
            deck_verified: DeckSupport::Unknown,
            steam_app_id: None,
            timestamp,
        }
    }

    /// Whether at least one of the two lookups produced a rating
    pub fn has_rating(&self) -> bool {
        self.tier.is_some() || self.deck_verified != DeckSupport::Unknown
    }
}

/// Cache mapping normalized title to compatibility record
pub type CompatCache = HashMap<String, CompatRecord>;

/// Cache key: lower-cased, whitespace-trimmed title
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_parse_recognizes_all_seven() {
        for value in ["platinum", "gold", "silver", "bronze", "borked", "pending", "native"] {
            let tier = Tier::parse(value).unwrap();
            assert_eq!(tier.as_str(), value);
        }
    }

    #[test]
    fn tier_parse_rejects_unknown_values() {
        assert_eq!(Tier::parse("diamond"), None);
        assert_eq!(Tier::parse("Platinum"), None);
        assert_eq!(Tier::parse(""), None);
    }

    #[test]
    fn deck_support_category_table() {
        assert_eq!(DeckSupport::from_category(1), DeckSupport::Unknown);
        assert_eq!(DeckSupport::from_category(2), DeckSupport::Unsupported);
        assert_eq!(DeckSupport::from_category(3), DeckSupport::Playable);
        assert_eq!(DeckSupport::from_category(4), DeckSupport::Verified);
    }

    #[test]
    fn unmapped_category_is_unknown() {
        assert_eq!(DeckSupport::from_category(99), DeckSupport::Unknown);
        assert_eq!(DeckSupport::from_category(0), DeckSupport::Unknown);
        assert_eq!(DeckSupport::from_category(-3), DeckSupport::Unknown);
    }

    #[test]
    fn record_serializes_with_wire_field_names() {
        let record = CompatRecord {
            tier: Some(Tier::Platinum),
            deck_verified: DeckSupport::Verified,
            steam_app_id: Some(945360),
            timestamp: 1_700_000_000,
        };

        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(json["tier"], "platinum");
        assert_eq!(json["deckVerified"], "verified");
        assert_eq!(json["steamAppId"], 945360);
        assert_eq!(json["timestamp"], 1_700_000_000);
    }

    #[test]
    fn unresolved_record_holds_invariant() {
        let record = CompatRecord::unresolved(1_700_000_000);
        assert_eq!(record.steam_app_id, None);
        assert_eq!(record.tier, None);
        assert_eq!(record.deck_verified, DeckSupport::Unknown);
        assert!(!record.has_rating());
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_title("  Among Us "), "among us");
        assert_eq!(normalize_title("DREDGE"), "dredge");
        assert_eq!(normalize_title("dredge"), "dredge");
    }
}
