use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Market capitalization bracket of a stock
///
/// Brackets have a natural display order: mega > large > mid > small > micro > unknown.
/// Unrecognized or missing values deserialize to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarketCapCategory {
    /// >= $200B
    Mega,
    /// $10B - $200B
    Large,
    /// $2B - $10B
    Mid,
    /// $300M - $2B
    Small,
    /// < $300M
    Micro,
    /// Bracket not reported by the backend
    #[default]
    Unknown,
}

impl MarketCapCategory {
    /// All brackets in display order
    pub const ALL: [MarketCapCategory; 6] = [
        MarketCapCategory::Mega,
        MarketCapCategory::Large,
        MarketCapCategory::Mid,
        MarketCapCategory::Small,
        MarketCapCategory::Micro,
        MarketCapCategory::Unknown,
    ];

    /// Parse from string (case-insensitive, tolerates "-cap"/" cap" suffixes)
    pub fn from_str(s: &str) -> Result<Self, String> {
        let normalized = s.trim().to_lowercase();
        let normalized = normalized
            .trim_end_matches("-cap")
            .trim_end_matches(" cap")
            .trim_end_matches("_cap")
            .trim();

        match normalized {
            "mega" => Ok(MarketCapCategory::Mega),
            "large" => Ok(MarketCapCategory::Large),
            "mid" => Ok(MarketCapCategory::Mid),
            "small" => Ok(MarketCapCategory::Small),
            "micro" => Ok(MarketCapCategory::Micro),
            "unknown" => Ok(MarketCapCategory::Unknown),
            _ => Err(format!(
                "Invalid market cap: '{}'. Valid values: mega, large, mid, small, micro, unknown",
                s
            )),
        }
    }

    /// Lenient parse used for backend payloads: anything unrecognized is `Unknown`
    pub fn normalize(s: &str) -> Self {
        Self::from_str(s).unwrap_or(MarketCapCategory::Unknown)
    }

    /// Stable key used for segment matching
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketCapCategory::Mega => "mega",
            MarketCapCategory::Large => "large",
            MarketCapCategory::Mid => "mid",
            MarketCapCategory::Small => "small",
            MarketCapCategory::Micro => "micro",
            MarketCapCategory::Unknown => "unknown",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            MarketCapCategory::Mega => "Mega Cap",
            MarketCapCategory::Large => "Large Cap",
            MarketCapCategory::Mid => "Mid Cap",
            MarketCapCategory::Small => "Small Cap",
            MarketCapCategory::Micro => "Micro Cap",
            MarketCapCategory::Unknown => "Unknown",
        }
    }

    /// Position in the display order
    pub fn rank(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(Self::ALL.len())
    }
}

impl fmt::Display for MarketCapCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for MarketCapCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .map(|s| MarketCapCategory::normalize(&s))
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_variants() {
        assert_eq!(MarketCapCategory::from_str("mega").unwrap(), MarketCapCategory::Mega);
        assert_eq!(MarketCapCategory::from_str("Large Cap").unwrap(), MarketCapCategory::Large);
        assert_eq!(MarketCapCategory::from_str("MID-CAP").unwrap(), MarketCapCategory::Mid);
        assert_eq!(MarketCapCategory::from_str("small_cap").unwrap(), MarketCapCategory::Small);
        assert!(MarketCapCategory::from_str("giant").is_err());
    }

    #[test]
    fn test_display_order() {
        assert_eq!(MarketCapCategory::Mega.rank(), 0);
        assert_eq!(MarketCapCategory::Unknown.rank(), 5);
        assert!(MarketCapCategory::Large.rank() < MarketCapCategory::Micro.rank());
    }

    #[test]
    fn test_deserialize_lenient() {
        let cap: MarketCapCategory = serde_json::from_str(r#""Large""#).unwrap();
        assert_eq!(cap, MarketCapCategory::Large);

        let cap: MarketCapCategory = serde_json::from_str(r#""nano""#).unwrap();
        assert_eq!(cap, MarketCapCategory::Unknown);

        let cap: MarketCapCategory = serde_json::from_str("null").unwrap();
        assert_eq!(cap, MarketCapCategory::Unknown);
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&MarketCapCategory::Micro).unwrap();
        assert_eq!(json, r#""micro""#);
    }
}
