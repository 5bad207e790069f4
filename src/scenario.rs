//! The fixed catalog of selfie scenarios.

use crate::error::SelfieError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioId {
    /// Downtown Zootopia.
    #[default]
    City,
    /// Snowy winter holiday.
    Christmas,
    /// Lunar New Year festival.
    Cny,
}

impl ScenarioId {
    /// All identifiers in catalog order.
    pub const ALL: [ScenarioId; 3] = [Self::City, Self::Christmas, Self::Cny];

    /// Textual identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Christmas => "christmas",
            Self::Cny => "cny",
        }
    }

    /// The catalog entry for this identifier.
    pub fn scenario(self) -> &'static Scenario {
        match self {
            Self::City => &SCENARIOS[0],
            Self::Christmas => &SCENARIOS[1],
            Self::Cny => &SCENARIOS[2],
        }
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioId {
    type Err = SelfieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| SelfieError::UnsupportedScenario(s.to_string()))
    }
}

/// Display accent for a scenario card. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    /// Blue.
    Blue,
    /// Red.
    Red,
    /// Amber.
    Amber,
}

impl AccentColor {
    /// Tag name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Amber => "amber",
        }
    }

    /// RGB triple used by the desktop front end.
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Self::Blue => [59, 130, 246],
            Self::Red => [239, 68, 68],
            Self::Amber => [245, 158, 11],
        }
    }
}

/// A named preset that steers the style of the generated selfie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    /// Unique identifier.
    pub id: ScenarioId,
    /// Card title.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Emoji shown on the card.
    pub icon: &'static str,
    /// Accent color for the selected card.
    pub color: AccentColor,
    /// Text injected as the style directive of the request.
    pub prompt_modifier: &'static str,
}

impl Scenario {
    /// Looks up a scenario by its textual identifier.
    pub fn find(id: &str) -> Option<&'static Scenario> {
        SCENARIOS.iter().find(|s| s.id.as_str() == id)
    }
}

/// The catalog, in display order. The first entry is the default selection.
pub static SCENARIOS: [Scenario; 3] = [
    Scenario {
        id: ScenarioId::City,
        name: "Zootopia City",
        description: "A casual selfie with Judy and Nick in downtown Zootopia.",
        icon: "🏙️",
        color: AccentColor::Blue,
        prompt_modifier: "Background: Zootopia city street in bright daylight. Mood: Casual, fun, urban. Judy and Nick look friendly and excited.",
    },
    Scenario {
        id: ScenarioId::Christmas,
        name: "Winter Holiday",
        description: "Festive vibes with Santa hats and snowy decorations.",
        icon: "🎄",
        color: AccentColor::Red,
        prompt_modifier: "Background: Snowy winter street with Christmas trees, fairy lights, and holiday decorations. Characters: Judy and Nick are wearing red Santa hats and cozy sweaters. Mood: Warm, festive, Christmas celebration.",
    },
    Scenario {
        id: ScenarioId::Cny,
        name: "Lunar New Year",
        description: "Traditional celebration with lanterns and fireworks.",
        icon: "🧧",
        color: AccentColor::Amber,
        prompt_modifier: "Background: Vibrant street with red lanterns, glowing lights, and fireworks in the distance. Characters: Judy and Nick are wearing traditional Chinese festive clothing (Tang suit/Qipao). Mood: Celebratory, Lunar New Year festival.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_matches_ids() {
        for (entry, id) in SCENARIOS.iter().zip(ScenarioId::ALL) {
            assert_eq!(entry.id, id);
            assert_eq!(id.scenario().id, id);
        }
    }

    #[test]
    fn test_ids_round_trip() {
        for id in ScenarioId::ALL {
            assert_eq!(id.as_str().parse::<ScenarioId>().unwrap(), id);
            assert_eq!(Scenario::find(id.as_str()).unwrap().id, id);
        }
    }

    #[test]
    fn test_unknown_id() {
        assert!(Scenario::find("beach").is_none());
        assert!(matches!(
            "beach".parse::<ScenarioId>(),
            Err(SelfieError::UnsupportedScenario(ref s)) if s == "beach"
        ));
    }

    #[test]
    fn test_default_is_first_entry() {
        assert_eq!(ScenarioId::default(), SCENARIOS[0].id);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(ScenarioId::Christmas.scenario().name, "Winter Holiday");
        assert_eq!(ScenarioId::Cny.scenario().name, "Lunar New Year");
        assert_eq!(ScenarioId::Cny.scenario().color.as_str(), "amber");
    }

    #[test]
    fn test_serde_uses_lowercase_ids() {
        let json = serde_json::to_string(&ScenarioId::Cny).unwrap();
        assert_eq!(json, "\"cny\"");
        let back: ScenarioId = serde_json::from_str("\"christmas\"").unwrap();
        assert_eq!(back, ScenarioId::Christmas);
    }
}
