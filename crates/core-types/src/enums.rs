use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The botanical species a plant belongs to. Stored and submitted by its full
/// binomial name (e.g. "Capsicum chinense").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    #[serde(rename = "Capsicum annuum")]
    Annuum,
    #[serde(rename = "Capsicum baccatum")]
    Baccatum,
    #[serde(rename = "Capsicum chinense")]
    Chinense,
    #[serde(rename = "Capsicum frutescens")]
    Frutescens,
    #[serde(rename = "Capsicum pubescens")]
    Pubescens,
    #[serde(rename = "Capsicum chacoense")]
    Chacoense,
    #[serde(rename = "Capsicum eximium")]
    Eximium,
    #[serde(rename = "Capsicum cardenasii")]
    Cardenasii,
    #[serde(rename = "Capsicum galapagoense")]
    Galapagoense,
    #[serde(rename = "Capsicum praetermissum")]
    Praetermissum,
    #[serde(rename = "Capsicum tovarii")]
    Tovarii,
    #[serde(rename = "Capsicum flexuosum")]
    Flexuosum,
    #[serde(rename = "Capsicum rhomboideum")]
    Rhomboideum,
}

impl Species {
    /// Every species, in the order the forms list them.
    pub const ALL: [Species; 13] = [
        Species::Annuum,
        Species::Baccatum,
        Species::Chinense,
        Species::Frutescens,
        Species::Pubescens,
        Species::Chacoense,
        Species::Eximium,
        Species::Cardenasii,
        Species::Galapagoense,
        Species::Praetermissum,
        Species::Tovarii,
        Species::Flexuosum,
        Species::Rhomboideum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Annuum => "Capsicum annuum",
            Species::Baccatum => "Capsicum baccatum",
            Species::Chinense => "Capsicum chinense",
            Species::Frutescens => "Capsicum frutescens",
            Species::Pubescens => "Capsicum pubescens",
            Species::Chacoense => "Capsicum chacoense",
            Species::Eximium => "Capsicum eximium",
            Species::Cardenasii => "Capsicum cardenasii",
            Species::Galapagoense => "Capsicum galapagoense",
            Species::Praetermissum => "Capsicum praetermissum",
            Species::Tovarii => "Capsicum tovarii",
            Species::Flexuosum => "Capsicum flexuosum",
            Species::Rhomboideum => "Capsicum rhomboideum",
        }
    }
}

/// Overall condition of a plant at its last inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlantHealth {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl PlantHealth {
    pub const ALL: [PlantHealth; 4] = [
        PlantHealth::Excellent,
        PlantHealth::Good,
        PlantHealth::Fair,
        PlantHealth::Poor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlantHealth::Excellent => "Excellent",
            PlantHealth::Good => "Good",
            PlantHealth::Fair => "Fair",
            PlantHealth::Poor => "Poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrowthStage {
    Seedling,
    Vegetative,
    Flowering,
    Fruiting,
}

impl GrowthStage {
    pub const ALL: [GrowthStage; 4] = [
        GrowthStage::Seedling,
        GrowthStage::Vegetative,
        GrowthStage::Flowering,
        GrowthStage::Fruiting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthStage::Seedling => "Seedling",
            GrowthStage::Vegetative => "Vegetative",
            GrowthStage::Flowering => "Flowering",
            GrowthStage::Fruiting => "Fruiting",
        }
    }
}

// --- String conversions ---
// The database stores these enums as TEXT and the forms submit them as plain
// strings, so parsing is exact-match against `as_str`.

impl FromStr for Species {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::ALL
            .into_iter()
            .find(|species| species.as_str() == s)
            .ok_or_else(|| CoreError::InvalidValue { field: "species", value: s.to_string() })
    }
}

impl FromStr for PlantHealth {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlantHealth::ALL
            .into_iter()
            .find(|health| health.as_str() == s)
            .ok_or_else(|| CoreError::InvalidValue { field: "health", value: s.to_string() })
    }
}

impl FromStr for GrowthStage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GrowthStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| CoreError::InvalidValue { field: "growth_stage", value: s.to_string() })
    }
}

// `TryFrom<String>` lets `sqlx::FromRow` decode TEXT columns via `#[sqlx(try_from = "String")]`.

impl TryFrom<String> for Species {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for PlantHealth {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for GrowthStage {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PlantHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn species_parse_by_binomial_name() {
        assert_eq!("Capsicum chinense".parse::<Species>().unwrap(), Species::Chinense);
        assert_eq!("Capsicum rhomboideum".parse::<Species>().unwrap(), Species::Rhomboideum);
        for species in Species::ALL {
            assert_eq!(species.as_str().parse::<Species>().unwrap(), species);
        }
    }

    #[test]
    fn unknown_species_is_rejected() {
        let err = "chinense".parse::<Species>().unwrap_err();
        assert_eq!(err, CoreError::InvalidValue { field: "species", value: "chinense".into() });
    }

    #[test]
    fn health_rejects_unknown_and_wrong_case() {
        assert_eq!("Good".parse::<PlantHealth>().unwrap(), PlantHealth::Good);
        assert_eq!("Thriving".parse::<PlantHealth>().unwrap_err().field(), "health");
        assert!("good".parse::<PlantHealth>().is_err());
    }

    #[test]
    fn growth_stage_errors_name_the_form_field() {
        assert_eq!(GrowthStage::try_from("Fruiting".to_string()).unwrap(), GrowthStage::Fruiting);
        assert_eq!("Budding".parse::<GrowthStage>().unwrap_err().field(), "growth_stage");
    }

    #[test]
    fn serde_uses_the_stored_names() {
        let json = serde_json::to_string(&Species::Annuum).unwrap();
        assert_eq!(json, "\"Capsicum annuum\"");
    }
}
