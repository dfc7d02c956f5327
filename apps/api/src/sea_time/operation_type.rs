use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Sea,
    River,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Sea => "sea",
            OperationType::River => "river",
        }
    }
}

/// Vessel type codes that only operate on inland waterways.
const RIVER_VESSEL_TYPES: &[&str] = &[
    "river_cargo",
    "river_tanker",
    "river_passenger",
    "river_cruise",
    "inland_tanker",
    "inland_cargo",
    "pusher_tug",
    "push_boat",
    "barge",
    "river_sea_restricted",
];

/// Maps a vessel type code to its operation category.
/// Unknown and absent types count as sea service.
pub fn classify_operation_type(vessel_type: Option<&str>) -> OperationType {
    let Some(code) = vessel_type else {
        return OperationType::Sea;
    };
    let normalized = code.trim().to_ascii_lowercase().replace([' ', '-'], "_");
    if RIVER_VESSEL_TYPES.contains(&normalized.as_str()) {
        OperationType::River
    } else {
        OperationType::Sea
    }
}
