use serde::{Deserialize, Serialize};

/// Vehicle class, serialized with the game's own tag spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    #[serde(rename = "lightTank")]
    LightTank,
    #[serde(rename = "mediumTank")]
    MediumTank,
    #[serde(rename = "heavyTank")]
    HeavyTank,
    #[serde(rename = "AT-SPG")]
    TankDestroyer,
}

impl VehicleType {
    pub fn tag(self) -> &'static str {
        match self {
            VehicleType::LightTank => "lightTank",
            VehicleType::MediumTank => "mediumTank",
            VehicleType::HeavyTank => "heavyTank",
            VehicleType::TankDestroyer => "AT-SPG",
        }
    }
}

/// A vehicle as read from a nation's `list.xml`, still pointing at its
/// localization key instead of a display name.
#[derive(Debug, Clone, PartialEq)]
pub struct RawVehicle {
    pub is_premium: bool,
    pub nation: String,
    pub tank_id: u32,
    pub tier: u8,
    pub vehicle_type: Option<VehicleType>,
    pub display_key: String,
}

/// Resolved tankopedia entry. Field order is alphabetical so the JSON output
/// diffs cleanly between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankRecord {
    pub is_premium: bool,
    pub name: String,
    pub nation: String,
    pub tank_id: u32,
    pub tier: u8,
    #[serde(rename = "type")]
    pub vehicle_type: Option<VehicleType>,
}

impl TankRecord {
    pub fn from_raw(raw: RawVehicle, name: String) -> Self {
        Self {
            is_premium: raw.is_premium,
            name,
            nation: raw.nation,
            tank_id: raw.tank_id,
            tier: raw.tier,
            vehicle_type: raw.vehicle_type,
        }
    }
}
