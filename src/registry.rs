use crate::error::{ExtractError, Outcome};
use crate::models::VehicleType;

/// Packs a per-nation vehicle id into the global id space used by the
/// tankopedia API: `(raw_id << 8) | (nation_index << 4) | 1`.
///
/// `raw_id` is assumed to stay below 2^24 so the shift keeps every bit.
pub fn encode_id(nation_index: u8, raw_id: u32) -> u32 {
    (raw_id << 8) | (u32::from(nation_index & 0x0f) << 4) | 1
}

/// Nation and vehicle-type tables for one game client.
///
/// Built once and passed by reference into extraction; never mutated.
#[derive(Debug, Clone)]
pub struct Registry {
    nations: Vec<(String, u8)>,
    tank_types: Vec<VehicleType>,
}

impl Registry {
    pub fn new(nations: Vec<(String, u8)>, tank_types: Vec<VehicleType>) -> Outcome<Self> {
        if let Some((nation, index)) = nations.iter().find(|(_, index)| *index > 0x0f) {
            return Err(ExtractError::NationIndexOutOfRange {
                nation: nation.clone(),
                index: *index,
            });
        }
        Ok(Self {
            nations,
            tank_types,
        })
    }

    /// Tables used by World of Tanks Blitz.
    pub fn blitz() -> Self {
        let nations = [
            ("ussr", 0),
            ("germany", 1),
            ("usa", 2),
            ("china", 3),
            ("france", 4),
            ("uk", 5),
            ("japan", 6),
            ("other", 7),
            ("european", 8),
        ];
        Self {
            nations: nations
                .into_iter()
                .map(|(name, index)| (name.to_string(), index))
                .collect(),
            tank_types: vec![
                VehicleType::LightTank,
                VehicleType::MediumTank,
                VehicleType::HeavyTank,
                VehicleType::TankDestroyer,
            ],
        }
    }

    pub fn nations(&self) -> impl Iterator<Item = &str> {
        self.nations.iter().map(|(name, _)| name.as_str())
    }

    pub fn nation_index(&self, nation: &str) -> Outcome<u8> {
        self.nations
            .iter()
            .find(|(name, _)| name == nation)
            .map(|(_, index)| *index)
            .ok_or_else(|| ExtractError::UnknownNation(nation.to_string()))
    }

    pub fn encode_id(&self, nation: &str, raw_id: u32) -> Outcome<u32> {
        Ok(encode_id(self.nation_index(nation)?, raw_id))
    }

    /// Only the first whitespace-separated token of `tags` decides the type.
    pub fn classify(&self, tags: &str) -> Option<VehicleType> {
        let first = tags.split_whitespace().next()?;
        self.tank_types.iter().copied().find(|t| t.tag() == first)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::blitz()
    }
}
