use serde::{Deserialize, Serialize};

pub const MAX_TANK_NAME_LEN: usize = 32;
const MIN_STAT_FACTOR: f32 = 0.5;
const MAX_STAT_FACTOR: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    None,
    Red,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Deathmatch,
    TeamDeathmatch,
    CaptureTheFlag,
    CaptureTheBase,
}

/// One entry in the server browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub players: u32,
    pub capacity: u32,
    pub map_name: String,
}

/// An account tank as created/edited through the roster screens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankProfile {
    pub name: String,
    pub model: String,
    pub skin: String,
    pub weapon: String,
    pub armor_factor: f32,
    pub speed_factor: f32,
}

impl Default for TankProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            model: String::from("standard"),
            skin: String::from("camo"),
            weapon: String::from("cannon"),
            armor_factor: 1.0,
            speed_factor: 1.0,
        }
    }
}

impl TankProfile {
    pub fn validate(&self) -> Result<(), InvalidProfile> {
        if self.name.trim().is_empty() {
            return Err(InvalidProfile::EmptyName);
        }
        if self.name.len() > MAX_TANK_NAME_LEN {
            return Err(InvalidProfile::NameTooLong);
        }
        if !(MIN_STAT_FACTOR..=MAX_STAT_FACTOR).contains(&self.armor_factor) {
            return Err(InvalidProfile::ArmorOutOfRange(self.armor_factor));
        }
        if !(MIN_STAT_FACTOR..=MAX_STAT_FACTOR).contains(&self.speed_factor) {
            return Err(InvalidProfile::SpeedOutOfRange(self.speed_factor));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidProfile {
    #[error("tank name must not be empty")]
    EmptyName,
    #[error("tank name is limited to {MAX_TANK_NAME_LEN} characters")]
    NameTooLong,
    #[error("armor factor {0} is outside 0.5..=1.5")]
    ArmorOutOfRange(f32),
    #[error("speed factor {0} is outside 0.5..=1.5")]
    SpeedOutOfRange(f32),
}

/// One row of the in-game scoreboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRow {
    pub name: String,
    pub team: Team,
    pub kills: u32,
    pub deaths: u32,
    pub score: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_validation() {
        let mut profile = TankProfile {
            name: String::from("rusty"),
            ..TankProfile::default()
        };
        assert!(profile.validate().is_ok());

        profile.name.clear();
        assert!(matches!(
            profile.validate(),
            Err(InvalidProfile::EmptyName)
        ));

        profile.name = "x".repeat(MAX_TANK_NAME_LEN + 1);
        assert!(matches!(
            profile.validate(),
            Err(InvalidProfile::NameTooLong)
        ));

        profile.name = String::from("rusty");
        profile.speed_factor = 2.0;
        assert!(matches!(
            profile.validate(),
            Err(InvalidProfile::SpeedOutOfRange(_))
        ));
    }
}
