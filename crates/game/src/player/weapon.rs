/// How a weapon's trigger behaves. Exactly one mode applies per weapon,
/// selected by its capability fields: charge wins over overheat, and a
/// weapon with neither is plain cooldown-gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireMode {
    Charge,
    Overheat,
    Cooldown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverheatSpec {
    /// Heat level at which firing locks out.
    pub limit: f32,
    pub heat_per_shot: f32,
    pub recovery_per_sec: f32,
    /// Quiet period after a shot before heat starts bleeding off.
    pub recovery_delay_secs: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeaponSpec {
    pub name: String,
    pub model: String,
    pub projectile_model: String,
    pub cooldown_secs: f32,
    pub max_charge_secs: Option<f32>,
    pub overheat: Option<OverheatSpec>,
}

impl WeaponSpec {
    pub fn fire_mode(&self) -> FireMode {
        if self.max_charge_secs.is_some() {
            FireMode::Charge
        } else if self.overheat.is_some() {
            FireMode::Overheat
        } else {
            FireMode::Cooldown
        }
    }

    /// The built-in armory. Stands in for the data files the full game ships;
    /// one weapon per fire mode so every code path stays exercised.
    pub fn standard_set() -> Vec<WeaponSpec> {
        vec![
            WeaponSpec {
                name: String::from("cannon"),
                model: String::from("weapons/cannon"),
                projectile_model: String::from("projectiles/shell"),
                cooldown_secs: 1.2,
                max_charge_secs: None,
                overheat: None,
            },
            WeaponSpec {
                name: String::from("minigun"),
                model: String::from("weapons/minigun"),
                projectile_model: String::from("projectiles/bullet"),
                cooldown_secs: 0.1,
                max_charge_secs: None,
                overheat: Some(OverheatSpec {
                    limit: 10.0,
                    heat_per_shot: 1.0,
                    recovery_per_sec: 2.5,
                    recovery_delay_secs: 0.5,
                }),
            },
            WeaponSpec {
                name: String::from("laser"),
                model: String::from("weapons/laser"),
                projectile_model: String::from("projectiles/beam"),
                cooldown_secs: 2.0,
                max_charge_secs: Some(1.5),
                overheat: None,
            },
        ]
    }

    /// Unknown names fall back to the cannon rather than failing the load.
    pub fn by_name(name: &str) -> WeaponSpec {
        let mut set = Self::standard_set();
        match set.iter().position(|spec| spec.name == name) {
            Some(index) => set.swap_remove(index),
            None => {
                log::warn!("unknown weapon {:?}, using cannon", name);
                set.swap_remove(0)
            }
        }
    }
}

/// Per-tank runtime trigger state.
#[derive(Debug, Clone)]
pub struct WeaponState {
    pub charging: bool,
    pub charge_secs: f32,
    pub heat: f32,
    pub overheated: bool,
    since_fired: f32,
    since_heat_added: f32,
}

impl WeaponState {
    pub fn new() -> Self {
        Self {
            charging: false,
            charge_secs: 0.0,
            heat: 0.0,
            overheated: false,
            // A fresh weapon has no pending cooldown.
            since_fired: f32::INFINITY,
            since_heat_added: f32::INFINITY,
        }
    }

    pub fn update(&mut self, spec: &WeaponSpec, dt: f32) {
        self.since_fired += dt;

        if self.charging {
            self.charge_secs += dt;
            if let Some(max) = spec.max_charge_secs {
                self.charge_secs = self.charge_secs.min(max);
            }
        }

        if let Some(overheat) = &spec.overheat {
            self.since_heat_added += dt;
            if self.heat > 0.0 && self.since_heat_added >= overheat.recovery_delay_secs {
                self.heat = (self.heat - overheat.recovery_per_sec * dt).max(0.0);
                if self.overheated && self.heat <= 0.0 {
                    self.overheated = false;
                    log::debug!("weapon recovered from overheat");
                }
            }
        }
    }

    /// `rate_of_fire` is the tank's buff fraction; it shortens the cooldown.
    pub fn can_fire(&self, spec: &WeaponSpec, rate_of_fire: f32) -> bool {
        if self.overheated {
            return false;
        }
        self.since_fired >= spec.cooldown_secs * (1.0 - rate_of_fire)
    }

    pub fn on_fired(&mut self, spec: &WeaponSpec) {
        self.since_fired = 0.0;
        self.charge_secs = 0.0;
        if let Some(overheat) = &spec.overheat {
            self.heat += overheat.heat_per_shot;
            self.since_heat_added = 0.0;
            if self.heat >= overheat.limit {
                self.overheated = true;
                log::debug!("weapon overheated at {:.1}", self.heat);
            }
        }
    }
}

impl Default for WeaponState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_mode(mode: FireMode) -> WeaponSpec {
        WeaponSpec::standard_set()
            .into_iter()
            .find(|spec| spec.fire_mode() == mode)
            .unwrap()
    }

    #[test]
    fn one_mode_per_weapon() {
        assert_eq!(WeaponSpec::by_name("cannon").fire_mode(), FireMode::Cooldown);
        assert_eq!(WeaponSpec::by_name("minigun").fire_mode(), FireMode::Overheat);
        assert_eq!(WeaponSpec::by_name("laser").fire_mode(), FireMode::Charge);
        // Unknown weapons degrade to the default, not a panic.
        assert_eq!(WeaponSpec::by_name("bagpipes").name, "cannon");
    }

    #[test]
    fn cooldown_gates_refire() {
        let spec = by_mode(FireMode::Cooldown);
        let mut state = WeaponState::new();

        assert!(state.can_fire(&spec, 0.0));
        state.on_fired(&spec);
        assert!(!state.can_fire(&spec, 0.0));

        state.update(&spec, spec.cooldown_secs + 0.01);
        assert!(state.can_fire(&spec, 0.0));
    }

    #[test]
    fn rate_of_fire_buff_shortens_cooldown() {
        let spec = by_mode(FireMode::Cooldown);
        let mut state = WeaponState::new();
        state.on_fired(&spec);
        state.update(&spec, spec.cooldown_secs * 0.6);

        assert!(!state.can_fire(&spec, 0.0));
        assert!(state.can_fire(&spec, 0.5));
    }

    #[test]
    fn overheat_locks_until_recovered() {
        let spec = by_mode(FireMode::Overheat);
        let overheat = spec.overheat.clone().unwrap();
        let mut state = WeaponState::new();

        let shots = (overheat.limit / overheat.heat_per_shot).ceil() as usize;
        for _ in 0..shots {
            state.update(&spec, spec.cooldown_secs);
            assert!(state.can_fire(&spec, 0.0));
            state.on_fired(&spec);
        }
        assert!(state.overheated);
        assert!(!state.can_fire(&spec, 0.0));

        // Recovery only starts after the quiet period.
        state.update(&spec, overheat.recovery_delay_secs);
        let secs_to_cool = overheat.limit / overheat.recovery_per_sec;
        state.update(&spec, secs_to_cool + 0.1);
        assert!(!state.overheated);
        assert!(state.can_fire(&spec, 0.0));
    }

    #[test]
    fn charge_accumulates_and_clamps() {
        let spec = by_mode(FireMode::Charge);
        let max = spec.max_charge_secs.unwrap();
        let mut state = WeaponState::new();

        state.charging = true;
        state.update(&spec, max * 2.0);
        assert_eq!(state.charge_secs, max);

        state.on_fired(&spec);
        assert_eq!(state.charge_secs, 0.0);
    }
}
