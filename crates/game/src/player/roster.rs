use std::collections::HashMap;

use super::{PlayerId, PlayerTank};

/// Every tank in the current round, keyed by the server-assigned player id.
/// The local player is inserted at construction and never removed while the
/// round runs.
pub struct PlayerRoster {
    players: HashMap<PlayerId, PlayerTank>,
    local_id: PlayerId,
}

impl PlayerRoster {
    pub fn new(local_id: PlayerId) -> Self {
        Self {
            players: HashMap::new(),
            local_id,
        }
    }

    pub fn local_id(&self) -> PlayerId {
        self.local_id
    }

    pub fn insert(&mut self, tank: PlayerTank) {
        self.players.insert(tank.id, tank);
    }

    pub fn remove(&mut self, id: PlayerId) -> Option<PlayerTank> {
        if id == self.local_id {
            return None;
        }
        self.players.remove(&id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.contains_key(&id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&PlayerTank> {
        self.players.get(&id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut PlayerTank> {
        self.players.get_mut(&id)
    }

    pub fn local(&self) -> &PlayerTank {
        self.players
            .get(&self.local_id)
            .expect("local player present in roster")
    }

    pub fn local_mut(&mut self) -> &mut PlayerTank {
        self.players
            .get_mut(&self.local_id)
            .expect("local player present in roster")
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerTank> {
        self.players.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PlayerTank> {
        self.players.values_mut()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use crate::player::WeaponSpec;
    use crate::session::Team;

    use super::*;

    fn tank(id: PlayerId) -> PlayerTank {
        PlayerTank::new(
            id,
            format!("tank-{}", id),
            Team::None,
            Vec2::ZERO,
            0.0,
            WeaponSpec::by_name("cannon"),
        )
    }

    #[test]
    fn local_player_cannot_be_removed() {
        let mut roster = PlayerRoster::new(1);
        roster.insert(tank(1));
        roster.insert(tank(2));

        assert!(roster.remove(1).is_none());
        assert!(roster.remove(2).is_some());
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.local().id, 1);
    }
}
