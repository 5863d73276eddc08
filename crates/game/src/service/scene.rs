use glam::Vec2;

pub type EntityHandle = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Chase,
    Overhead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Tank,
    Projectile,
    Effect,
}

/// The rendering/scene collaborator. Called from the logical thread only,
/// except `clear` which the loading thread uses to reset the scene before
/// a new round.
pub trait SceneService: Send + Sync {
    fn add_entity(&self, kind: EntityKind, position: Vec2) -> EntityHandle;
    fn remove_entity(&self, handle: EntityHandle);
    fn clear(&self);
    fn switch_camera(&self, mode: CameraMode);
    fn set_camera_locked(&self, locked: bool);
}
