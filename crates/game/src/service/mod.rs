mod resources;
mod scene;

pub use resources::{AssetError, PurgeStats, ResourceCache};
pub use scene::{CameraMode, EntityHandle, EntityKind, SceneService};
