use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Client tunables. The maps directory pair mirrors the install layout: a
/// primary folder next to the game, and a per-user fallback for installs
/// where the primary is not writable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    pub maps_dir: PathBuf,
    pub fallback_maps_dir: PathBuf,
    /// Predict collisions for remote tanks too. Cosmetic smoothing only;
    /// nothing is reported to the server.
    pub remote_collision: bool,
    /// Seconds of continuous movement before a forced position resync.
    pub sync_interval_secs: f64,
    /// Visible tile extent used to bound collision scans, in tiles per axis.
    pub viewport_tiles: (i32, i32),
}

impl Default for Options {
    fn default() -> Self {
        Self {
            maps_dir: PathBuf::from("maps"),
            fallback_maps_dir: default_fallback_dir(),
            remote_collision: true,
            sync_interval_secs: 2.5,
            viewport_tiles: (0, 0),
        }
    }
}

fn default_fallback_dir() -> PathBuf {
    if let Some(appdata) = std::env::var_os("APPDATA") {
        PathBuf::from(appdata).join("salvo").join("maps")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share/salvo/maps")
    } else {
        std::env::temp_dir().join("salvo-maps")
    }
}
