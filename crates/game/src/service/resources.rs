/// Outcome of a resource-cache garbage pass, reported for logging only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PurgeStats {
    pub objects_before: usize,
    pub objects_after: usize,
    pub bytes_freed: u64,
}

#[derive(Debug, thiserror::Error)]
#[error("asset {path} unavailable: {reason}")]
pub struct AssetError {
    pub path: String,
    pub reason: String,
}

/// The asset cache collaborator. Guarantees at most one in-memory copy per
/// logical asset name; implementations are encouraged to substitute a
/// placeholder for a missing asset rather than fail.
pub trait ResourceCache: Send + Sync {
    fn preload_model(&self, path: &str) -> Result<(), AssetError>;
    fn preload_texture(&self, path: &str) -> Result<(), AssetError>;
    fn purge(&self) -> PurgeStats;
    fn count(&self) -> usize;
}
