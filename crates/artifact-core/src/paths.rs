use std::path::PathBuf;

/// Artifact Studio settings directory (~/.artifact-studio)
pub fn studio_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".artifact-studio")
}

/// config.json inside the settings directory
pub fn config_json_path() -> PathBuf {
    studio_dir().join("config.json")
}

/// Default snapshot directory
pub fn snapshots_dir() -> PathBuf {
    studio_dir().join("snapshots")
}
