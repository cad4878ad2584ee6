use anyhow::Context;
use covalence_core::config::EngineConfig;
use std::fs;
use std::path::Path;

/// Reads `path` as an engine config. A missing file yields the defaults; a
/// present but unreadable or invalid file is an error.
pub fn load(path: &Path) -> anyhow::Result<EngineConfig> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "No config file, using defaults");
        return Ok(EngineConfig::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    EngineConfig::from_toml(&content).with_context(|| format!("invalid config in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let path = std::env::temp_dir().join(format!("covalence-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[clusters]\naffinity_threshold = 4.0\n").unwrap();
        let result = load(&path);
        let _ = fs::remove_file(&path);
        assert!(result.is_err());
    }
}
