//! Service configuration

use std::env;
use std::path::PathBuf;

/// Store root used when nothing else is configured
pub const DEFAULT_STORE_ROOT: &str = "fs";

/// Environment variable overriding the store root
pub const STORE_ROOT_ENV: &str = "VFS_ROOT";

/// Namespace service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceConfig {
    /// Directory holding one sub-directory per user
    pub store_root: PathBuf,
    /// Whether to create the store root if it does not exist
    pub create_root: bool,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            store_root: PathBuf::from(DEFAULT_STORE_ROOT),
            create_root: true,
        }
    }
}

impl NamespaceConfig {
    /// Configuration for a given store root
    pub fn new(store_root: impl Into<PathBuf>) -> Self {
        Self {
            store_root: store_root.into(),
            ..Self::default()
        }
    }

    pub fn with_create_root(mut self, create_root: bool) -> Self {
        self.create_root = create_root;
        self
    }

    /// Defaults overlaid with `VFS_ROOT`
    pub fn from_env() -> Self {
        Self::from_env_value(env::var(STORE_ROOT_ENV).ok())
    }

    /// Defaults overlaid with an optional store root value
    ///
    /// Blank values are ignored.
    pub fn from_env_value(value: Option<String>) -> Self {
        match value {
            Some(root) if !root.trim().is_empty() => Self::new(root.trim()),
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NamespaceConfig::default();
        assert_eq!(config.store_root, PathBuf::from("fs"));
        assert!(config.create_root);
    }

    #[test]
    fn test_env_value_overrides_root() {
        let config = NamespaceConfig::from_env_value(Some("/tmp/vfs".to_string()));
        assert_eq!(config.store_root, PathBuf::from("/tmp/vfs"));
    }

    #[test]
    fn test_blank_env_value_is_ignored() {
        assert_eq!(
            NamespaceConfig::from_env_value(Some("  ".to_string())),
            NamespaceConfig::default()
        );
        assert_eq!(NamespaceConfig::from_env_value(None), NamespaceConfig::default());
    }

    #[test]
    fn test_with_create_root() {
        let config = NamespaceConfig::new("/data").with_create_root(false);
        assert!(!config.create_root);
        assert_eq!(config.store_root, PathBuf::from("/data"));
    }
}
