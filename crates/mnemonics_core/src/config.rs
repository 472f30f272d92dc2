//! Store configuration resolution.
//!
//! # Responsibility
//! - Resolve the store root, template path and logging settings from
//!   explicit overrides, then environment, then defaults.
//!
//! # Invariants
//! - Configuration is a plain value passed to operations; nothing here is
//!   global or mutable after resolution.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Env var overriding the store root.
pub const ROOT_ENV: &str = "MNEMONICS_ROOT";
/// Env var pointing at a note template file.
pub const TEMPLATE_ENV: &str = "MNEMONICS_TEMPLATE";
/// Env var overriding the log directory.
pub const LOG_DIR_ENV: &str = "MNEMONICS_LOG_DIR";
/// Env var overriding the log level.
pub const LOG_LEVEL_ENV: &str = "MNEMONICS_LOG_LEVEL";

const DEFAULT_ROOT_SEGMENTS: [&str; 3] = [".config", "opencode", ".opencode"];
const DEFAULT_ROOT_LEAF: &str = "memory";
const LOG_DIR_NAME: &str = "logs";

/// Configuration resolution failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No root override and the home directory cannot be determined.
    NoHomeDirectory,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoHomeDirectory => write!(
                f,
                "cannot determine home directory; set {ROOT_ENV} or pass --root"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Explicit overrides, typically from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root: Option<PathBuf>,
    pub template: Option<PathBuf>,
}

/// Resolved store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding one subdirectory per category.
    pub root: PathBuf,
    /// Optional template file; `None` means the built-in template.
    pub template_path: Option<PathBuf>,
    /// Directory for rolling log files.
    pub log_dir: PathBuf,
    /// Log level string accepted by `init_logging`.
    pub log_level: String,
}

impl StoreConfig {
    /// Configuration rooted at `root` with built-in defaults for the rest.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let log_dir = default_log_dir(&root);
        Self {
            root,
            template_path: None,
            log_dir,
            log_level: default_log_level().to_string(),
        }
    }

    /// Resolves configuration from overrides, then the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Resolution with injectable environment lookup and home directory.
    pub fn resolve_with(
        overrides: ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let root = match overrides.root.or_else(|| non_empty(ROOT_ENV).map(PathBuf::from)) {
            Some(root) => root,
            None => {
                let mut root = home.ok_or(ConfigError::NoHomeDirectory)?;
                for segment in DEFAULT_ROOT_SEGMENTS {
                    root.push(segment);
                }
                root.push(DEFAULT_ROOT_LEAF);
                root
            }
        };

        let mut config = Self::new(root);
        config.template_path = overrides
            .template
            .or_else(|| non_empty(TEMPLATE_ENV).map(PathBuf::from));
        if let Some(log_dir) = non_empty(LOG_DIR_ENV) {
            config.log_dir = PathBuf::from(log_dir);
        }
        if let Some(level) = non_empty(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        Ok(config)
    }
}

fn default_log_dir(root: &Path) -> PathBuf {
    match root.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(LOG_DIR_NAME),
        _ => root.join(LOG_DIR_NAME),
    }
}
