// Tue Jan 13 2026 - Alex

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_PREVIEW_LIMIT: usize = 50;
pub const DEFAULT_ROOT_DIR: &str = "skia";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub dll_path: PathBuf,
    pub output_path: PathBuf,
    pub preview_limit: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dll_path: PathBuf::from("skia.dll"),
            output_path: PathBuf::from("skia_dll_symbols.txt"),
            preview_limit: DEFAULT_PREVIEW_LIMIT,
        }
    }
}

impl ExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dll_path(mut self, path: PathBuf) -> Self {
        self.dll_path = path;
        self
    }

    pub fn with_output_path(mut self, path: PathBuf) -> Self {
        self.output_path = path;
        self
    }

    pub fn with_preview_limit(mut self, limit: usize) -> Self {
        self.preview_limit = limit;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.dll_path.as_os_str().is_empty() {
            return Err("dll_path must not be empty".to_string());
        }
        if self.output_path.as_os_str().is_empty() {
            return Err("output_path must not be empty".to_string());
        }
        if self.dll_path == self.output_path {
            return Err("output_path must differ from dll_path".to_string());
        }
        Ok(())
    }
}

/// How checkout tasks are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One dependency at a time, in order.
    #[default]
    Serial,
    /// One worker per dependency.
    Parallel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Checkout root; `None` means `skia` next to the running executable.
    pub root: Option<PathBuf>,
    pub deps_path: Option<PathBuf>,
    pub git_executable: Option<String>,
    pub python: String,
    pub verbose: bool,
    pub skip_emsdk: bool,
    pub run_hooks: bool,
    pub os_requests: Vec<String>,
    pub mode: ExecutionMode,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            root: None,
            deps_path: None,
            git_executable: None,
            python: "python3".to_string(),
            verbose: true,
            skip_emsdk: false,
            run_hooks: true,
            os_requests: Vec::new(),
            mode: ExecutionMode::Serial,
        }
    }
}

impl SyncConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn with_root(mut self, root: PathBuf) -> Self {
        self.root = Some(root);
        self
    }

    pub fn with_deps_path(mut self, path: PathBuf) -> Self {
        self.deps_path = Some(path);
        self
    }

    pub fn with_git_executable(mut self, git: String) -> Self {
        self.git_executable = Some(git);
        self
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_os_requests(mut self, requests: Vec<String>) -> Self {
        self.os_requests = requests;
        self
    }

    pub fn without_hooks(mut self) -> Self {
        self.run_hooks = false;
        self
    }

    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }

    pub fn root(&self) -> Result<PathBuf, ConfigError> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => executable_root(),
        }
    }

    /// The descriptor file: explicit path, or `DEPS` under the root.
    pub fn deps_file(&self) -> Result<PathBuf, ConfigError> {
        match &self.deps_path {
            Some(path) => Ok(path.clone()),
            None => Ok(self.root()?.join("DEPS")),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if matches!(&self.root, Some(root) if root.as_os_str().is_empty()) {
            return Err("root must not be empty".to_string());
        }
        if self.run_hooks && self.python.trim().is_empty() {
            return Err("python must be set when hooks are enabled".to_string());
        }
        if let Some(git) = &self.git_executable {
            if git.trim().is_empty() {
                return Err("git_executable must not be empty".to_string());
            }
        }
        Ok(())
    }
}

/// `skia` beside the running executable, wherever it was invoked from.
pub fn executable_root() -> Result<PathBuf, ConfigError> {
    let exe = std::env::current_exe()?;
    let dir = exe
        .parent()
        .ok_or_else(|| ConfigError::Invalid(format!("{} has no parent directory", exe.display())))?;
    Ok(dir.join(DEFAULT_ROOT_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.dll_path, PathBuf::from("skia.dll"));
        assert_eq!(config.output_path, PathBuf::from("skia_dll_symbols.txt"));
        assert_eq!(config.preview_limit, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_export_rejects_same_input_and_output() {
        let config = ExportConfig::new()
            .with_dll_path(PathBuf::from("a.dll"))
            .with_output_path(PathBuf::from("a.dll"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sync_deps_file_defaults_under_root() {
        let config = SyncConfig::new().with_root(PathBuf::from("/src/skia"));
        assert_eq!(config.deps_file().unwrap(), PathBuf::from("/src/skia/DEPS"));

        let config = config.with_deps_path(PathBuf::from("/tmp/DEPS.alt"));
        assert_eq!(config.deps_file().unwrap(), PathBuf::from("/tmp/DEPS.alt"));
    }

    #[test]
    fn test_sync_root_defaults_next_to_executable() {
        let exe_dir = std::env::current_exe().unwrap().parent().unwrap().to_path_buf();
        let config = SyncConfig::default();

        assert!(config.root.is_none());
        assert_eq!(config.root().unwrap(), exe_dir.join("skia"));
        assert_eq!(config.deps_file().unwrap(), exe_dir.join("skia").join("DEPS"));
        assert!(config.root().unwrap().is_absolute());
    }

    #[test]
    fn test_sync_rejects_empty_root() {
        let config = SyncConfig::new().with_root(PathBuf::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sync_validate() {
        assert!(SyncConfig::default().validate().is_ok());

        let mut config = SyncConfig::default();
        config.python = String::new();
        assert!(config.validate().is_err());
        assert!(config.without_hooks().validate().is_ok());

        let config = SyncConfig::default().with_git_executable("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sync_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.json");
        std::fs::write(&path, r#"{ "root": "third_party/skia", "mode": "parallel", "os_requests": ["linux"] }"#).unwrap();

        let config = SyncConfig::from_json_file(&path).unwrap();

        assert_eq!(config.root, Some(PathBuf::from("third_party/skia")));
        assert_eq!(config.mode, ExecutionMode::Parallel);
        assert_eq!(config.os_requests, vec!["linux".to_string()]);
        assert!(config.verbose);
        assert!(config.run_hooks);
    }

    #[test]
    fn test_sync_from_bad_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.json");
        std::fs::write(&path, "{ root: ").unwrap();

        assert!(matches!(SyncConfig::from_json_file(&path), Err(ConfigError::Json(_))));
    }
}
