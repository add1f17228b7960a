// Tue Jan 15 2026 - Alex

use crate::config::SyncConfig;
use crate::deps::git::Git;
use crate::deps::manifest::DepsFile;
use crate::deps::strategy::{strategy_for, ExecutionStrategy, SyncReport};
use crate::deps::task::{build_tasks, CheckoutTask};
use crate::deps::SyncError;
use std::path::PathBuf;
use std::process::Command;

const FETCH_GN: &str = "bin/fetch-gn";
const ACTIVATE_EMSDK: &str = "bin/activate-emsdk";

/// Syncs the dependencies of one descriptor file through an execution strategy.
pub struct SyncRunner {
    config: SyncConfig,
    strategy: Box<dyn ExecutionStrategy>,
}

impl SyncRunner {
    pub fn new(config: SyncConfig) -> Self {
        let strategy = strategy_for(config.mode, config.verbose);
        Self { config, strategy }
    }

    pub fn with_strategy(config: SyncConfig, strategy: Box<dyn ExecutionStrategy>) -> Self {
        Self { config, strategy }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn load_manifest(&self) -> Result<DepsFile, SyncError> {
        let deps_path = self.config.deps_file()?;
        if !deps_path.is_file() {
            return Err(SyncError::DescriptorNotFound(deps_path));
        }
        Ok(DepsFile::load(&deps_path)?)
    }

    pub fn load_tasks(&self) -> Result<Vec<CheckoutTask>, SyncError> {
        let manifest = self.load_manifest()?;
        let dependencies = manifest.dependencies(&self.config.os_requests);
        Ok(build_tasks(&dependencies, &manifest.base_dir(), self.config.verbose)?)
    }

    /// Runs `job` for every dependency; fails once, after all tasks, if any task failed.
    pub fn sync_deps_with<F>(&self, job: F) -> Result<SyncReport, SyncError>
    where
        F: Fn(&CheckoutTask) -> Result<(), SyncError> + Sync,
    {
        let tasks = self.load_tasks()?;
        log::info!("Syncing {} dependencies ({})", tasks.len(), self.strategy.name());
        self.strategy.execute(&tasks, &job)?.into_result()
    }

    pub fn sync_deps(&self) -> Result<SyncReport, SyncError> {
        let git = Git::discover(self.config.git_executable.as_deref())?;
        self.sync_deps_with(|task| git.checkout_to_directory(task))
    }

    /// Scripts run after a successful sync, relative to the descriptor directory.
    pub fn hooks(&self) -> Result<Vec<PathBuf>, SyncError> {
        let base = self
            .config
            .deps_file()?
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default();

        let mut hooks = vec![base.join(FETCH_GN)];
        if !self.config.skip_emsdk {
            hooks.push(base.join(ACTIVATE_EMSDK));
        }
        Ok(hooks)
    }

    pub fn run_hooks(&self) -> Result<(), SyncError> {
        for hook in self.hooks()? {
            log::info!("Running {}", hook.display());
            let status = Command::new(&self.config.python).arg(&hook).status()?;
            if !status.success() {
                return Err(SyncError::HookFailed {
                    hook,
                    status: status.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn run(&self) -> Result<SyncReport, SyncError> {
        let report = self.sync_deps()?;
        if self.config.run_hooks {
            self.run_hooks()?;
        }
        Ok(report)
    }
}
