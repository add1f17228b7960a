// Tue Jan 15 2026 - Alex

use crate::deps::manifest::DependencyMap;
use crate::deps::DepsError;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static SHA1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-f]{40}$").expect("valid regex"));

/// Arguments for one call of the per-dependency checkout function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutTask {
    pub repo: String,
    pub commit: String,
    pub directory: PathBuf,
    pub label: String,
    pub verbose: bool,
}

pub fn is_sha1_sum(s: &str) -> bool {
    SHA1_RE.is_match(s)
}

/// Builds checkout tasks in sorted directory order.
pub fn build_tasks(dependencies: &DependencyMap, base_dir: &Path, verbose: bool) -> Result<Vec<CheckoutTask>, DepsError> {
    let directories: Vec<&String> = dependencies.keys().sorted().collect();

    for directory in &directories {
        for other in &directories {
            if directory.starts_with(&format!("{}/", other)) {
                return Err(DepsError::NestedDependency {
                    parent: (*other).clone(),
                    child: (*directory).clone(),
                });
            }
        }
    }

    let mut tasks = Vec::with_capacity(directories.len());
    for directory in directories {
        let spec = &dependencies[directory.as_str()];
        let (repo, commit) = spec
            .url
            .split_once('@')
            .ok_or_else(|| DepsError::MissingCommit(directory.clone()))?;
        if !is_sha1_sum(commit) {
            return Err(DepsError::MalformedCommit(commit.to_string()));
        }

        tasks.push(CheckoutTask {
            repo: repo.to_string(),
            commit: commit.to_string(),
            directory: base_dir.join(directory),
            label: directory.clone(),
            verbose,
        });
    }

    log::debug!("Built {} checkout tasks under {}", tasks.len(), base_dir.display());
    Ok(tasks)
}
