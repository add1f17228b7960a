// Tue Jan 15 2026 - Alex

use crate::deps::parser::{evaluate, Value};
use crate::deps::DepsError;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// A git dependency as written in the descriptor: `url@commit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    pub url: String,
    pub condition: Option<String>,
}

impl DependencySpec {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            condition: None,
        }
    }
}

pub type DependencyMap = IndexMap<String, DependencySpec>;

#[derive(Debug, Clone, Default)]
pub struct DepsFile {
    path: Option<PathBuf>,
    vars: IndexMap<String, Value>,
    deps: DependencyMap,
    deps_os: IndexMap<String, DependencyMap>,
}

impl DepsFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DepsError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let mut file = Self::parse(&text)?;
        file.path = Some(path.as_ref().to_path_buf());
        Ok(file)
    }

    pub fn parse(text: &str) -> Result<Self, DepsError> {
        let bindings = evaluate(text)?;

        let vars = bindings
            .get("vars")
            .and_then(Value::as_dict)
            .cloned()
            .unwrap_or_default();
        let deps = parse_table(bindings.get("deps").ok_or(DepsError::MissingDeps)?, "deps")?;

        let mut deps_os = IndexMap::new();
        if let Some(value) = bindings.get("deps_os") {
            let tables = value
                .as_dict()
                .ok_or_else(|| DepsError::Type("deps_os must be a dict".to_string()))?;
            for (os, table) in tables {
                deps_os.insert(os.clone(), parse_table(table, &format!("deps_os[{:?}]", os))?);
            }
        }

        log::debug!("Parsed descriptor: {} deps, {} os tables", deps.len(), deps_os.len());

        Ok(Self {
            path: None,
            vars,
            deps,
            deps_os,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Directory the dependency paths are relative to.
    pub fn base_dir(&self) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    pub fn vars(&self) -> &IndexMap<String, Value> {
        &self.vars
    }

    pub fn deps(&self) -> &DependencyMap {
        &self.deps
    }

    pub fn deps_os(&self) -> &IndexMap<String, DependencyMap> {
        &self.deps_os
    }

    /// Common dependencies merged with the requested OS tables; `all` selects every table.
    pub fn dependencies(&self, os_requests: &[String]) -> DependencyMap {
        let mut merged = self.deps.clone();

        if os_requests.iter().any(|os| os == "all") {
            for table in self.deps_os.values() {
                merged.extend(table.clone());
            }
            return merged;
        }

        for os in os_requests {
            match self.deps_os.get(os) {
                Some(table) => merged.extend(table.clone()),
                None => log::debug!("No OS-specific dependencies for {:?}", os),
            }
        }
        merged
    }
}

fn parse_table(value: &Value, context: &str) -> Result<DependencyMap, DepsError> {
    let dict = value
        .as_dict()
        .ok_or_else(|| DepsError::Type(format!("{} must be a dict", context)))?;

    let mut table = DependencyMap::new();
    for (directory, entry) in dict {
        match entry {
            Value::Str(url) => {
                table.insert(directory.clone(), DependencySpec::new(url));
            }
            Value::Dict(fields) => {
                let dep_type = fields.get("dep_type").and_then(Value::as_str).unwrap_or("git");
                if dep_type != "git" {
                    log::warn!("Skipping {} dependency {}", dep_type, directory);
                    continue;
                }
                let url = fields.get("url").and_then(Value::as_str).ok_or_else(|| {
                    DepsError::InvalidEntry {
                        directory: directory.clone(),
                        reason: "missing url".to_string(),
                    }
                })?;
                table.insert(
                    directory.clone(),
                    DependencySpec {
                        url: url.to_string(),
                        condition: fields.get("condition").and_then(Value::as_str).map(str::to_string),
                    },
                );
            }
            Value::None => log::debug!("Dependency {} is disabled", directory),
            other => {
                return Err(DepsError::InvalidEntry {
                    directory: directory.clone(),
                    reason: format!("unsupported value {:?}", other),
                })
            }
        }
    }
    Ok(table)
}
