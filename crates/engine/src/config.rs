// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-project configuration surface. The engine only needs the parsed
//! shape; loading it from a YAML file on disk is the daemon's job
//! (see its `config` module), reached here through [`ConfigLoader`] so
//! actions can be tested against an in-memory stand-in.

use async_trait::async_trait;
use ralph_core::Project;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parsed per-project YAML config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    /// Base branch new PRs target.
    pub default_base_branch: String,
    /// Shell lines the fix-checks and build prompts quote as the
    /// project's quality gate; each is prefixed by a `ralph check`
    /// runner when rendered into a prompt.
    #[serde(default)]
    pub quality_checks: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            default_base_branch: "main".to_string(),
            quality_checks: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("invalid yaml in {path}: {source}")]
    Yaml { path: String, source: serde_yaml::Error },
}

/// Resolves a project's config file. The engine depends only on this
/// trait; the daemon supplies the real filesystem-backed implementation.
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    async fn load(&self, project: &Project) -> Result<ProjectConfig, ConfigError>;
}

#[cfg(any(test, feature = "test-support"))]
pub struct StaticConfigLoader(pub ProjectConfig);

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl ConfigLoader for StaticConfigLoader {
    async fn load(&self, _project: &Project) -> Result<ProjectConfig, ConfigError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_main() {
        assert_eq!(ProjectConfig::default().default_base_branch, "main");
    }
}
