// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem-backed [`ConfigLoader`]: resolves a project's YAML config
//! file relative to its checkout root and parses it with `serde_yaml`.

use async_trait::async_trait;
use ralph_core::Project;
use ralph_engine::config::{ConfigError, ConfigLoader, ProjectConfig};

pub struct YamlConfigLoader;

#[async_trait]
impl ConfigLoader for YamlConfigLoader {
    async fn load(&self, project: &Project) -> Result<ProjectConfig, ConfigError> {
        let path = project.checkout_root.join(&project.config_path);
        let raw = tokio::fs::read_to_string(&path).await.map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw)
            .map_err(|source| ConfigError::Yaml { path: path.display().to_string(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ralph_core::ProjectBuilder;
    use tempfile::tempdir;

    #[tokio::test]
    async fn loads_and_parses_a_real_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("ralph.yaml"),
            "name: widgets\ndefault_base_branch: main\nquality_checks:\n  - cargo test\n",
        )
        .unwrap();

        let project = ProjectBuilder::default()
            .checkout_root(dir.path().to_path_buf())
            .config_path(std::path::PathBuf::from("ralph.yaml"))
            .build();

        let config = YamlConfigLoader.load(&project).await.unwrap();
        assert_eq!(config.name, "widgets");
        assert_eq!(config.quality_checks, vec!["cargo test".to_string()]);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let project = ProjectBuilder::default().checkout_root(dir.path().to_path_buf()).build();
        let result = YamlConfigLoader.load(&project).await;
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
