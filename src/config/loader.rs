// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_BACKGROUND_QUEUE_NAME, DEFAULT_MAIN_QUEUE_NAME, DEFAULT_THREAD_NAME,
    FALLBACK_WORKER_THREADS,
};
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level runtime configuration.
///
/// Every section is optional; an empty file yields the defaults.
///
/// # Example
/// ```yaml
/// scheduler:
///   worker_threads: 4
///   thread_name: "search-worker"
///   main_queue_name: "main"
///   background_queue_name: "background"
/// ```
#[derive(Debug, Deserialize, Default, PartialEq, Clone)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerOptions,
}

/// Options for the execution lanes built by [`crate::config::RuntimeBuilder`].
///
/// # Fields
/// * `worker_threads` - Background runtime worker count (defaults to available parallelism)
/// * `thread_name` - Background runtime thread name
/// * `main_queue_name` - Name of the serial lane and of its thread
/// * `background_queue_name` - Name of the parallel lane
#[derive(Debug, Deserialize, Default, PartialEq, Clone)]
pub struct SchedulerOptions {
    pub worker_threads: Option<usize>,
    pub thread_name: Option<String>,
    pub main_queue_name: Option<String>,
    pub background_queue_name: Option<String>,
}

impl SchedulerOptions {
    pub fn get_worker_threads(&self) -> usize {
        self.worker_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(FALLBACK_WORKER_THREADS)
        })
    }

    pub fn get_thread_name(&self) -> &str {
        self.thread_name.as_deref().unwrap_or(DEFAULT_THREAD_NAME)
    }

    pub fn get_main_queue_name(&self) -> &str {
        self.main_queue_name
            .as_deref()
            .unwrap_or(DEFAULT_MAIN_QUEUE_NAME)
    }

    pub fn get_background_queue_name(&self) -> &str {
        self.background_queue_name
            .as_deref()
            .unwrap_or(DEFAULT_BACKGROUND_QUEUE_NAME)
    }
}

/// Load a config from a YAML (`.yaml`, `.yml`) or TOML (`.toml`) file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("yaml") | Some("yml") => parse_yaml(&content),
        Some("toml") => Ok(toml::from_str(&content)?),
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Load a config and reject values the runtime cannot be built from.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigError::Validation)?;
    Ok(cfg)
}

// An empty YAML document is `null`, not an empty mapping.
fn parse_yaml(content: &str) -> Result<Config, ConfigError> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
scheduler:
  worker_threads: 2
  main_queue_name: ui
"#;

        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.scheduler.worker_threads, Some(2));
        assert_eq!(cfg.scheduler.get_main_queue_name(), "ui");
        assert_eq!(cfg.scheduler.get_background_queue_name(), "background");
        assert_eq!(cfg.scheduler.get_thread_name(), DEFAULT_THREAD_NAME);
    }

    #[test]
    fn test_load_yaml_file() {
        let file = write_config(".yaml", "scheduler:\n  thread_name: search\n");

        let cfg = load_config(file.path()).unwrap();

        assert_eq!(cfg.scheduler.get_thread_name(), "search");
    }

    #[test]
    fn test_load_toml_file() {
        let file = write_config(
            ".toml",
            "[scheduler]\nworker_threads = 3\nbackground_queue_name = \"pool\"\n",
        );

        let cfg = load_config(file.path()).unwrap();

        assert_eq!(cfg.scheduler.get_worker_threads(), 3);
        assert_eq!(cfg.scheduler.get_background_queue_name(), "pool");
    }

    #[test]
    fn test_empty_yaml_yields_defaults() {
        let file = write_config(".yml", "");

        let cfg = load_config(file.path()).unwrap();

        assert_eq!(cfg, Config::default());
        assert!(cfg.scheduler.get_worker_threads() >= 1);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let file = write_config(".json", "{}");

        let err = load_config(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_config("does/not/exist.yaml").unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.yaml"));
    }

    #[test]
    fn test_malformed_yaml_is_a_parse_error() {
        let file = write_config(".yaml", "scheduler:\n  worker_threads: many\n");

        let err = load_config(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_load_and_validate_rejects_zero_workers() {
        let file = write_config(".yaml", "scheduler:\n  worker_threads: 0\n");

        let err = load_and_validate_config(file.path()).unwrap_err();

        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }
}
