// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::Config;
use crate::errors::ConfigError;

/// Check a parsed config for values the runtime cannot be built from.
///
/// All problems are collected rather than stopping at the first one.
pub fn validate_config(cfg: &Config) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let scheduler = &cfg.scheduler;

    if scheduler.worker_threads == Some(0) {
        errors.push(ConfigError::InvalidValue {
            field: "scheduler.worker_threads",
            reason: "must be at least 1".to_string(),
        });
    }

    let names = [
        ("scheduler.thread_name", &scheduler.thread_name),
        ("scheduler.main_queue_name", &scheduler.main_queue_name),
        ("scheduler.background_queue_name", &scheduler.background_queue_name),
    ];
    for (field, name) in names {
        if matches!(name, Some(name) if name.trim().is_empty()) {
            errors.push(ConfigError::InvalidValue {
                field,
                reason: "must not be empty".to_string(),
            });
        }
    }

    if scheduler.get_main_queue_name() == scheduler.get_background_queue_name() {
        errors.push(ConfigError::InvalidValue {
            field: "scheduler.background_queue_name",
            reason: format!(
                "must differ from the main queue name '{}'",
                scheduler.get_main_queue_name()
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
