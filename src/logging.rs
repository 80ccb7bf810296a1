// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tracing setup. The terminal belongs to the UI, so logs go to a file.

use crate::config::app_config::LoggingConfig;
use std::fs::{self, OpenOptions};
use std::path::Path;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter for our crates at `level`, everything else at `warn`.
///
/// `RUST_LOG` wins when set. An unparsable level falls back to `info`.
pub fn build_filter(level: &str, rust_log: Option<&str>) -> EnvFilter {
    if let Some(spec) = rust_log.filter(|s| !s.trim().is_empty()) {
        return EnvFilter::new(spec);
    }
    let level: LevelFilter = level.parse().unwrap_or(LevelFilter::INFO);
    let directive = |target: &str| -> Directive {
        format!("{}={}", target, level)
            .parse()
            .unwrap_or_else(|_| Directive::from(LevelFilter::INFO))
    };
    EnvFilter::new("warn")
        .add_directive(directive("soundctl"))
        .add_directive(directive("soundctl_services"))
}

/// Install the global subscriber writing to `path`.
///
/// Returns false, and logs nothing, if the file cannot be opened.
pub fn init(config: &LoggingConfig, path: &Path) -> bool {
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return false;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return false;
    };

    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false),
        )
        .with(build_filter(&config.level, rust_log.as_deref()))
        .try_init()
        .is_ok()
}
