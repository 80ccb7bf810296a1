// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Running external command-line tools.
//!
//! Every service talks to the host through a [`CommandRunner`], so tests can
//! script exact command lines instead of touching the real `pactl` or
//! `bluetoothctl`.

use crate::error::{ServiceError, ServiceResult};
use std::process::Command;
use tracing::{debug, trace};

/// Executes a program to completion and returns its trimmed stdout.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[&str]) -> ServiceResult<String>;
}

/// Render a program and its arguments as a single space-separated line.
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs commands on the host system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> ServiceResult<String> {
        let command = command_line(program, args);
        debug!("Running `{}`", command);

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| ServiceError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            // bluetoothctl reports most failures on stdout.
            let message = if !stderr.is_empty() {
                format!("{}: {}", output.status, stderr)
            } else if !stdout.is_empty() {
                format!("{}: {}", output.status, stdout)
            } else {
                output.status.to_string()
            };
            return Err(ServiceError::CommandFailed { command, message });
        }

        trace!("`{}` -> {} bytes", command, stdout.len());
        Ok(stdout)
    }
}

#[cfg(test)]
pub(crate) use fake::FakeRunner;
