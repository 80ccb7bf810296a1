// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type shared by every service.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} is required")]
    MissingArgument(&'static str),
    #[error("invalid {what}: {value}")]
    InvalidArgument { what: &'static str, value: String },
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` failed: {message}")]
    CommandFailed { command: String, message: String },
    #[error("unexpected {tool} output: {message}")]
    Parse { tool: &'static str, message: String },
    #[error("{kind} {name:?} not found")]
    NotFound { kind: &'static str, name: String },
    #[error("failed to determine config directory")]
    NoConfigDir,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl ServiceError {
    pub(crate) fn parse(tool: &'static str, message: impl Into<String>) -> Self {
        Self::Parse {
            tool,
            message: message.into(),
        }
    }

    /// Whether this is a lookup miss rather than a failed operation.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
