// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Casemodel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of casemodel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter {filter:?}: {message}")]
    InvalidFilter { filter: String, message: String },
}

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, falling back to `filter`.
///
/// Only the first call does anything. A subscriber installed elsewhere is left in place.
pub fn init_logging(filter: &str) -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(env_filter) => env_filter,
        Err(_) => EnvFilter::try_new(filter).map_err(|err| LoggingError::InvalidFilter {
            filter: filter.to_owned(),
            message: err.to_string(),
        })?,
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
    let _ = INSTALLED.set(());
    Ok(())
}
