// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared text/JSON output formatting for every subcommand.

use clap::ValueEnum;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render an [`IssueState`](ralph_core::IssueState) or similar `Display`
/// value the way every list command's text column expects it: lowercase,
/// already snake_case from the type's own `Display` impl.
pub fn state_label(state: impl std::fmt::Display) -> String {
    state.to_string()
}
