// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project registration: the immutable-per-run descriptor every issue
//! belongs to.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

crate::define_id! {
    /// Unique identifier for a registered project.
    pub struct ProjectId("prj-");
}

/// An optionally-configured trusted reviewer identity.
///
/// Either field may be set independently: some code hosts only expose a
/// login at webhook time, others only a numeric id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedReviewer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl TrustedReviewer {
    pub fn matches_login(&self, login: &str) -> bool {
        self.username
            .as_deref()
            .is_some_and(|u| u.eq_ignore_ascii_case(login))
    }

    pub fn matches_id(&self, id: i64) -> bool {
        self.user_id == Some(id)
    }
}

/// A registered project: the scope every issue, worktree, and poller tick
/// is keyed on.
///
/// Created once at registration and treated as read-only afterward; it is
/// not mutated by the engine, only by operator-driven reconfiguration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Root of the local checkout this project's worktrees branch from.
    pub checkout_root: PathBuf,
    /// Code-host repository owner (org or user login).
    pub repo_owner: String,
    /// Code-host repository name.
    pub repo_name: String,
    /// Issue-tracker team identifier issues are filed under.
    pub tracker_team: String,
    /// Issue-tracker user/bot identifier issues are assigned to for pickup.
    pub tracker_assignee: String,
    /// Prefix applied to every branch this project's build action creates.
    pub branch_prefix: String,
    /// Path, relative to `checkout_root`, to this project's YAML config file.
    pub config_path: PathBuf,
    /// Upper bound on AI turns spent in the build action's coding phase.
    pub max_iterations: u32,
    #[serde(default)]
    pub trusted_reviewer: TrustedReviewer,
}

impl Project {
    pub fn branch_name(&self, issue_human_id: &str) -> String {
        format!("{}{}", self.branch_prefix, issue_human_id.to_ascii_lowercase())
    }
}

crate::builder! {
    pub struct ProjectBuilder => Project {
        into {
            name: String = "test-project",
            checkout_root: PathBuf = "/tmp/ralph-test",
            repo_owner: String = "acme",
            repo_name: String = "widgets",
            tracker_team: String = "ENG",
            tracker_assignee: String = "ralph-bot",
            branch_prefix: String = "ralph/",
            config_path: PathBuf = "ralph.yaml",
        }
        set {
            max_iterations: u32 = 20,
            trusted_reviewer: TrustedReviewer = TrustedReviewer::default(),
        }
        computed {
            id: ProjectId = ProjectId::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_name_lowercases_and_prefixes() {
        let project = Project::builder().branch_prefix("ralph/").build();
        assert_eq!(project.branch_name("PROJ-42"), "ralph/proj-42");
    }

    #[test]
    fn trusted_reviewer_matches_case_insensitively() {
        let trusted = TrustedReviewer { username: Some("Alice".into()), user_id: None };
        assert!(trusted.matches_login("alice"));
        assert!(trusted.matches_login("ALICE"));
        assert!(!trusted.matches_login("bob"));
    }

    #[test]
    fn trusted_reviewer_matches_by_id() {
        let trusted = TrustedReviewer { username: None, user_id: Some(42) };
        assert!(trusted.matches_id(42));
        assert!(!trusted.matches_id(43));
    }
}
