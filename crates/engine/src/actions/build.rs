// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build action: `building → in_review`. Renders a build prompt from the
//! approved plan, runs the agent against the project's worktree, commits
//! and pushes, then opens or reuses the PR.

use super::{from_code_host, from_config};
use crate::deps::ActionDeps;
use crate::event_log::EventLogHandler;
use crate::prompts::render_build_prompt;
use async_trait::async_trait;
use ralph_core::{ActionError, Issue, Store, TransitionAction};
use std::sync::Arc;

pub struct BuildAction {
    deps: Arc<ActionDeps>,
}

impl BuildAction {
    pub fn new(deps: Arc<ActionDeps>) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl TransitionAction for BuildAction {
    async fn run(&self, issue: &Issue, store: &dyn Store) -> Result<(), ActionError> {
        let project = store.get_project(&issue.project_id).await?;
        let config = self.deps.config.load(&project).await.map_err(from_config)?;

        let branch_name = if issue.branch_name.is_empty() {
            project.branch_name(&issue.human_id)
        } else {
            issue.branch_name.clone()
        };
        let workspace_name = if issue.workspace_name.is_empty() {
            branch_name.clone()
        } else {
            issue.workspace_name.clone()
        };
        let workdir = project.checkout_root.join(&workspace_name);

        let prompt = render_build_prompt(issue, &project, &config);
        let handler =
            EventLogHandler::new(issue.id, store, self.deps.clock.clone(), self.deps.on_build_event.clone());

        self.deps
            .agent
            .invoke_with_events(&prompt, &workdir, project.max_iterations, &handler)
            .await
            .map_err(super::from_agent)?;

        match self.deps.git.commit(&workdir, &format!("Implement {}", issue.human_id)).await {
            Ok(()) => {}
            Err(err) if err.is_nothing_to_commit() => {
                tracing::warn!(issue_id = %issue.id, "build action produced no changes to commit");
            }
            Err(err) => return Err(ActionError::Transient(err.to_string())),
        }

        self.deps
            .git
            .push_branch(&workdir, &branch_name)
            .await
            .map_err(|err| ActionError::Transient(err.to_string()))?;

        let existing = self
            .deps
            .code_host
            .find_open_pr(&project.repo_owner, &project.repo_name, &branch_name, &config.default_base_branch)
            .await
            .map_err(from_code_host)?;

        let pr = match existing {
            Some(pr) => pr,
            None => self
                .deps
                .code_host
                .create_pr(
                    &project.repo_owner,
                    &project.repo_name,
                    &branch_name,
                    &config.default_base_branch,
                    &issue.title,
                    &issue.plan,
                )
                .await
                .map_err(from_code_host)?,
        };

        let mut updated = issue.clone();
        updated.branch_name = branch_name;
        updated.workspace_name = workspace_name;
        updated.pr_number = Some(pr.number);
        updated.pr_url = Some(pr.html_url);
        updated.touch(self.deps.clock.now());
        store.update_issue(updated).await?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "build"
    }
}
