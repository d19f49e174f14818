// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Address-feedback action: `addressing_feedback → in_review`. Gathers
//! review comments, review bodies, and general PR comments into a single
//! normalized list, runs the agent against them, and replies to each
//! source with whatever explanation it can extract from the response.

use super::{from_agent, from_code_host};
use crate::deps::ActionDeps;
use crate::event_log::EventLogHandler;
use crate::prompts::{is_actionable_comment, is_actionable_review_body, render_feedback_prompt, FeedbackItem};
use async_trait::async_trait;
use ralph_core::{ActionError, Issue, Store, TransitionAction};
use std::sync::Arc;

const FEEDBACK_MAX_TURNS: u32 = 30;
const FALLBACK_CANNED_MESSAGE: &str = "Addressed this feedback.";
const FALLBACK_MAX_CHARS: usize = 1000;

pub struct AddressFeedbackAction {
    deps: Arc<ActionDeps>,
}

impl AddressFeedbackAction {
    pub fn new(deps: Arc<ActionDeps>) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl TransitionAction for AddressFeedbackAction {
    async fn run(&self, issue: &Issue, store: &dyn Store) -> Result<(), ActionError> {
        let project = store.get_project(&issue.project_id).await?;
        let pr_number = issue
            .pr_number
            .ok_or_else(|| ActionError::PermanentRemote("issue has no open pull request".into()))?;

        let owner = &project.repo_owner;
        let repo = &project.repo_name;

        let inline_comments = self.deps.code_host.fetch_pr_comments(owner, repo, pr_number).await.map_err(from_code_host)?;
        let reviews = self.deps.code_host.fetch_reviews(owner, repo, pr_number).await.map_err(from_code_host)?;
        let issue_comments =
            self.deps.code_host.fetch_pr_issue_comments(owner, repo, pr_number).await.map_err(from_code_host)?;

        let mut items = Vec::new();
        let mut top_level_index_by_id = std::collections::HashMap::new();

        for comment in &inline_comments {
            if comment.in_reply_to != 0 || comment.path.is_none() {
                continue;
            }
            top_level_index_by_id.insert(comment.id, items.len());
            items.push(FeedbackItem {
                source_id: comment.id,
                path: comment.path.clone(),
                body: comment.body.clone(),
                author: comment.user_login.clone(),
                is_trusted: project.trusted_reviewer.matches_login(&comment.user_login),
                is_inline: true,
                replies: Vec::new(),
            });
        }

        for comment in &inline_comments {
            if comment.in_reply_to == 0 {
                continue;
            }
            if let Some(&parent_idx) = top_level_index_by_id.get(&comment.in_reply_to) {
                items[parent_idx].replies.push(format!("{}: {}", comment.user_login, comment.body));
            }
        }

        for review in &reviews {
            if !is_actionable_review_body(review) {
                continue;
            }
            items.push(FeedbackItem {
                source_id: review.id,
                path: None,
                body: review.body.clone(),
                author: review.user_login.clone(),
                is_trusted: project.trusted_reviewer.matches_login(&review.user_login),
                is_inline: false,
                replies: Vec::new(),
            });
        }

        for comment in &issue_comments {
            if !is_actionable_comment(comment) {
                continue;
            }
            items.push(FeedbackItem {
                source_id: comment.id,
                path: None,
                body: comment.body.clone(),
                author: comment.user_login.clone(),
                is_trusted: project.trusted_reviewer.matches_login(&comment.user_login),
                is_inline: false,
                replies: Vec::new(),
            });
        }

        for item in &items {
            let result = if item.is_inline {
                self.deps.code_host.react_to_review_comment(owner, repo, item.source_id, "eyes").await
            } else {
                self.deps.code_host.react_to_issue_comment(owner, repo, item.source_id, "eyes").await
            };
            if let Err(err) = result {
                tracing::warn!(issue_id = %issue.id, source_id = item.source_id, error = %err, "failed to react to feedback item");
            }
        }

        let prompt = render_feedback_prompt(issue, &project, &items);
        let workdir = project.checkout_root.join(&issue.workspace_name);
        let handler =
            EventLogHandler::new(issue.id, store, self.deps.clock.clone(), self.deps.on_build_event.clone());
        let response = self
            .deps
            .agent
            .invoke_with_events(&prompt, &workdir, FEEDBACK_MAX_TURNS, &handler)
            .await
            .map_err(from_agent)?;

        let committed = match self.deps.git.commit(&workdir, &format!("Address feedback on {}", issue.human_id)).await {
            Ok(()) => true,
            Err(err) if err.is_nothing_to_commit() => false,
            Err(err) => return Err(ActionError::Transient(err.to_string())),
        };

        let commit_ref = if committed {
            self.deps.git.push_branch(&workdir, &issue.branch_name).await.map_err(|err| ActionError::Transient(err.to_string()))?;
            Some(self.deps.git.head_sha(&workdir).await.map_err(|err| ActionError::Transient(err.to_string()))?)
        } else {
            None
        };

        let mut general_replies = Vec::new();
        for item in &items {
            let body = reply_body(&response, item, commit_ref.as_deref());
            if item.is_inline {
                self.deps
                    .code_host
                    .post_review_reply(owner, repo, pr_number, item.source_id, &body)
                    .await
                    .map_err(from_code_host)?;
            } else {
                general_replies.push(body);
            }
        }
        if !general_replies.is_empty() {
            self.deps
                .code_host
                .post_pr_comment(owner, repo, pr_number, &general_replies.join("\n\n---\n\n"))
                .await
                .map_err(from_code_host)?;
        }

        let mut updated = issue.clone();
        updated.touch(self.deps.clock.now());
        store.update_issue(updated).await?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "address_feedback"
    }
}

/// Pulls the agent's `### item:<id>` block for this item out of its full
/// response, if present.
fn extract_explanation(response: &str, source_id: i64) -> Option<String> {
    let marker = format!("### item:{source_id}");
    let start = response.find(&marker)? + marker.len();
    let rest = &response[start..];
    let end = rest.find("### item:").unwrap_or(rest.len());
    let explanation = rest[..end].trim();
    if explanation.is_empty() {
        None
    } else {
        Some(explanation.to_string())
    }
}

fn reply_body(response: &str, item: &FeedbackItem, commit_ref: Option<&str>) -> String {
    let explanation = extract_explanation(response, item.source_id);
    let path = item.path.as_deref().unwrap_or("General feedback");

    let base = match explanation {
        Some(text) => text,
        None => match commit_ref {
            Some(_) => String::new(),
            None => {
                let truncated: String = response.chars().take(FALLBACK_MAX_CHARS).collect();
                if truncated.trim().is_empty() {
                    FALLBACK_CANNED_MESSAGE.to_string()
                } else {
                    truncated
                }
            }
        },
    };

    match (commit_ref, base.is_empty()) {
        (Some(sha), true) => format!("Addressed in {sha}."),
        (Some(sha), false) => format!("Addressed in {sha}.\n\n[{path}] {base}"),
        (None, true) => FALLBACK_CANNED_MESSAGE.to_string(),
        (None, false) => format!("[{path}] {base}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ralph_adapters::fakes::{FakeAgentDriver, FakeCodeHost, FakeGitOps, FakeIssueTracker};
    use ralph_adapters::{Comment, Review, ReviewState};
    use ralph_core::{Clock, IssueBuilder, IssueState, ProjectBuilder, SystemClock};

    fn test_deps(
        code_host: Arc<FakeCodeHost>,
        agent: Arc<FakeAgentDriver>,
        git: Arc<FakeGitOps>,
    ) -> Arc<ActionDeps> {
        Arc::new(ActionDeps::new(
            code_host,
            Arc::new(FakeIssueTracker::new()),
            agent,
            git,
            Arc::new(crate::config::StaticConfigLoader(Default::default())),
            Arc::new(SystemClock) as Arc<dyn Clock>,
        ))
    }

    #[tokio::test]
    async fn inline_comment_gets_a_threaded_reply_with_extracted_explanation() {
        let project = ProjectBuilder::default().build();
        let issue = IssueBuilder::default()
            .project_id(project.id)
            .state(IssueState::AddressingFeedback)
            .pr_number(42u64)
            .branch_name("ralph/proj-1")
            .build();

        let code_host = Arc::new(FakeCodeHost::new());
        code_host.set_pr(
            &project.repo_owner,
            &project.repo_name,
            ralph_adapters::PullRequest {
                number: 42,
                head_sha: "abc123".into(),
                html_url: "https://example.test/pr/42".into(),
                title: issue.title.clone(),
                state: "open".into(),
            },
        );
        code_host.set_pr_comments(
            &project.repo_owner,
            &project.repo_name,
            42,
            vec![Comment {
                id: 7,
                body: "please rename this".into(),
                path: Some("src/lib.rs".into()),
                user_login: "alice".into(),
                in_reply_to: 0,
            }],
        );

        let agent =
            Arc::new(FakeAgentDriver::with_response("### item:7\nRenamed the function as requested."));
        let git = Arc::new(FakeGitOps::new());
        let deps = test_deps(code_host.clone(), agent, git);

        let store = crate::test_support::MemStore::default();
        store.seed_project(project.clone());
        store.seed_issue(issue.clone());

        let action = AddressFeedbackAction::new(deps);
        action.run(&issue, &store).await.unwrap();

        let replies = code_host.posted_replies.lock();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].2.contains("Renamed the function"));
    }

    #[tokio::test]
    async fn reply_comment_is_threaded_under_its_parent_instead_of_dropped() {
        let project = ProjectBuilder::default().build();
        let issue = IssueBuilder::default()
            .project_id(project.id)
            .state(IssueState::AddressingFeedback)
            .pr_number(42u64)
            .branch_name("ralph/proj-1")
            .build();

        let code_host = Arc::new(FakeCodeHost::new());
        code_host.set_pr(
            &project.repo_owner,
            &project.repo_name,
            ralph_adapters::PullRequest {
                number: 42,
                head_sha: "abc123".into(),
                html_url: "https://example.test/pr/42".into(),
                title: issue.title.clone(),
                state: "open".into(),
            },
        );
        code_host.set_pr_comments(
            &project.repo_owner,
            &project.repo_name,
            42,
            vec![
                Comment {
                    id: 7,
                    body: "please rename this".into(),
                    path: Some("src/lib.rs".into()),
                    user_login: "alice".into(),
                    in_reply_to: 0,
                },
                Comment {
                    id: 8,
                    body: "agreed, and also check the error path".into(),
                    path: Some("src/lib.rs".into()),
                    user_login: "bob".into(),
                    in_reply_to: 7,
                },
            ],
        );

        let agent = Arc::new(FakeAgentDriver::with_response("### item:7\nRenamed and fixed the error path."));
        let git = Arc::new(FakeGitOps::new());
        let deps = test_deps(code_host.clone(), agent, git);

        let store = crate::test_support::MemStore::default();
        store.seed_project(project.clone());
        store.seed_issue(issue.clone());

        let action = AddressFeedbackAction::new(deps);
        action.run(&issue, &store).await.unwrap();

        // Only the top-level comment gets its own reply; the threaded reply
        // is folded into item 7's prompt context rather than posted again.
        let replies = code_host.posted_replies.lock();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].1, 7);
    }

    #[tokio::test]
    async fn untrusted_review_body_still_gets_consolidated_into_a_general_comment() {
        let project = ProjectBuilder::default().build();
        let issue = IssueBuilder::default()
            .project_id(project.id)
            .state(IssueState::AddressingFeedback)
            .pr_number(42u64)
            .branch_name("ralph/proj-1")
            .build();

        let code_host = Arc::new(FakeCodeHost::new());
        code_host.set_pr(
            &project.repo_owner,
            &project.repo_name,
            ralph_adapters::PullRequest {
                number: 42,
                head_sha: "abc123".into(),
                html_url: "https://example.test/pr/42".into(),
                title: issue.title.clone(),
                state: "open".into(),
            },
        );
        code_host.set_reviews(
            &project.repo_owner,
            &project.repo_name,
            42,
            vec![Review {
                id: 9,
                state: ReviewState::ChangesRequested,
                body: "tighten this up".into(),
                user_login: "bob".into(),
                user_id: 2,
            }],
        );

        let agent = Arc::new(FakeAgentDriver::with_response("no per-item markers here"));
        let git = Arc::new(FakeGitOps::new());
        git.set_nothing_to_commit(true);
        let deps = test_deps(code_host.clone(), agent, git);

        let store = crate::test_support::MemStore::default();
        store.seed_project(project.clone());
        store.seed_issue(issue.clone());

        let action = AddressFeedbackAction::new(deps);
        action.run(&issue, &store).await.unwrap();

        let comments = code_host.posted_comments.lock();
        assert_eq!(comments.len(), 1);
        assert!(comments[0].1.contains("no per-item markers here") || comments[0].1.contains(FALLBACK_CANNED_MESSAGE));
    }
}
