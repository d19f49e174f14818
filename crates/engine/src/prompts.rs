// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt rendering for each transition action. Plain string templates —
//! there is no templating engine in the dependency stack and none of
//! these need one; every prompt is built from a handful of fields already
//! in hand.

use ralph_adapters::{Comment, Review};
use ralph_core::{Issue, Project};
use std::path::PathBuf;

/// Knowledge directory every prompt that touches a worktree points the
/// agent at; conventionally a sibling of the worktree itself.
pub fn knowledge_dir(project: &Project) -> PathBuf {
    project.checkout_root.join("knowledge")
}

pub fn render_refine_prompt(issue: &Issue, tracker_comments: &[ralph_adapters::TrackerComment]) -> String {
    let mut prompt = format!(
        "You are refining issue {} ({}).\n\nTitle: {}\nDescription:\n{}\n",
        issue.human_id, issue.tracker_id, issue.title, issue.description
    );
    if !tracker_comments.is_empty() {
        prompt.push_str("\nExisting discussion:\n");
        for comment in tracker_comments {
            prompt.push_str(&format!("- {}: {}\n", comment.author, comment.body));
        }
    }
    prompt.push_str(
        "\nProduce an implementation plan. If genuine clarification is required before a plan \
         can be written, prefix your response with `type: questions` and ask them instead.\n",
    );
    prompt
}

pub fn render_build_prompt(issue: &Issue, project: &Project, config: &crate::config::ProjectConfig) -> String {
    let mut prompt = format!(
        "You are implementing the approved plan for issue {}.\n\nPlan:\n{}\n\nKnowledge directory: {}\n",
        issue.human_id,
        issue.plan,
        knowledge_dir(project).display()
    );
    if !config.quality_checks.is_empty() {
        prompt.push_str("\nRun these quality checks before finishing (via `ralph check`):\n");
        for check in &config.quality_checks {
            prompt.push_str(&format!("- ralph check -- {check}\n"));
        }
    }
    prompt
}

/// One normalized feedback item, as gathered by the address-feedback
/// action from inline review comments, review bodies, and general
/// comments.
#[derive(Debug, Clone)]
pub struct FeedbackItem {
    pub source_id: i64,
    pub path: Option<String>,
    pub body: String,
    pub author: String,
    pub is_trusted: bool,
    pub is_inline: bool,
    /// Reply comments threaded under this item, in arrival order.
    pub replies: Vec<String>,
}

pub fn render_feedback_prompt(
    issue: &Issue,
    project: &Project,
    items: &[FeedbackItem],
) -> String {
    let mut prompt = format!(
        "Address the following reviewer feedback on issue {}.\n\nKnowledge directory: {}\n\n",
        issue.human_id,
        knowledge_dir(project).display()
    );
    for item in items {
        let path = item.path.as_deref().unwrap_or("General feedback");
        let trust = if item.is_trusted { "trusted" } else { "untrusted" };
        prompt.push_str(&format!(
            "- [{path}] ({trust}) {}: {} (item:{})\n",
            item.author, item.body, item.source_id
        ));
        for reply in &item.replies {
            prompt.push_str(&format!("    \u{21b3} {reply}\n"));
        }
    }
    prompt.push_str(
        "\nFor each item above, prefix your explanation of what you changed with a line of the \
         form `### item:<id>` using that item's id, so each can be matched back to its comment.\n",
    );
    prompt
}

pub fn render_fix_checks_prompt(
    issue: &Issue,
    failed: &[(String, String, String)],
    config: &crate::config::ProjectConfig,
) -> String {
    let mut prompt = format!("Fix the failing checks on the PR for issue {}.\n\n", issue.human_id);
    for (name, conclusion, log) in failed {
        prompt.push_str(&format!("## Check: {name} ({conclusion})\n```\n{log}\n```\n\n"));
    }
    if !config.quality_checks.is_empty() {
        prompt.push_str("Quality checks this project runs (via `ralph check`):\n");
        for check in &config.quality_checks {
            prompt.push_str(&format!("- ralph check -- {check}\n"));
        }
    }
    prompt
}

/// Truncates a check run's log to at most 200 lines, keeping the first 30
/// and the last 170 so both the triggering error and the final failure
/// state survive truncation.
pub fn truncate_log(log: &str) -> String {
    const HEAD: usize = 30;
    const TAIL: usize = 170;
    let lines: Vec<&str> = log.lines().collect();
    if lines.len() <= HEAD + TAIL {
        return log.to_string();
    }
    let dropped = lines.len() - HEAD - TAIL;
    let mut out = lines[..HEAD].join("\n");
    out.push_str(&format!("\n[... {dropped} lines truncated ...]\n"));
    out.push_str(&lines[lines.len() - TAIL..].join("\n"));
    out
}

/// Whether a review counts as feedback the address-feedback action should
/// act on: non-empty body, `changes_requested` or `commented`, not a bot.
pub fn is_actionable_review_body(review: &Review) -> bool {
    !review.body.trim().is_empty()
        && !ralph_adapters::is_bot_login(&review.user_login)
        && matches!(
            review.state,
            ralph_adapters::ReviewState::ChangesRequested | ralph_adapters::ReviewState::Commented
        )
}

pub fn is_actionable_comment(comment: &Comment) -> bool {
    !ralph_adapters::is_bot_login(&comment.user_login)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_preserves_head_and_tail() {
        let log = (1..=250).map(|n| format!("line {n}")).collect::<Vec<_>>().join("\n");
        let truncated = truncate_log(&log);
        assert!(truncated.starts_with("line 1\n"));
        assert!(truncated.contains("[... 50 lines truncated ...]"));
        assert!(truncated.trim_end().ends_with("line 250"));
    }

    #[test]
    fn short_logs_pass_through_untouched() {
        let log = "line 1\nline 2";
        assert_eq!(truncate_log(log), log);
    }
}
