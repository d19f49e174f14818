// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GitHub REST API implementation of [`CodeHostClient`].

use crate::code_host::{
    CheckConclusion, CheckRun, CheckStatus, CodeHostClient, CodeHostError, Comment, PullRequest,
    Review, ReviewState, TimelineEvent, TimelineEventKind,
};
use crate::retry::{with_retry, RetryPolicy};
use async_trait::async_trait;
use serde::Deserialize;

pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    retry_policy: RetryPolicy,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://api.github.com".to_string(),
            token: token.into(),
            retry_policy: RetryPolicy::default(),
        }
    }

    #[cfg(test)]
    fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
            retry_policy: RetryPolicy { max_attempts: 1, ..RetryPolicy::default() },
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, CodeHostError> {
        with_retry(self.retry_policy, CodeHostError::is_transient, || async {
            let response = self
                .http
                .get(format!("{}{}", self.base_url, path))
                .bearer_auth(&self.token)
                .header("User-Agent", "ralph-agent")
                .send()
                .await
                .map_err(|err| CodeHostError::Transient(err.to_string()))?;
            classify_and_parse(response).await
        })
        .await
    }

    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<(), CodeHostError> {
        with_retry(self.retry_policy, CodeHostError::is_transient, || async {
            let response = self
                .http
                .post(format!("{}{}", self.base_url, path))
                .bearer_auth(&self.token)
                .header("User-Agent", "ralph-agent")
                .json(&body)
                .send()
                .await
                .map_err(|err| CodeHostError::Transient(err.to_string()))?;
            classify_status(response.status()).map(|_| ())
        })
        .await
    }
}

async fn classify_and_parse<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, CodeHostError> {
    let status = response.status();
    classify_status(status)?;
    response.json::<T>().await.map_err(|err| CodeHostError::Transient(err.to_string()))
}

fn classify_status(status: reqwest::StatusCode) -> Result<(), CodeHostError> {
    if status.is_success() {
        return Ok(());
    }
    if status.is_server_error() {
        return Err(CodeHostError::Transient(format!("server error: {status}")));
    }
    Err(CodeHostError::Permanent { status: status.as_u16(), message: status.to_string() })
}

#[derive(Deserialize)]
struct GhPullRequest {
    number: u64,
    head: GhHead,
    html_url: String,
    title: String,
    state: String,
}

#[derive(Deserialize)]
struct GhHead {
    sha: String,
}

#[derive(Deserialize)]
struct GhCheckRunsResponse {
    check_runs: Vec<GhCheckRun>,
}

#[derive(Deserialize)]
struct GhCheckRun {
    id: i64,
    name: String,
    status: String,
    conclusion: Option<String>,
}

impl From<GhCheckRun> for CheckRun {
    fn from(r: GhCheckRun) -> Self {
        CheckRun {
            id: r.id,
            name: r.name,
            status: match r.status.as_str() {
                "queued" => CheckStatus::Queued,
                "in_progress" => CheckStatus::InProgress,
                _ => CheckStatus::Completed,
            },
            conclusion: r.conclusion.map(|c| match c.as_str() {
                "success" => CheckConclusion::Success,
                "failure" => CheckConclusion::Failure,
                other => CheckConclusion::Other(other.to_string()),
            }),
        }
    }
}

#[derive(Deserialize)]
struct GhReview {
    id: i64,
    state: String,
    #[serde(default)]
    body: String,
    user: GhUser,
}

#[derive(Deserialize)]
struct GhUser {
    login: String,
    id: i64,
}

#[derive(Deserialize)]
struct GhComment {
    id: i64,
    #[serde(default)]
    body: String,
    #[serde(default)]
    path: Option<String>,
    user: GhUser,
    #[serde(default)]
    in_reply_to_id: Option<i64>,
}

#[async_trait]
impl CodeHostClient for GitHubClient {
    async fn fetch_pr(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequest, CodeHostError> {
        let pr: GhPullRequest = self.get(&format!("/repos/{owner}/{repo}/pulls/{number}")).await?;
        Ok(PullRequest {
            number: pr.number,
            head_sha: pr.head.sha,
            html_url: pr.html_url,
            title: pr.title,
            state: pr.state,
        })
    }

    async fn is_pr_merged(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<bool, CodeHostError> {
        match self
            .get::<serde_json::Value>(&format!("/repos/{owner}/{repo}/pulls/{number}/merge"))
            .await
        {
            Ok(_) => Ok(true),
            Err(CodeHostError::Permanent { status: 404, .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn fetch_reviews(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Review>, CodeHostError> {
        let reviews: Vec<GhReview> =
            self.get(&format!("/repos/{owner}/{repo}/pulls/{number}/reviews")).await?;
        Ok(reviews
            .into_iter()
            .map(|r| Review {
                id: r.id,
                state: match r.state.as_str() {
                    "APPROVED" => ReviewState::Approved,
                    "CHANGES_REQUESTED" => ReviewState::ChangesRequested,
                    "COMMENTED" => ReviewState::Commented,
                    _ => ReviewState::Other,
                },
                body: r.body,
                user_login: r.user.login,
                user_id: r.user.id,
            })
            .collect())
    }

    async fn fetch_pr_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Comment>, CodeHostError> {
        let comments: Vec<GhComment> =
            self.get(&format!("/repos/{owner}/{repo}/pulls/{number}/comments")).await?;
        Ok(comments
            .into_iter()
            .map(|c| Comment {
                id: c.id,
                body: c.body,
                path: c.path,
                user_login: c.user.login,
                in_reply_to: c.in_reply_to_id.unwrap_or(0),
            })
            .collect())
    }

    async fn fetch_pr_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<Comment>, CodeHostError> {
        let comments: Vec<GhComment> =
            self.get(&format!("/repos/{owner}/{repo}/issues/{number}/comments")).await?;
        Ok(comments
            .into_iter()
            .map(|c| Comment { id: c.id, body: c.body, path: None, user_login: c.user.login, in_reply_to: 0 })
            .collect())
    }

    async fn fetch_timeline(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<TimelineEvent>, CodeHostError> {
        #[derive(Deserialize)]
        struct GhTimelineEvent {
            event: String,
            #[serde(default)]
            actor: Option<GhUser>,
            #[serde(default)]
            requested_reviewer: Option<GhUser>,
            created_at: chrono::DateTime<chrono::Utc>,
        }

        let events: Vec<GhTimelineEvent> =
            self.get(&format!("/repos/{owner}/{repo}/issues/{number}/timeline")).await?;
        Ok(events
            .into_iter()
            .filter_map(|e| {
                let kind = match e.event.as_str() {
                    "review_requested" => TimelineEventKind::ReviewRequested,
                    "review_request_removed" => TimelineEventKind::ReviewRequestRemoved,
                    _ => TimelineEventKind::Other,
                };
                if kind == TimelineEventKind::Other {
                    return None;
                }
                Some(TimelineEvent {
                    kind,
                    actor_login: e.actor.map(|a| a.login).unwrap_or_default(),
                    requested_reviewer_login: e.requested_reviewer.map(|u| u.login),
                    created_at: e.created_at,
                })
            })
            .collect())
    }

    async fn fetch_check_runs(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Vec<CheckRun>, CodeHostError> {
        let resp: GhCheckRunsResponse =
            self.get(&format!("/repos/{owner}/{repo}/commits/{sha}/check-runs")).await?;
        Ok(resp.check_runs.into_iter().map(CheckRun::from).collect())
    }

    async fn fetch_check_run_log(
        &self,
        owner: &str,
        repo: &str,
        run_id: i64,
    ) -> Result<Vec<u8>, CodeHostError> {
        let response = self
            .http
            .get(format!("{}/repos/{owner}/{repo}/actions/jobs/{run_id}/logs", self.base_url))
            .bearer_auth(&self.token)
            .header("User-Agent", "ralph-agent")
            .send()
            .await
            .map_err(|err| CodeHostError::Transient(err.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        classify_status(response.status())?;
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|err| CodeHostError::Transient(err.to_string()))
    }

    async fn post_pr_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), CodeHostError> {
        self.post_json(
            &format!("/repos/{owner}/{repo}/issues/{number}/comments"),
            serde_json::json!({ "body": body }),
        )
        .await
    }

    async fn post_review_reply(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        comment_id: i64,
        body: &str,
    ) -> Result<(), CodeHostError> {
        self.post_json(
            &format!("/repos/{owner}/{repo}/pulls/{number}/comments/{comment_id}/replies"),
            serde_json::json!({ "body": body }),
        )
        .await
    }

    async fn react_to_review_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: i64,
        reaction: &str,
    ) -> Result<(), CodeHostError> {
        self.post_json(
            &format!("/repos/{owner}/{repo}/pulls/comments/{comment_id}/reactions"),
            serde_json::json!({ "content": reaction }),
        )
        .await
    }

    async fn react_to_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: i64,
        reaction: &str,
    ) -> Result<(), CodeHostError> {
        self.post_json(
            &format!("/repos/{owner}/{repo}/issues/comments/{comment_id}/reactions"),
            serde_json::json!({ "content": reaction }),
        )
        .await
    }

    async fn create_pr(
        &self,
        owner: &str,
        repo: &str,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest, CodeHostError> {
        with_retry(self.retry_policy, CodeHostError::is_transient, || async {
            let response = self
                .http
                .post(format!("{}/repos/{owner}/{repo}/pulls", self.base_url))
                .bearer_auth(&self.token)
                .header("User-Agent", "ralph-agent")
                .json(&serde_json::json!({ "head": head, "base": base, "title": title, "body": body }))
                .send()
                .await
                .map_err(|err| CodeHostError::Transient(err.to_string()))?;
            let pr: GhPullRequest = classify_and_parse(response).await?;
            Ok(PullRequest {
                number: pr.number,
                head_sha: pr.head.sha,
                html_url: pr.html_url,
                title: pr.title,
                state: pr.state,
            })
        })
        .await
    }

    async fn find_open_pr(
        &self,
        owner: &str,
        repo: &str,
        head: &str,
        base: &str,
    ) -> Result<Option<PullRequest>, CodeHostError> {
        let prs: Vec<GhPullRequest> = self
            .get(&format!(
                "/repos/{owner}/{repo}/pulls?head={owner}:{head}&base={base}&state=open"
            ))
            .await?;
        Ok(prs.into_iter().next().map(|pr| PullRequest {
            number: pr.number,
            head_sha: pr.head.sha,
            html_url: pr.html_url,
            title: pr.title,
            state: pr.state,
        }))
    }
}
