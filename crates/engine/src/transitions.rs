// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds the [`TransitionRegistry`] every daemon engine loop drives an
//! issue through. Two of the six registered transitions are trivial
//! "pickup" steps with a [`NoopAction`](crate::actions::NoopAction): they
//! exist only so an issue that is merely queued for work shows up in its
//! working state (`refining`, `building`) the moment a poller notices it,
//! before the heavier action has actually run once.

use crate::actions::address_feedback::AddressFeedbackAction;
use crate::actions::build::BuildAction;
use crate::actions::fix_checks::FixChecksAction;
use crate::actions::refine::RefineAction;
use crate::actions::NoopAction;
use crate::deps::ActionDeps;
use ralph_core::{IssueState, Transition, TransitionRegistry};
use std::sync::Arc;

/// Registers every automatic transition the engine drives on its own —
/// i.e. every one that isn't gated on an external human action (approving
/// a plan) or a poller-observed remote event (merge, new review). Those
/// are constructed ad hoc by the daemon's pollers using the same
/// [`Transition::new`] constructor this module uses.
pub fn build_registry(deps: Arc<ActionDeps>) -> TransitionRegistry {
    let mut registry = TransitionRegistry::new();

    registry.register(Transition::new(
        IssueState::Queued,
        IssueState::Refining,
        Arc::new(NoopAction::new("pickup_refine")),
    ));
    registry.register(Transition::new(
        IssueState::Refining,
        IssueState::WaitingApproval,
        Arc::new(RefineAction::new(deps.clone())),
    ));
    registry.register(Transition::new(
        IssueState::Approved,
        IssueState::Building,
        Arc::new(NoopAction::new("pickup_build")),
    ));
    registry.register(Transition::new(
        IssueState::Building,
        IssueState::InReview,
        Arc::new(BuildAction::new(deps.clone())),
    ));
    registry.register(Transition::new(
        IssueState::AddressingFeedback,
        IssueState::InReview,
        Arc::new(AddressFeedbackAction::new(deps.clone())),
    ));
    registry.register(Transition::new(
        IssueState::FixingChecks,
        IssueState::InReview,
        Arc::new(FixChecksAction::new(deps)),
    ));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use ralph_adapters::fakes::{FakeAgentDriver, FakeCodeHost, FakeGitOps, FakeIssueTracker};
    use ralph_core::{Clock, IssueBuilder, SystemClock};

    fn test_deps() -> Arc<ActionDeps> {
        Arc::new(ActionDeps::new(
            Arc::new(FakeCodeHost::new()),
            Arc::new(FakeIssueTracker::new()),
            Arc::new(FakeAgentDriver::with_response("")),
            Arc::new(FakeGitOps::new()),
            Arc::new(crate::config::StaticConfigLoader(Default::default())),
            Arc::new(SystemClock) as Arc<dyn Clock>,
        ))
    }

    #[test]
    fn every_working_state_has_a_registered_transition() {
        let registry = build_registry(test_deps());
        for state in [
            IssueState::Queued,
            IssueState::Refining,
            IssueState::Approved,
            IssueState::Building,
            IssueState::AddressingFeedback,
            IssueState::FixingChecks,
        ] {
            let issue = IssueBuilder::default().state(state).build();
            assert!(registry.evaluate(&issue).is_some(), "no transition registered for {state:?}");
        }
    }

    #[test]
    fn terminal_and_externally_driven_states_have_no_automatic_transition() {
        let registry = build_registry(test_deps());
        for state in [
            IssueState::WaitingApproval,
            IssueState::InReview,
            IssueState::Paused,
            IssueState::Completed,
            IssueState::Failed,
        ] {
            let issue = IssueBuilder::default().state(state).build();
            assert!(registry.evaluate(&issue).is_none(), "unexpected transition registered for {state:?}");
        }
    }
}
