//! Navigation state machine for one respondent's pass through a survey.
//!
//! The navigator is synchronous and owns all session state: the visited
//! path, the recorded answers, and the current [`NavigationState`]. The only
//! asynchronous step, posting the answers, happens outside: `advance()`
//! hands out a [`SubmissionRequest`] and the caller reports back through
//! [`SurveyNavigator::complete_submission`].
//!
//! # Invariants
//!
//! - `path` is never empty; its first element is the root node
//! - at most one submission ticket is in flight
//! - outcomes carrying any other ticket are dropped
//! - once detached, no operation changes state

use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::{
    build_submission, next_node, Answer, NavigationPhase, NavigationState, NodeSet, Respondent,
    SubmissionPayload, SubmissionReceipt, Survey, SurveyDefinition, SurveyError, SurveyNode,
};
use crate::domain::foundation::{
    NodeId, StateMachine, SubmissionTicket, Timestamp, ValidationError,
};

/// Default cap on the visited path, guarding against routing cycles.
pub const DEFAULT_MAX_PATH_LENGTH: usize = 256;

/// Shown after a successful submission when neither the server nor the
/// survey provides a message.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Thank you for your feedback!";

/// A submission the caller must send and then report back on.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    pub ticket: SubmissionTicket,
    pub payload: SubmissionPayload,
}

/// Result of a call to [`SurveyNavigator::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved to the given question node.
    Moved(NodeId),
    /// Reached a result node; carries its message.
    Finished(String),
    /// Current node is required and unanswered; nothing changed.
    Blocked(NodeId),
    /// End of survey; the request must be submitted.
    Submit(SubmissionRequest),
    /// Advancing is not possible in the current state.
    Ignored,
}

/// State machine walking a respondent through a survey's decision tree.
#[derive(Debug, Clone)]
pub struct SurveyNavigator {
    survey: Survey,
    nodes: NodeSet,
    respondent: Respondent,
    path: Vec<NodeId>,
    answers: BTreeMap<NodeId, Answer>,
    state: NavigationState,
    in_flight: Option<SubmissionTicket>,
    detached: bool,
    max_path_length: usize,
    started_at: Timestamp,
}

impl SurveyNavigator {
    /// Starts a session at the survey's root node.
    ///
    /// A root that carries a result message starts in `Terminal`.
    ///
    /// # Errors
    ///
    /// - `Empty` if the survey has no nodes
    pub fn new(definition: SurveyDefinition, respondent: Respondent) -> Result<Self, SurveyError> {
        let SurveyDefinition { survey, nodes } = definition;
        let nodes = NodeSet::new(nodes);

        let (root_id, state) = {
            let root = nodes.root().ok_or_else(|| SurveyError::Empty(survey.id.clone()))?;
            let state = match &root.result_message {
                Some(message) => NavigationState::Terminal(message.clone()),
                None => NavigationState::Active(root.id.clone()),
            };
            (root.id.clone(), state)
        };

        debug!(survey_id = %survey.id, root = %root_id, nodes = nodes.len(), "Survey session started");

        Ok(Self {
            survey,
            nodes,
            respondent,
            path: vec![root_id],
            answers: BTreeMap::new(),
            state,
            in_flight: None,
            detached: false,
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
            started_at: Timestamp::now(),
        })
    }

    /// Caps how many nodes a single pass may visit.
    pub fn with_max_path_length(mut self, max_path_length: usize) -> Self {
        self.max_path_length = max_path_length.max(1);
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn survey(&self) -> &Survey {
        &self.survey
    }

    pub fn nodes(&self) -> &NodeSet {
        &self.nodes
    }

    pub fn respondent(&self) -> &Respondent {
        &self.respondent
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Visited node ids; the last one is the current node.
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    pub fn answers(&self) -> &BTreeMap<NodeId, Answer> {
        &self.answers
    }

    pub fn answer_for(&self, node_id: &NodeId) -> Option<&Answer> {
        self.answers.get(node_id)
    }

    pub fn root_id(&self) -> &NodeId {
        &self.path[0]
    }

    pub fn current_node_id(&self) -> &NodeId {
        &self.path[self.path.len() - 1]
    }

    /// The node at the end of the path, or `None` if routing pointed at an
    /// id the survey does not contain.
    pub fn current_node(&self) -> Option<&SurveyNode> {
        self.nodes.get(self.current_node_id())
    }

    /// Number of nodes visited so far, the current one included.
    pub fn progress(&self) -> usize {
        self.path.len()
    }

    pub fn can_go_back(&self) -> bool {
        !self.detached
            && match self.state.phase() {
                NavigationPhase::Active => self.path.len() > 1,
                NavigationPhase::Failed => true,
                _ => false,
            }
    }

    /// Why the current node cannot be left yet. `Ok` when `advance()` would
    /// not return `Blocked`.
    pub fn check_current(&self) -> Result<(), ValidationError> {
        match self.current_node() {
            Some(node) => self.check_node(node),
            None => Ok(()),
        }
    }

    pub fn in_flight(&self) -> Option<SubmissionTicket> {
        self.in_flight
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Answers
    // ─────────────────────────────────────────────────────────────────────────

    /// Records or overwrites the answer for a node. Never changes state.
    pub fn answer(&mut self, node_id: NodeId, answer: impl Into<Answer>) {
        self.answers.insert(node_id, answer.into());
    }

    /// Removes a recorded answer, returning it.
    pub fn clear_answer(&mut self, node_id: &NodeId) -> Option<Answer> {
        self.answers.remove(node_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Moves past the current node.
    ///
    /// From `Failed` this resubmits. While `Submitting`, `Terminal` or
    /// `Submitted` it does nothing.
    pub fn advance(&mut self) -> Advance {
        if self.detached {
            return Advance::Ignored;
        }
        match self.state.phase() {
            NavigationPhase::Active => {}
            NavigationPhase::Failed => {
                return self
                    .begin_submission()
                    .map_or(Advance::Ignored, Advance::Submit)
            }
            phase => {
                debug!(%phase, "Advance ignored");
                return Advance::Ignored;
            }
        }

        let current = self.current_node_id().clone();
        let next = match self.nodes.get(&current) {
            None => {
                warn!(node_id = %current, "Current node is not part of the survey; ending survey");
                None
            }
            Some(node) => {
                if let Err(error) = self.check_node(node) {
                    debug!(node_id = %current, %error, "Advance blocked");
                    return Advance::Blocked(current);
                }
                next_node(node, self.answers.get(&current))
            }
        };

        match next {
            Some(next_id) if self.path.len() >= self.max_path_length => {
                warn!(
                    node_id = %next_id,
                    max_path_length = self.max_path_length,
                    "Path length limit reached; ending survey"
                );
                self.begin_submission()
                    .map_or(Advance::Ignored, Advance::Submit)
            }
            Some(next_id) => self.enter(next_id),
            None => self
                .begin_submission()
                .map_or(Advance::Ignored, Advance::Submit),
        }
    }

    /// Steps back to the previous node. No-op at the root and outside of
    /// answering.
    ///
    /// From `Failed` it reopens the node that was current when the
    /// submission started, without popping it.
    pub fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        if self.state.phase() == NavigationPhase::Active {
            self.path.pop();
        }
        let previous = self.current_node_id().clone();
        self.transition(NavigationState::Active(previous))
    }

    /// Submits the answers gathered before a result node.
    ///
    /// Only valid in `Terminal`.
    pub fn finish(&mut self) -> Option<SubmissionRequest> {
        if self.detached || self.state.phase() != NavigationPhase::Terminal {
            return None;
        }
        self.begin_submission()
    }

    /// Resubmits after a failure. Only valid in `Failed`.
    pub fn retry(&mut self) -> Option<SubmissionRequest> {
        if self.detached || self.state.phase() != NavigationPhase::Failed {
            return None;
        }
        self.begin_submission()
    }

    /// Applies the outcome of the submission identified by `ticket`.
    ///
    /// Returns false, leaving state untouched, when the ticket is not the
    /// one in flight or the navigator was detached.
    pub fn complete_submission(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<SubmissionReceipt, String>,
    ) -> bool {
        if self.detached
            || self.in_flight != Some(ticket)
            || self.state.phase() != NavigationPhase::Submitting
        {
            debug!(%ticket, "Ignoring stale submission outcome");
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(receipt) => {
                let message = receipt
                    .success_message
                    .filter(|m| !m.trim().is_empty())
                    .or_else(|| self.survey.success_message.clone())
                    .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());
                info!(survey_id = %self.survey.id, "Survey response submitted");
                self.transition(NavigationState::Submitted(message))
            }
            Err(error) => {
                warn!(survey_id = %self.survey.id, %error, "Survey response submission failed");
                self.transition(NavigationState::Failed(error))
            }
        }
    }

    /// Marks the hosting view as gone. Late outcomes are ignored and no
    /// further transitions happen.
    pub fn detach(&mut self) {
        if let Some(ticket) = self.in_flight.take() {
            debug!(%ticket, "Detached with submission in flight");
        }
        self.detached = true;
    }

    fn check_node(&self, node: &SurveyNode) -> Result<(), ValidationError> {
        match self.answers.get(&node.id) {
            Some(answer) if !answer.is_blank() => node.check_answer(answer),
            _ if node.is_required => Err(ValidationError::empty_field("answer")),
            _ => Ok(()),
        }
    }

    fn enter(&mut self, next_id: NodeId) -> Advance {
        self.path.push(next_id.clone());

        let result_message = match self.nodes.get(&next_id) {
            Some(node) => node.result_message.clone(),
            None => {
                warn!(node_id = %next_id, "Routed to a node the survey does not contain");
                None
            }
        };

        match result_message {
            Some(message) => {
                self.transition(NavigationState::Terminal(message.clone()));
                Advance::Finished(message)
            }
            None => {
                self.transition(NavigationState::Active(next_id.clone()));
                Advance::Moved(next_id)
            }
        }
    }

    fn begin_submission(&mut self) -> Option<SubmissionRequest> {
        if !self.transition(NavigationState::Submitting) {
            return None;
        }

        let ticket = SubmissionTicket::new();
        self.in_flight = Some(ticket);

        let payload = build_submission(
            &self.answers,
            &self.survey.id,
            &self.respondent.fingerprint,
            self.respondent.external_user_id.as_deref(),
            self.respondent.metadata.as_ref(),
        );
        debug!(
            survey_id = %self.survey.id,
            %ticket,
            answers = payload.answers.len(),
            "Submission assembled"
        );

        Some(SubmissionRequest { ticket, payload })
    }

    fn transition(&mut self, next: NavigationState) -> bool {
        match self.state.phase().transition_to(next.phase()) {
            Ok(_) => {
                debug!(from = %self.state.phase(), to = %next.phase(), "Navigation transition");
                self.state = next;
                true
            }
            Err(err) => {
                warn!(error = %err, "Rejected navigation transition");
                false
            }
        }
    }
}
