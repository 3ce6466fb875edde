//! Two-phase feedback capture state machine.
//!
//! While a session is active it owns the whole turn: the router must not run
//! classification or retrieval until the session returns to idle. The machine
//! itself is pure; persistence happens in the router when a turn yields
//! [`FeedbackOutcome::Submitted`].

pub const PROMPT_BODY: &str = "Sure! Understand that you have a feedback that you would like to \
     provide. Please enter your full feedback in the next message.";

pub const PROMPT_EMAIL: &str = "Got it. Now please provide your email address so we can follow \
     up. If you do not wish to submit feedback, reply with 'none'.";

pub const PROMPT_INVALID_EMAIL: &str = "Please provide a valid email address. If you do not wish \
     to submit feedback, reply with 'none'.";

pub const ACK_CANCELLED: &str = "Alright, no feedback submitted.";

pub const ACK_SUBMITTED: &str =
    "Thank you for your feedback. It has been submitted to the administrator.";

/// Reply used to cancel from the email phase, compared case-insensitively.
const CANCEL_WORD: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    AwaitingBody,
    AwaitingEmail { body: String },
}

/// What one consumed turn produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackOutcome {
    /// Body captured, now asking for the email.
    EmailRequested,
    /// Blank body; asking again without a state change.
    BodyReprompted,
    /// Reply had no "@"; asking again without a state change.
    InvalidEmail,
    /// User backed out; state reset, nothing persisted.
    Cancelled,
    /// Both parts captured; state reset, caller must persist the record.
    Submitted { body: String, email: String },
}

impl FeedbackOutcome {
    pub fn reply(&self) -> &'static str {
        match self {
            FeedbackOutcome::EmailRequested => PROMPT_EMAIL,
            FeedbackOutcome::BodyReprompted => PROMPT_BODY,
            FeedbackOutcome::InvalidEmail => PROMPT_INVALID_EMAIL,
            FeedbackOutcome::Cancelled => ACK_CANCELLED,
            FeedbackOutcome::Submitted { .. } => ACK_SUBMITTED,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedbackSession {
    phase: Phase,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle
    }
}

impl FeedbackSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// While active the session consumes every turn of its conversation.
    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Start the flow; returns the prompt asking for the feedback text.
    /// Only valid from idle - the router guards with `is_active` first.
    pub fn arm(&mut self) -> &'static str {
        self.phase = Phase::AwaitingBody;
        PROMPT_BODY
    }

    /// Consume one turn while active. Panics if called while idle; the
    /// router's precedence order makes that unreachable.
    pub fn advance(&mut self, utterance: &str) -> FeedbackOutcome {
        let reply = utterance.trim();
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => unreachable!("advance called on idle feedback session"),
            Phase::AwaitingBody => {
                if reply.is_empty() {
                    self.phase = Phase::AwaitingBody;
                    return FeedbackOutcome::BodyReprompted;
                }
                self.phase = Phase::AwaitingEmail {
                    body: reply.to_string(),
                };
                FeedbackOutcome::EmailRequested
            }
            Phase::AwaitingEmail { body } => {
                if reply.eq_ignore_ascii_case(CANCEL_WORD) {
                    return FeedbackOutcome::Cancelled;
                }
                if !reply.contains('@') {
                    self.phase = Phase::AwaitingEmail { body };
                    return FeedbackOutcome::InvalidEmail;
                }
                FeedbackOutcome::Submitted {
                    body,
                    email: reply.to_string(),
                }
            }
        }
    }
}
