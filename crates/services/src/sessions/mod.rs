mod plan;
mod progress;
mod service;
mod timer;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{SessionBuilder, SessionPlan};
pub use progress::SessionProgress;
pub use service::{AnswerFeedback, QuestionState, QuizSession};
pub use timer::{QuestionTimer, TickOutcome, TimerToken};
pub use workflow::{AdvanceResult, SessionLoopService};
