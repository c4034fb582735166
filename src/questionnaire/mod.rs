//! The quote questionnaire core: step definitions, answers, the reducer,
//! undo/redo history, validation, and pricing.

pub mod answer;
pub mod history;
pub mod pricing;
pub mod question;
pub mod state;
pub mod validate;

pub use answer::Answer;
pub use history::{HistoryStack, DEFAULT_HISTORY_LIMIT};
pub use pricing::{estimate_cost, QuoteResult, BASE_COST};
pub use question::{Question, QuestionKind, TOTAL_STEPS};
pub use state::{Action, AnswerMap, CheckpointPolicy, QuestionnaireState, Snapshot};
pub use validate::is_step_complete;
