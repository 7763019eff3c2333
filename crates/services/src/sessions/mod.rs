mod evaluate;
mod filter;
mod presentation;
mod progress;
mod service;
mod workflow;

// Public API of the quiz session subsystem.
pub use evaluate::{Evaluation, OptionFeedback, evaluate, option_feedback};
pub use filter::{apply_filters, chapter_matches};
pub use presentation::Presentation;
pub use progress::QuizProgress;
pub use service::{Advance, QuizSession};
pub use workflow::QuizLoopService;
