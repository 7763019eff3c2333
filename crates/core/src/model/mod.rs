mod chapter;
mod ids;
mod module;
mod question;
mod raw;
mod session_label;

pub use chapter::{Chapter, DEFAULT_CHAPTER_COLOR, UNCLASSIFIED_CHAPTER, extract_chapters};
pub use ids::{ChapterId, ModuleId, ParseIdError, QuestionId};
pub use module::ModuleEntry;
pub use question::{Question, QuestionValidationError};
pub use raw::{RawChoiceSlot, RawQuestionRecord};
pub use session_label::{SessionFilter, SessionLabel, available_sessions};
