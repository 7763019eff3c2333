#![forbid(unsafe_code)]

pub mod model;

pub use model::{
    Chapter, ChapterId, ModuleEntry, ModuleId, Question, QuestionId, QuestionValidationError,
    RawChoiceSlot, RawQuestionRecord, SessionFilter, SessionLabel,
};
