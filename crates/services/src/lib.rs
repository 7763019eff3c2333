#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod dataset;
pub mod error;
pub mod navigator;
pub mod progress;
pub mod question_store;
pub mod reporter;
pub mod sessions;

pub use app_services::AppServices;
pub use catalog::ModuleCatalog;
pub use dataset::{DatasetLoader, FsDatasetLoader, HttpDatasetLoader, StaticDatasetLoader};
pub use error::{AppServicesError, DatasetError, ProgressError};
pub use navigator::{Navigator, NoopNavigator, RecordingNavigator, Route};
pub use progress::{MasteryMap, ProgressService};
pub use question_store::{LoadedModule, QuestionStore};
pub use reporter::{Anomaly, AnomalyKind, CapturingReporter, ErrorReporter, TracingReporter};
pub use sessions::{
    Advance, Evaluation, OptionFeedback, Presentation, QuizLoopService, QuizProgress, QuizSession,
};
