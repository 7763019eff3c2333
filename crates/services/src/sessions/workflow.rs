use std::sync::Arc;

use quiz_core::model::{ModuleId, SessionFilter};

use crate::catalog::ModuleCatalog;
use crate::navigator::{Navigator, Route};
use crate::progress::ProgressService;
use crate::question_store::QuestionStore;
use crate::reporter::{AnomalyKind, ErrorReporter};

use super::evaluate::Evaluation;
use super::service::{Advance, QuizSession};

/// Orchestrates module opening, answer persistence and completion routing.
///
/// The session value itself stays synchronous and in-memory; this service
/// owns every collaborator that crosses an async or durable boundary.
#[derive(Clone)]
pub struct QuizLoopService {
    catalog: ModuleCatalog,
    questions: Arc<QuestionStore>,
    progress: Arc<ProgressService>,
    navigator: Arc<dyn Navigator>,
    reporter: Arc<dyn ErrorReporter>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        catalog: ModuleCatalog,
        questions: Arc<QuestionStore>,
        progress: Arc<ProgressService>,
        navigator: Arc<dyn Navigator>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            catalog,
            questions,
            progress,
            navigator,
            reporter,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    /// Open a quiz session for `module_id`.
    ///
    /// An unknown module or failed load is reported and yields an empty
    /// session (the view renders "module non trouvé"); it never hangs or
    /// panics. Durable mastery is loaded alongside the questions.
    pub async fn open_module(&self, module_id: ModuleId) -> QuizSession {
        let mut session = QuizSession::new(module_id);

        let Some(entry) = self.catalog.get(module_id) else {
            self.reporter.report(
                AnomalyKind::DatasetUnavailable,
                "unknown module id",
                &format!("module {module_id}"),
            );
            return session;
        };

        match self.questions.load_module(entry).await {
            Ok(loaded) => {
                let mastery = self.progress.load(module_id).await;
                session.install(&loaded, mastery, &mut rand::rng());
            }
            Err(err) => {
                self.reporter.report(
                    AnomalyKind::DatasetUnavailable,
                    &err.to_string(),
                    &format!("module {module_id}"),
                );
            }
        }

        session
    }

    /// Reveal and score the current question, persisting mastery on a fully
    /// correct answer.
    ///
    /// Returns `None` when the session refuses to reveal (empty selection or
    /// already revealed). A storage failure during the write-through is
    /// reported and the session continues with its in-memory state.
    pub async fn reveal_current(&self, session: &mut QuizSession) -> Option<Evaluation> {
        let question_id = session.current_question().map(|q| q.id().clone())?;
        let evaluation = session.reveal(&mut rand::rng())?;

        if evaluation.is_fully_correct {
            if let Err(err) = self
                .progress
                .record_correct(session.module_id(), &question_id)
                .await
            {
                self.reporter.report(
                    AnomalyKind::StorageUnavailable,
                    &err.to_string(),
                    &format!("module {}", session.module_id()),
                );
            }
        }

        Some(evaluation)
    }

    /// Advance to the next question; completing the list routes back to the
    /// dashboard.
    pub fn advance(&self, session: &mut QuizSession) -> Advance {
        let advance = session.next_question(&mut rand::rng());
        if advance == Advance::Completed {
            self.navigator.navigate(Route::Dashboard);
        }
        advance
    }

    pub fn go_back(&self, session: &mut QuizSession) -> bool {
        session.previous_question(&mut rand::rng())
    }

    //
    // ─── FILTERS ───────────────────────────────────────────────────────────────
    //

    pub fn set_session_filter(&self, session: &mut QuizSession, filter: SessionFilter) {
        session.set_session_filter(filter, &mut rand::rng());
    }

    pub fn select_chapter(&self, session: &mut QuizSession, chapter_name: &str) {
        session.select_chapter(chapter_name, &mut rand::rng());
    }

    pub fn clear_chapter_filter(&self, session: &mut QuizSession) {
        session.clear_chapter_filter(&mut rand::rng());
    }

    //
    // ─── RESET ─────────────────────────────────────────────────────────────────
    //

    /// First step of the reset: nothing is cleared until confirmation.
    pub fn request_reset(&self, session: &mut QuizSession) {
        session.request_reset();
    }

    pub fn cancel_reset(&self, session: &mut QuizSession) {
        session.cancel_reset();
    }

    /// Second step: remove the module's durable record, then clear the
    /// in-memory mastery. Other modules' progress is untouched. A storage
    /// failure is reported and leaves state intact so the user can retry.
    pub async fn confirm_reset(&self, session: &mut QuizSession) {
        if !session.reset_requested() {
            return;
        }

        match self.progress.reset(session.module_id()).await {
            Ok(()) => session.apply_reset(),
            Err(err) => self.reporter.report(
                AnomalyKind::StorageUnavailable,
                &err.to_string(),
                &format!("module {}", session.module_id()),
            ),
        }
    }
}
