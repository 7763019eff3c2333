use std::collections::{HashMap, HashSet};
use std::fmt;

use rand::Rng;

use quiz_core::model::{
    Chapter, ModuleId, Question, SessionFilter, SessionLabel, extract_chapters,
};

use crate::progress::MasteryMap;
use crate::question_store::LoadedModule;

use super::evaluate::{Evaluation, evaluate};
use super::filter::{apply_filters, chapter_matches};
use super::presentation::Presentation;
use super::progress::QuizProgress;

/// Result of moving past the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next question.
    Moved,
    /// Already at the last question; the sitting is over.
    Completed,
}

/// In-memory state machine for one module's quiz view.
///
/// Owned exclusively by the active view and discarded on navigation away;
/// only the mastery map it carries outlives it (via the progress service).
pub struct QuizSession {
    module_id: ModuleId,
    all_questions: Vec<Question>,
    full_chapters: Vec<Chapter>,
    available_sessions: Vec<SessionLabel>,
    questions: Vec<Question>,
    chapters: Vec<Chapter>,
    session_filter: SessionFilter,
    chapter_filter: Option<String>,
    current: usize,
    selected: Vec<usize>,
    revealed: bool,
    score: u32,
    answered: HashSet<usize>,
    strikethrough: HashMap<usize, HashSet<usize>>,
    presentation: Option<Presentation>,
    last_evaluation: Option<Evaluation>,
    mastery: MasteryMap,
    reset_pending: bool,
}

impl QuizSession {
    /// An empty session for `module_id`, before (or instead of) data arrival.
    #[must_use]
    pub fn new(module_id: ModuleId) -> Self {
        Self {
            module_id,
            all_questions: Vec::new(),
            full_chapters: Vec::new(),
            available_sessions: Vec::new(),
            questions: Vec::new(),
            chapters: Vec::new(),
            session_filter: SessionFilter::AllSessions,
            chapter_filter: None,
            current: 0,
            selected: Vec::new(),
            revealed: false,
            score: 0,
            answered: HashSet::new(),
            strikethrough: HashMap::new(),
            presentation: None,
            last_evaluation: None,
            mastery: MasteryMap::new(),
            reset_pending: false,
        }
    }

    /// Install a load result into this session.
    ///
    /// Guarded by module id: a result for a different module than this
    /// session's is discarded silently and `false` is returned, so a load
    /// resolving after the user moved on cannot leak into the wrong view.
    pub fn install<R: Rng + ?Sized>(
        &mut self,
        loaded: &LoadedModule,
        mastery: MasteryMap,
        rng: &mut R,
    ) -> bool {
        if loaded.module_id() != self.module_id {
            return false;
        }

        self.all_questions = loaded.questions().to_vec();
        self.full_chapters = loaded.chapters().to_vec();
        self.available_sessions = loaded.sessions().to_vec();
        self.mastery = mastery;
        self.session_filter = SessionFilter::AllSessions;
        self.chapter_filter = None;
        self.refresh_active(rng);
        true
    }

    //
    // ─── FILTERS ───────────────────────────────────────────────────────────────
    //

    /// Apply a sitting filter. Selecting a concrete sitting also clears the
    /// chapter filter, since chapters are only meaningful per view scope.
    pub fn set_session_filter<R: Rng + ?Sized>(&mut self, filter: SessionFilter, rng: &mut R) {
        self.session_filter = filter;
        self.chapter_filter = None;
        self.refresh_active(rng);
    }

    /// Toggle the chapter filter: selecting the active chapter again clears
    /// it and restores the session-filtered list.
    pub fn select_chapter<R: Rng + ?Sized>(&mut self, chapter_name: &str, rng: &mut R) {
        if self.chapter_filter.as_deref() == Some(chapter_name) {
            self.chapter_filter = None;
        } else {
            self.chapter_filter = Some(chapter_name.to_string());
        }
        self.refresh_active(rng);
    }

    pub fn clear_chapter_filter<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.chapter_filter = None;
        self.refresh_active(rng);
    }

    /// Recompute the active subset and reset positional state.
    ///
    /// The chapter list shown alongside the questions reflects the sitting
    /// scope: the cached full-module list in the all-sessions view, a
    /// recomputed list from the filtered subset otherwise. Strikethrough
    /// annotations are positional, so they never survive a filter change.
    fn refresh_active<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let session_scope = apply_filters(&self.all_questions, &self.session_filter, None);
        self.chapters = if self.session_filter.is_all() {
            self.full_chapters.clone()
        } else {
            extract_chapters(&session_scope)
        };
        self.questions = match self.chapter_filter.as_deref() {
            Some(name) => session_scope
                .into_iter()
                .filter(|question| chapter_matches(question, name))
                .collect(),
            None => session_scope,
        };

        self.current = 0;
        self.selected.clear();
        self.revealed = false;
        self.last_evaluation = None;
        self.strikethrough.clear();
        self.present_current(rng);
    }

    //
    // ─── SELECTION ─────────────────────────────────────────────────────────────
    //

    /// Toggle the option at `presentation_index` while composing an answer.
    ///
    /// Multi-select: toggles membership. Single-select: clicking the sole
    /// selected option clears the selection, clicking another replaces it.
    /// Ignored once the answer is revealed.
    pub fn toggle_selection(&mut self, presentation_index: usize) {
        if self.revealed {
            return;
        }
        let Some(question) = self.questions.get(self.current) else {
            return;
        };
        if presentation_index >= question.options().len() {
            return;
        }

        if question.is_multiple_choice() {
            if let Some(position) = self
                .selected
                .iter()
                .position(|&slot| slot == presentation_index)
            {
                self.selected.remove(position);
            } else {
                self.selected.push(presentation_index);
            }
        } else if self.selected.contains(&presentation_index) {
            self.selected.clear();
        } else {
            self.selected = vec![presentation_index];
        }
    }

    /// Toggle the strikethrough annotation on a presentation slot.
    ///
    /// Annotations are keyed by the question's position in the active list
    /// and are purely positional.
    pub fn toggle_strikethrough(&mut self, presentation_index: usize) {
        let Some(question) = self.questions.get(self.current) else {
            return;
        };
        if presentation_index >= question.options().len() {
            return;
        }

        let slots = self.strikethrough.entry(self.current).or_default();
        if !slots.remove(&presentation_index) {
            slots.insert(presentation_index);
        }
    }

    #[must_use]
    pub fn is_struck(&self, presentation_index: usize) -> bool {
        self.strikethrough
            .get(&self.current)
            .is_some_and(|slots| slots.contains(&presentation_index))
    }

    /// Struck slots translated to canonical indices for the revealed view.
    #[must_use]
    pub fn struck_canonical_indices(&self) -> Vec<usize> {
        let Some(presentation) = self.presentation.as_ref() else {
            return Vec::new();
        };
        let Some(slots) = self.strikethrough.get(&self.current) else {
            return Vec::new();
        };
        let mut canonical: Vec<usize> = slots
            .iter()
            .filter_map(|&slot| presentation.canonical_index(slot))
            .collect();
        canonical.sort_unstable();
        canonical
    }

    //
    // ─── REVEAL ────────────────────────────────────────────────────────────────
    //

    /// Reveal the answer for the current question and score the selection.
    ///
    /// Refuses (returns `None`) when the selection is empty or the answer is
    /// already revealed. A fully correct answer increments the session score
    /// and marks the question mastered in memory; the caller persists the
    /// mastery write-through. The question counts as answered this session
    /// either way.
    ///
    /// Revealing also re-presents the current question; scoring always uses
    /// the mapping captured before the refresh.
    pub fn reveal<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Evaluation> {
        if self.revealed {
            return None;
        }
        let question = self.questions.get(self.current)?;
        let presentation = self.presentation.as_ref()?;
        let evaluation = evaluate(question, &self.selected, presentation)?;

        if evaluation.is_fully_correct {
            self.score += 1;
            self.mastery.mark(self.module_id, question.id());
        }
        self.answered.insert(self.current);
        self.revealed = true;
        self.last_evaluation = Some(evaluation.clone());
        self.present_current(rng);

        Some(evaluation)
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Move to the next question, or report completion at the end.
    pub fn next_question<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Advance {
        if self.current + 1 >= self.questions.len() {
            return Advance::Completed;
        }
        self.current += 1;
        self.enter_current(rng);
        Advance::Moved
    }

    /// Move back one question. Returns false at the first question.
    pub fn previous_question<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        self.enter_current(rng);
        true
    }

    fn enter_current<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.selected.clear();
        self.revealed = false;
        self.last_evaluation = None;
        // Annotations from an earlier visit to this position are stale.
        self.strikethrough.remove(&self.current);
        self.present_current(rng);
    }

    fn present_current<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.presentation = self
            .questions
            .get(self.current)
            .map(|question| Presentation::of(question, rng));
    }

    //
    // ─── RESET ─────────────────────────────────────────────────────────────────
    //

    /// First step of the two-step progress reset.
    pub fn request_reset(&mut self) {
        self.reset_pending = true;
    }

    pub fn cancel_reset(&mut self) {
        self.reset_pending = false;
    }

    #[must_use]
    pub fn reset_requested(&self) -> bool {
        self.reset_pending
    }

    /// Clear in-memory mastery after the durable record was removed.
    pub(crate) fn apply_reset(&mut self) {
        self.mastery.clear();
        self.reset_pending = false;
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn module_id(&self) -> ModuleId {
        self.module_id
    }

    /// Active (filtered) questions.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Chapter list for the current sitting scope.
    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Distinct sitting labels for the module, newest first.
    #[must_use]
    pub fn available_sessions(&self) -> &[SessionLabel] {
        &self.available_sessions
    }

    #[must_use]
    pub fn session_filter(&self) -> &SessionFilter {
        &self.session_filter
    }

    #[must_use]
    pub fn chapter_filter(&self) -> Option<&str> {
        self.chapter_filter.as_deref()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn presentation(&self) -> Option<&Presentation> {
        self.presentation.as_ref()
    }

    /// Selected presentation slots, in click order.
    #[must_use]
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn last_evaluation(&self) -> Option<&Evaluation> {
        self.last_evaluation.as_ref()
    }

    #[must_use]
    pub fn mastery(&self) -> &MasteryMap {
        &self.mastery
    }

    /// Whether a question has a durable mastery record.
    #[must_use]
    pub fn is_mastered(&self, question: &Question) -> bool {
        self.mastery.contains(self.module_id, question.id())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.questions.len();
        QuizProgress {
            total,
            position: if total == 0 { 0 } else { self.current + 1 },
            answered: self.answered.len(),
            score: self.score,
            mastered: self
                .questions
                .iter()
                .filter(|question| self.is_mastered(question))
                .count(),
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("module_id", &self.module_id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("session_filter", &self.session_filter)
            .field("chapter_filter", &self.chapter_filter)
            .field("revealed", &self.revealed)
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
