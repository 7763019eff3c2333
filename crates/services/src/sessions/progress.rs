/// Aggregated view of quiz progress, useful for UI.
///
/// `answered` and `score` are session-scoped; `mastered` counts active
/// questions with a durable mastery record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub position: usize,
    pub answered: usize,
    pub score: u32,
    pub mastered: usize,
}
