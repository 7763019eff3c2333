use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::question::Question;

/// An exam sitting label attached to a question, e.g. "Février 2024".
///
/// Unrelated to a quiz-taking session: this is the year/month the question
/// was originally asked. Ordering is chronological; labels that cannot be
/// parsed sort before every dated one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionLabel(String);

impl SessionLabel {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the label into `(year, month)` for chronological ordering.
    ///
    /// Recognizes "<french month> <year>" and bare "<year>"; anything else
    /// maps to `(0, 0)`.
    fn sort_key(&self) -> (u32, u32) {
        let lowered = self.0.to_lowercase();
        let mut parts = lowered.split_whitespace();

        match (parts.next(), parts.next(), parts.next()) {
            (Some(month), Some(year), None) => {
                let month = french_month_number(month).unwrap_or(0);
                let year = year.parse::<u32>().unwrap_or(0);
                (year, month)
            }
            (Some(year), None, None) => (year.parse::<u32>().unwrap_or(0), 0),
            _ => (0, 0),
        }
    }
}

fn french_month_number(name: &str) -> Option<u32> {
    let number = match name {
        "janvier" => 1,
        "février" | "fevrier" => 2,
        "mars" => 3,
        "avril" => 4,
        "mai" => 5,
        "juin" => 6,
        "juillet" => 7,
        "août" | "aout" => 8,
        "septembre" => 9,
        "octobre" => 10,
        "novembre" => 11,
        "décembre" | "decembre" => 12,
        _ => return None,
    };
    Some(number)
}

impl Ord for SessionLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for SessionLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SessionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The sitting filter applied to a module's question list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionFilter {
    /// The "Toutes les sessions" sentinel: no sitting restriction.
    #[default]
    AllSessions,
    /// Restrict to questions from one sitting.
    Only(SessionLabel),
}

impl SessionFilter {
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, SessionFilter::AllSessions)
    }

    /// Whether a question passes this filter.
    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        match self {
            SessionFilter::AllSessions => true,
            SessionFilter::Only(label) => question.session() == Some(label),
        }
    }
}

/// Distinct sitting labels across `questions`, newest first.
#[must_use]
pub fn available_sessions(questions: &[Question]) -> Vec<SessionLabel> {
    let mut sessions: Vec<SessionLabel> = Vec::new();
    for question in questions {
        if let Some(label) = question.session() {
            if !sessions.contains(label) {
                sessions.push(label.clone());
            }
        }
    }
    sessions.sort_by(|a, b| b.cmp(a));
    sessions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::QuestionId;
    use crate::model::raw::RawQuestionRecord;

    fn question(index: usize, year_asked: &str) -> Question {
        let raw = RawQuestionRecord {
            question_text: format!("Question {index}"),
            year_asked: year_asked.to_string(),
            choice_a_text: "Oui".to_string(),
            choice_a_is_correct: true,
            choice_b_text: "Non".to_string(),
            ..RawQuestionRecord::default()
        };
        Question::from_raw(QuestionId::from_dataset_index(index), &raw).unwrap()
    }

    #[test]
    fn orders_by_year_then_month() {
        let older = SessionLabel::new("Octobre 2023");
        let newer = SessionLabel::new("Février 2024");
        assert!(older < newer);

        let early = SessionLabel::new("Février 2024");
        let late = SessionLabel::new("Octobre 2024");
        assert!(early < late);
    }

    #[test]
    fn year_only_labels_parse() {
        let bare = SessionLabel::new("2022");
        let dated = SessionLabel::new("Janvier 2022");
        assert!(bare < dated);
    }

    #[test]
    fn unparseable_labels_sort_first() {
        let odd = SessionLabel::new("Session spéciale");
        let dated = SessionLabel::new("Janvier 2020");
        assert!(odd < dated);
    }

    #[test]
    fn available_sessions_are_deduped_newest_first() {
        let questions = vec![
            question(0, "Octobre 2023"),
            question(1, "Février 2024"),
            question(2, "Octobre 2023"),
            question(3, ""),
        ];

        let sessions = available_sessions(&questions);
        assert_eq!(
            sessions,
            vec![
                SessionLabel::new("Février 2024"),
                SessionLabel::new("Octobre 2023"),
            ]
        );
    }

    #[test]
    fn filter_matches_by_label() {
        let q = question(0, "Février 2024");
        assert!(SessionFilter::AllSessions.matches(&q));
        assert!(SessionFilter::Only(SessionLabel::new("Février 2024")).matches(&q));
        assert!(!SessionFilter::Only(SessionLabel::new("Octobre 2023")).matches(&q));
    }
}
