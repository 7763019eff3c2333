use quiz_core::model::{Question, SessionFilter, UNCLASSIFIED_CHAPTER};

/// Whether a question belongs to the named chapter bucket.
///
/// Unlabeled questions belong to the [`UNCLASSIFIED_CHAPTER`] bucket, matching
/// chapter extraction.
#[must_use]
pub fn chapter_matches(question: &Question, chapter_name: &str) -> bool {
    question.chapter_name().unwrap_or(UNCLASSIFIED_CHAPTER) == chapter_name
}

/// Derive the active question subset from the sitting and chapter filters.
///
/// Output preserves the relative order of `all`.
#[must_use]
pub fn apply_filters(
    all: &[Question],
    session: &SessionFilter,
    chapter: Option<&str>,
) -> Vec<Question> {
    all.iter()
        .filter(|question| session.matches(question))
        .filter(|question| chapter.is_none_or(|name| chapter_matches(question, name)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionId, RawQuestionRecord, SessionLabel};

    fn question(index: usize, year: &str, chapter: &str) -> Question {
        let raw = RawQuestionRecord {
            question_text: format!("Question {index}"),
            year_asked: year.to_string(),
            subtopic: chapter.to_string(),
            choice_a_text: "Oui".to_string(),
            choice_a_is_correct: true,
            choice_b_text: "Non".to_string(),
            ..RawQuestionRecord::default()
        };
        Question::from_raw(QuestionId::from_dataset_index(index), &raw).unwrap()
    }

    #[test]
    fn all_sessions_with_no_chapter_keeps_everything() {
        let all = vec![
            question(0, "Février 2024", "Foie"),
            question(1, "Octobre 2023", "Pancréas"),
        ];
        let active = apply_filters(&all, &SessionFilter::AllSessions, None);
        assert_eq!(active, all);
    }

    #[test]
    fn filters_combine_and_preserve_order() {
        let all = vec![
            question(0, "Février 2024", "Foie"),
            question(1, "Février 2024", "Pancréas"),
            question(2, "Octobre 2023", "Foie"),
            question(3, "Février 2024", "Foie"),
        ];

        let filter = SessionFilter::Only(SessionLabel::new("Février 2024"));
        let active = apply_filters(&all, &filter, Some("Foie"));

        let ids: Vec<&str> = active.iter().map(|q| q.id().as_str()).collect();
        assert_eq!(ids, vec!["0", "3"]);
    }

    #[test]
    fn unlabeled_questions_match_the_unclassified_bucket() {
        let all = vec![question(0, "", ""), question(1, "", "Foie")];
        let active = apply_filters(&all, &SessionFilter::AllSessions, Some(UNCLASSIFIED_CHAPTER));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id().as_str(), "0");
    }
}
