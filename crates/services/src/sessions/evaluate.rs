use quiz_core::model::Question;

use super::presentation::Presentation;

/// Outcome of scoring one answer.
///
/// `canonical_selected` holds the user's selection translated back to
/// canonical indices, ascending and deduplicated — the shape the revealed
/// view renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub is_fully_correct: bool,
    pub canonical_selected: Vec<usize>,
}

/// Score a selection made in presentation space.
///
/// Returns `None` for an empty selection: revealing without a selection is a
/// refused no-op, not an error. Correctness is exact set equality between the
/// canonical selection and the question's correct set — there is no partial
/// credit.
#[must_use]
pub fn evaluate(
    question: &Question,
    selected_presentation: &[usize],
    presentation: &Presentation,
) -> Option<Evaluation> {
    if selected_presentation.is_empty() {
        return None;
    }

    let mut canonical_selected: Vec<usize> = selected_presentation
        .iter()
        .filter_map(|&slot| presentation.canonical_index(slot))
        .collect();
    canonical_selected.sort_unstable();
    canonical_selected.dedup();

    let is_fully_correct = canonical_selected.as_slice() == question.correct_options();

    Some(Evaluation {
        is_fully_correct,
        canonical_selected,
    })
}

/// Display state of one option after reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionFeedback {
    /// Correct and selected.
    SelectedCorrect,
    /// Correct but not selected.
    MissedCorrect,
    /// Selected but incorrect.
    SelectedIncorrect,
    /// Neither correct nor selected.
    Neutral,
}

/// Classify one option's post-reveal feedback from canonical correctness and
/// canonical selection.
#[must_use]
pub fn option_feedback(
    question: &Question,
    canonical_selected: &[usize],
    canonical_index: usize,
) -> OptionFeedback {
    let correct = question.is_correct_option(canonical_index);
    let selected = canonical_selected.contains(&canonical_index);
    match (correct, selected) {
        (true, true) => OptionFeedback::SelectedCorrect,
        (true, false) => OptionFeedback::MissedCorrect,
        (false, true) => OptionFeedback::SelectedIncorrect,
        (false, false) => OptionFeedback::Neutral,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionId, RawQuestionRecord};

    /// Four options; canonical 0 and 2 are correct.
    fn question() -> Question {
        let raw = RawQuestionRecord {
            question_text: "Q".to_string(),
            choice_a_text: "Alpha".to_string(),
            choice_a_is_correct: true,
            choice_b_text: "Beta".to_string(),
            choice_c_text: "Gamma".to_string(),
            choice_c_is_correct: true,
            choice_d_text: "Delta".to_string(),
            ..RawQuestionRecord::default()
        };
        Question::from_raw(QuestionId::from_dataset_index(0), &raw).unwrap()
    }

    fn identity(question: &Question) -> Presentation {
        Presentation::identity(question)
    }

    #[test]
    fn empty_selection_refuses() {
        let q = question();
        assert_eq!(evaluate(&q, &[], &identity(&q)), None);
    }

    #[test]
    fn exact_set_equality_is_correct() {
        let q = question();
        let evaluation = evaluate(&q, &[0, 2], &identity(&q)).unwrap();
        assert!(evaluation.is_fully_correct);
        assert_eq!(evaluation.canonical_selected, vec![0, 2]);
    }

    #[test]
    fn subset_and_superset_are_incorrect() {
        let q = question();
        let presentation = identity(&q);

        assert!(!evaluate(&q, &[0], &presentation).unwrap().is_fully_correct);
        assert!(
            !evaluate(&q, &[0, 2, 3], &presentation)
                .unwrap()
                .is_fully_correct
        );
        assert!(
            !evaluate(&q, &[1, 3], &presentation)
                .unwrap()
                .is_fully_correct
        );
    }

    #[test]
    fn selection_translates_through_a_permutation() {
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let q = question();
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..20 {
            let presentation = Presentation::of(&q, &mut rng);

            // Selecting exactly the slots that show canonical {0, 2} is
            // fully correct regardless of the permutation.
            let slots: Vec<usize> = [0, 2]
                .iter()
                .map(|&canonical| presentation.presentation_index(canonical).unwrap())
                .collect();
            let evaluation = evaluate(&q, &slots, &presentation).unwrap();
            assert!(evaluation.is_fully_correct);
            assert_eq!(evaluation.canonical_selected, vec![0, 2]);

            // Any other slot set is not.
            let wrong: Vec<usize> = [0, 1]
                .iter()
                .map(|&canonical| presentation.presentation_index(canonical).unwrap())
                .collect();
            assert!(!evaluate(&q, &wrong, &presentation).unwrap().is_fully_correct);
        }
    }

    #[test]
    fn duplicate_selection_entries_collapse() {
        let q = question();
        let evaluation = evaluate(&q, &[0, 0, 2], &identity(&q)).unwrap();
        assert!(evaluation.is_fully_correct);
        assert_eq!(evaluation.canonical_selected, vec![0, 2]);
    }

    #[test]
    fn feedback_distinguishes_all_four_states() {
        let q = question();
        // Selected canonical {0, 3}: 0 correct+selected, 2 correct+missed,
        // 3 selected+incorrect, 1 neutral.
        let selected = vec![0, 3];

        assert_eq!(
            option_feedback(&q, &selected, 0),
            OptionFeedback::SelectedCorrect
        );
        assert_eq!(
            option_feedback(&q, &selected, 2),
            OptionFeedback::MissedCorrect
        );
        assert_eq!(
            option_feedback(&q, &selected, 3),
            OptionFeedback::SelectedIncorrect
        );
        assert_eq!(option_feedback(&q, &selected, 1), OptionFeedback::Neutral);
    }
}
