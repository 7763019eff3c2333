use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::Question;

/// A per-presentation view of a question's options.
///
/// `mapping[slot]` is the canonical index shown at presentation `slot`; the
/// shuffled arrays are derived through that permutation. The canonical
/// question is never mutated, and a new `Presentation` replaces the previous
/// one whenever the current question changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    mapping: Vec<usize>,
    options: Vec<String>,
    correct_presentation_indices: Vec<usize>,
    explanations: Vec<String>,
    option_images: Vec<String>,
}

impl Presentation {
    /// Present `question`, shuffling options with an unbiased permutation.
    ///
    /// Two-option questions are exempt and keep their authored order, so
    /// binary (vrai/faux style) questions have stable positions.
    #[must_use]
    pub fn of<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Self {
        if question.options().len() == 2 {
            return Self::identity(question);
        }

        let mut mapping: Vec<usize> = (0..question.options().len()).collect();
        mapping.shuffle(rng);
        Self::from_mapping(question, mapping)
    }

    /// The identity presentation: options in canonical order.
    #[must_use]
    pub fn identity(question: &Question) -> Self {
        let mapping = (0..question.options().len()).collect();
        Self::from_mapping(question, mapping)
    }

    fn from_mapping(question: &Question, mapping: Vec<usize>) -> Self {
        let mut inverse = vec![0_usize; mapping.len()];
        for (slot, &canonical) in mapping.iter().enumerate() {
            inverse[canonical] = slot;
        }

        let options = mapping
            .iter()
            .map(|&canonical| question.options()[canonical].clone())
            .collect();
        let explanations = mapping
            .iter()
            .map(|&canonical| question.explanations()[canonical].clone())
            .collect();
        let option_images = mapping
            .iter()
            .map(|&canonical| question.option_images()[canonical].clone())
            .collect();

        let mut correct_presentation_indices: Vec<usize> = question
            .correct_options()
            .iter()
            .map(|&canonical| inverse[canonical])
            .collect();
        correct_presentation_indices.sort_unstable();

        Self {
            mapping,
            options,
            correct_presentation_indices,
            explanations,
            option_images,
        }
    }

    /// Number of presentation slots (same as the question's option count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Options in presentation order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Presentation slots holding a correct option, ascending.
    #[must_use]
    pub fn correct_presentation_indices(&self) -> &[usize] {
        &self.correct_presentation_indices
    }

    /// Explanations in presentation order.
    #[must_use]
    pub fn explanations(&self) -> &[String] {
        &self.explanations
    }

    /// Option images in presentation order.
    #[must_use]
    pub fn option_images(&self) -> &[String] {
        &self.option_images
    }

    /// The slot → canonical permutation.
    #[must_use]
    pub fn mapping(&self) -> &[usize] {
        &self.mapping
    }

    /// Translate a presentation slot back to its canonical index.
    #[must_use]
    pub fn canonical_index(&self, presentation_index: usize) -> Option<usize> {
        self.mapping.get(presentation_index).copied()
    }

    /// Translate a canonical index to the slot it is shown at.
    #[must_use]
    pub fn presentation_index(&self, canonical_index: usize) -> Option<usize> {
        self.mapping
            .iter()
            .position(|&canonical| canonical == canonical_index)
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.mapping.iter().enumerate().all(|(slot, &c)| slot == c)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionId, RawQuestionRecord};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn question_with_options(count: usize) -> Question {
        let mut raw = RawQuestionRecord {
            question_text: "Q".to_string(),
            ..RawQuestionRecord::default()
        };
        let texts = ["Alpha", "Beta", "Gamma", "Delta", "Epsilon"];
        let slots: [(&mut String, &mut String); 5] = [
            (&mut raw.choice_a_text, &mut raw.choice_a_explanation),
            (&mut raw.choice_b_text, &mut raw.choice_b_explanation),
            (&mut raw.choice_c_text, &mut raw.choice_c_explanation),
            (&mut raw.choice_d_text, &mut raw.choice_d_explanation),
            (&mut raw.choice_e_text, &mut raw.choice_e_explanation),
        ];
        for (index, (text, explanation)) in slots.into_iter().enumerate().take(count) {
            *text = texts[index].to_string();
            *explanation = format!("expl {index}");
        }
        raw.choice_a_is_correct = true;
        if count > 2 {
            raw.choice_c_is_correct = true;
        }
        Question::from_raw(QuestionId::from_dataset_index(0), &raw).unwrap()
    }

    #[test]
    fn two_option_questions_are_never_shuffled() {
        let question = question_with_options(2);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let presentation = Presentation::of(&question, &mut rng);
            assert!(presentation.is_identity());
        }
    }

    #[test]
    fn mapping_is_a_permutation() {
        let question = question_with_options(5);
        let mut rng = StdRng::seed_from_u64(7);
        let presentation = Presentation::of(&question, &mut rng);

        let mut seen = presentation.mapping().to_vec();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(presentation.len(), 5);
    }

    #[test]
    fn shuffled_views_follow_the_mapping() {
        let question = question_with_options(4);
        let mut rng = StdRng::seed_from_u64(11);
        let presentation = Presentation::of(&question, &mut rng);

        for slot in 0..presentation.len() {
            let canonical = presentation.canonical_index(slot).unwrap();
            assert_eq!(presentation.options()[slot], question.options()[canonical]);
            assert_eq!(
                presentation.explanations()[slot],
                question.explanations()[canonical]
            );
        }

        // Correct slots are exactly the slots showing a correct option.
        for slot in 0..presentation.len() {
            let canonical = presentation.canonical_index(slot).unwrap();
            assert_eq!(
                presentation.correct_presentation_indices().contains(&slot),
                question.is_correct_option(canonical)
            );
        }
    }

    #[test]
    fn translation_round_trips() {
        let question = question_with_options(5);
        let mut rng = StdRng::seed_from_u64(13);
        let presentation = Presentation::of(&question, &mut rng);

        for slot in 0..presentation.len() {
            let canonical = presentation.canonical_index(slot).unwrap();
            assert_eq!(presentation.presentation_index(canonical), Some(slot));
        }
    }

    #[test]
    fn shuffle_has_no_positional_bias() {
        // Each canonical option should land on each slot with roughly uniform
        // frequency. 4 options, 4000 presentations: 1000 expected per cell;
        // the bound is far beyond sampling noise for a seeded run.
        let question = question_with_options(4);
        let mut rng = StdRng::seed_from_u64(42);
        let runs = 4000_u32;
        let mut counts = [[0_u32; 4]; 4];

        for _ in 0..runs {
            let presentation = Presentation::of(&question, &mut rng);
            for (slot, &canonical) in presentation.mapping().iter().enumerate() {
                counts[slot][canonical] += 1;
            }
        }

        let expected = runs / 4;
        for slot in 0..4 {
            for canonical in 0..4 {
                let count = counts[slot][canonical];
                assert!(
                    count.abs_diff(expected) < 150,
                    "slot {slot} canonical {canonical}: {count} (expected ~{expected})"
                );
            }
        }
    }
}
