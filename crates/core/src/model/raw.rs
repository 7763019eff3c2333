use serde::{Deserialize, Serialize};

/// A question record as authored in a module dataset.
///
/// Datasets carry exactly five lettered choice slots; unused slots have blank
/// text. This shape mirrors persisted data so normalization rules stay out of
/// the canonical [`Question`](crate::model::Question) type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawQuestionRecord {
    #[serde(rename = "YearAsked")]
    pub year_asked: String,
    #[serde(rename = "Subtopic")]
    pub subtopic: String,
    #[serde(rename = "QuestionText")]
    pub question_text: String,
    #[serde(rename = "QuestionImage")]
    pub question_image: Option<String>,

    #[serde(rename = "Choice_A_Text")]
    pub choice_a_text: String,
    #[serde(rename = "Choice_A_isCorrect")]
    pub choice_a_is_correct: bool,
    #[serde(rename = "Choice_A_Explanation")]
    pub choice_a_explanation: String,
    #[serde(rename = "Choice_A_Image")]
    pub choice_a_image: Option<String>,

    #[serde(rename = "Choice_B_Text")]
    pub choice_b_text: String,
    #[serde(rename = "Choice_B_isCorrect")]
    pub choice_b_is_correct: bool,
    #[serde(rename = "Choice_B_Explanation")]
    pub choice_b_explanation: String,
    #[serde(rename = "Choice_B_Image")]
    pub choice_b_image: Option<String>,

    #[serde(rename = "Choice_C_Text")]
    pub choice_c_text: String,
    #[serde(rename = "Choice_C_isCorrect")]
    pub choice_c_is_correct: bool,
    #[serde(rename = "Choice_C_Explanation")]
    pub choice_c_explanation: String,
    #[serde(rename = "Choice_C_Image")]
    pub choice_c_image: Option<String>,

    #[serde(rename = "Choice_D_Text")]
    pub choice_d_text: String,
    #[serde(rename = "Choice_D_isCorrect")]
    pub choice_d_is_correct: bool,
    #[serde(rename = "Choice_D_Explanation")]
    pub choice_d_explanation: String,
    #[serde(rename = "Choice_D_Image")]
    pub choice_d_image: Option<String>,

    #[serde(rename = "Choice_E_Text")]
    pub choice_e_text: String,
    #[serde(rename = "Choice_E_isCorrect")]
    pub choice_e_is_correct: bool,
    #[serde(rename = "Choice_E_Explanation")]
    pub choice_e_explanation: String,
    #[serde(rename = "Choice_E_Image")]
    pub choice_e_image: Option<String>,

    #[serde(rename = "OverallExplanation")]
    pub overall_explanation: String,
    #[serde(rename = "IsChapterStart")]
    pub is_chapter_start: bool,
    #[serde(rename = "ChapterName")]
    pub chapter_name: Option<String>,
    #[serde(rename = "ChapterColor")]
    pub chapter_color: Option<String>,
    #[serde(rename = "Confirmed")]
    pub confirmed: bool,
}

/// One of the five fixed choice slots, viewed uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawChoiceSlot<'a> {
    pub text: &'a str,
    pub is_correct: bool,
    pub explanation: &'a str,
    pub image: &'a str,
}

impl RawChoiceSlot<'_> {
    /// A slot counts as authored only when its text is non-blank.
    #[must_use]
    pub fn is_authored(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

impl RawQuestionRecord {
    /// The five lettered slots in authored order.
    #[must_use]
    pub fn choice_slots(&self) -> [RawChoiceSlot<'_>; 5] {
        fn slot<'a>(
            text: &'a str,
            is_correct: bool,
            explanation: &'a str,
            image: Option<&'a String>,
        ) -> RawChoiceSlot<'a> {
            RawChoiceSlot {
                text,
                is_correct,
                explanation,
                image: image.map_or("", String::as_str),
            }
        }

        [
            slot(
                &self.choice_a_text,
                self.choice_a_is_correct,
                &self.choice_a_explanation,
                self.choice_a_image.as_ref(),
            ),
            slot(
                &self.choice_b_text,
                self.choice_b_is_correct,
                &self.choice_b_explanation,
                self.choice_b_image.as_ref(),
            ),
            slot(
                &self.choice_c_text,
                self.choice_c_is_correct,
                &self.choice_c_explanation,
                self.choice_c_image.as_ref(),
            ),
            slot(
                &self.choice_d_text,
                self.choice_d_is_correct,
                &self.choice_d_explanation,
                self.choice_d_image.as_ref(),
            ),
            slot(
                &self.choice_e_text,
                self.choice_e_is_correct,
                &self.choice_e_explanation,
                self.choice_e_image.as_ref(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_authored_field_names() {
        let json = r#"{
            "YearAsked": "Février 2024",
            "Subtopic": "Foie",
            "QuestionText": "Quelle est la bonne réponse ?",
            "Choice_A_Text": "Alpha",
            "Choice_A_isCorrect": true,
            "Choice_A_Explanation": "Exact.",
            "Choice_B_Text": "Beta",
            "Choice_B_isCorrect": false,
            "Choice_B_Explanation": "Non.",
            "OverallExplanation": "Voir le cours.",
            "Confirmed": true
        }"#;

        let record: RawQuestionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.year_asked, "Février 2024");
        assert_eq!(record.subtopic, "Foie");
        assert!(record.confirmed);
        // Unset slots default to blank and are not authored.
        let slots = record.choice_slots();
        assert!(slots[0].is_authored());
        assert!(slots[1].is_authored());
        assert!(!slots[2].is_authored());
        assert!(!slots[4].is_authored());
        assert!(slots[0].is_correct);
    }

    #[test]
    fn blank_text_slot_is_not_authored() {
        let record = RawQuestionRecord {
            choice_a_text: "   ".to_string(),
            ..RawQuestionRecord::default()
        };
        assert!(!record.choice_slots()[0].is_authored());
    }
}
