use crate::model::ids::ChapterId;
use crate::model::question::Question;

/// Bucket name for questions that carry no chapter label.
pub const UNCLASSIFIED_CHAPTER: &str = "Non classé";

/// Fallback color tag when a chapter has none authored.
pub const DEFAULT_CHAPTER_COLOR: &str = "#3B82F6";

/// A chapter grouping derived from question labels.
///
/// `start_position` is the index of the chapter's first question in the
/// sequence the chapters were extracted from; the color is presentation-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    id: ChapterId,
    name: String,
    color: String,
    start_position: usize,
    question_count: usize,
}

impl Chapter {
    #[must_use]
    pub fn id(&self) -> ChapterId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    #[must_use]
    pub fn start_position(&self) -> usize {
        self.start_position
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }
}

/// Groups questions by chapter label, ordered by first appearance.
///
/// Questions without a label fall into the [`UNCLASSIFIED_CHAPTER`] bucket.
/// Ids are assigned sequentially from 1 so they stay stable for a given
/// question sequence; the color comes from the first question of the bucket
/// that carries one. Works on any slice, so filtered subsets get their own
/// chapter view.
#[must_use]
pub fn extract_chapters(questions: &[Question]) -> Vec<Chapter> {
    let mut chapters: Vec<Chapter> = Vec::new();

    for (position, question) in questions.iter().enumerate() {
        let name = question.chapter_name().unwrap_or(UNCLASSIFIED_CHAPTER);

        match chapters.iter_mut().find(|c| c.name == name) {
            Some(chapter) => {
                chapter.question_count += 1;
                if chapter.color == DEFAULT_CHAPTER_COLOR {
                    if let Some(color) = question.chapter_color() {
                        chapter.color = color.to_string();
                    }
                }
            }
            None => {
                let id = u32::try_from(chapters.len() + 1).unwrap_or(u32::MAX);
                chapters.push(Chapter {
                    id: ChapterId::new(id),
                    name: name.to_string(),
                    color: question
                        .chapter_color()
                        .unwrap_or(DEFAULT_CHAPTER_COLOR)
                        .to_string(),
                    start_position: position,
                    question_count: 1,
                });
            }
        }
    }

    chapters
}
