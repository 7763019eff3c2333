use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use quiz_core::model::{
    Chapter, ModuleEntry, ModuleId, Question, QuestionId, SessionLabel, available_sessions,
    extract_chapters,
};

use crate::dataset::DatasetLoader;
use crate::error::DatasetError;
use crate::reporter::{AnomalyKind, ErrorReporter};

/// The normalized contents of one module, ready for quiz sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModule {
    module_id: ModuleId,
    questions: Vec<Question>,
    chapters: Vec<Chapter>,
    sessions: Vec<SessionLabel>,
}

impl LoadedModule {
    #[must_use]
    pub fn module_id(&self) -> ModuleId {
        self.module_id
    }

    /// Canonical questions in dataset order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Full-module chapter list, first-appearance order.
    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Distinct sitting labels, newest first.
    #[must_use]
    pub fn sessions(&self) -> &[SessionLabel] {
        &self.sessions
    }
}

/// Loads, normalizes and memoizes module datasets.
///
/// The cache is an owned object with explicit clear operations, not ambient
/// global state. Holding the async lock across the fetch means concurrent
/// first loads for a module coalesce: the second caller waits, then hits the
/// cache.
pub struct QuestionStore {
    loader: Arc<dyn DatasetLoader>,
    reporter: Arc<dyn ErrorReporter>,
    cache: Mutex<HashMap<ModuleId, Arc<LoadedModule>>>,
}

impl QuestionStore {
    #[must_use]
    pub fn new(loader: Arc<dyn DatasetLoader>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            loader,
            reporter,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Load the module behind `entry`, converting raw records into canonical
    /// questions and deriving chapter and sitting groupings.
    ///
    /// Loading the same module twice returns the cached value without a
    /// second dataset fetch. Records that fail normalization are skipped and
    /// reported, never fatal.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError` if the dataset cannot be fetched or parsed.
    pub async fn load_module(
        &self,
        entry: &ModuleEntry,
    ) -> Result<Arc<LoadedModule>, DatasetError> {
        let mut cache = self.cache.lock().await;
        if let Some(found) = cache.get(&entry.id()) {
            return Ok(Arc::clone(found));
        }

        let records = self.loader.load_dataset(entry.dataset_ref()).await?;

        let mut questions = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            match Question::from_raw(QuestionId::from_dataset_index(index), record) {
                Ok(question) => questions.push(question),
                Err(err) => self.reporter.report(
                    AnomalyKind::InvalidQuestionRecord,
                    &err.to_string(),
                    &format!("module {} record {index}", entry.id()),
                ),
            }
        }

        let chapters = extract_chapters(&questions);
        let sessions = available_sessions(&questions);
        tracing::debug!(
            module = %entry.id(),
            questions = questions.len(),
            chapters = chapters.len(),
            "module dataset loaded"
        );

        let loaded = Arc::new(LoadedModule {
            module_id: entry.id(),
            questions,
            chapters,
            sessions,
        });
        cache.insert(entry.id(), Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Drop the cached data for one module.
    pub async fn clear(&self, module_id: ModuleId) {
        self.cache.lock().await.remove(&module_id);
    }

    /// Drop every cached module.
    pub async fn clear_all(&self) {
        self.cache.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::StaticDatasetLoader;
    use crate::reporter::CapturingReporter;
    use quiz_core::model::RawQuestionRecord;

    fn record(text: &str, chapter: &str) -> RawQuestionRecord {
        RawQuestionRecord {
            question_text: text.to_string(),
            subtopic: chapter.to_string(),
            choice_a_text: "Oui".to_string(),
            choice_a_is_correct: true,
            choice_b_text: "Non".to_string(),
            ..RawQuestionRecord::default()
        }
    }

    fn entry() -> ModuleEntry {
        ModuleEntry::new(ModuleId::new(1), "Demo", "s", "d", "y", "demo")
    }

    fn store_with(records: Vec<RawQuestionRecord>) -> (QuestionStore, CapturingReporter) {
        let loader = StaticDatasetLoader::new().with_dataset("demo", records);
        let reporter = CapturingReporter::new();
        let store = QuestionStore::new(Arc::new(loader), Arc::new(reporter.clone()));
        (store, reporter)
    }

    #[tokio::test]
    async fn loads_and_derives_chapters() {
        let (store, _) = store_with(vec![record("Q1", "Foie"), record("Q2", "Pancréas")]);

        let loaded = store.load_module(&entry()).await.unwrap();
        assert_eq!(loaded.questions().len(), 2);
        assert_eq!(loaded.chapters().len(), 2);
        assert_eq!(loaded.chapters()[0].name(), "Foie");
    }

    #[tokio::test]
    async fn second_load_is_a_cache_hit() {
        let loader = Arc::new(
            StaticDatasetLoader::new().with_dataset("demo", vec![record("Q1", "Foie")]),
        );
        let reporter = CapturingReporter::new();
        let store = QuestionStore::new(loader.clone(), Arc::new(reporter));

        let first = store.load_module(&entry()).await.unwrap();
        let second = store.load_module(&entry()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(loader.fetch_count(), 1);
    }

    #[tokio::test]
    async fn clear_forces_a_reload() {
        let loader = Arc::new(
            StaticDatasetLoader::new().with_dataset("demo", vec![record("Q1", "Foie")]),
        );
        let reporter = CapturingReporter::new();
        let store = QuestionStore::new(loader.clone(), Arc::new(reporter));

        store.load_module(&entry()).await.unwrap();
        store.clear(ModuleId::new(1)).await;
        store.load_module(&entry()).await.unwrap();

        assert_eq!(loader.fetch_count(), 2);
    }

    #[tokio::test]
    async fn invalid_records_are_skipped_and_reported() {
        let invalid = RawQuestionRecord {
            question_text: "No correct choice".to_string(),
            choice_a_text: "A".to_string(),
            choice_b_text: "B".to_string(),
            ..RawQuestionRecord::default()
        };
        let (store, reporter) = store_with(vec![record("Q1", "Foie"), invalid]);

        let loaded = store.load_module(&entry()).await.unwrap();
        assert_eq!(loaded.questions().len(), 1);
        assert!(reporter.has_kind(AnomalyKind::InvalidQuestionRecord));
    }

    #[tokio::test]
    async fn missing_dataset_surfaces_as_error() {
        let (store, _) = store_with(Vec::new());
        let other = ModuleEntry::new(ModuleId::new(2), "Other", "s", "d", "y", "missing");
        assert!(matches!(
            store.load_module(&other).await,
            Err(DatasetError::NotFound { .. })
        ));
    }
}
