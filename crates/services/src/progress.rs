use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use quiz_core::model::{ModuleId, QuestionId};
use storage::repository::KeyValueStore;

use crate::error::ProgressError;
use crate::reporter::{AnomalyKind, ErrorReporter};

/// Prefix of the durable record key; one record per module.
pub const MASTERY_RECORD_PREFIX: &str = "learnfmpa_answered_";

/// Durable mastery state for the questions of one or more modules.
///
/// A question is mastered once it has been answered fully correctly at least
/// once, independent of the current session. Entries are keyed
/// `"{module_id}_{question_id}"`; absence means "not yet mastered" and a
/// `false` marker is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasteryMap {
    entries: HashSet<String>,
}

impl MasteryMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry key for a question within a module.
    #[must_use]
    pub fn entry_key(module_id: ModuleId, question_id: &QuestionId) -> String {
        format!("{module_id}_{question_id}")
    }

    #[must_use]
    pub fn contains(&self, module_id: ModuleId, question_id: &QuestionId) -> bool {
        self.entries
            .contains(&Self::entry_key(module_id, question_id))
    }

    /// Marks a question mastered. Returns true if it was newly marked.
    pub fn mark(&mut self, module_id: ModuleId, question_id: &QuestionId) -> bool {
        self.entries.insert(Self::entry_key(module_id, question_id))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses the stored JSON object, keeping only `true` markers.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error when the value is not a
    /// string-to-boolean object.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let parsed: HashMap<String, bool> = serde_json::from_str(raw)?;
        let entries = parsed
            .into_iter()
            .filter_map(|(key, mastered)| mastered.then_some(key))
            .collect();
        Ok(Self { entries })
    }

    /// Serializes to a JSON object of `true` markers, keys sorted for
    /// stable output.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error on failure.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let object: BTreeMap<&str, bool> = self
            .entries
            .iter()
            .map(|key| (key.as_str(), true))
            .collect();
        serde_json::to_string(&object)
    }
}

/// Durable per-module progress over an injected key-value collaborator.
pub struct ProgressService {
    store: Arc<dyn KeyValueStore>,
    reporter: Arc<dyn ErrorReporter>,
}

impl ProgressService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self { store, reporter }
    }

    /// The durable record key for a module.
    #[must_use]
    pub fn record_key(module_id: ModuleId) -> String {
        format!("{MASTERY_RECORD_PREFIX}{module_id}")
    }

    /// Load the mastery map for `module_id`.
    ///
    /// An absent record reads as empty. Corrupt stored data and storage
    /// failures also degrade to an empty map with a reported anomaly; loading
    /// never interrupts the session.
    pub async fn load(&self, module_id: ModuleId) -> MasteryMap {
        let key = Self::record_key(module_id);
        match self.store.get(&key).await {
            Ok(None) => MasteryMap::new(),
            Ok(Some(raw)) => match MasteryMap::from_json(&raw) {
                Ok(map) => map,
                Err(err) => {
                    self.reporter.report(
                        AnomalyKind::CorruptProgressData,
                        &err.to_string(),
                        &format!("module {module_id}"),
                    );
                    MasteryMap::new()
                }
            },
            Err(err) => {
                self.reporter.report(
                    AnomalyKind::StorageUnavailable,
                    &err.to_string(),
                    &format!("module {module_id}"),
                );
                MasteryMap::new()
            }
        }
    }

    /// Durably mark a question as mastered.
    ///
    /// Read-modify-write of the module's record; idempotent for an already
    /// mastered question.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the record cannot be read back or written.
    pub async fn record_correct(
        &self,
        module_id: ModuleId,
        question_id: &QuestionId,
    ) -> Result<(), ProgressError> {
        let key = Self::record_key(module_id);
        let mut map = self.load(module_id).await;
        map.mark(module_id, question_id);
        self.store.set(&key, &map.to_json()?).await?;
        Ok(())
    }

    /// Clear the durable record for `module_id` only; other modules' progress
    /// is untouched.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the record cannot be removed.
    pub async fn reset(&self, module_id: ModuleId) -> Result<(), ProgressError> {
        self.store.remove(&Self::record_key(module_id)).await?;
        Ok(())
    }
}
