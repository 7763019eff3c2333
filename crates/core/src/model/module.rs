use crate::model::ids::ModuleId;

/// A static catalog entry pointing at a question dataset.
///
/// Defined at configuration time and immutable at runtime; `dataset_ref` is
/// an opaque identifier resolved by the dataset loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEntry {
    id: ModuleId,
    title: String,
    subtitle: String,
    description: String,
    year: String,
    dataset_ref: String,
}

impl ModuleEntry {
    #[must_use]
    pub fn new(
        id: ModuleId,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        description: impl Into<String>,
        year: impl Into<String>,
        dataset_ref: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            subtitle: subtitle.into(),
            description: description.into(),
            year: year.into(),
            dataset_ref: dataset_ref.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ModuleId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn year(&self) -> &str {
        &self.year
    }

    #[must_use]
    pub fn dataset_ref(&self) -> &str {
        &self.dataset_ref
    }
}
