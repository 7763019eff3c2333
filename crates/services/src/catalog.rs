use quiz_core::model::{ModuleEntry, ModuleId};

/// The static module catalog: which modules exist and where their question
/// datasets live. Defined at configuration time, immutable at runtime.
#[derive(Debug, Clone, Default)]
pub struct ModuleCatalog {
    entries: Vec<ModuleEntry>,
}

impl ModuleCatalog {
    #[must_use]
    pub fn from_entries(entries: Vec<ModuleEntry>) -> Self {
        Self { entries }
    }

    /// The catalog shipped with the app.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_entries(vec![ModuleEntry::new(
            ModuleId::new(1),
            "Pathologie digestive",
            "3ème année",
            "Questions d'annales en pathologie digestive pour les étudiants en médecine",
            "3ème année",
            "Pathologie digestive",
        )])
    }

    /// Entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[ModuleEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: ModuleId) -> Option<&ModuleEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
