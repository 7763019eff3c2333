use std::path::PathBuf;
use std::sync::Arc;

use storage::repository::Storage;

use crate::catalog::ModuleCatalog;
use crate::dataset::{DatasetLoader, FsDatasetLoader};
use crate::error::AppServicesError;
use crate::navigator::{Navigator, NoopNavigator};
use crate::progress::ProgressService;
use crate::question_store::QuestionStore;
use crate::reporter::{ErrorReporter, TracingReporter};
use crate::sessions::QuizLoopService;

/// Assembles the engine's services over durable storage and a dataset root.
#[derive(Clone)]
pub struct AppServices {
    catalog: ModuleCatalog,
    quiz_loop: Arc<QuizLoopService>,
    progress: Arc<ProgressService>,
    question_store: Arc<QuestionStore>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and filesystem datasets.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        data_dir: impl Into<PathBuf>,
        catalog: ModuleCatalog,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let loader: Arc<dyn DatasetLoader> = Arc::new(FsDatasetLoader::new(data_dir));
        let navigator: Arc<dyn Navigator> = Arc::new(NoopNavigator);
        Ok(Self::assemble(storage, loader, navigator, catalog))
    }

    /// Build services over in-memory storage; useful for tests and demos.
    #[must_use]
    pub fn new_in_memory(loader: Arc<dyn DatasetLoader>, catalog: ModuleCatalog) -> Self {
        let storage = Storage::in_memory();
        let navigator: Arc<dyn Navigator> = Arc::new(NoopNavigator);
        Self::assemble(storage, loader, navigator, catalog)
    }

    fn assemble(
        storage: Storage,
        loader: Arc<dyn DatasetLoader>,
        navigator: Arc<dyn Navigator>,
        catalog: ModuleCatalog,
    ) -> Self {
        let reporter: Arc<dyn ErrorReporter> = Arc::new(TracingReporter);
        let question_store = Arc::new(QuestionStore::new(loader, Arc::clone(&reporter)));
        let progress = Arc::new(ProgressService::new(
            Arc::clone(&storage.progress),
            Arc::clone(&reporter),
        ));
        let quiz_loop = Arc::new(QuizLoopService::new(
            catalog.clone(),
            Arc::clone(&question_store),
            Arc::clone(&progress),
            navigator,
            reporter,
        ));

        Self {
            catalog,
            quiz_loop,
            progress,
            question_store,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn question_store(&self) -> Arc<QuestionStore> {
        Arc::clone(&self.question_store)
    }
}
