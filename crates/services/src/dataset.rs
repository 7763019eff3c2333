use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use quiz_core::model::RawQuestionRecord;

use crate::error::DatasetError;

/// Loads a module's raw question records from a dataset reference.
///
/// Implementations resolve the opaque `dataset_ref` from the module catalog;
/// the engine never assumes where datasets live.
#[async_trait]
pub trait DatasetLoader: Send + Sync {
    /// Fetch and parse the dataset behind `dataset_ref`.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::NotFound` for an unknown reference,
    /// `DatasetError::Parse` for malformed content, and
    /// `DatasetError::Transport` for everything in between.
    async fn load_dataset(&self, dataset_ref: &str) -> Result<Vec<RawQuestionRecord>, DatasetError>;
}

//
// ─── FILESYSTEM LOADER ─────────────────────────────────────────────────────────
//

/// Loads datasets from `<root>/<dataset_ref>.json`.
#[derive(Debug, Clone)]
pub struct FsDatasetLoader {
    root: PathBuf,
}

impl FsDatasetLoader {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DatasetLoader for FsDatasetLoader {
    async fn load_dataset(&self, dataset_ref: &str) -> Result<Vec<RawQuestionRecord>, DatasetError> {
        let path = self.root.join(format!("{dataset_ref}.json"));
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(DatasetError::NotFound {
                    dataset: dataset_ref.to_string(),
                });
            }
            Err(err) => {
                return Err(DatasetError::Transport {
                    dataset: dataset_ref.to_string(),
                    message: err.to_string(),
                });
            }
        };

        serde_json::from_slice(&bytes).map_err(|err| DatasetError::Parse {
            dataset: dataset_ref.to_string(),
            message: err.to_string(),
        })
    }
}

//
// ─── HTTP LOADER ───────────────────────────────────────────────────────────────
//

/// Loads datasets published as static JSON under a base URL.
#[derive(Debug, Clone)]
pub struct HttpDatasetLoader {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDatasetLoader {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl DatasetLoader for HttpDatasetLoader {
    async fn load_dataset(&self, dataset_ref: &str) -> Result<Vec<RawQuestionRecord>, DatasetError> {
        let url = format!(
            "{}/{dataset_ref}.json",
            self.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| DatasetError::Transport {
                dataset: dataset_ref.to_string(),
                message: err.to_string(),
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DatasetError::NotFound {
                dataset: dataset_ref.to_string(),
            });
        }

        let response = response
            .error_for_status()
            .map_err(|err| DatasetError::Transport {
                dataset: dataset_ref.to_string(),
                message: err.to_string(),
            })?;

        response
            .json::<Vec<RawQuestionRecord>>()
            .await
            .map_err(|err| {
                if err.is_decode() {
                    DatasetError::Parse {
                        dataset: dataset_ref.to_string(),
                        message: err.to_string(),
                    }
                } else {
                    DatasetError::Transport {
                        dataset: dataset_ref.to_string(),
                        message: err.to_string(),
                    }
                }
            })
    }
}

//
// ─── STATIC LOADER ─────────────────────────────────────────────────────────────
//

/// In-memory loader for tests and prototyping; counts underlying fetches so
/// cache behavior can be asserted.
#[derive(Default)]
pub struct StaticDatasetLoader {
    datasets: HashMap<String, Vec<RawQuestionRecord>>,
    fetches: AtomicUsize,
}

impl StaticDatasetLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_dataset(
        mut self,
        dataset_ref: impl Into<String>,
        records: Vec<RawQuestionRecord>,
    ) -> Self {
        self.datasets.insert(dataset_ref.into(), records);
        self
    }

    /// Number of `load_dataset` calls that reached this loader.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatasetLoader for StaticDatasetLoader {
    async fn load_dataset(&self, dataset_ref: &str) -> Result<Vec<RawQuestionRecord>, DatasetError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.datasets
            .get(dataset_ref)
            .cloned()
            .ok_or_else(|| DatasetError::NotFound {
                dataset: dataset_ref.to_string(),
            })
    }
}
