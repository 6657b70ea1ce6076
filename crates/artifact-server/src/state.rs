use artifact_core::{Config, SnapshotStore};
use artifact_llm::{ArtifactPipeline, CredentialSource, UnifiedProvider};

/// Shared, read-only handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: ArtifactPipeline,
    pub store: SnapshotStore,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, credentials: CredentialSource) -> Self {
        let provider = UnifiedProvider::from_config(&config, &credentials);
        let store = SnapshotStore::new(config.snapshot_dir());
        Self::with_parts(ArtifactPipeline::new(provider), store, config)
    }

    pub fn with_parts(pipeline: ArtifactPipeline, store: SnapshotStore, config: Config) -> Self {
        Self {
            pipeline,
            store,
            config,
        }
    }

    pub fn provider(&self) -> &UnifiedProvider {
        self.pipeline.provider()
    }

    /// Create the snapshot directory; failures only disable persistence.
    pub async fn init(&self) {
        log::info!("Initializing snapshot storage at: {:?}", self.store.base_path());
        if let Err(e) = self.store.init().await {
            log::error!("Failed to initialize snapshot storage: {}", e);
        }
    }
}
