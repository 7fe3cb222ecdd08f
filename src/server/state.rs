//! Shared application state.

use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::auth::CredentialStore;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::rag::openai::OpenAiClient;
use crate::rag::provider::{ChatProvider, EmbeddingProvider};
use crate::rag::RagApp;
use crate::session::{Session, SessionStore};

struct AppStateInner {
    config: Config,
    credentials: CredentialStore,
    embedder: Arc<dyn EmbeddingProvider>,
    chat: Arc<dyn ChatProvider>,
    sessions: SessionStore,
}

/// Cheaply cloneable handle to everything the request handlers need.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self> {
        let mongo_uri = config.mongo_uri()?;
        let api_key = config.openai_api_key()?;

        let credentials = CredentialStore::connect(&mongo_uri, &config.store).await?;
        let client = Arc::new(OpenAiClient::new(&config.llm, api_key)?);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                credentials,
                embedder: client.clone(),
                chat: client,
                sessions: SessionStore::new(),
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Build a fresh RAG pipeline for a session using the shared providers.
    pub fn new_rag(&self) -> Result<Arc<RagApp>> {
        Ok(Arc::new(RagApp::new(
            &self.inner.config.rag,
            Arc::clone(&self.inner.embedder),
            Arc::clone(&self.inner.chat),
        )?))
    }

    /// Look up a session by id, or fail with an authentication error.
    pub fn session(&self, id: &Uuid) -> Result<Arc<Mutex<Session>>> {
        self.inner
            .sessions
            .get(id)
            .ok_or(Error::SessionNotFound)
    }
}

#[cfg(test)]
impl AppState {
    /// State wired to stub providers. The mongodb client connects lazily,
    /// so no database is contacted unless a test actually authenticates.
    pub(crate) async fn with_providers(
        embedder: Arc<dyn EmbeddingProvider>,
        chat: Arc<dyn ChatProvider>,
    ) -> Self {
        let config = Config::default();
        let credentials = CredentialStore::connect("mongodb://127.0.0.1:27017", &config.store)
            .await
            .unwrap();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                credentials,
                embedder,
                chat,
                sessions: SessionStore::new(),
            }),
        }
    }
}
