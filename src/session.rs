//! Per-user session state and the in-memory session store.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::auth::User;
use crate::error::Result;
use crate::rag::RagApp;

/// Greeting shown at the start of every conversation.
pub const GREETING: &str = "Hi! I'm DocGPT. Upload your documents (PDF, DOCX), \
and I'll answer your questions about them!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// All state belonging to one logged-in user: transcript, the set of
/// ingested file names, and the lazily-built RAG pipeline.
pub struct Session {
    pub user: User,
    ingested_files: HashSet<String>,
    transcript: Vec<Message>,
    rag: Option<Arc<RagApp>>,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self {
            user,
            ingested_files: HashSet::new(),
            transcript: vec![Message::assistant(GREETING)],
            rag: None,
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn ingested_files(&self) -> impl Iterator<Item = &str> {
        self.ingested_files.iter().map(String::as_str)
    }

    /// True if a file with this name was already ingested this session.
    pub fn is_ingested(&self, file_name: &str) -> bool {
        self.ingested_files.contains(file_name)
    }

    /// Record a successful ingestion and announce it in the transcript.
    pub fn record_ingested(&mut self, file_name: &str) {
        self.ingested_files.insert(file_name.to_string());
        self.transcript.push(Message::assistant(format!(
            "Added {} to knowledge base!",
            file_name
        )));
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.transcript.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.transcript.push(Message::assistant(content));
    }

    /// Return the session's RAG pipeline, building it on first use.
    pub fn ensure_rag<F>(&mut self, build: F) -> Result<Arc<RagApp>>
    where
        F: FnOnce() -> Result<Arc<RagApp>>,
    {
        if let Some(rag) = &self.rag {
            return Ok(Arc::clone(rag));
        }
        let rag = build()?;
        self.rag = Some(Arc::clone(&rag));
        Ok(rag)
    }
}

/// Concurrent map of live sessions keyed by session id.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, Arc<Mutex<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for an authenticated user, returning its id.
    pub fn create(&self, user: User) -> Uuid {
        let id = Uuid::new_v4();
        info!(session = %id, email = %user.email, "session created");
        self.sessions.insert(id, Arc::new(Mutex::new(Session::new(user))));
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<Mutex<Session>>> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove a session. Dropping the session drops its RAG pipeline,
    /// which removes the on-disk index directory. Returns true if the
    /// session existed.
    pub fn destroy(&self, id: &Uuid) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            info!(session = %id, "session destroyed");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RagSettings;
    use crate::rag::provider::testing::{StubChat, StubEmbedder};

    fn user() -> User {
        User {
            email: "jo@example.com".to_string(),
            first_name: "Jo".to_string(),
        }
    }

    fn build_rag() -> Result<Arc<RagApp>> {
        let settings = RagSettings {
            chunk_size: 100,
            chunk_overlap: 0,
            top_k: 2,
        };
        Ok(Arc::new(RagApp::new(
            &settings,
            Arc::new(StubEmbedder::new()),
            Arc::new(StubChat::replay(&[])),
        )?))
    }

    #[test]
    fn test_new_session_starts_with_greeting() {
        let session = Session::new(user());
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].role, Role::Assistant);
        assert_eq!(session.transcript()[0].content, GREETING);
    }

    #[test]
    fn test_record_ingested_tracks_and_announces() {
        let mut session = Session::new(user());
        assert!(!session.is_ingested("report.pdf"));
        session.record_ingested("report.pdf");
        assert!(session.is_ingested("report.pdf"));
        let last = session.transcript().last().unwrap();
        assert_eq!(last.content, "Added report.pdf to knowledge base!");
    }

    #[test]
    fn test_transcript_preserves_order() {
        let mut session = Session::new(user());
        session.push_user("Question one");
        session.push_assistant("Answer one");
        session.push_user("Question two");
        let roles: Vec<Role> = session.transcript().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::Assistant, Role::User, Role::Assistant, Role::User]
        );
    }

    #[test]
    fn test_ensure_rag_builds_once() {
        let mut session = Session::new(user());
        let first = session.ensure_rag(build_rag).unwrap();
        let second = session
            .ensure_rag(|| panic!("should not rebuild an existing pipeline"))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_store_create_get_destroy() {
        let store = SessionStore::new();
        let id = store.create(user());
        assert!(store.get(&id).is_some());
        assert!(store.destroy(&id));
        assert!(store.get(&id).is_none());
        assert!(!store.destroy(&id));
    }

    #[tokio::test]
    async fn test_destroy_removes_index_directory() {
        let store = SessionStore::new();
        let id = store.create(user());
        let session = store.get(&id).unwrap();

        let path = {
            let mut guard = session.lock().await;
            let rag = guard.ensure_rag(build_rag).unwrap();
            rag.add_text("Track this content.", "doc.pdf").await.unwrap();
            rag.index_path().to_path_buf()
        };
        assert!(path.exists());

        store.destroy(&id);
        drop(session);
        assert!(!path.exists());
    }

    #[test]
    fn test_message_role_serialization() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert!(json.contains(r#""role":"user""#));
        let json = serde_json::to_string(&Message::assistant("hello")).unwrap();
        assert!(json.contains(r#""role":"assistant""#));
    }
}
