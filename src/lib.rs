//! docgpt: document Q&A web service
//!
//! Users authenticate against a MongoDB credential store, upload PDF/DOCX
//! files, and chat with an assistant whose answers are grounded in the
//! uploaded content. Each login gets an isolated session with its own
//! transcript and its own temporary vector store.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod rag;
pub mod server;
pub mod session;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use session::{Message, Role, Session, SessionStore};
