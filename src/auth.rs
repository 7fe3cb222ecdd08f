//! Credential store adapter
//!
//! Users live in an external MongoDB collection, created and managed
//! elsewhere; this module only reads them. Passwords are stored as bcrypt
//! hashes and verified with a constant-shape check, never compared as
//! plaintext.

use mongodb::{bson::doc, Client, Collection};
use serde::Deserialize;

use crate::config::StoreConfig;
use crate::error::Result;

/// Authenticated user identity attached to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub first_name: String,
}

/// User record as stored in the `users` collection.
/// Field casing matches the external store, not this codebase.
#[derive(Debug, Deserialize)]
struct UserRecord {
    email: String,
    #[serde(rename = "Password")]
    password_hash: String,
    #[serde(rename = "Firstname")]
    first_name: String,
}

/// Read-only adapter over the external user collection.
pub struct CredentialStore {
    users: Collection<UserRecord>,
}

impl CredentialStore {
    /// Connect to the credential store.
    pub async fn connect(uri: &str, config: &StoreConfig) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let users = client
            .database(&config.database)
            .collection::<UserRecord>(&config.collection);

        tracing::info!(
            "Credential store connected ({}/{})",
            config.database,
            config.collection
        );

        Ok(Self { users })
    }

    /// Look up a user by exact email match and verify the password.
    ///
    /// Returns `Ok(None)` for an unknown email or a wrong password; only
    /// connectivity failures surface as errors.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>> {
        let record = match self.users.find_one(doc! { "email": email }).await? {
            Some(record) => record,
            None => return Ok(None),
        };

        if verify_password(password, &record.password_hash) {
            Ok(Some(User {
                email: record.email,
                first_name: record.first_name,
            }))
        } else {
            Ok(None)
        }
    }
}

/// Verify a password against a bcrypt hash.
/// An unparseable hash counts as a failed verification.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}
