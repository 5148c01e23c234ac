//! Email/password sign-in for the saved-history features.
//!
//! [`CredentialProvider`] is the seam; [`InMemoryCredentialProvider`] keeps
//! accounts in process. Passwords are never stored: each account holds a
//! random salt and `SHA-256(salt || password)`, and digests are compared with
//! [`subtle::ConstantTimeEq`].
//!
//! ```rust
//! use calcdesk::auth::{CredentialProvider, InMemoryCredentialProvider};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let auth = InMemoryCredentialProvider::new();
//! let session = auth.sign_up("ada@example.com", "hunter22", "Ada").await?;
//! assert_eq!(auth.current_session().await.map(|s| s.uid), Some(session.uid));
//!
//! auth.sign_out().await;
//! assert!(auth.current_session().await.is_none());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

pub const MIN_PASSWORD_LEN: usize = 6;

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Owner id used for saved history records.
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub signed_in_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    InvalidEmail,
    WeakPassword,
    EmailInUse,
    /// Unknown email or wrong password; the two are not told apart.
    InvalidCredentials,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidEmail => write!(f, "Please enter a valid email address."),
            AuthError::WeakPassword => write!(
                f,
                "Password should be at least {} characters.",
                MIN_PASSWORD_LEN
            ),
            AuthError::EmailInUse => write!(f, "An account with this email already exists."),
            AuthError::InvalidCredentials => write!(f, "Invalid email or password."),
        }
    }
}

impl Error for AuthError {}

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Create an account and sign it in.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Session, AuthError>;

    async fn sign_out(&self);

    async fn current_session(&self) -> Option<Session>;
}

struct Account {
    uid: String,
    email: String,
    display_name: Option<String>,
    salt: String,
    digest: Vec<u8>,
}

impl Account {
    fn session(&self) -> Session {
        Session {
            uid: self.uid.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            signed_in_at: Utc::now(),
        }
    }

    fn verify(&self, password: &str) -> bool {
        let candidate = password_digest(&self.salt, password);
        candidate.as_slice().ct_eq(self.digest.as_slice()).into()
    }
}

fn password_digest(salt: &str, password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Accounts and the current session held in memory.
#[derive(Default)]
pub struct InMemoryCredentialProvider {
    // keyed by normalized email
    accounts: RwLock<HashMap<String, Account>>,
    current: RwLock<Option<Session>>,
}

impl InMemoryCredentialProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialProvider for InMemoryCredentialProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let key = normalize_email(email);
        let session = {
            let accounts = self.accounts.read().await;
            match accounts.get(&key) {
                Some(account) if account.verify(password) => account.session(),
                _ => {
                    log::debug!("sign_in: rejected credentials for {}", key);
                    return Err(AuthError::InvalidCredentials);
                }
            }
        };
        *self.current.write().await = Some(session.clone());
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Session, AuthError> {
        let key = normalize_email(email);
        if !key.contains('@') {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let session = {
            let mut accounts = self.accounts.write().await;
            if accounts.contains_key(&key) {
                return Err(AuthError::EmailInUse);
            }
            let salt = uuid::Uuid::new_v4().to_string();
            let display_name = display_name.trim();
            let account = Account {
                uid: uuid::Uuid::new_v4().to_string(),
                email: key.clone(),
                display_name: (!display_name.is_empty()).then(|| display_name.to_string()),
                digest: password_digest(&salt, password),
                salt,
            };
            let session = account.session();
            accounts.insert(key, account);
            session
        };
        log::debug!("sign_up: created account {}", session.uid);
        *self.current.write().await = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) {
        self.current.write().await.take();
    }

    async fn current_session(&self) -> Option<Session> {
        self.current.read().await.clone()
    }
}
