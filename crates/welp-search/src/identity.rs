//! Sign-in with automatic registration, and a local account store.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;
use welp_core::validate_credentials;

use crate::error::AuthError;

/// A signed-in user. `uid` is the opaque key history is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

pub trait AccountProvider {
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send;

    fn register(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send;
}

/// Validates the credentials and signs in, registering a new account when
/// none exists for the email.
///
/// # Errors
///
/// Returns [`AuthError::Invalid`] before contacting the provider, or the
/// provider's error for anything other than an unknown account.
pub async fn sign_in_or_register<A: AccountProvider>(
    accounts: &A,
    email: &str,
    password: &str,
) -> Result<Identity, AuthError> {
    validate_credentials(email, password)?;
    let email = email.trim();
    // Length is checked on the trimmed password, so that is what gets hashed.
    let password = password.trim();

    match accounts.sign_in(email, password).await {
        Ok(identity) => Ok(identity),
        Err(AuthError::UserNotFound) => {
            tracing::info!(email, "no account for email, registering");
            accounts.register(email, password).await.inspect_err(|e| {
                tracing::warn!(email, error = %e, "registration failed");
            })
        }
        Err(e) => {
            tracing::warn!(email, error = %e, "sign-in failed");
            Err(e)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredAccount {
    uid: String,
    password_sha256: String,
}

/// Accounts kept in memory, optionally mirrored to a JSON file.
pub struct LocalAccounts {
    path: Option<PathBuf>,
    accounts: tokio::sync::Mutex<HashMap<String, StoredAccount>>,
}

impl LocalAccounts {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            accounts: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Loads the account file at `path`, starting empty if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Io`] if the file cannot be read and
    /// [`AuthError::Corrupt`] if it is not a valid account map.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let path = path.into();
        let accounts = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: Some(path),
            accounts: tokio::sync::Mutex::new(accounts),
        })
    }

    async fn persist(&self, accounts: &HashMap<String, StoredAccount>) -> Result<(), AuthError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(accounts)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

impl AccountProvider for LocalAccounts {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let key = account_key(email);
        let accounts = self.accounts.lock().await;
        let stored = accounts.get(&key).ok_or(AuthError::UserNotFound)?;

        let candidate = password_digest(&stored.uid, password);
        if bool::from(candidate.as_bytes().ct_eq(stored.password_sha256.as_bytes())) {
            Ok(Identity {
                uid: stored.uid.clone(),
                email: key,
            })
        } else {
            Err(AuthError::WrongPassword)
        }
    }

    async fn register(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        validate_credentials(email, password)?;
        let key = account_key(email);
        let mut accounts = self.accounts.lock().await;
        if accounts.contains_key(&key) {
            return Err(AuthError::EmailInUse);
        }

        let uid = Uuid::new_v4().to_string();
        accounts.insert(
            key.clone(),
            StoredAccount {
                uid: uid.clone(),
                password_sha256: password_digest(&uid, password),
            },
        );
        if let Err(e) = self.persist(&accounts).await {
            accounts.remove(&key);
            return Err(e);
        }

        tracing::info!(email = %key, "registered account");
        Ok(Identity { uid, email: key })
    }
}

fn account_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn password_digest(uid: &str, password: &str) -> String {
    format!("{:x}", Sha256::digest(format!("{uid}:{password}").as_bytes()))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use welp_core::ValidationError;

    use super::*;

    struct CountingAccounts {
        inner: LocalAccounts,
        registrations: AtomicUsize,
    }

    impl CountingAccounts {
        fn new() -> Self {
            Self {
                inner: LocalAccounts::in_memory(),
                registrations: AtomicUsize::new(0),
            }
        }
    }

    impl AccountProvider for CountingAccounts {
        async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
            self.inner.sign_in(email, password).await
        }

        async fn register(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
            self.registrations.fetch_add(1, Ordering::SeqCst);
            self.inner.register(email, password).await
        }
    }

    #[tokio::test]
    async fn unknown_account_is_registered() {
        let accounts = CountingAccounts::new();
        let identity = sign_in_or_register(&accounts, "new@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(identity.email, "new@example.com");
        assert_eq!(accounts.registrations.load(Ordering::SeqCst), 1);

        let again = sign_in_or_register(&accounts, "new@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(again, identity);
        assert_eq!(accounts.registrations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn wrong_password_does_not_register() {
        let accounts = CountingAccounts::new();
        sign_in_or_register(&accounts, "a@example.com", "secret1")
            .await
            .unwrap();

        let err = sign_in_or_register(&accounts, "a@example.com", "wrong-one")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::WrongPassword));
        assert_eq!(accounts.registrations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn surrounding_whitespace_in_password_is_ignored() {
        let accounts = CountingAccounts::new();
        let registered = sign_in_or_register(&accounts, "a@example.com", "  secret1 ")
            .await
            .unwrap();

        let signed_in = sign_in_or_register(&accounts, "a@example.com", "secret1")
            .await
            .unwrap();

        assert_eq!(signed_in, registered);
        assert_eq!(accounts.registrations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_credentials_never_reach_provider() {
        let accounts = CountingAccounts::new();
        let err = sign_in_or_register(&accounts, "not-an-email", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::Invalid(ValidationError::InvalidEmail)
        ));
        let err = sign_in_or_register(&accounts, "a@example.com", "123")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::Invalid(ValidationError::PasswordTooShort)
        ));
        assert_eq!(accounts.registrations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn email_is_case_insensitive() {
        let accounts = LocalAccounts::in_memory();
        let registered = accounts.register("Me@Example.com", "secret1").await.unwrap();
        let signed_in = accounts.sign_in("me@example.com", "secret1").await.unwrap();
        assert_eq!(registered, signed_in);
        let err = accounts.register("ME@EXAMPLE.COM", "other12").await.unwrap_err();
        assert!(matches!(err, AuthError::EmailInUse));
    }

    #[tokio::test]
    async fn file_backed_accounts_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.json");
        let registered = LocalAccounts::open(&path)
            .await
            .unwrap()
            .register("a@example.com", "secret1")
            .await
            .unwrap();

        let reopened = LocalAccounts::open(&path).await.unwrap();
        let signed_in = reopened.sign_in("a@example.com", "secret1").await.unwrap();
        assert_eq!(signed_in.uid, registered.uid);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("secret1"));
    }

    #[tokio::test]
    async fn corrupt_account_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.json");
        std::fs::write(&path, "not json").unwrap();
        let err = LocalAccounts::open(&path).await.err().unwrap();
        assert!(matches!(err, AuthError::Corrupt(_)));
    }

    #[test]
    fn digest_is_salted_by_uid() {
        assert_ne!(password_digest("u1", "pw"), password_digest("u2", "pw"));
        let digest = password_digest("u1", "pw");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }
}
