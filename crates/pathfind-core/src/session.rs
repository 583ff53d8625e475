//! Authentication state injected into front ends.
//!
//! A `SessionContext` is created once at launch (optionally restored from a
//! [`SessionPersistence`] backend) and handed to whatever decides top-level
//! routing. There is no process-global session.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::config::normalize_server_url;
use crate::{Error, Result};

/// Server URL plus the API key used to authenticate against it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    server_url: String,
    api_key: String,
}

impl Credentials {
    pub fn new(server_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let server_url = normalize_server_url(server_url.into())?;
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(Error::InvalidInput("API key is required".to_string()));
        }
        Ok(Self {
            server_url,
            api_key,
        })
    }

    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("server_url", &self.server_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Storage backend for credentials (keychain, secure enclave, test map).
pub trait SessionPersistence: Send + Sync {
    fn load_credentials(&self) -> Result<Option<Credentials>>;
    fn save_credentials(&self, credentials: &Credentials) -> Result<()>;
    fn clear_credentials(&self) -> Result<()>;
}

/// Holds the signed-in credentials and notifies subscribers when the
/// authenticated flag flips.
pub struct SessionContext {
    credentials: Option<Credentials>,
    authenticated: watch::Sender<bool>,
    persistence: Option<Box<dyn SessionPersistence>>,
}

impl SessionContext {
    /// A signed-out context with no persistence.
    #[must_use]
    pub fn new() -> Self {
        let (authenticated, _) = watch::channel(false);
        Self {
            credentials: None,
            authenticated,
            persistence: None,
        }
    }

    /// Initialize from persisted credentials.
    ///
    /// A persistence failure is logged and yields a signed-out context.
    pub fn restore(persistence: Box<dyn SessionPersistence>) -> Self {
        let credentials = match persistence.load_credentials() {
            Ok(credentials) => credentials,
            Err(error) => {
                tracing::warn!("Failed to restore persisted session: {}", error);
                None
            }
        };
        let (authenticated, _) = watch::channel(credentials.is_some());
        Self {
            credentials,
            authenticated,
            persistence: Some(persistence),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    #[must_use]
    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Receive the authenticated flag whenever it changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.authenticated.subscribe()
    }

    pub fn sign_in(&mut self, credentials: Credentials) -> Result<()> {
        if let Some(persistence) = &self.persistence {
            persistence.save_credentials(&credentials)?;
        }
        tracing::debug!(server_url = credentials.server_url(), "Signed in");
        self.credentials = Some(credentials);
        self.authenticated.send_replace(true);
        Ok(())
    }

    pub fn sign_out(&mut self) -> Result<()> {
        if let Some(persistence) = &self.persistence {
            persistence.clear_credentials()?;
        }
        self.credentials = None;
        self.authenticated.send_replace(false);
        Ok(())
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SessionContext")
            .field("credentials", &self.credentials)
            .field("persistent", &self.persistence.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct MemoryPersistence {
        stored: Arc<Mutex<Option<Credentials>>>,
    }

    impl SessionPersistence for MemoryPersistence {
        fn load_credentials(&self) -> Result<Option<Credentials>> {
            Ok(self.stored.lock().unwrap().clone())
        }

        fn save_credentials(&self, credentials: &Credentials) -> Result<()> {
            *self.stored.lock().unwrap() = Some(credentials.clone());
            Ok(())
        }

        fn clear_credentials(&self) -> Result<()> {
            *self.stored.lock().unwrap() = None;
            Ok(())
        }
    }

    struct BrokenPersistence;

    impl SessionPersistence for BrokenPersistence {
        fn load_credentials(&self) -> Result<Option<Credentials>> {
            Err(Error::Storage("keychain locked".to_string()))
        }

        fn save_credentials(&self, _credentials: &Credentials) -> Result<()> {
            Err(Error::Storage("keychain locked".to_string()))
        }

        fn clear_credentials(&self) -> Result<()> {
            Ok(())
        }
    }

    fn credentials() -> Credentials {
        Credentials::new("https://pf.example.com", "secret-key").unwrap()
    }

    #[test]
    fn credentials_debug_redacts_api_key() {
        let rendered = format!("{:?}", credentials());
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn credentials_require_key_and_scheme() {
        assert!(Credentials::new("https://pf.example.com", " ").is_err());
        assert!(Credentials::new("pf.example.com", "key").is_err());
    }

    #[test]
    fn sign_in_and_out_notify_subscribers() {
        let mut session = SessionContext::new();
        let receiver = session.subscribe();
        assert!(!*receiver.borrow());

        session.sign_in(credentials()).unwrap();
        assert!(session.is_authenticated());
        assert!(*receiver.borrow());

        session.sign_out().unwrap();
        assert!(!session.is_authenticated());
        assert!(!*receiver.borrow());
    }

    #[test]
    fn restore_reads_persisted_credentials() {
        let persistence = MemoryPersistence::default();
        {
            let mut session = SessionContext::restore(Box::new(persistence.clone()));
            assert!(!session.is_authenticated());
            session.sign_in(credentials()).unwrap();
        }

        let restored = SessionContext::restore(Box::new(persistence));
        assert!(restored.is_authenticated());
        assert_eq!(
            restored.credentials().map(Credentials::server_url),
            Some("https://pf.example.com")
        );
    }

    #[test]
    fn failed_save_keeps_session_signed_out() {
        let mut session = SessionContext::restore(Box::new(BrokenPersistence));
        assert!(!session.is_authenticated());
        assert!(session.sign_in(credentials()).is_err());
        assert!(!session.is_authenticated());
    }
}
