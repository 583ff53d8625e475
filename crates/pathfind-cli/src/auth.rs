//! API-key persistence in the OS keychain, one entry per CLI profile.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use pathfind_core::session::{Credentials, SessionContext, SessionPersistence};
use pathfind_core::{Error, Result};

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "pathfind-cli";

#[derive(Clone)]
pub struct KeychainCredentialStore {
    username: String,
}

impl KeychainCredentialStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            username: format!("api_key:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> Result<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| Error::Storage(error.to_string()))
    }
}

impl SessionPersistence for KeychainCredentialStore {
    #[cfg(not(test))]
    fn load_credentials(&self) -> Result<Option<Credentials>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(Error::Storage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load_credentials(&self) -> Result<Option<Credentials>> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard
            .get(&self.username)
            .map(|raw| serde_json::from_str::<Credentials>(raw))
            .transpose()
            .map_err(Error::from)
    }

    #[cfg(not(test))]
    fn save_credentials(&self, credentials: &Credentials) -> Result<()> {
        let raw = serde_json::to_string(credentials)?;
        self.entry()?
            .set_password(&raw)
            .map_err(|error| Error::Storage(error.to_string()))
    }

    #[cfg(test)]
    fn save_credentials(&self, credentials: &Credentials) -> Result<()> {
        let raw = serde_json::to_string(credentials)?;
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.insert(self.username.clone(), raw);
        Ok(())
    }

    #[cfg(not(test))]
    fn clear_credentials(&self) -> Result<()> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(Error::Storage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear_credentials(&self) -> Result<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

/// Session for a profile, restored from the keychain.
pub fn open_session(profile_name: &str) -> SessionContext {
    SessionContext::restore(Box::new(KeychainCredentialStore::new(profile_name)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn session_survives_reopen_and_logout_clears_it() {
        let profile = "auth-test-reopen";
        let credentials = Credentials::new("https://pf.example.com", "key-123").unwrap();

        let mut session = open_session(profile);
        assert!(!session.is_authenticated());
        session.sign_in(credentials.clone()).unwrap();

        let mut reopened = open_session(profile);
        assert!(reopened.is_authenticated());
        assert_eq!(reopened.credentials(), Some(&credentials));

        reopened.sign_out().unwrap();
        assert!(!open_session(profile).is_authenticated());
    }

    #[test]
    fn profiles_do_not_share_keys() {
        let credentials = Credentials::new("https://pf.example.com", "work-key").unwrap();
        open_session("auth-test-work").sign_in(credentials).unwrap();
        assert!(!open_session("auth-test-personal").is_authenticated());
    }
}
