//! Keeps the tokens from a password grant in the user's keyring between runs.

use crate::Client;
use keyring::Entry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const KEYRING_SERVICE: &str = "napsterctl";
const KEYRING_ENTRY: &str = "OAuth2 Credentials";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("credential storage is unavailable: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("stored credentials are corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// The format of our JSON within credential storage.
///
/// All three tokens live in a single entry so they can never drift apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenStorage {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
}

impl TokenStorage {
    /// Captures the tokens a client currently holds.
    pub fn from_client<T>(client: &Client<T>) -> Self {
        Self {
            access_token: client.access_token().map(str::to_string),
            refresh_token: client.refresh_token().map(str::to_string),
            expires_in: client.expires_in(),
        }
    }

    /// Hands the stored tokens back to a client, replacing whatever it had.
    pub fn apply_to<T>(&self, client: &mut Client<T>) {
        client.set_access_token(self.access_token.clone());
        client.set_refresh_token(self.refresh_token.clone());
        client.set_expires_in(self.expires_in);
    }

    pub fn from_json(contents: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reads stored tokens from the user's keyring, if there are any.
    pub fn load() -> Result<Option<Self>, StorageError> {
        Self::load_from(&entry()?)
    }

    pub fn save(&self) -> Result<(), StorageError> {
        self.save_to(&entry()?)
    }

    /// Forgets any stored tokens. Having none stored is not an error.
    pub fn clear() -> Result<(), StorageError> {
        Self::clear_from(&entry()?)
    }

    pub fn load_from(store: &impl SecretStore) -> Result<Option<Self>, StorageError> {
        match store.get_password() {
            Ok(contents) => Ok(Some(Self::from_json(&contents)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save_to(&self, store: &impl SecretStore) -> Result<(), StorageError> {
        store.set_password(&self.to_json()?)?;
        Ok(())
    }

    pub fn clear_from(store: &impl SecretStore) -> Result<(), StorageError> {
        match store.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// A single secret slot. The OS keyring in practice.
pub trait SecretStore {
    fn get_password(&self) -> keyring::Result<String>;
    fn set_password(&self, password: &str) -> keyring::Result<()>;
    fn delete_password(&self) -> keyring::Result<()>;
}

impl SecretStore for Entry {
    fn get_password(&self) -> keyring::Result<String> {
        Entry::get_password(self)
    }

    fn set_password(&self, password: &str) -> keyring::Result<()> {
        Entry::set_password(self, password)
    }

    fn delete_password(&self) -> keyring::Result<()> {
        Entry::delete_password(self)
    }
}

fn entry() -> Result<Entry, StorageError> {
    Ok(Entry::new(KEYRING_SERVICE, KEYRING_ENTRY)?)
}
