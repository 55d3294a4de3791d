//! # Credential Repository
//!
//! Stores accounts in `users.json` at the root of the data directory as a
//! single JSON object mapping username to password hash:
//!
//! ```json
//! {"admin": "$argon2id$v=19$m=19456,t=2,p=1$...", "user": "$argon2id$v=19$..."}
//! ```
//!
//! When the file does not exist the two default accounts are seeded and
//! written immediately.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::connection::CsvConnection;
use crate::domain::models::credential::{Credential, DEFAULT_ACCOUNTS};
use crate::domain::password::hash_password;
use crate::storage::traits::CredentialStorage;

type CredentialMap = BTreeMap<String, String>;

#[derive(Clone)]
pub struct CredentialRepository {
    connection: CsvConnection,
    write_lock: Arc<Mutex<()>>,
}

impl CredentialRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            connection,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Read the credential file. `None` when it has never been written.
    fn read_credentials(&self) -> Result<Option<CredentialMap>> {
        let path = self.connection.users_file_path();
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let credentials: CredentialMap = serde_json::from_str(&content)
            .with_context(|| format!("Credential file {} is not a username → hash object", path.display()))?;

        debug!("Loaded {} credentials from {}", credentials.len(), path.display());
        Ok(Some(credentials))
    }

    fn write_credentials(&self, credentials: &CredentialMap) -> Result<()> {
        let json = serde_json::to_string_pretty(credentials)?;
        self.connection
            .write_atomically(&self.connection.users_file_path(), json.as_bytes())
    }

    fn seed_default_credentials(&self) -> Result<CredentialMap> {
        let credentials = DEFAULT_ACCOUNTS
            .iter()
            .map(|(username, password)| Ok((username.to_string(), hash_password(password)?)))
            .collect::<Result<CredentialMap>>()?;

        self.write_credentials(&credentials)?;
        warn!(
            "No credential file found; seeded default accounts {:?} with well-known passwords. Change them.",
            DEFAULT_ACCOUNTS.iter().map(|(u, _)| *u).collect::<Vec<_>>()
        );
        Ok(credentials)
    }

    /// Must be called with the write lock held
    fn load_or_seed(&self) -> Result<CredentialMap> {
        match self.read_credentials()? {
            Some(credentials) => Ok(credentials),
            None => self.seed_default_credentials(),
        }
    }
}

#[async_trait]
impl CredentialStorage for CredentialRepository {
    async fn initialize(&self) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let credentials = self.load_or_seed()?;
        info!("Credential store ready with {} accounts", credentials.len());
        Ok(credentials.len())
    }

    async fn get_password_hash(&self, username: &str) -> Result<Option<String>> {
        let _guard = self.write_lock.lock().await;
        let credentials = self.load_or_seed()?;
        Ok(credentials.get(username).cloned())
    }

    async fn store_credential(&self, credential: &Credential) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut credentials = self.load_or_seed()?;

        if credentials.contains_key(&credential.username) {
            debug!("Credential for '{}' already exists", credential.username);
            return Ok(false);
        }

        credentials.insert(credential.username.clone(), credential.password_hash.clone());
        self.write_credentials(&credentials)?;

        info!("Stored credential for '{}'", credential.username);
        Ok(true)
    }
}
