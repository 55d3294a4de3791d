use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::auth::{RegisterCommand, RegisterResult};
use crate::domain::models::credential::{Credential, ValidationError};
use crate::domain::password::{hash_password, verify_password};
use crate::storage::csv::{CredentialRepository, CsvConnection};
use crate::storage::traits::{Connection, CredentialStorage};

/// Registration and password checks against the credential store
#[derive(Clone)]
pub struct CredentialService {
    credential_repository: CredentialRepository,
}

impl CredentialService {
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        Self {
            credential_repository: csv_conn.create_credential_repository(),
        }
    }

    /// Load the store, seeding the default accounts on first run
    pub async fn initialize(&self) -> Result<usize> {
        self.credential_repository.initialize().await
    }

    pub async fn lookup(&self, username: &str) -> Result<Option<String>> {
        self.credential_repository.get_password_hash(username).await
    }

    /// Register a new account.
    ///
    /// Checks run in a fixed order and the first failure wins: blank fields,
    /// then an existing username, then a confirmation mismatch. Registration
    /// never logs the user in.
    pub async fn register(&self, command: RegisterCommand) -> Result<RegisterResult> {
        let username = command.username.trim();
        info!("Registering account '{}'", username);

        if username.is_empty() || command.password.is_empty() {
            return Err(ValidationError::MissingFields.into());
        }
        if self.credential_repository.get_password_hash(username).await?.is_some() {
            warn!("Registration rejected: '{}' already exists", username);
            return Err(ValidationError::UsernameTaken.into());
        }
        if command.password != command.confirm_password {
            return Err(ValidationError::PasswordMismatch.into());
        }

        let credential = Credential {
            username: username.to_string(),
            password_hash: hash_password(&command.password)?,
        };
        if !self.credential_repository.store_credential(&credential).await? {
            // Lost a race with a concurrent registration for the same name
            return Err(ValidationError::UsernameTaken.into());
        }

        info!("Registered account '{}'", username);
        Ok(RegisterResult {
            username: credential.username,
            success_message: "Registration successful! You can now log in.".to_string(),
        })
    }

    /// False for unknown usernames as well as wrong passwords
    pub async fn verify(&self, username: &str, password: &str) -> Result<bool> {
        Ok(match self.credential_repository.get_password_hash(username).await? {
            Some(stored_hash) => verify_password(password, &stored_hash),
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;

    async fn setup_test() -> (TestEnvironment, CredentialService) {
        let env = TestEnvironment::new().await.expect("Failed to create test environment");
        let service = CredentialService::new(Arc::new(env.connection.clone()));
        (env, service)
    }

    fn register_command(username: &str, password: &str, confirm: &str) -> RegisterCommand {
        RegisterCommand {
            username: username.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    fn validation_error(err: anyhow::Error) -> ValidationError {
        err.downcast::<ValidationError>().expect("expected a validation error")
    }

    #[tokio::test]
    async fn test_default_accounts_verify() {
        let (_env, service) = setup_test().await;

        assert_eq!(service.initialize().await.unwrap(), 2);
        assert!(service.verify("admin", "admin123").await.unwrap());
        assert!(service.verify("user", "user123").await.unwrap());
        assert!(!service.verify("admin", "user123").await.unwrap());
        assert!(!service.verify("nobody", "admin123").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_then_verify() {
        let (_env, service) = setup_test().await;

        let result = service
            .register(register_command("alice", "s3cret", "s3cret"))
            .await
            .unwrap();
        assert_eq!(result.username, "alice");
        assert_eq!(result.success_message, "Registration successful! You can now log in.");

        assert!(service.verify("alice", "s3cret").await.unwrap());
        assert!(!service.verify("alice", "s3cret ").await.unwrap());
        assert!(!service.verify("alice", "").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_rejects_existing_username_regardless_of_password() {
        let (_env, service) = setup_test().await;

        let err = service
            .register(register_command("admin", "different", "different"))
            .await
            .unwrap_err();
        assert_eq!(validation_error(err), ValidationError::UsernameTaken);

        // Existing password is untouched
        assert!(service.verify("admin", "admin123").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_rejection_order() {
        let (_env, service) = setup_test().await;

        let err = service.register(register_command("", "pw", "other")).await.unwrap_err();
        assert_eq!(validation_error(err), ValidationError::MissingFields);

        let err = service.register(register_command("bob", "", "")).await.unwrap_err();
        assert_eq!(validation_error(err), ValidationError::MissingFields);

        // Duplicate beats mismatch
        let err = service.register(register_command("user", "a", "b")).await.unwrap_err();
        assert_eq!(validation_error(err), ValidationError::UsernameTaken);

        let err = service.register(register_command("bob", "a", "b")).await.unwrap_err();
        assert_eq!(validation_error(err), ValidationError::PasswordMismatch);
        assert!(service.lookup("bob").await.unwrap().is_none());
    }

    #[test]
    fn test_error_messages_are_user_facing() {
        assert_eq!(ValidationError::MissingFields.to_string(), "Please fill in all fields.");
        assert_eq!(ValidationError::UsernameTaken.to_string(), "Username already exists.");
        assert_eq!(ValidationError::PasswordMismatch.to_string(), "Passwords do not match.");
    }
}
