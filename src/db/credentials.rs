use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    error::{AppError, AppResult},
    models::Credential,
};

/// Flat-file user store (`username,email,password_hash`)
///
/// Usernames are unique keys. Records can be created and read, nothing else.
/// The methods block (file I/O and Argon2), so async callers should run them
/// on the blocking pool.
#[derive(Clone)]
pub struct CredentialStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All registered users; a missing file means nobody has registered yet
    pub fn load(&self) -> AppResult<Vec<Credential>> {
        let _guard = self.lock()?;
        self.read_users()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| AppError::Internal("Credential store lock poisoned".to_string()))
    }

    fn read_users(&self) -> AppResult<Vec<Credential>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let headers = reader.headers()?;
        let has_column = |name: &str| headers.iter().any(|h| h == name);
        if has_column("password") && !has_column("password_hash") {
            return Err(AppError::Internal(format!(
                "{} stores plaintext passwords; re-register users to create Argon2 hashes",
                self.path.display()
            )));
        }

        let users = reader.deserialize().collect::<Result<Vec<Credential>, _>>()?;
        Ok(users)
    }

    /// Registers a new user
    ///
    /// Fails with `Conflict` when the username is taken, in which case the
    /// file is left untouched.
    pub fn register(&self, username: &str, email: &str, password: &str) -> AppResult<Credential> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "Username, email and password are all required.".to_string(),
            ));
        }

        let _guard = self.lock()?;

        if self.read_users()?.iter().any(|c| c.username == username) {
            tracing::info!(username = %username, "Registration rejected, username taken");
            return Err(AppError::Conflict("Username already exists.".to_string()));
        }

        let credential = Credential {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
        };
        self.append(&credential)?;

        tracing::info!(username = %username, "User registered");
        Ok(credential)
    }

    /// Checks a username/password pair
    pub fn login(&self, username: &str, password: &str) -> AppResult<Credential> {
        let invalid = || AppError::Unauthorized("Invalid username or password.".to_string());

        let credential = self
            .load()?
            .into_iter()
            .find(|c| c.username == username.trim())
            .ok_or_else(invalid)?;

        if !verify_password(password, &credential.password_hash)? {
            tracing::debug!(username = %credential.username, "Password mismatch");
            return Err(invalid());
        }

        Ok(credential)
    }

    fn append(&self, credential: &Credential) -> AppResult<()> {
        let needs_header = std::fs::metadata(&self.path)
            .map(|meta| meta.len() == 0)
            .unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(credential)?;
        writer.flush()?;
        Ok(())
    }
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| AppError::Internal(format!("Stored password hash is malformed: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, CredentialStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("users.csv"));
        (dir, store)
    }

    #[test]
    fn test_register_then_login() {
        let (_dir, store) = store();
        store.register("ada", "ada@example.com", "lovelace").unwrap();

        let credential = store.login("ada", "lovelace").unwrap();
        assert_eq!(credential.email, "ada@example.com");
        assert!(credential.password_hash.starts_with("$argon2"));
    }

    #[test]
    fn test_password_not_stored_in_plaintext() {
        let (_dir, store) = store();
        store.register("ada", "ada@example.com", "lovelace").unwrap();
        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert!(!contents.contains("lovelace"));
        assert!(contents.starts_with("username,email,password_hash"));
    }

    #[test]
    fn test_duplicate_username_leaves_store_unchanged() {
        let (_dir, store) = store();
        store.register("ada", "ada@example.com", "lovelace").unwrap();
        let before = std::fs::read_to_string(store.path()).unwrap();

        let err = store.register("ada", "other@example.com", "different").unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let after = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(before, after);
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_wrong_password_and_unknown_user_rejected() {
        let (_dir, store) = store();
        store.register("ada", "ada@example.com", "lovelace").unwrap();

        assert!(matches!(
            store.login("ada", "babbage"),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            store.login("grace", "lovelace"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_empty_fields_rejected() {
        let (_dir, store) = store();
        assert!(matches!(
            store.register("  ", "ada@example.com", "pw"),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            store.register("ada", "ada@example.com", ""),
            Err(AppError::InvalidInput(_))
        ));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_plaintext_password_file_reports_clear_error() {
        let (_dir, store) = store();
        std::fs::write(
            store.path(),
            "username,email,password\nada,ada@example.com,lovelace\n",
        )
        .unwrap();

        let err = store.login("ada", "lovelace").unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert!(err.to_string().contains("plaintext passwords"));
    }

    #[test]
    fn test_concurrent_registrations_and_logins() {
        let (_dir, store) = store();
        store.register("ada", "ada@example.com", "lovelace").unwrap();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .register(&format!("user{}", i), "user@example.com", "pw")
                        .unwrap();
                    store.login("ada", "lovelace").unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.load().unwrap().len(), 5);
    }
}
