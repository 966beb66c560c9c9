/// The single dashboard account
///
/// The dashboard has no user table: one account is configured at startup
/// and checked on every login. The password is only ever held as an
/// Argon2id hash.
///
/// # Example
///
/// ```
/// use dashboard_shared::auth::credentials::Credentials;
/// use dashboard_shared::models::User;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user = User {
///     id: "1".to_string(),
///     username: "admin".to_string(),
///     email: "admin@dashboard.local".to_string(),
/// };
/// let credentials = Credentials::from_plaintext(user, "s3cret")?;
///
/// assert!(credentials.authenticate("admin", "s3cret").is_ok());
/// assert!(credentials.authenticate("admin", "guess").is_err());
/// # Ok(())
/// # }
/// ```

use super::password::{self, PasswordError};
use crate::models::User;

/// Error type for login attempts
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Username or password was empty
    #[error("Username and password are required")]
    MissingFields,

    /// Username or password did not match
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The stored hash could not be used
    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Configured account plus its password hash
#[derive(Clone)]
pub struct Credentials {
    user: User,
    password_hash: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Builds credentials from an existing PHC hash
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::InvalidHash` if the hash does not parse
    pub fn from_hash(user: User, password_hash: impl Into<String>) -> Result<Self, PasswordError> {
        let password_hash = password_hash.into();
        password::validate_hash(&password_hash)?;

        Ok(Self {
            user,
            password_hash,
        })
    }

    /// Builds credentials by hashing a plaintext password
    pub fn from_plaintext(user: User, password: &str) -> Result<Self, PasswordError> {
        let password_hash = password::hash_password(password)?;

        Ok(Self {
            user,
            password_hash,
        })
    }

    /// The public projection of the account
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Checks a login attempt
    ///
    /// The password hash is verified even when the username is wrong so
    /// both failure modes take the same time.
    ///
    /// # Errors
    ///
    /// - `MissingFields` if either field is empty
    /// - `InvalidCredentials` if either field does not match
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User, CredentialError> {
        if username.is_empty() || password.is_empty() {
            return Err(CredentialError::MissingFields);
        }

        let username_matches = constant_time_compare(username, &self.user.username);
        let password_matches = password::verify_password(password, &self.password_hash)?;

        if username_matches && password_matches {
            Ok(self.user.clone())
        } else {
            Err(CredentialError::InvalidCredentials)
        }
    }
}

/// Compares two strings without short-circuiting on the first difference
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
