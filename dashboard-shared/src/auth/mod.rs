/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`credentials`]: The single configured account and login checks
/// - [`jwt`]: Session token issuing and validation
/// - [`middleware`]: Bearer token extraction for Axum requests
///
/// # Example
///
/// ```
/// use dashboard_shared::auth::credentials::Credentials;
/// use dashboard_shared::auth::jwt::{create_token, validate_token, Claims};
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
/// let user = credentials.authenticate("admin", "s3cret")?;
/// let token = create_token(&Claims::new(&user), "secret-key")?;
/// assert_eq!(validate_token(&token, "secret-key")?.username, "admin");
/// # Ok(())
/// # }
/// ```

pub mod credentials;
pub mod jwt;
pub mod middleware;
pub mod password;
