//! Authentication against the hosted users table

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};

use crate::backend::TableClient;
use crate::session::Identity;

/// Role assigned to freshly registered users
pub const DEFAULT_ROLE: &str = "viewer";

/// Login form input
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish()
    }
}

/// Row shape of the users table
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRow {
    username: String,
    password: String,
    role: String,
}

/// Check credentials against the users table.
///
/// Returns the identity on a match, `None` for an unknown username or a
/// wrong password. Backend failures propagate as errors.
pub async fn authenticate(
    client: &TableClient,
    table: &str,
    credentials: &Credentials,
) -> crate::Result<Option<Identity>> {
    let rows: Vec<UserRow> = client
        .select_eq(table, "username", &credentials.username)
        .await?;

    let Some(user) = rows.into_iter().next() else {
        tracing::debug!("Login attempt for unknown user '{}'", credentials.username);
        return Ok(None);
    };

    let parsed = PasswordHash::new(&user.password)
        .map_err(|e| crate::VitrineError::Auth(format!("Stored password hash is invalid: {}", e)))?;

    if Argon2::default()
        .verify_password(credentials.password.as_bytes(), &parsed)
        .is_err()
    {
        tracing::debug!("Wrong password for user '{}'", credentials.username);
        return Ok(None);
    }

    tracing::info!("User '{}' logged in with role '{}'", user.username, user.role);
    Ok(Some(Identity {
        username: user.username,
        role: user.role,
    }))
}

/// Register a new user with the default role and return its identity.
///
/// Fails when the username is already taken.
pub async fn signup(
    client: &TableClient,
    table: &str,
    credentials: &Credentials,
) -> crate::Result<Identity> {
    let existing: Vec<UserRow> = client
        .select_eq(table, "username", &credentials.username)
        .await?;
    if !existing.is_empty() {
        return Err(crate::VitrineError::Auth(format!(
            "Username '{}' is already taken",
            credentials.username
        )));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(credentials.password.as_bytes(), &salt)
        .map_err(|e| crate::VitrineError::Auth(format!("Password hashing failed: {}", e)))?
        .to_string();

    let row = UserRow {
        username: credentials.username.clone(),
        password: hash,
        role: DEFAULT_ROLE.to_string(),
    };
    let stored: UserRow = client.insert(table, &row).await?;

    tracing::info!("Registered user '{}'", stored.username);
    Ok(Identity {
        username: stored.username,
        role: stored.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{HttpResponse, MockHttpClient};
    use std::sync::Arc;

    fn hash_of(password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn user_row_body(username: &str, password_hash: &str, role: &str) -> String {
        serde_json::to_string(&vec![UserRow {
            username: username.to_string(),
            password: password_hash.to_string(),
            role: role.to_string(),
        }])
        .unwrap()
    }

    fn client_returning(body: String) -> TableClient {
        let mut mock = MockHttpClient::new();
        mock.expect_get().returning(move |_, _| {
            let body = body.clone();
            Box::pin(async move {
                Ok(HttpResponse { status: 200, body })
            })
        });
        TableClient::connect("https://auth.example.test", "k", Arc::new(mock))
    }

    #[tokio::test]
    async fn correct_password_yields_identity() {
        let client = client_returning(user_row_body("ana", &hash_of("s3cret"), "admin"));
        let identity = authenticate(&client, "users", &credentials("ana", "s3cret"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(identity.username, "ana");
        assert_eq!(identity.role, "admin");
    }

    #[tokio::test]
    async fn wrong_password_yields_none() {
        let client = client_returning(user_row_body("ana", &hash_of("s3cret"), "admin"));
        let result = authenticate(&client, "users", &credentials("ana", "wrong"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn username_with_query_metacharacters_authenticates() {
        // A signup stores the raw username via JSON body; the login lookup
        // must query that same name, not a spliced filter list.
        let hash = hash_of("pw");
        let body = user_row_body("a&b=c", &hash, "viewer");
        let mut mock = MockHttpClient::new();
        mock.expect_get()
            .withf(|url, _| url.contains("username=eq.a%26b%3Dc") && !url.contains("&b=c"))
            .returning(move |_, _| {
                let body = body.clone();
                Box::pin(async move { Ok(HttpResponse { status: 200, body }) })
            });
        let client = TableClient::connect("https://auth.example.test", "k", Arc::new(mock));

        let identity = authenticate(&client, "users", &credentials("a&b=c", "pw"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(identity.username, "a&b=c");
    }

    #[tokio::test]
    async fn unknown_user_yields_none() {
        let client = client_returning("[]".to_string());
        let result = authenticate(&client, "users", &credentials("ghost", "pw"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn corrupt_stored_hash_is_an_auth_error() {
        let client = client_returning(user_row_body("ana", "not-a-phc-string", "admin"));
        let err = authenticate(&client, "users", &credentials("ana", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::VitrineError::Auth(_)));
    }

    #[tokio::test]
    async fn backend_failure_propagates() {
        let mut mock = MockHttpClient::new();
        mock.expect_get().returning(|_, _| {
            Box::pin(async { Err(crate::VitrineError::Http("timeout".to_string())) })
        });
        let client = TableClient::connect("https://auth.example.test", "k", Arc::new(mock));

        let err = authenticate(&client, "users", &credentials("ana", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::VitrineError::BackendUnavailable(_)));
    }

    #[tokio::test]
    async fn signup_hashes_password_and_assigns_default_role() {
        let mut mock = MockHttpClient::new();
        mock.expect_get()
            .returning(|_, _| Box::pin(async { Ok(HttpResponse { status: 200, body: "[]".to_string() }) }));
        mock.expect_post_json()
            .withf(|_, _, body| {
                let row: UserRow = serde_json::from_str(body).unwrap();
                // Stored as a PHC string, never plaintext
                row.password.starts_with("$argon2") && row.role == "viewer"
            })
            .returning(|_, _, body| {
                let body = format!("[{}]", body);
                Box::pin(async move { Ok(HttpResponse { status: 201, body }) })
            });
        let client = TableClient::connect("https://auth.example.test", "k", Arc::new(mock));

        let identity = signup(&client, "users", &credentials("bea", "pw"))
            .await
            .unwrap();
        assert_eq!(identity.username, "bea");
        assert_eq!(identity.role, "viewer");
    }

    #[tokio::test]
    async fn signup_rejects_taken_username() {
        let client = client_returning(user_row_body("ana", &hash_of("pw"), "viewer"));
        let err = signup(&client, "users", &credentials("ana", "pw"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already taken"));
    }

    #[tokio::test]
    async fn signup_round_trip_authenticates() {
        // The hash produced by signup must verify with the same password
        let hash = hash_of("pw123");
        let client = client_returning(user_row_body("bea", &hash, "viewer"));
        let identity = authenticate(&client, "users", &credentials("bea", "pw123"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(identity.role, "viewer");
    }
}
