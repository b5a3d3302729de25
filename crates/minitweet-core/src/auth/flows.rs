//! Login and signup flows.
//!
//! Success is recognized only by the marker field of each reply: `token`
//! for login, `id` for signup. Anything else, including a plain-text body,
//! is a rejection.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError, Outcome};
use crate::models::{Credential, LoginForm, SignupForm};

use super::SessionStore;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Signup failed")]
    SignupFailed,

    /// The account exists server-side but the chained login did not succeed
    #[error("Account created, please log in")]
    AccountCreatedLoginFailed,

    #[error(transparent)]
    Transport(#[from] ApiError),

    #[error("Failed to save session: {0}")]
    Storage(anyhow::Error),
}

/// `POST /login` and extract the credential. Does not touch the session.
pub async fn request_login(api: &ApiClient, form: &LoginForm) -> Result<Credential, AuthError> {
    let outcome = api.post("/login", form, None).await?.require_field("token");

    match outcome {
        Outcome::Accepted(Value::String(token)) if !token.is_empty() => Ok(Credential::new(token)),
        Outcome::Accepted(other) => {
            warn!(kind = json_kind(&other), "Login reply carried a non-string token");
            Err(AuthError::InvalidCredentials)
        }
        rejected => {
            debug!(reason = ?rejected.reason(), "Login rejected");
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// `POST /signup`, then chain into login with the same email/password.
pub async fn request_signup(api: &ApiClient, form: &SignupForm) -> Result<Credential, AuthError> {
    let outcome = api.post("/signup", form, None).await?.require_field("id");

    if !outcome.is_accepted() {
        warn!(username = %form.username, reason = ?outcome.reason(), "Signup rejected");
        return Err(AuthError::SignupFailed);
    }
    info!(username = %form.username, "Account created");

    // Retrying signup would now be refused, so every login failure here
    // sends the user to the login form instead
    request_login(api, &form.login_form()).await.map_err(|e| {
        warn!(username = %form.username, error = %e, "Login after signup failed");
        AuthError::AccountCreatedLoginFailed
    })
}

/// Log in and store the resulting credential.
pub async fn login(
    api: &ApiClient,
    session: &mut SessionStore,
    form: &LoginForm,
) -> Result<(), AuthError> {
    let credential = request_login(api, form).await?;
    session.set_credential(credential).map_err(AuthError::Storage)?;
    info!("Login successful");
    Ok(())
}

/// Sign up, log in, and store the resulting credential.
pub async fn signup(
    api: &ApiClient,
    session: &mut SessionStore,
    form: &SignupForm,
) -> Result<(), AuthError> {
    let credential = request_signup(api, form).await?;
    session.set_credential(credential).map_err(AuthError::Storage)?;
    info!(username = %form.username, "Signup successful");
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid credentials");
        assert_eq!(AuthError::SignupFailed.to_string(), "Signup failed");
        assert_eq!(
            AuthError::AccountCreatedLoginFailed.to_string(),
            "Account created, please log in"
        );
    }

    #[test]
    fn test_json_kind() {
        assert_eq!(json_kind(&serde_json::json!(1)), "number");
        assert_eq!(json_kind(&serde_json::json!({})), "object");
    }
}
