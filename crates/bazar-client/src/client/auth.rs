use bazar_core::User;
use reqwest::Method;
use serde_json::{json, Value};

use super::ApiClient;
use crate::envelope::{first_value, ApiEnvelope};
use crate::error::ClientError;
use crate::normalize::{decode, normalize_user};
use crate::types::RawUser;

/// What the login endpoint returned.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub token: String,
    pub user: Option<User>,
}

impl ApiClient {
    /// Exchanges credentials for a bearer token. Does not touch the session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingToken`] if the response carries no token,
    /// and transport or API errors otherwise.
    pub async fn request_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, ClientError> {
        let env = self
            .send_json(
                Method::POST,
                "auth/login",
                &json!({ "username": username, "password": password }),
            )
            .await?;
        let token = login_token(&env).ok_or(ClientError::MissingToken)?;
        let user = user_value(&env)
            .map(|v| decode::<RawUser>(v, "login user"))
            .transpose()?
            .map(normalize_user);
        Ok(LoginResponse { token, user })
    }

    /// Asks the server who the current token belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] when the token is rejected, and
    /// transport, API or decode errors otherwise.
    pub async fn request_verify(&self) -> Result<Option<User>, ClientError> {
        let env = self.send_json(Method::POST, "auth/verify", &json!({})).await?;
        user_value(&env)
            .map(|v| decode::<RawUser>(v, "verify user").map(normalize_user))
            .transpose()
    }
}

/// The token is either the bare `data` string or `data.token`.
fn login_token(env: &ApiEnvelope) -> Option<String> {
    let token = match &env.data {
        Value::String(s) => Some(s.as_str()),
        _ => first_value(&env.data, &["token"])
            .or_else(|| first_value(&env.raw, &["data.token", "token"]))
            .and_then(Value::as_str),
    };
    token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

fn user_value(env: &ApiEnvelope) -> Option<&Value> {
    first_value(&env.data, &["user"])
        .or_else(|| first_value(&env.raw, &["data.user", "user"]))
        .filter(|v| v.is_object())
}
