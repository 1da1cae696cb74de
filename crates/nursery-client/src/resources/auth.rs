//! Login, logout and the current operator.

use nursery_api_models::{LoginRequest, LoginResponse, User};
use reqwest::Method;
use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::session::Session;

impl ApiClient {
    /// Exchange credentials for a token and persist the session.
    ///
    /// # Errors
    ///
    /// Returns the classified backend error, or [`crate::ApiError::Session`]
    /// when the session cannot be stored.
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<User> {
        let response: LoginResponse = self
            .send(Method::POST, "/auth/login", Some(credentials), &[])
            .await?;
        let user = response.user.clone();
        self.install_session(Session {
            token: response.token,
            user: response.user,
        })?;
        info!(user_id = %user.id, "signed in");
        Ok(user)
    }

    /// Operator behind the current token.
    ///
    /// # Errors
    ///
    /// Returns the classified backend error.
    pub async fn current_user(&self) -> ApiResult<User> {
        self.get("/auth/me", None).await
    }

    /// Forget the session locally. The backend keeps no logout state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::Session`] when the stored session cannot be
    /// removed.
    pub fn logout(&self) -> ApiResult<()> {
        self.drop_session()?;
        info!("signed out");
        Ok(())
    }
}
