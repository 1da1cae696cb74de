//! Per-nursery branding.

use nursery_api_models::{Theme, ThemeRequest};
use reqwest::Method;

use super::require_id;
use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};

impl ApiClient {
    /// Theme configured for a nursery.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] for a blank id, otherwise the
    /// classified backend error.
    pub async fn nursery_theme(&self, nursery_id: &str) -> ApiResult<Theme> {
        let nursery_id = require_id(nursery_id, "nursery")?;
        self.get(&format!("/theme/nursery/{nursery_id}"), None)
            .await
    }

    /// Update the fields set in `request`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidArgument`] for a blank id or an empty
    /// request, otherwise the classified backend error.
    pub async fn update_theme(&self, nursery_id: &str, request: &ThemeRequest) -> ApiResult<Theme> {
        let nursery_id = require_id(nursery_id, "nursery")?;
        if request.is_empty() {
            return Err(ApiError::invalid_argument("No theme fields to update"));
        }
        self.send(
            Method::POST,
            &format!("/theme/nursery/{nursery_id}"),
            Some(request),
            &["/theme"],
        )
        .await
    }

    /// Backend default theme.
    ///
    /// # Errors
    ///
    /// Returns the classified backend error.
    pub async fn default_theme(&self) -> ApiResult<Theme> {
        self.get("/theme/default", None).await
    }
}

#[cfg(test)]
mod tests {
    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;
    use crate::resources::testing::{envelope, signed_in};

    #[tokio::test]
    async fn update_refreshes_cached_theme() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let stored = envelope(serde_json::to_value(Theme::default())?);
        let read = server.mock(|when, then| {
            when.method(GET).path("/theme/nursery/n1");
            then.status(200).json_body(stored);
        });
        let write = server.mock(|when, then| {
            when.method(POST)
                .path("/theme/nursery/n1")
                .json_body(json!({"primaryColor": "#111111"}));
            then.status(200).json_body(envelope(json!({
                "primaryColor": "#111111",
                "secondaryColor": "#8B5CF6",
                "accentColor": "#10B981",
                "fontFamily": "Inter",
                "fontSizeBase": "16px",
                "borderRadius": "8px",
                "spacingUnit": "8px",
                "themeMode": "light"
            })));
        });
        let (client, _) = signed_in(&server);

        assert_eq!(client.nursery_theme("n1").await?, Theme::default());
        let updated = client
            .update_theme(
                "n1",
                &ThemeRequest {
                    primary_color: Some("#111111".to_string()),
                    ..ThemeRequest::default()
                },
            )
            .await?;
        assert_eq!(updated.primary_color, "#111111");
        client.nursery_theme("n1").await?;
        read.assert_calls(2);
        write.assert();
        Ok(())
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let server = MockServer::start_async().await;
        let (client, _) = signed_in(&server);
        assert!(matches!(
            client.update_theme("n1", &ThemeRequest::default()).await,
            Err(ApiError::InvalidArgument { .. })
        ));
    }
}
