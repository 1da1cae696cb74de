//! Dashboard aggregates.

use nursery_api_models::{DashboardSummary, RecentTransaction};

use super::{Query, require_id};
use crate::client::ApiClient;
use crate::error::ApiResult;

impl ApiClient {
    /// Stock and sales totals for a nursery.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::InvalidArgument`] for a blank id, otherwise
    /// the classified backend error.
    pub async fn dashboard_summary(&self, nursery_id: &str) -> ApiResult<DashboardSummary> {
        let nursery_id = require_id(nursery_id, "nursery")?;
        let query = Query::new().opt("nurseryId", Some(nursery_id)).build();
        self.get("/dashboard/summary", query).await
    }

    /// Latest stock movements for a nursery.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::InvalidArgument`] for a blank id, otherwise
    /// the classified backend error.
    pub async fn recent_transactions(&self, nursery_id: &str) -> ApiResult<Vec<RecentTransaction>> {
        let nursery_id = require_id(nursery_id, "nursery")?;
        let query = Query::new().opt("nurseryId", Some(nursery_id)).build();
        self.get("/dashboard/recent-transactions", query).await
    }
}

#[cfg(test)]
mod tests {
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;
    use crate::error::{ApiError, NETWORK_ERROR, SERVER_ERROR};
    use crate::resources::testing::{config_for, envelope, signed_in};

    #[tokio::test]
    async fn summary_decodes_totals() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET)
                .path("/dashboard/summary")
                .query_param("nurseryId", "n1")
                .header("authorization", "Bearer token-1");
            then.status(200).json_body(envelope(json!({
                "totalSaplingCount": 12,
                "totalInventoryQuantity": 340,
                "salesLast48Hours": 1200.5,
                "salesLastMonth": 8000,
                "salesLastYear": 64000,
                "salesAllTime": 90000
            })));
        });
        let (client, _) = signed_in(&server);

        let summary = client.dashboard_summary("n1").await?;
        assert_eq!(summary.total_sapling_count, 12);
        assert_eq!(summary.total_inventory_quantity, 340);
        Ok(())
    }

    #[tokio::test]
    async fn server_failure_uses_default_message_and_toasts() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/dashboard/summary");
            then.status(503).body("upstream unavailable");
        });
        let (client, _) = signed_in(&server);

        let err = client
            .dashboard_summary("n1")
            .await
            .expect_err("503 should fail");
        assert_eq!(
            err,
            ApiError::Server {
                status: 503,
                message: SERVER_ERROR.to_string()
            }
        );
        err.notify(&client.signals().toasts);
        assert_eq!(client.signals().toasts.toasts()[0].message, SERVER_ERROR);
        assert_eq!(client.signals().loading.count(), 0);
    }

    #[tokio::test]
    async fn forbidden_and_unexpected_statuses_are_classified() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/dashboard/recent-transactions");
            then.status(403).json_body(json!({"message": "denied"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/dashboard/summary");
            then.status(418).json_body(json!({"message": "short and stout"}));
        });
        let (client, _) = signed_in(&server);

        let forbidden = client.recent_transactions("n1").await.expect_err("403");
        assert!(matches!(forbidden, ApiError::Forbidden { .. }));
        assert!(forbidden.is_client_error());

        let teapot = client.dashboard_summary("n1").await.expect_err("418");
        assert_eq!(
            teapot,
            ApiError::Unexpected {
                status: 418,
                message: "short and stout".to_string()
            }
        );
    }

    #[tokio::test]
    async fn undecodable_success_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/dashboard/summary");
            then.status(200).body("<html>maintenance</html>");
        });
        let (client, _) = signed_in(&server);
        assert!(matches!(
            client.dashboard_summary("n1").await,
            Err(ApiError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let mut config = config_for(&server);
        config.api_base_url = "http://127.0.0.1:1".parse()?;
        let client = ApiClient::new(
            config,
            nursery_signals::Signals::new(),
            std::sync::Arc::new(crate::session::MemorySessionStore::new()),
        )?;

        let err = client
            .dashboard_summary("n1")
            .await
            .expect_err("connection refused");
        assert_eq!(
            err,
            ApiError::Network {
                message: NETWORK_ERROR.to_string()
            }
        );
        assert!(err.is_network());
        Ok(())
    }
}
