//! Sapling (species) catalogue.

use nursery_api_models::{Page, PageRequest, Sapling, SaplingRequest};
use reqwest::Method;

use super::{Query, require_id};
use crate::client::ApiClient;
use crate::error::ApiResult;

const INVALIDATES: &[&str] = &["/saplings", "/breeds", "/inventory", "/dashboard"];

/// Listing filter for saplings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaplingFilter {
    /// Restrict to one nursery.
    pub nursery_id: Option<String>,
    /// Name search; trimmed, and ignored when blank.
    pub search: Option<String>,
}

impl SaplingFilter {
    fn query(&self) -> Query {
        Query::new()
            .opt("nurseryId", self.nursery_id.as_deref())
            .opt("search", self.search.as_deref().map(str::trim))
    }
}

impl ApiClient {
    /// Saplings matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns the classified backend error.
    pub async fn list_saplings(&self, filter: &SaplingFilter) -> ApiResult<Vec<Sapling>> {
        self.get("/saplings", filter.query().build()).await
    }

    /// One page of saplings matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns the classified backend error.
    pub async fn saplings_page(
        &self,
        filter: &SaplingFilter,
        page: PageRequest,
    ) -> ApiResult<Page<Sapling>> {
        self.get("/saplings", filter.query().page(page).build()).await
    }

    /// One sapling.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::InvalidArgument`] for a blank id, otherwise
    /// the classified backend error.
    pub async fn get_sapling(&self, id: &str) -> ApiResult<Sapling> {
        let id = require_id(id, "sapling")?;
        self.get(&format!("/saplings/{id}"), None).await
    }

    /// Create a sapling.
    ///
    /// # Errors
    ///
    /// Returns the classified backend error.
    pub async fn create_sapling(&self, request: &SaplingRequest) -> ApiResult<Sapling> {
        self.send(Method::POST, "/saplings", Some(request), INVALIDATES)
            .await
    }

    /// Replace a sapling.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::InvalidArgument`] for a blank id, otherwise
    /// the classified backend error.
    pub async fn update_sapling(&self, id: &str, request: &SaplingRequest) -> ApiResult<Sapling> {
        let id = require_id(id, "sapling")?;
        self.send(Method::PUT, &format!("/saplings/{id}"), Some(request), INVALIDATES)
            .await
    }

    /// Delete a sapling.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::InvalidArgument`] for a blank id, otherwise
    /// the classified backend error.
    pub async fn delete_sapling(&self, id: &str) -> ApiResult<()> {
        let id = require_id(id, "sapling")?;
        self.send_empty::<()>(Method::DELETE, &format!("/saplings/{id}"), None, INVALIDATES)
            .await
    }
}

#[cfg(test)]
mod tests {
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;
    use crate::resources::testing::{envelope, signed_in};

    fn sapling_json() -> serde_json::Value {
        json!({
            "id": "s1",
            "name": "Rose",
            "nurseryId": "n1",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn search_is_trimmed_and_blank_search_is_dropped() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let searched = server.mock(|when, then| {
            when.method(GET)
                .path("/saplings")
                .query_param("search", "rose")
                .query_param("nurseryId", "n1");
            then.status(200).json_body(envelope(json!([sapling_json()])));
        });
        let (client, _) = signed_in(&server);

        let filter = SaplingFilter {
            nursery_id: Some("n1".to_string()),
            search: Some("  rose ".to_string()),
        };
        let saplings = client.list_saplings(&filter).await?;
        assert_eq!(saplings[0].name, "Rose");
        searched.assert();

        let blank = SaplingFilter {
            nursery_id: None,
            search: Some("   ".to_string()),
        };
        assert_eq!(blank.query().build(), None);
        Ok(())
    }

    #[tokio::test]
    async fn page_request_sends_paging_and_decodes_page() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/saplings")
                .query_param("page", "1")
                .query_param("size", "20");
            then.status(200).json_body(envelope(json!({
                "content": [sapling_json()],
                "totalElements": 21,
                "totalPages": 2,
                "size": 20,
                "number": 1,
                "hasNext": false,
                "hasPrevious": true,
                "isFirst": false,
                "isLast": true
            })));
        });
        let (client, _) = signed_in(&server);

        let page = client
            .saplings_page(&SaplingFilter::default(), PageRequest::new(Some(1), None))
            .await?;
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.describe(), "page 2 of 2");
        mock.assert();
        Ok(())
    }
}
