//! Paged list resources
//!
//! List endpoints return a page of items plus a `paging` block whose
//! `next` link addresses the following page. [`collect_all`] walks the
//! links eagerly; [`stream_pages`] exposes them as a `futures` stream.

use crate::error::Result;
use crate::rest::{RequestConfig, RestClient};
use futures::Stream;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Requested window of a paged listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Index of the first item
    pub offset: u32,
    /// Maximum number of items to return
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 100,
        }
    }
}

impl Page {
    /// Page starting at `offset` with up to `limit` items
    pub fn new(offset: u32, limit: u32) -> Self {
        Self { offset, limit }
    }

    /// Query parameters addressing this page
    pub fn apply(self, config: RequestConfig) -> RequestConfig {
        config
            .query("offset", self.offset.to_string())
            .query("limit", self.limit.to_string())
    }
}

/// Paging block of a list response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paging {
    /// Offset of the returned window
    #[serde(default)]
    pub offset: Option<u32>,
    /// Number of items in the returned window
    #[serde(default)]
    pub count: Option<u32>,
    /// URI of the next page; absent on the last page
    #[serde(default)]
    pub next: Option<String>,
}

/// One page of a list resource
#[derive(Debug, Clone, Deserialize)]
pub struct PagedItems<T> {
    /// Items of this page
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Paging block
    #[serde(default)]
    pub paging: Paging,
}

impl<T> PagedItems<T> {
    /// URI of the next page, if any
    pub fn next_uri(&self) -> Option<&str> {
        self.paging.next.as_deref()
    }
}

/// Fetch every page starting at `first_uri` and collect all items.
pub async fn collect_all<T: DeserializeOwned>(
    client: &RestClient,
    first_uri: impl Into<String>,
) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut next = Some(first_uri.into());

    while let Some(uri) = next {
        let page: PagedItems<T> = client.get_json(&uri).await?;
        next = page.next_uri().map(String::from);
        items.extend(page.items);
    }

    Ok(items)
}

/// Stream of pages starting at `first_uri`, fetched lazily.
pub fn stream_pages<T: DeserializeOwned>(
    client: RestClient,
    first_uri: impl Into<String>,
) -> impl Stream<Item = Result<PagedItems<T>>> {
    futures::stream::try_unfold(Some(first_uri.into()), move |state| {
        let client = client.clone();
        async move {
            let Some(uri) = state else {
                return Ok(None);
            };
            let page: PagedItems<T> = client.get_json(&uri).await?;
            let next = page.next_uri().map(String::from);
            Ok(Some((page, next)))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::RestConfig;
    use futures::TryStreamExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base: String) -> RestClient {
        RestClient::new(RestConfig::builder().base_url(base).no_throttle().build()).unwrap()
    }

    #[test]
    fn test_page_query_params() {
        let config = Page::new(200, 50).apply(RequestConfig::new());
        assert_eq!(config.query.get("offset"), Some(&"200".to_string()));
        assert_eq!(config.query.get("limit"), Some(&"50".to_string()));
    }

    async fn mount_two_pages(mock_server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/projects"))
            .and(query_param("offset", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"n": 3}],
                "paging": { "offset": 2, "count": 1 }
            })))
            .mount(mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"n": 1}, {"n": 2}],
                "paging": { "offset": 0, "count": 2, "next": "/api/projects?offset=2" }
            })))
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn test_collect_all_follows_next_links() {
        let mock_server = MockServer::start().await;
        mount_two_pages(&mock_server).await;

        let items: Vec<serde_json::Value> =
            collect_all(&client(mock_server.uri()), "/api/projects")
                .await
                .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[2]["n"], 3);
    }

    #[tokio::test]
    async fn test_stream_pages_is_lazy() {
        let mock_server = MockServer::start().await;
        mount_two_pages(&mock_server).await;

        let pages: Vec<PagedItems<serde_json::Value>> =
            stream_pages(client(mock_server.uri()), "/api/projects")
                .try_collect()
                .await
                .unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].items.len(), 2);
        assert_eq!(pages[1].items.len(), 1);
        assert!(pages[1].next_uri().is_none());
    }

    #[tokio::test]
    async fn test_single_page_without_next() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/roles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"n": 1}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let items: Vec<serde_json::Value> = collect_all(&client(mock_server.uri()), "/api/roles")
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
    }
}
