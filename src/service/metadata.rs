//! Metadata service: typed objects, queries, identifier resolution

use crate::error::{Error, Result};
use crate::model::{
    Entry, IdentifierQuery, IdentifiersAndUris, MdObject, QueryResult, Restriction, Usages,
    UsedByQuery,
};
use crate::rest::RestClient;
use crate::validate::{non_empty_slice, not_empty};

/// Service for metadata objects within a project
#[derive(Debug, Clone)]
pub struct MetadataService {
    client: RestClient,
}

impl MetadataService {
    pub(crate) fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Create a metadata object; the server assigns its URI
    pub async fn create_obj<T: MdObject>(&self, project_id: &str, obj: &T) -> Result<T> {
        let project_id = not_empty(project_id, "project_id")?;
        self.client
            .post_json(
                &format!("/api/md/{project_id}/objects"),
                serde_json::to_value(obj)?,
            )
            .await
    }

    /// Metadata object by URI
    pub async fn obj_by_uri<T: MdObject>(&self, uri: &str) -> Result<T> {
        let uri = not_empty(uri, "uri")?;
        self.client.get_json(uri).await.map_err(|e| {
            if e.is_not_found_status() {
                Error::ObjectNotFound {
                    what: uri.to_string(),
                }
            } else {
                e
            }
        })
    }

    /// Metadata object by numeric id within a project
    pub async fn obj_by_id<T: MdObject>(&self, project_id: &str, id: &str) -> Result<T> {
        let project_id = not_empty(project_id, "project_id")?;
        let id = not_empty(id, "id")?;
        self.obj_by_uri(&format!("/api/md/{project_id}/objects/{id}"))
            .await
    }

    /// Replace a metadata object at its URI
    pub async fn update_obj<T: MdObject>(&self, obj: &T) -> Result<T> {
        let uri = obj
            .uri()
            .ok_or_else(|| Error::validation("object has no uri"))?
            .to_string();
        self.client
            .put_json(&uri, serde_json::to_value(obj)?)
            .await
            .map_err(|e| {
                if e.is_not_found_status() {
                    Error::ObjectNotFound { what: uri.clone() }
                } else {
                    e
                }
            })
    }

    /// Remove a metadata object
    pub async fn remove_obj<T: MdObject>(&self, obj: &T) -> Result<()> {
        let uri = obj
            .uri()
            .ok_or_else(|| Error::validation("object has no uri"))?;
        self.client.delete(uri).await?;
        Ok(())
    }

    /// Entries of category `T` satisfying every restriction.
    ///
    /// The query endpoint returns the whole category; restrictions are
    /// applied client-side.
    pub async fn find<T: MdObject>(
        &self,
        project_id: &str,
        restrictions: &[Restriction],
    ) -> Result<Vec<Entry>> {
        let project_id = not_empty(project_id, "project_id")?;
        let result: QueryResult = self
            .client
            .get_json(&format!("/api/md/{project_id}/query/{}", T::CATEGORY))
            .await?;

        Ok(result
            .entries
            .into_iter()
            .filter(|entry| restrictions.iter().all(|r| r.matches(entry)))
            .collect())
    }

    /// URIs of entries of category `T` satisfying every restriction
    pub async fn find_uris<T: MdObject>(
        &self,
        project_id: &str,
        restrictions: &[Restriction],
    ) -> Result<Vec<String>> {
        Ok(self
            .find::<T>(project_id, restrictions)
            .await?
            .into_iter()
            .map(|entry| entry.link)
            .collect())
    }

    /// URI of the single entry of category `T` satisfying the
    /// restrictions; missing and ambiguous matches are distinct errors.
    pub async fn find_one_uri<T: MdObject>(
        &self,
        project_id: &str,
        restrictions: &[Restriction],
    ) -> Result<String> {
        let mut uris = self.find_uris::<T>(project_id, restrictions).await?;
        match uris.len() {
            0 => Err(Error::ObjectNotFound {
                what: format!("{} matching restrictions", T::CATEGORY),
            }),
            1 => Ok(uris.remove(0)),
            count => Err(Error::NonUniqueObject {
                category: T::CATEGORY.to_string(),
                count,
            }),
        }
    }

    /// Resolve stable identifiers to object URIs
    pub async fn identifiers_to_uris(
        &self,
        project_id: &str,
        identifiers: &[String],
    ) -> Result<IdentifiersAndUris> {
        let project_id = not_empty(project_id, "project_id")?;
        non_empty_slice(identifiers, "identifiers")?;
        self.client
            .post_json(
                &format!("/api/md/{project_id}/identifiers"),
                serde_json::to_value(IdentifierQuery {
                    identifiers: identifiers.to_vec(),
                })?,
            )
            .await
    }

    /// Which objects use the given ones
    pub async fn used_by(
        &self,
        project_id: &str,
        uris: &[String],
        nearest: bool,
    ) -> Result<Usages> {
        let project_id = not_empty(project_id, "project_id")?;
        non_empty_slice(uris, "uris")?;
        self.client
            .post_json(
                &format!("/api/md/{project_id}/usedby"),
                serde_json::to_value(UsedByQuery {
                    uris: uris.to_vec(),
                    nearest,
                })?,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Metric;
    use crate::rest::RestConfig;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(base: String) -> MetadataService {
        let client =
            RestClient::new(RestConfig::builder().base_url(base).no_throttle().build()).unwrap();
        MetadataService::new(client)
    }

    fn query_body() -> serde_json::Value {
        serde_json::json!({
            "entries": [
                {
                    "link": "/api/md/p1/objects/1",
                    "title": "Total Revenue",
                    "identifier": "revenue.sum",
                    "category": "metric"
                },
                {
                    "link": "/api/md/p1/objects/2",
                    "title": "Average Revenue",
                    "identifier": "revenue.avg",
                    "category": "metric"
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_create_obj_returns_created_metric() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/md/p1/objects"))
            .and(body_partial_json(
                serde_json::json!({"title": "Total Revenue"}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "uri": "/api/md/p1/objects/1",
                "title": "Total Revenue",
                "expression": "SELECT SUM(amount)"
            })))
            .mount(&mock_server)
            .await;

        let metric = service(mock_server.uri())
            .create_obj("p1", &Metric::new("Total Revenue", "SELECT SUM(amount)"))
            .await
            .unwrap();
        assert_eq!(metric.uri.as_deref(), Some("/api/md/p1/objects/1"));
    }

    #[tokio::test]
    async fn test_obj_by_uri_maps_404() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/md/p1/objects/9"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let err = service(mock_server.uri())
            .obj_by_uri::<Metric>("/api/md/p1/objects/9")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ObjectNotFound { .. }));
    }

    #[tokio::test]
    async fn test_find_applies_restrictions_client_side() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/md/p1/query/metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(query_body()))
            .mount(&mock_server)
            .await;

        let service = service(mock_server.uri());
        let all = service.find::<Metric>("p1", &[]).await.unwrap();
        assert_eq!(all.len(), 2);

        let matched = service
            .find::<Metric>("p1", &[Restriction::title("Total Revenue")])
            .await
            .unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].identifier.as_deref(), Some("revenue.sum"));
    }

    #[tokio::test]
    async fn test_find_one_uri_distinguishes_missing_and_ambiguous() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/md/p1/query/metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(query_body()))
            .mount(&mock_server)
            .await;

        let service = service(mock_server.uri());

        let uri = service
            .find_one_uri::<Metric>("p1", &[Restriction::identifier("revenue.sum")])
            .await
            .unwrap();
        assert_eq!(uri, "/api/md/p1/objects/1");

        let missing = service
            .find_one_uri::<Metric>("p1", &[Restriction::identifier("revenue.median")])
            .await
            .unwrap_err();
        assert!(matches!(missing, Error::ObjectNotFound { .. }));

        let ambiguous = service.find_one_uri::<Metric>("p1", &[]).await.unwrap_err();
        match ambiguous {
            Error::NonUniqueObject { category, count } => {
                assert_eq!(category, "metric");
                assert_eq!(count, 2);
            }
            other => panic!("expected NonUniqueObject, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_identifiers_to_uris() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/md/p1/identifiers"))
            .and(body_partial_json(
                serde_json::json!({"identifiers": ["revenue.sum"]}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "identifiers": [
                    {"identifier": "revenue.sum", "uri": "/api/md/p1/objects/1"}
                ]
            })))
            .mount(&mock_server)
            .await;

        let resolved = service(mock_server.uri())
            .identifiers_to_uris("p1", &["revenue.sum".to_string()])
            .await
            .unwrap();
        assert_eq!(resolved.identifiers[0].uri, "/api/md/p1/objects/1");
    }

    #[tokio::test]
    async fn test_validation_rejects_empty_project_id() {
        let mock_server = MockServer::start().await;
        let service = service(mock_server.uri());

        let err = service.find::<Metric>("", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(mock_server.received_requests().await.unwrap().len(), 0);
    }
}
