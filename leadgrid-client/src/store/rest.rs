/// REST client for the hosted record store
///
/// This module implements [`RecordStore`], [`HierarchyService`], and
/// [`AuditSink`] against the hosted backend's REST surface. Leads live in
/// a `leads` resource queried with PostgREST-style filters and `Range`
/// headers; the hierarchy query is exposed as an RPC endpoint; the audit
/// log is a plain insert target.
///
/// # Requests
///
/// ```text
/// GET    {base}/leads?select=*&is_converted=eq.false&order=created_at.desc
///        Range: {offset}-{offset+limit-1}
/// GET    {base}/lead_statuses?select=*&order=id.asc
/// PATCH  {base}/leads?id=in.(a,b,c)          body: mutation patch
/// DELETE {base}/leads?id=in.(a,b,c)
/// POST   {base}/rpc/subordinates_of          body: {"viewer_id": ...}
/// POST   {base}/audit_log                    body: audit entry
/// ```
///
/// Authentication headers are attached from configuration; the access
/// token itself is minted by the external auth service. Failed requests
/// map to [`StoreError`] and are never retried here.
///
/// # Example
///
/// ```no_run
/// use leadgrid_client::store::rest::RestStore;
/// use leadgrid_client::store::{PageRequest, RecordStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = RestStore::new(
///     "https://records.example.com/rest/v1",
///     "service-key",
///     "viewer-access-token",
/// );
///
/// let first_page = store.fetch_leads_page(PageRequest::page(0, 1000)).await?;
/// println!("fetched {} leads", first_page.len());
/// # Ok(())
/// # }
/// ```

use crate::store::{AuditSink, HierarchyService, PageRequest, RecordStore, StoreError};
use async_trait::async_trait;
use leadgrid_shared::models::audit::AuditEntry;
use leadgrid_shared::models::lead::{Lead, LeadMutation};
use leadgrid_shared::models::status::{LeadStatus, StatusCatalog};
use leadgrid_shared::models::viewer::SubordinateSet;
use reqwest::header;
use serde_json::json;
use uuid::Uuid;

/// REST-backed store client
#[derive(Debug, Clone)]
pub struct RestStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    access_token: String,
}

impl RestStore {
    /// Creates a client against the given REST base URL
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        RestStore {
            http: reqwest::Client::new(),
            base_url,
            api_key: api_key.into(),
            access_token: access_token.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.access_token),
            )
    }

    /// `id=in.(a,b,c)` filter value for an identity set
    fn id_filter(ids: &[Uuid]) -> String {
        let joined = ids
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(",");
        format!("in.({})", joined)
    }

    /// Reads the body of a successful response, or maps the rejection
    async fn read_success(response: reqwest::Response) -> Result<String, StoreError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.text().await?)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(StoreError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl RecordStore for RestStore {
    async fn fetch_leads_page(&self, page: PageRequest) -> Result<Vec<Lead>, StoreError> {
        let request = self
            .authed(self.http.get(self.endpoint("leads")))
            .query(&[
                ("select", "*"),
                ("is_converted", "eq.false"),
                ("order", "created_at.desc"),
            ])
            .header(header::RANGE, format!("{}-{}", page.offset, page.range_end()))
            .header("Range-Unit", "items");

        let body = Self::read_success(request.send().await?).await?;
        let leads: Vec<Lead> = serde_json::from_str(&body)?;
        Ok(leads)
    }

    async fn fetch_statuses(&self) -> Result<StatusCatalog, StoreError> {
        let request = self
            .authed(self.http.get(self.endpoint("lead_statuses")))
            .query(&[("select", "*"), ("order", "id.asc")]);

        let body = Self::read_success(request.send().await?).await?;
        let statuses: Vec<LeadStatus> = serde_json::from_str(&body)?;
        Ok(StatusCatalog::new(statuses))
    }

    async fn update_leads(&self, ids: &[Uuid], mutation: &LeadMutation) -> Result<(), StoreError> {
        let request = self
            .authed(self.http.patch(self.endpoint("leads")))
            .query(&[("id", Self::id_filter(ids))])
            .header("Prefer", "return=minimal")
            .json(&mutation.patch_body());

        Self::read_success(request.send().await?).await?;
        Ok(())
    }

    async fn delete_leads(&self, ids: &[Uuid]) -> Result<(), StoreError> {
        let request = self
            .authed(self.http.delete(self.endpoint("leads")))
            .query(&[("id", Self::id_filter(ids))]);

        Self::read_success(request.send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl HierarchyService for RestStore {
    async fn subordinates_of(&self, viewer_id: Uuid) -> Result<SubordinateSet, StoreError> {
        let request = self
            .authed(self.http.post(self.endpoint("rpc/subordinates_of")))
            .json(&json!({ "viewer_id": viewer_id }));

        let body = Self::read_success(request.send().await?).await?;
        let ids: Vec<Uuid> = serde_json::from_str(&body)?;
        Ok(ids.into_iter().collect())
    }
}

#[async_trait]
impl AuditSink for RestStore {
    async fn append(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        let request = self
            .authed(self.http.post(self.endpoint("audit_log")))
            .header("Prefer", "return=minimal")
            .json(entry);

        Self::read_success(request.send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn lead_row(id: Uuid) -> serde_json::Value {
        json!({
            "id": id,
            "first_name": "Test",
            "last_name": "Lead",
            "email": null,
            "phone": null,
            "status": "new",
            "assigned_to": null,
            "desk": null,
            "is_converted": false,
            "created_at": "2025-01-04T12:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_fetch_page_sends_range_and_filters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/leads")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("select".into(), "*".into()),
                Matcher::UrlEncoded("is_converted".into(), "eq.false".into()),
                Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
            ]))
            .match_header("range", "1000-1999")
            .match_header("range-unit", "items")
            .match_header("apikey", "key")
            .match_header("authorization", "Bearer token")
            .with_status(200)
            .with_body(json!([lead_row(Uuid::new_v4())]).to_string())
            .create_async()
            .await;

        let store = RestStore::new(server.url(), "key", "token");
        let leads = store
            .fetch_leads_page(PageRequest::page(1, 1000))
            .await
            .unwrap();

        assert_eq!(leads.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_patches_identity_set() {
        let mut server = mockito::Server::new_async().await;
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let mock = server
            .mock("PATCH", "/leads")
            .match_query(Matcher::UrlEncoded(
                "id".into(),
                format!("in.({},{})", a, b),
            ))
            .match_body(Matcher::Json(json!({ "status": "contacted" })))
            .with_status(204)
            .create_async()
            .await;

        let store = RestStore::new(server.url(), "key", "token");
        store
            .update_leads(&[a, b], &LeadMutation::SetStatus("contacted".to_string()))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_clear_assignment_patches_null() {
        let mut server = mockito::Server::new_async().await;
        let id = Uuid::new_v4();

        let mock = server
            .mock("PATCH", "/leads")
            .match_body(Matcher::Json(json!({ "assigned_to": null })))
            .match_query(Matcher::Any)
            .with_status(204)
            .create_async()
            .await;

        let store = RestStore::new(server.url(), "key", "token");
        store
            .update_leads(&[id], &LeadMutation::Assign(None))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejection_maps_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/leads")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body("permission denied")
            .create_async()
            .await;

        let store = RestStore::new(server.url(), "key", "token");
        let err = store
            .fetch_leads_page(PageRequest::page(0, 1000))
            .await
            .unwrap_err();

        match err {
            StoreError::Rejected { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "permission denied");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_subordinates_rpc() {
        let mut server = mockito::Server::new_async().await;
        let viewer = Uuid::new_v4();
        let sub = Uuid::new_v4();

        server
            .mock("POST", "/rpc/subordinates_of")
            .match_body(Matcher::Json(json!({ "viewer_id": viewer })))
            .with_status(200)
            .with_body(json!([sub]).to_string())
            .create_async()
            .await;

        let store = RestStore::new(server.url(), "key", "token");
        let subs = store.subordinates_of(viewer).await.unwrap();

        assert!(subs.contains(sub));
        assert_eq!(subs.len(), 1);
    }

    #[tokio::test]
    async fn test_audit_append_posts_entry() {
        let mut server = mockito::Server::new_async().await;
        let lead_id = Uuid::new_v4();

        let mock = server
            .mock("POST", "/audit_log")
            .match_body(Matcher::Json(json!({
                "lead_id": lead_id,
                "type": "deletion",
                "description": "Ada Byron deleted"
            })))
            .with_status(201)
            .create_async()
            .await;

        let store = RestStore::new(server.url(), "key", "token");
        store
            .append(&AuditEntry::deletion(lead_id, "Ada Byron"))
            .await
            .unwrap();

        mock.assert_async().await;
    }
}
