//! HTTP client for the document API.
//!
//! Every request is authorized through the injected [`CredentialProvider`] and
//! carries trace context headers. Non-success responses are mapped onto the
//! [`ApiError`] taxonomy.

use crate::config::ApiSettings;
use crate::models::{
    BatchOutcome, BatchRequest, DashboardStats, DocumentCollectionResponse, DocumentContent,
    DocumentDetail, DocumentSummary, Finding, FindingComment, FindingCommentListResponse,
    FindingListResponse, FindingQuery, FindingStatus, FindingStatusUpdate, Meeting,
    MeetingListResponse, MeetingQuery, MetadataUpdate, NewAnnotation, NewComment, NewFinding,
    NewMeeting, WriteReceipt,
};
use crate::services::{CredentialProvider, DocumentApi, FindingsApi};
use async_trait::async_trait;
use console_core::error::ApiError;
use console_core::observability::{TracedClientExt, TracedRequest};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, Url};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use validator::Validate;

pub struct ApiClient {
    client: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialProvider>,
}

impl ApiClient {
    pub fn new(
        settings: &ApiSettings,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            ApiError::Config(anyhow::anyhow!(
                "Invalid API base URL '{}': {}",
                settings.base_url,
                e
            ))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(anyhow::anyhow!(
                "API base URL '{}' cannot carry a path",
                settings.base_url
            )));
        }

        Ok(Self {
            client: Client::new(),
            base_url,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorize(&self, request: TracedRequest) -> Result<TracedRequest, ApiError> {
        match self.credentials.access_token() {
            Some(token) => Ok(request.bearer_auth(token.expose_secret())),
            None => Err(ApiError::Unauthorized(
                "No access token available for the document API".to_string(),
            )),
        }
    }

    /// Send an authorized request and map failures onto [`ApiError`].
    async fn execute(&self, url: &Url, request: TracedRequest) -> Result<Response, ApiError> {
        let (request_id, result) = self.authorize(request)?.send().await;

        let response = result.map_err(|e| {
            tracing::error!(
                request_id = %request_id,
                url = %url,
                error = %e,
                "Failed to send request to document API"
            );
            ApiError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status, &body);
        tracing::warn!(
            request_id = %request_id,
            url = %url,
            status = status.as_u16(),
            error = %err,
            "Document API returned an error"
        );
        Err(err)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let request = self.client.traced_get(url.clone());
        let response = self.execute(&url, request).await?;
        Ok(response.json::<T>().await?)
    }

    async fn get_json_with_query<T, Q>(&self, url: Url, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let request = self.client.traced_get(url.clone()).query(query);
        let response = self.execute(&url, request).await?;
        Ok(response.json::<T>().await?)
    }

    async fn post_json<B>(&self, url: Url, body: &B) -> Result<Response, ApiError>
    where
        B: serde::Serialize + ?Sized,
    {
        let request = self.client.traced_post(url.clone()).json(body);
        self.execute(&url, request).await
    }

    async fn put_json<B>(&self, url: Url, body: &B) -> Result<Response, ApiError>
    where
        B: serde::Serialize + ?Sized,
    {
        let request = self.client.traced_put(url.clone()).json(body);
        self.execute(&url, request).await
    }

    /// Read a create/update answer; bodies that are empty or not JSON give the default.
    async fn receipt(response: Response) -> Result<WriteReceipt, ApiError> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Write response carried no receipt");
            WriteReceipt::default()
        }))
    }
}

#[async_trait]
impl DocumentApi for ApiClient {
    #[tracing::instrument(skip(self))]
    async fn list_documents(&self) -> Result<Vec<DocumentSummary>, ApiError> {
        let url = self.endpoint(&["documents"]);
        let response: DocumentCollectionResponse = self.get_json(url).await?;
        let documents = response.into_documents();
        tracing::debug!(count = documents.len(), "Fetched document collection");
        Ok(documents)
    }

    #[tracing::instrument(skip(self))]
    async fn get_document(&self, document_id: &str) -> Result<DocumentDetail, ApiError> {
        let url = self.endpoint(&["documents", document_id]);
        self.get_json(url).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_document_content(&self, document_id: &str) -> Result<DocumentContent, ApiError> {
        let url = self.endpoint(&["documents", document_id, "content"]);
        let request = self.client.traced_get(url.clone());
        let response = self.execute(&url, request).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        Ok(DocumentContent {
            content_type,
            bytes,
        })
    }

    #[tracing::instrument(skip(self, update), fields(fields = update.len()))]
    async fn update_metadata(
        &self,
        document_id: &str,
        update: &MetadataUpdate,
    ) -> Result<(), ApiError> {
        if update.is_empty() {
            return Err(ApiError::Validation(
                "Metadata update has no fields".to_string(),
            ));
        }

        let url = self.endpoint(&["documents", document_id, "metadata"]);
        self.post_json(url, update).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, annotation))]
    async fn add_annotation(
        &self,
        document_id: &str,
        annotation: &NewAnnotation,
    ) -> Result<(), ApiError> {
        annotation.validate()?;

        let url = self.endpoint(&["documents", document_id, "annotations"]);
        self.post_json(url, annotation).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, request), fields(operation = %request.operation, count = request.document_ids.len()))]
    async fn batch_operation(&self, request: &BatchRequest) -> Result<BatchOutcome, ApiError> {
        request.validate()?;

        let url = self.endpoint(&["documents", "batch"]);
        let response = self.post_json(url, request).await?;
        Ok(response.json::<BatchOutcome>().await?)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_document(&self, document_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["documents", document_id]);
        let request = self.client.traced_delete(url.clone());
        self.execute(&url, request).await?;
        Ok(())
    }
}

#[async_trait]
impl FindingsApi for ApiClient {
    #[tracing::instrument(skip(self))]
    async fn list_findings(&self, query: &FindingQuery) -> Result<Vec<Finding>, ApiError> {
        let url = self.endpoint(&["api", "findings"]);
        let response: FindingListResponse = self.get_json_with_query(url, query).await?;
        Ok(response.into_findings())
    }

    #[tracing::instrument(skip(self, finding), fields(severity = ?finding.severity))]
    async fn create_finding(&self, finding: &NewFinding) -> Result<WriteReceipt, ApiError> {
        finding.validate()?;

        let url = self.endpoint(&["api", "findings"]);
        let response = self.post_json(url, finding).await?;
        Self::receipt(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_finding_status(
        &self,
        finding_id: &str,
        status: FindingStatus,
    ) -> Result<WriteReceipt, ApiError> {
        let url = self.endpoint(&["api", "findings", finding_id]);
        let response = self.put_json(url, &FindingStatusUpdate { status }).await?;
        Self::receipt(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn findings_stats(&self) -> Result<DashboardStats, ApiError> {
        let url = self.endpoint(&["api", "findings", "dashboard", "stats"]);
        self.get_json(url).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_meetings(&self, query: &MeetingQuery) -> Result<Vec<Meeting>, ApiError> {
        let url = self.endpoint(&["api", "findings", "meetings", "all"]);
        let response: MeetingListResponse = self.get_json_with_query(url, query).await?;
        Ok(response.into_meetings())
    }

    #[tracing::instrument(skip(self, meeting), fields(scheduled_time = %meeting.scheduled_time))]
    async fn schedule_meeting(&self, meeting: &NewMeeting) -> Result<WriteReceipt, ApiError> {
        meeting.validate()?;

        let url = self.endpoint(&["api", "findings", "meetings"]);
        let response = self.post_json(url, meeting).await?;
        Self::receipt(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_finding_comments(
        &self,
        finding_id: &str,
    ) -> Result<Vec<FindingComment>, ApiError> {
        let url = self.endpoint(&["api", "findings", finding_id, "comments"]);
        let response: FindingCommentListResponse = self.get_json(url).await?;
        Ok(response.into_comments())
    }

    #[tracing::instrument(skip(self, comment))]
    async fn add_finding_comment(
        &self,
        finding_id: &str,
        comment: &NewComment,
    ) -> Result<(), ApiError> {
        comment.validate()?;

        let url = self.endpoint(&["api", "findings", finding_id, "comments"]);
        self.post_json(url, comment).await?;
        Ok(())
    }
}
