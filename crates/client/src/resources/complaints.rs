//! `/complaints/*` endpoints.

use std::sync::Arc;

use civic_core::complaint::{
    Assignment, Complaint, ComplaintCode, ComplaintStatus, FeedQuery, NewComplaint, StatusUpdate,
    SubmittedComplaint, UpvoteResult,
};
use civic_core::types::DbId;

use crate::error::ClientResult;
use crate::http::{ApiClient, ApiRequest, MultipartBody};

/// Result of a public tracking lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackOutcome {
    /// The matching complaint.
    Found(Box<Complaint>),
    /// No complaint carries the requested identifier.
    NotFound,
}

impl TrackOutcome {
    /// The complaint, if one was found.
    pub fn found(self) -> Option<Complaint> {
        match self {
            Self::Found(complaint) => Some(*complaint),
            Self::NotFound => None,
        }
    }
}

/// Complaint submission, tracking, feed, and triage endpoints.
#[derive(Clone)]
pub struct ComplaintsApi {
    api: Arc<ApiClient>,
}

impl ComplaintsApi {
    /// Handle over the shared HTTP core.
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// `POST /complaints/` as multipart.
    ///
    /// The first image goes in the `image` field, any further images in
    /// repeated `images` fields.
    pub async fn submit(&self, complaint: &NewComplaint) -> ClientResult<SubmittedComplaint> {
        complaint.check()?;

        let mut body = MultipartBody::new();
        for (name, value) in complaint.form_fields() {
            body = body.text(name, value);
        }
        for (index, image) in complaint.images.iter().enumerate() {
            let field = if index == 0 { "image" } else { "images" };
            body = body.file(field, image.clone());
        }

        let submitted: SubmittedComplaint = self
            .api
            .send_json(ApiRequest::post("/complaints/").with_multipart(body))
            .await?;

        tracing::info!(
            complaint_id = %submitted.complaint.complaint_id,
            category = %complaint.category,
            images = complaint.images.len(),
            "Complaint submitted",
        );
        Ok(submitted)
    }

    /// `GET /complaints/track/{code}/`. A `404` is reported as
    /// [`TrackOutcome::NotFound`]; every other failure is an error.
    pub async fn track(&self, code: &str) -> ClientResult<TrackOutcome> {
        let code = ComplaintCode::parse(code)?;
        let request = ApiRequest::get(format!("/complaints/track/{code}/"));
        match self.api.send_json::<Complaint>(request).await {
            Ok(complaint) => Ok(TrackOutcome::Found(Box::new(complaint))),
            Err(e) if e.is_not_found() => {
                tracing::debug!(complaint_id = %code, "Complaint not found");
                Ok(TrackOutcome::NotFound)
            }
            Err(e) => Err(e),
        }
    }

    /// `GET /complaints/`.
    pub async fn list(&self) -> ClientResult<Vec<Complaint>> {
        self.api.send_json(ApiRequest::get("/complaints/")).await
    }

    /// `GET /complaints/{id}/`.
    pub async fn get(&self, id: DbId) -> ClientResult<Complaint> {
        self.api
            .send_json(ApiRequest::get(format!("/complaints/{id}/")))
            .await
    }

    /// `PATCH /complaints/{id}/` with `{"status": ...}`.
    pub async fn update_status(
        &self,
        id: DbId,
        status: ComplaintStatus,
    ) -> ClientResult<Complaint> {
        let request =
            ApiRequest::patch(format!("/complaints/{id}/")).json(&StatusUpdate { status })?;
        self.api.send_json(request).await
    }

    /// `POST /complaints/{id}/assign/`.
    pub async fn assign(&self, id: DbId, assignment: &Assignment) -> ClientResult<Complaint> {
        assignment.check()?;
        let request = ApiRequest::post(format!("/complaints/{id}/assign/")).json(assignment)?;
        self.api.send_json(request).await
    }

    /// `GET /complaints/public/` with only the set filters in the query.
    pub async fn public_feed(&self, query: &FeedQuery) -> ClientResult<Vec<Complaint>> {
        query.check()?;
        let request = ApiRequest::get("/complaints/public/").with_query(query.to_pairs());
        self.api.send_json(request).await
    }

    /// `POST /complaints/{id}/upvote/`. Toggles the caller's upvote.
    pub async fn toggle_upvote(&self, id: DbId) -> ClientResult<UpvoteResult> {
        self.api
            .send_json(ApiRequest::post(format!("/complaints/{id}/upvote/")))
            .await
    }
}
