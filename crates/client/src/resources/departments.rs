//! `/departments/*` endpoints.

use std::sync::Arc;

use civic_core::department::{Department, DepartmentOfficer};
use civic_core::types::DbId;

use crate::error::ClientResult;
use crate::http::{ApiClient, ApiRequest};

/// Department directory endpoints.
#[derive(Clone)]
pub struct DepartmentsApi {
    api: Arc<ApiClient>,
}

impl DepartmentsApi {
    /// Handle over the shared HTTP core.
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// `GET /departments/`.
    pub async fn list(&self) -> ClientResult<Vec<Department>> {
        self.api.send_json(ApiRequest::get("/departments/")).await
    }

    /// `GET /departments/{id}/admins/`: officers that complaints in this
    /// department can be assigned to.
    pub async fn admins(&self, department_id: DbId) -> ClientResult<Vec<DepartmentOfficer>> {
        self.api
            .send_json(ApiRequest::get(format!("/departments/{department_id}/admins/")))
            .await
    }
}
