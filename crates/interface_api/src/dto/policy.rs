//! Policy DTOs

use serde::{Deserialize, Serialize};

use domain_claims::Policy;

/// Query string of `GET /api/v1/policies`
#[derive(Debug, Default, Deserialize)]
pub struct PolicyQuery {
    /// Restricts the listing to one policyholder
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PolicyListResponse {
    pub policies: Vec<Policy>,
    pub total: usize,
}

impl From<Vec<Policy>> for PolicyListResponse {
    fn from(policies: Vec<Policy>) -> Self {
        let total = policies.len();
        Self { policies, total }
    }
}
