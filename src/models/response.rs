// src/models/response.rs

use serde::Serialize;
use utoipa::ToSchema;

/// Body returned by endpoints that remove something.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActionResponse {
    pub success: bool,
    #[schema(example = "Sale cancelled and stock restored")]
    pub message: String,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }
}
