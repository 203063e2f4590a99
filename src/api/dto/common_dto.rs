//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Paging query parameters for history reads.
///
/// Missing or zero `limit` selects the server default; values above the
/// server maximum are capped.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryParams {
    /// Page size.
    #[serde(default)]
    pub limit: Option<usize>,
    /// Number of messages to skip from the oldest.
    #[serde(default)]
    pub offset: Option<usize>,
}

/// Effective paging echoed back in list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageMeta {
    /// Page size applied.
    pub limit: usize,
    /// Offset applied.
    pub offset: usize,
    /// Items in this page.
    pub count: usize,
}
