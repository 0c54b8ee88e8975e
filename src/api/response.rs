use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

/// Additional metadata about the response
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct ResponseMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        let metadata = self.metadata.take().unwrap_or_default();
        self.metadata = Some(ResponseMetadata { total_count: Some(count), ..metadata });
        self
    }

    pub fn with_pagination(mut self, page: &Pagination, total: usize) -> Self {
        self.metadata = Some(ResponseMetadata {
            total_count: Some(total),
            page: Some(page.page),
            page_size: Some(page.page_size),
        });
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// `?page=&page_size=` query, 1-based
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, page_size: 20 }
    }
}

impl Pagination {
    pub const MAX_PAGE_SIZE: usize = 100;

    pub fn limit(&self) -> usize {
        self.page_size.clamp(1, Self::MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> usize {
        self.page.max(1).saturating_sub(1).saturating_mul(self.limit())
    }

    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.offset()).take(self.limit()).collect()
    }
}

/// Helper to create a success response
pub fn success<T: Serialize>(data: T) -> ApiResponse<T> {
    ApiResponse::success(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let response = success("test data");
        assert!(response.success);
        assert_eq!(response.data, "test data");
        assert!(response.metadata.is_none());
    }

    #[test]
    fn test_response_with_pagination() {
        let page = Pagination { page: 2, page_size: 20 };
        let metadata = success("data").with_pagination(&page, 100).metadata.unwrap();
        assert_eq!(metadata.page, Some(2));
        assert_eq!(metadata.page_size, Some(20));
        assert_eq!(metadata.total_count, Some(100));
    }

    #[test]
    fn pagination_clamps_and_slices() {
        let page = Pagination { page: 0, page_size: 1000 };
        assert_eq!(page.limit(), Pagination::MAX_PAGE_SIZE);
        assert_eq!(page.offset(), 0);

        let page = Pagination { page: 2, page_size: 3 };
        assert_eq!(page.slice((1..=10).collect()), vec![4, 5, 6]);
    }
}
