use serde::{Deserialize, Serialize};

/// Default page size used when a caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Parameters for a paginated listing request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: u32,
    pub size: u32,
    /// Free-text search filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            q: None,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        PageRequest {
            page,
            size,
            q: None,
        }
    }

    pub fn with_query(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }
}

/// One page of results from a paginated endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    /// Whether a further page exists after this one.
    pub fn has_next(&self) -> bool {
        let seen = (self.page as u64 + 1) * self.size as u64;
        seen < self.total
    }
}
