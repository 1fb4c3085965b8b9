use serde::Serialize;

/// Result of one cursor pagination call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CursorPage<E> {
    pub nodes: Vec<E>,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_cursor: Option<String>,
    pub next_cursor: Option<String>,
    pub count: Option<u64>,
}

/// Result of one page-number pagination call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffsetPage<E> {
    pub nodes: Vec<E>,
    pub has_next: bool,
    pub count: Option<u64>,
}
