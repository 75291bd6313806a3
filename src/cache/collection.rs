use serde::{Deserialize, Serialize};

/// Server-reported pagination metadata.
///
/// Always server-authoritative: the browser never derives these figures
/// from a cached total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
    pub last_page: u32,
    /// 1-based index of the first row on this page, `None` when empty.
    pub from: Option<u64>,
    /// 1-based index of the last row on this page, `None` when empty.
    pub to: Option<u64>,
}

impl Pagination {
    pub fn empty(per_page: u32) -> Self {
        Self {
            current_page: 1,
            per_page,
            total: 0,
            last_page: 1,
            from: None,
            to: None,
        }
    }

    /// Metadata for a page holding `count` rows of a `total`-row collection.
    ///
    /// `last_page` is `ceil(total / per_page)` with a floor of 1.
    pub fn for_page(current_page: u32, per_page: u32, total: u64, count: usize) -> Self {
        let per = u64::from(per_page.max(1));
        let last_page = total.div_ceil(per).max(1);
        let (from, to) = if count == 0 {
            (None, None)
        } else {
            let from = u64::from(current_page.saturating_sub(1)) * per + 1;
            (Some(from), Some(from + count as u64 - 1))
        };
        Self {
            current_page,
            per_page,
            total,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
            from,
            to,
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// One page of rows plus its pagination metadata.
///
/// This is also the wire shape of a list response: `{ rows, pagination }`
/// (`data` is accepted in place of `rows`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResult<R> {
    #[serde(alias = "data")]
    pub rows: Vec<R>,
    pub pagination: Pagination,
}

impl<R> PaginatedResult<R> {
    pub fn empty(per_page: u32) -> Self {
        Self {
            rows: Vec::new(),
            pagination: Pagination::empty(per_page),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Holder of the currently displayed page.
///
/// Replaced wholesale on every accepted response; pages are never merged.
#[derive(Debug, Clone)]
pub struct CollectionCache<R> {
    result: PaginatedResult<R>,
}

impl<R: Clone> CollectionCache<R> {
    pub fn new(per_page: u32) -> Self {
        Self {
            result: PaginatedResult::empty(per_page),
        }
    }

    pub fn replace(&mut self, result: PaginatedResult<R>) {
        self.result = result;
    }

    pub fn clear(&mut self) {
        let per_page = self.result.pagination.per_page;
        self.result = PaginatedResult::empty(per_page);
    }

    pub fn result(&self) -> &PaginatedResult<R> {
        &self.result
    }

}
