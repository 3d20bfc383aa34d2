//! Shared list-endpoint plumbing: pagination envelope and sort parameters.

use sea_orm::{ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait, Select};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    /// 1-based page and a size clamped to [1, MAX_PAGE_SIZE].
    pub fn normalized(&self) -> (u64, u64) {
        let page = self.page.max(1);
        let size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        (page, size)
    }
}

/// List envelope every collection endpoint returns.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub results: Vec<T>,
    pub count: u64,
    pub current_page: u64,
    pub num_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(results: Vec<T>, count: u64, current_page: u64, page_size: u64) -> Self {
        let num_pages = if count == 0 {
            1
        } else {
            count.div_ceil(page_size)
        };
        Self {
            results,
            count,
            current_page,
            num_pages,
        }
    }
}

/// Run a select through sea-orm's paginator and wrap the page in the
/// envelope.
pub async fn paginate<C, E>(
    conn: &C,
    select: Select<E>,
    params: PaginationParams,
) -> Result<Paginated<E::Model>, ServiceError>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync,
{
    let (page, size) = params.normalized();
    let paginator = select.paginate(conn, size);
    let count = paginator.num_items().await?;
    let results = paginator.fetch_page(page - 1).await?;
    Ok(Paginated::new(results, count, page, size))
}

/// Sort key + direction. Repeating a request with `sort_order=desc` flips
/// the direction, mirroring a table-header toggle.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SortParams {
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortParams {
    pub fn is_descending(&self) -> bool {
        self.sort_order == SortOrder::Desc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_page_math() {
        let p: Paginated<i32> = Paginated::new(vec![], 0, 1, 20);
        assert_eq!(p.num_pages, 1);

        let p: Paginated<i32> = Paginated::new(vec![1, 2], 41, 3, 20);
        assert_eq!(p.num_pages, 3);
        assert_eq!(p.current_page, 3);
    }

    #[test]
    fn params_are_clamped() {
        let params = PaginationParams {
            page: 0,
            page_size: 10_000,
        };
        assert_eq!(params.normalized(), (1, MAX_PAGE_SIZE));
    }

    #[test]
    fn sort_order_defaults_ascending() {
        let params: SortParams = serde_json::from_str("{}").unwrap();
        assert!(!params.is_descending());
        let params: SortParams =
            serde_json::from_str(r#"{"sort_by":"name","sort_order":"desc"}"#).unwrap();
        assert!(params.is_descending());
    }
}
