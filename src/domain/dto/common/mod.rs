//! 페이지 요청/응답 공통 DTO

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use crate::config::PagingConfig;
use crate::core::errors::{AppError, AppResult};
use crate::db::query::Page;

/// 쿼리 스트링의 페이지 번호/크기를 [`Page`]로 변환합니다.
///
/// - 번호가 없으면 1, 크기가 없으면 `PagingConfig::default_page_size()`
/// - 0 이하의 값은 `ValidationError`
/// - `PagingConfig::max_page_size()`를 넘는 크기는 `ValidationError`
pub fn resolve_page(page_index: Option<i64>, page_size: Option<i64>) -> AppResult<Page> {
    let size = page_size.unwrap_or_else(PagingConfig::default_page_size);
    let max_size = PagingConfig::max_page_size();

    if size > max_size {
        return Err(AppError::ValidationError(format!(
            "page_size는 {} 이하여야 합니다: {}",
            max_size, size
        )));
    }

    Page::new(page_index.unwrap_or(1), size)
}

/// BSON 시각을 응답용 RFC 3339 문자열로 변환합니다.
pub fn format_date(date: DateTime) -> String {
    date.try_to_rfc3339_string().unwrap_or_default()
}

/// 페이지 목록 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    /// 현재 페이지 번호 (1부터)
    pub page_index: i64,
    pub page_size: i64,
    pub total_pages: u64,
    pub total_count: u64,
}

impl<T> PagedResponse<T> {
    pub fn new(items: Vec<T>, page: Page, total_count: u64) -> Self {
        Self {
            items,
            page_index: page.index(),
            page_size: page.size(),
            total_pages: page.total_pages(total_count),
            total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_page_defaults_to_first_page() {
        if std::env::var("DEFAULT_PAGE_SIZE").is_err() {
            let page = resolve_page(None, None).unwrap();
            assert_eq!(page.index(), 1);
            assert_eq!(page.size(), 10);
        }
    }

    #[test]
    fn test_resolve_page_rejects_invalid_values() {
        assert!(resolve_page(Some(0), Some(10)).is_err());
        assert!(resolve_page(Some(1), Some(-5)).is_err());

        if std::env::var("MAX_PAGE_SIZE").is_err() {
            assert!(resolve_page(Some(1), Some(101)).is_err());
        }
    }

    #[test]
    fn test_resolve_page_rejects_huge_page_index() {
        let result = resolve_page(Some(1_000_000_000_000_000_000), Some(100));
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_paged_response_totals() {
        let page = Page::new(3, 2).unwrap();
        let response = PagedResponse::new(vec!["e"], page, 5);

        assert_eq!(response.page_index, 3);
        assert_eq!(response.total_pages, 3);
        assert_eq!(response.total_count, 5);
    }

    #[test]
    fn test_format_date_is_rfc3339() {
        let formatted = format_date(DateTime::from_millis(0));
        assert!(formatted.starts_with("1970-01-01T00:00:00"));
    }
}
