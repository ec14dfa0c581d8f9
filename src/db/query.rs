//! 조회/갱신 조건을 표현하는 값 타입
//!
//! - [`UpdateDefinition`] - `$set` 필드 할당 목록 (부분 갱신 / 전체 덮어쓰기)
//! - [`Page`] - 1부터 시작하는 페이지 번호와 크기
//! - [`FindQuery`] - 프로젝션 필드와 정렬 조건

use mongodb::bson::{doc, to_document, Bson, Document};
use mongodb::options::FindOptions;
use serde::Serialize;
use crate::core::errors::{AppError, AppResult};

/// `$set` 갱신 정의
///
/// ```rust,ignore
/// let update = UpdateDefinition::new()
///     .set("nick_name", "앨리스")
///     .set("update_date", DateTime::now());
///
/// repo.update_one(doc! { "_id": id }, update).await?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateDefinition {
    fields: Document,
}

impl UpdateDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// 필드 하나에 값을 할당합니다. 같은 필드를 다시 지정하면 마지막 값이 남습니다.
    pub fn set(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.fields.insert(field, value.into());
        self
    }

    /// 직렬화 가능한 패치 객체에서 필드/값 쌍을 추출합니다.
    ///
    /// 직렬화된 모든 필드가 할당 대상이 되며 `_id`는 제외됩니다.
    /// 값이 없는 필드를 건너뛰려면 패치 타입에
    /// `#[serde(skip_serializing_if = "Option::is_none")]`를 붙입니다.
    pub fn from_patch<P: Serialize>(patch: &P) -> AppResult<Self> {
        let mut fields = to_document(patch)
            .map_err(|e| AppError::ValidationError(format!("갱신 객체 직렬화 실패: {}", e)))?;
        fields.remove("_id");

        Ok(Self { fields })
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> &Document {
        &self.fields
    }

    /// `{ "$set": { ... } }` 형태의 갱신 문서로 변환합니다.
    pub fn into_document(self) -> Document {
        doc! { "$set": self.fields }
    }
}

/// 1부터 시작하는 페이지
///
/// `skip = (index - 1) * size`, `limit = size`.
/// 0 이하의 번호나 크기, `skip`이 `i64` 범위를 넘는 번호는 생성 시점에 거부됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    index: i64,
    size: i64,
    skip: u64,
}

impl Page {
    pub fn new(index: i64, size: i64) -> AppResult<Self> {
        if index <= 0 {
            return Err(AppError::ValidationError(format!(
                "page_index는 1 이상이어야 합니다: {}",
                index
            )));
        }
        if size <= 0 {
            return Err(AppError::ValidationError(format!(
                "page_size는 1 이상이어야 합니다: {}",
                size
            )));
        }

        let skip = (index - 1).checked_mul(size).ok_or_else(|| {
            AppError::ValidationError(format!(
                "page_index가 너무 큽니다: {} (page_size {})",
                index, size
            ))
        })?;

        Ok(Self { index, size, skip: skip as u64 })
    }

    pub fn index(&self) -> i64 {
        self.index
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn skip(&self) -> u64 {
        self.skip
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    /// 전체 건수로 총 페이지 수를 계산합니다 (올림).
    pub fn total_pages(&self, total_count: u64) -> u64 {
        total_count.div_ceil(self.size as u64)
    }
}

/// 정렬 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn as_bson(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

/// 목록 조회 옵션 (프로젝션 필드, 정렬)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    fields: Vec<String>,
    sort: Option<Document>,
}

impl FindQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// 반환할 필드를 지정합니다. 비어 있으면 문서 전체를 반환합니다.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// 정렬 키를 추가합니다. 호출 순서가 정렬 우선순위입니다.
    pub fn sort_by(mut self, field: &str, order: SortOrder) -> Self {
        self.sort
            .get_or_insert_with(Document::new)
            .insert(field, order.as_bson());
        self
    }

    pub fn projection(&self) -> Option<Document> {
        if self.fields.is_empty() {
            return None;
        }

        let mut projection = Document::new();
        for field in &self.fields {
            projection.insert(field.as_str(), 1);
        }
        Some(projection)
    }

    pub fn sort(&self) -> Option<&Document> {
        self.sort.as_ref()
    }

    /// 드라이버 `FindOptions`로 변환합니다. 페이지가 주어지면 skip/limit을 설정합니다.
    pub fn to_options(&self, page: Option<Page>) -> FindOptions {
        let mut options = FindOptions::default();
        options.projection = self.projection();
        options.sort = self.sort.clone();

        if let Some(page) = page {
            options.skip = Some(page.skip());
            options.limit = Some(page.limit());
        }

        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[derive(Serialize)]
    struct ProfilePatch {
        #[serde(rename = "_id")]
        id: ObjectId,
        nick_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        head_portrait: Option<String>,
    }

    #[test]
    fn test_update_definition_wraps_fields_in_set() {
        let update = UpdateDefinition::new()
            .set("nick_name", "alice")
            .set("status", 1);

        assert_eq!(update.len(), 2);
        assert_eq!(
            update.into_document(),
            doc! { "$set": { "nick_name": "alice", "status": 1 } }
        );
    }

    #[test]
    fn test_update_definition_from_patch_skips_identifier() {
        let patch = ProfilePatch {
            id: ObjectId::new(),
            nick_name: "앨리스".to_string(),
            head_portrait: None,
        };

        let update = UpdateDefinition::from_patch(&patch).unwrap();

        assert!(!update.contains("_id"));
        assert!(!update.contains("head_portrait"));
        assert_eq!(update.fields().get_str("nick_name").unwrap(), "앨리스");
    }

    #[test]
    fn test_page_skip_and_limit() {
        let first = Page::new(1, 2).unwrap();
        let third = Page::new(3, 2).unwrap();

        assert_eq!(first.skip(), 0);
        assert_eq!(first.limit(), 2);
        assert_eq!(third.skip(), 4);
    }

    #[test]
    fn test_page_rejects_non_positive_values() {
        assert!(matches!(Page::new(0, 10), Err(AppError::ValidationError(_))));
        assert!(matches!(Page::new(-1, 10), Err(AppError::ValidationError(_))));
        assert!(matches!(Page::new(1, 0), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_page_rejects_index_whose_skip_overflows() {
        assert!(matches!(Page::new(i64::MAX, 10), Err(AppError::ValidationError(_))));
        assert!(matches!(
            Page::new(1_000_000_000_000_000_000, 100),
            Err(AppError::ValidationError(_))
        ));

        let last = Page::new(i64::MAX, 1).unwrap();
        assert_eq!(last.skip(), (i64::MAX - 1) as u64);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = Page::new(1, 2).unwrap();

        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(4), 2);
        assert_eq!(page.total_pages(5), 3);
    }

    #[test]
    fn test_find_query_builds_projection_and_sort() {
        let query = FindQuery::new()
            .fields(["nick_name", "email"])
            .sort_by("create_date", SortOrder::Ascending)
            .sort_by("nick_name", SortOrder::Descending);

        assert_eq!(query.projection(), Some(doc! { "nick_name": 1, "email": 1 }));
        assert_eq!(
            query.sort(),
            Some(&doc! { "create_date": 1, "nick_name": -1 })
        );

        let options = query.to_options(Some(Page::new(2, 10).unwrap()));
        assert_eq!(options.skip, Some(10));
        assert_eq!(options.limit, Some(10));
    }

    #[test]
    fn test_empty_find_query_has_no_projection() {
        let options = FindQuery::new().to_options(None);

        assert!(options.projection.is_none());
        assert!(options.sort.is_none());
        assert!(options.skip.is_none());
    }
}
