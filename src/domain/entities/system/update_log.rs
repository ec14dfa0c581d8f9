use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use crate::db::query::UpdateDefinition;
use crate::domain::entities::Entity;

/// 시스템 업데이트 내역
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateLog {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub update_content: String,
}

impl UpdateLog {
    pub fn new(update_content: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            update_content: update_content.into(),
        }
    }
}

impl Entity for UpdateLog {
    const COLLECTION: Option<&'static str> = Some("yyflight_todolist_updatelog");

    fn id(&self) -> ObjectId {
        self.id
    }

    fn overwrite(&self) -> UpdateDefinition {
        let UpdateLog { id: _, update_content } = self;
        UpdateDefinition::new().set("update_content", update_content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_uses_explicit_mapping() {
        assert_eq!(UpdateLog::collection_name(), "yyflight_todolist_updatelog");
    }

    #[test]
    fn test_overwrite_assigns_content_only() {
        let log = UpdateLog::new("v1.2 배포");

        let update = log.overwrite();

        assert_eq!(update.len(), 1);
        assert_eq!(update.fields().get_str("update_content").unwrap(), "v1.2 배포");
    }
}
