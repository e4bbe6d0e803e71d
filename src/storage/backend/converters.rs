use crate::storage::LinkRecord;
use migration::entities::link;

/// 将 Sea-ORM Model 转换为 LinkRecord
pub fn model_to_record(model: link::Model) -> LinkRecord {
    LinkRecord {
        id: model.id,
        short_code: model.short_code,
        original_url: model.original_url,
        owner_id: model.owner_id,
        clicks: model.clicks.max(0) as u64,
        created_at: model.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_test_model(clicks: i64) -> link::Model {
        link::Model {
            id: "4f1c2d9e-0000-4000-8000-000000000001".to_string(),
            short_code: "abc123".to_string(),
            original_url: "example.com/page".to_string(),
            owner_id: "user-1".to_string(),
            clicks,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_model_to_record_basic() {
        let model = create_test_model(42);
        let expected_id = model.id.clone();

        let record = model_to_record(model);

        assert_eq!(record.id, expected_id);
        assert_eq!(record.short_code, "abc123");
        assert_eq!(record.original_url, "example.com/page");
        assert_eq!(record.owner_id, "user-1");
        assert_eq!(record.clicks, 42);
    }

    #[test]
    fn test_model_to_record_negative_clicks() {
        // 负数应该被转换为 0
        let record = model_to_record(create_test_model(-10));
        assert_eq!(record.clicks, 0);
    }
}
