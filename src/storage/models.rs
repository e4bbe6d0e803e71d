use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

/// A stored short link.
///
/// `id` and `created_at` are assigned by the store at insert time and never
/// change afterwards. `clicks` only ever grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: String,
    pub short_code: String,
    pub original_url: String,
    pub owner_id: String,
    #[serde(default)]
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
}

/// Fields the management surface supplies when creating a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLinkRecord {
    pub short_code: String,
    pub original_url: String,
    pub owner_id: String,
}

/// Fields a link can be looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum LinkField {
    ShortCode,
    OwnerId,
}

/// Counter fields that support atomic increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum CounterField {
    Clicks,
}

/// 存储后端信息（健康检查使用）
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BackendInfo {
    pub storage_type: String,
    pub support_click: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_field_names_match_columns() {
        let names: Vec<String> = LinkField::iter().map(|f| f.to_string()).collect();
        assert_eq!(names, vec!["short_code", "owner_id"]);
        assert_eq!(CounterField::Clicks.as_ref(), "clicks");
    }

    #[test]
    fn test_clicks_default_when_missing() {
        let record: LinkRecord = serde_json::from_value(serde_json::json!({
            "id": "1",
            "short_code": "abc123",
            "original_url": "example.com/page",
            "owner_id": "u1",
            "created_at": "2026-10-16T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(record.clicks, 0);
    }
}
