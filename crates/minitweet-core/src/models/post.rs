use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A post as served by the feed endpoint.
///
/// Posts are immutable once created; the client never edits or deletes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Author handle as shown in the feed (`@name`)
    pub fn handle(&self) -> String {
        format!("@{}", self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_feed_entry() {
        let json = r#"{
            "id": 1,
            "user_id": 4,
            "username": "a",
            "content": "hi",
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 1);
        assert_eq!(post.user_id, Some(4));
        assert_eq!(post.username, "a");
        assert_eq!(post.content, "hi");
        assert_eq!(post.created_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_without_user_id() {
        let json = r#"{"id":1,"username":"a","content":"hi","created_at":"2024-01-01T00:00:00Z"}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.user_id, None);
    }

    #[test]
    fn test_parse_offset_timestamp() {
        // Postgres timestamps come back with an offset and fractional seconds
        let json = r#"{"id":2,"username":"b","content":"x","created_at":"2024-03-05T10:15:30.123456+02:00"}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.created_at.to_rfc3339(), "2024-03-05T08:15:30.123456+00:00");
    }

    #[test]
    fn test_handle() {
        let json = r#"{"id":1,"username":"alice","content":"hi","created_at":"2024-01-01T00:00:00Z"}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.handle(), "@alice");
    }
}
