use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Snap
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snap {
    #[serde(rename = "_id", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_created_at")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hashtags: Hashtags,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_blocked: bool,
}

/// Ids come as strings from document stores and as numbers from SQL backends.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(n) => n.to_string(),
    })
}

/// `null` reads the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Hashtags arrive either as a single display string or as a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Hashtags {
    List(Vec<String>),
    Text(String),
}

impl Default for Hashtags {
    fn default() -> Self {
        Hashtags::List(Vec::new())
    }
}

impl std::fmt::Display for Hashtags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hashtags::List(tags) => f.write_str(&tags.join(", ")),
            Hashtags::Text(text) => f.write_str(text),
        }
    }
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]`, or a bare date.
/// Anything else becomes `None` rather than failing the whole list.
fn deserialize_created_at<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// ---------------------------------------------------------------------------
// Response wrappers
// ---------------------------------------------------------------------------

/// `GET /snaps` answers with either a bare array or an envelope carrying the
/// list under `snaps` (or `data`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SnapsResponse {
    Bare(Vec<Snap>),
    Envelope {
        #[serde(default)]
        success: Option<bool>,
        #[serde(default, alias = "data")]
        snaps: Option<Vec<Snap>>,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        error: Option<serde_json::Value>,
    },
}

/// Body of a block/unblock reply. Every field is optional; an empty 2xx body
/// counts as success.
#[derive(Debug, Default, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BlockRequest<'a> {
    pub email: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn deserializes_mongo_style_snap() {
        let json = r#"{
            "_id": "65a1",
            "message": "hello",
            "username": "ana",
            "email": "ana@example.com",
            "created_at": "2024-01-05T10:30:00.000Z",
            "likes": 3,
            "hashtags": ["rust", "tui"],
            "is_blocked": true
        }"#;
        let snap: Snap = serde_json::from_str(json).unwrap();
        assert_eq!(snap.id, "65a1");
        assert_eq!(snap.likes, 3);
        assert!(snap.is_blocked);
        assert_eq!(snap.hashtags.to_string(), "rust, tui");
        let created = snap.created_at.unwrap();
        assert_eq!((created.year(), created.month(), created.day()), (2024, 1, 5));
        assert_eq!(created.hour(), 10);
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let snap: Snap = serde_json::from_str(r#"{"_id": "1"}"#).unwrap();
        assert_eq!(snap.message, "");
        assert_eq!(snap.likes, 0);
        assert!(!snap.is_blocked);
        assert!(snap.created_at.is_none());
        assert_eq!(snap.hashtags, Hashtags::List(vec![]));
    }

    #[test]
    fn hashtags_accept_plain_text() {
        let snap: Snap = serde_json::from_str(r##"{"_id": "1", "hashtags": "#a #b"}"##).unwrap();
        assert_eq!(snap.hashtags.to_string(), "#a #b");
    }

    #[test]
    fn bare_dates_and_garbage_dates() {
        let d = parse_timestamp("2024-02-10").unwrap();
        assert_eq!((d.month(), d.day(), d.hour()), (2, 10, 0));
        assert!(parse_timestamp("2024-02-10T08:00:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());

        let snap: Snap = serde_json::from_str(r#"{"_id": "1", "created_at": "nope"}"#).unwrap();
        assert!(snap.created_at.is_none());
    }

    #[test]
    fn snaps_response_shapes() {
        let bare: SnapsResponse = serde_json::from_str(r#"[{"_id": "1"}]"#).unwrap();
        assert!(matches!(bare, SnapsResponse::Bare(ref v) if v.len() == 1));

        let env: SnapsResponse =
            serde_json::from_str(r#"{"success": true, "data": [{"_id": "1"}, {"_id": "2"}]}"#)
                .unwrap();
        match env {
            SnapsResponse::Envelope { snaps, .. } => assert_eq!(snaps.unwrap().len(), 2),
            SnapsResponse::Bare(_) => panic!("expected envelope"),
        }

        let env: SnapsResponse =
            serde_json::from_str(r#"{"success": true, "snaps": [{"_id": "1"}]}"#).unwrap();
        assert!(matches!(env, SnapsResponse::Envelope { snaps: Some(ref v), .. } if v.len() == 1));
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let snaps: Vec<Snap> = serde_json::from_str(
            r#"[
                {"_id": "1", "message": "ok"},
                {"_id": "2", "message": null, "username": null, "likes": null,
                 "hashtags": null, "is_blocked": null, "created_at": null}
            ]"#,
        )
        .unwrap();
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[1].message, "");
        assert_eq!(snaps[1].likes, 0);
        assert!(!snaps[1].is_blocked);
        assert_eq!(snaps[1].hashtags, Hashtags::default());
    }

    #[test]
    fn numeric_ids_become_strings() {
        let snap: Snap = serde_json::from_str(r#"{"_id": 1, "message": "hi"}"#).unwrap();
        assert_eq!(snap.id, "1");
        assert!(serde_json::from_str::<Snap>(r#"{"_id": null}"#).is_err());
    }
}
