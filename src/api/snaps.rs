use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::api::types::{ActionResponse, BlockRequest, Snap, SnapsResponse};
use crate::api::{ApiClientError, SnapsApiClient};

/// Percent-encoding set for a single path segment (encode everything except unreserved chars).
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode_segment(s: &str) -> String {
    utf8_percent_encode(s, SEGMENT_ENCODE_SET).to_string()
}

impl SnapsApiClient {
    /// Fetch the full snap collection in one request.
    pub async fn fetch_all_snaps(&self) -> Result<Vec<Snap>, ApiClientError> {
        let url = self.url("snaps")?;
        let resp = self.get::<SnapsResponse>(url).await?;
        snaps_from_response(resp)
    }

    /// Block a snap. The author's email travels with the request so the
    /// backend can notify them.
    pub async fn block_snap(&self, snap_id: &str, email: &str) -> Result<(), ApiClientError> {
        let url = self.url(&format!("snaps/{}/block", encode_segment(snap_id)))?;
        let body = self.post(url, Some(&BlockRequest { email })).await?;
        check_action(&body)
    }

    /// Reverse a block.
    pub async fn unblock_snap(&self, snap_id: &str) -> Result<(), ApiClientError> {
        let url = self.url(&format!("snaps/{}/unblock", encode_segment(snap_id)))?;
        let body = self.post::<()>(url, None).await?;
        check_action(&body)
    }

    /// Block when `currently_blocked` is false, unblock otherwise. Returns the
    /// block state the server confirmed.
    pub async fn toggle_block(
        &self,
        snap_id: &str,
        email: &str,
        currently_blocked: bool,
    ) -> Result<bool, ApiClientError> {
        if currently_blocked {
            self.unblock_snap(snap_id).await?;
            Ok(false)
        } else {
            self.block_snap(snap_id, email).await?;
            Ok(true)
        }
    }
}

/// An envelope only counts as a load when it actually carries the list.
fn snaps_from_response(resp: SnapsResponse) -> Result<Vec<Snap>, ApiClientError> {
    match resp {
        SnapsResponse::Bare(snaps) => Ok(snaps),
        SnapsResponse::Envelope {
            success: Some(false),
            message,
            error,
            ..
        } => Err(rejection(message, error)),
        SnapsResponse::Envelope {
            snaps: Some(snaps), ..
        } => Ok(snaps),
        SnapsResponse::Envelope {
            message: None,
            error: None,
            ..
        } => Err(ApiClientError::Deserialize(
            "response carried no snap list".to_string(),
        )),
        SnapsResponse::Envelope { message, error, .. } => Err(rejection(message, error)),
    }
}

fn rejection(message: Option<String>, error: Option<serde_json::Value>) -> ApiClientError {
    let reason = message
        .or_else(|| error.map(|e| e.as_str().map_or_else(|| e.to_string(), str::to_owned)))
        .unwrap_or_else(|| "failed to fetch snaps".to_string());
    ApiClientError::Rejected(reason)
}

/// A 2xx reply confirms the action unless its JSON body says `"success": false`.
/// Empty or non-JSON bodies (e.g. `text/plain`) count as success.
fn check_action(body: &str) -> Result<(), ApiClientError> {
    match serde_json::from_str::<ActionResponse>(body) {
        Ok(ActionResponse {
            success: Some(false),
            message,
        }) => Err(ApiClientError::Rejected(
            message.unwrap_or_else(|| "action rejected".to_string()),
        )),
        Ok(_) => Ok(()),
        Err(_) => {
            tracing::debug!(body, "action reply is not a JSON object; treating as success");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_ids_as_single_segment() {
        assert_eq!(encode_segment("65a1f0"), "65a1f0");
        assert_eq!(encode_segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn action_body_interpretation() {
        assert!(check_action("").is_ok());
        assert!(check_action("{}").is_ok());
        assert!(check_action(r#"{"success": true}"#).is_ok());
        assert!(check_action("Snap blocked").is_ok());
        assert!(check_action("true").is_ok());

        let err = check_action(r#"{"success": false, "message": "already blocked"}"#).unwrap_err();
        assert_eq!(err.to_string(), "request rejected: already blocked");
    }

    fn response(json: &str) -> SnapsResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn envelope_with_snaps_key_loads() {
        let snaps = snaps_from_response(response(
            r#"{"success": true, "snaps": [{"_id": "1"}, {"_id": "2"}]}"#,
        ))
        .unwrap();
        assert_eq!(snaps.len(), 2);

        let snaps = snaps_from_response(response(r#"{"data": []}"#)).unwrap();
        assert!(snaps.is_empty());
    }

    #[test]
    fn envelope_without_list_is_a_failure() {
        assert!(matches!(
            snaps_from_response(response(r#"{"error": "db down"}"#)),
            Err(ApiClientError::Rejected(ref m)) if m == "db down"
        ));
        assert!(matches!(
            snaps_from_response(response(r#"{"success": true}"#)),
            Err(ApiClientError::Deserialize(_))
        ));
        assert!(matches!(
            snaps_from_response(response("{}")),
            Err(ApiClientError::Deserialize(_))
        ));
    }

    #[test]
    fn success_false_is_rejected_even_with_a_list() {
        let err = snaps_from_response(response(
            r#"{"success": false, "snaps": [], "message": "not an admin"}"#,
        ))
        .unwrap_err();
        assert_eq!(err.to_string(), "request rejected: not an admin");

        assert!(matches!(
            snaps_from_response(response(r#"{"success": false}"#)),
            Err(ApiClientError::Rejected(ref m)) if m == "failed to fetch snaps"
        ));
    }
}
