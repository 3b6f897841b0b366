use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;

/// Status and body of a settled HTTP exchange, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, value: &Value) -> Self {
        Self::new(status, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Server verdict on an action or form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Success { message: String },
    Failure { detail: Option<String> },
}

impl ActionOutcome {
    /// Interpret a `{ success, message?, detail? }` response.
    ///
    /// Any non-2xx status is a failure whatever the body says; only the `detail`
    /// text is salvaged from it. A 2xx body must be a JSON object with a boolean
    /// `success`, anything else is `ApiError::Malformed`.
    pub fn parse(raw: &RawResponse) -> Result<Self, ApiError> {
        let value: Option<Value> = serde_json::from_slice(&raw.body).ok();

        if !raw.is_success() {
            let detail = value.as_ref().and_then(|v| text_field(v, "detail"));
            return Ok(ActionOutcome::Failure { detail });
        }

        let value = value.ok_or_else(|| ApiError::Malformed {
            status: raw.status,
            reason: "body is not JSON".to_string(),
        })?;

        match value.get("success").and_then(Value::as_bool) {
            Some(true) => Ok(ActionOutcome::Success {
                message: text_field(&value, "message").unwrap_or_default(),
            }),
            Some(false) => Ok(ActionOutcome::Failure {
                detail: text_field(&value, "detail"),
            }),
            None => Err(ApiError::Malformed {
                status: raw.status,
                reason: "missing boolean `success` field".to_string(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Success { .. })
    }
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Dashboard counters served by `GET /admin/get_stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_users: u64,
    pub pro_users: u64,
    pub total_contents: u64,
    pub pending_groups: u64,
}

impl DashboardStats {
    /// `(data-stat key, value)` pairs in display order
    pub fn entries(&self) -> [(&'static str, u64); 4] {
        [
            ("total_users", self.total_users),
            ("pro_users", self.pro_users),
            ("total_contents", self.total_contents),
            ("pending_groups", self.pending_groups),
        ]
    }

    /// `Ok(None)` when the server answers `success: false` or a non-2xx status.
    pub fn parse(raw: &RawResponse) -> Result<Option<Self>, ApiError> {
        if !raw.is_success() {
            return Ok(None);
        }

        let envelope: StatsEnvelope =
            serde_json::from_slice(&raw.body).map_err(|e| ApiError::Malformed {
                status: raw.status,
                reason: e.to_string(),
            })?;

        match (envelope.success, envelope.stats) {
            (false, _) => Ok(None),
            (true, Some(stats)) => Ok(Some(stats)),
            (true, None) => Err(ApiError::Malformed {
                status: raw.status,
                reason: "missing `stats` object".to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatsEnvelope {
    success: bool,
    #[serde(default)]
    stats: Option<DashboardStats>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_with_message() {
        let raw = RawResponse::json(
            200,
            &json!({"success": true, "message": "Utilisateur désactivé"}),
        );
        assert_eq!(
            ActionOutcome::parse(&raw).unwrap(),
            ActionOutcome::Success {
                message: "Utilisateur désactivé".to_string()
            }
        );
    }

    #[test]
    fn test_success_false_keeps_detail() {
        let raw = RawResponse::json(
            200,
            &json!({"success": false, "detail": "Champ requis manquant"}),
        );
        assert_eq!(
            ActionOutcome::parse(&raw).unwrap(),
            ActionOutcome::Failure {
                detail: Some("Champ requis manquant".to_string())
            }
        );
    }

    #[test]
    fn test_non_2xx_is_failure_even_with_success_true() {
        let raw = RawResponse::json(500, &json!({"success": true, "message": "ok"}));
        assert_eq!(
            ActionOutcome::parse(&raw).unwrap(),
            ActionOutcome::Failure { detail: None }
        );
    }

    #[test]
    fn test_non_2xx_non_json_body_is_failure() {
        let raw = RawResponse::new(502, "<html>Bad Gateway</html>");
        assert_eq!(
            ActionOutcome::parse(&raw).unwrap(),
            ActionOutcome::Failure { detail: None }
        );
    }

    #[test]
    fn test_non_string_detail_is_ignored() {
        // Validation errors come back as a list of objects
        let raw = RawResponse::json(422, &json!({"detail": [{"loc": ["body", "reason"]}]}));
        assert_eq!(
            ActionOutcome::parse(&raw).unwrap(),
            ActionOutcome::Failure { detail: None }
        );
    }

    #[test]
    fn test_2xx_without_success_flag_is_malformed() {
        let raw = RawResponse::json(200, &json!({"message": "ok"}));
        assert!(matches!(
            ActionOutcome::parse(&raw),
            Err(ApiError::Malformed { status: 200, .. })
        ));

        let raw = RawResponse::json(200, &json!({"success": "yes"}));
        assert!(matches!(ActionOutcome::parse(&raw), Err(ApiError::Malformed { .. })));
    }

    #[test]
    fn test_2xx_non_json_is_malformed() {
        let raw = RawResponse::new(200, "OK");
        assert!(matches!(ActionOutcome::parse(&raw), Err(ApiError::Malformed { .. })));
    }

    #[test]
    fn test_stats_parse() {
        let raw = RawResponse::json(
            200,
            &json!({
                "success": true,
                "stats": {
                    "total_users": 120,
                    "pro_users": 14,
                    "total_contents": 56,
                    "pending_groups": 3
                }
            }),
        );
        let stats = DashboardStats::parse(&raw).unwrap().unwrap();
        assert_eq!(stats.total_users, 120);
        assert_eq!(stats.entries()[3], ("pending_groups", 3));
    }

    #[test]
    fn test_stats_failure_yields_no_update() {
        let raw = RawResponse::json(200, &json!({"success": false}));
        assert_eq!(DashboardStats::parse(&raw).unwrap(), None);
        let raw = RawResponse::new(403, "");
        assert_eq!(DashboardStats::parse(&raw).unwrap(), None);
    }

    #[test]
    fn test_stats_success_without_payload_is_malformed() {
        let raw = RawResponse::json(200, &json!({"success": true}));
        assert!(DashboardStats::parse(&raw).is_err());
    }
}
