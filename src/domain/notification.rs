use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

pub const DEFAULT_TITLE: &str = "TaleemHub";
pub const DEFAULT_BODY: &str = "You have a new notification";
pub const DEFAULT_ICON: &str = "/icons/icon-192x192.png";
pub const DEFAULT_BADGE: &str = "/icons/badge-72x72.png";
pub const DEFAULT_TAG: &str = "taleemhub-notification";
pub const DEFAULT_CLICK_PATH: &str = "/dashboard";

/// One button offered on a displayed notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

/// Fully merged display request. Built fresh from each incoming push
/// message; lives only until the notification is shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    /// Grouping key: showing a second notification with the same tag
    /// replaces the first instead of stacking.
    pub tag: String,
    pub require_interaction: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<NotificationAction>,
    pub data: Value,
}

impl Default for NotificationPayload {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            body: DEFAULT_BODY.to_string(),
            icon: DEFAULT_ICON.to_string(),
            badge: DEFAULT_BADGE.to_string(),
            tag: DEFAULT_TAG.to_string(),
            require_interaction: false,
            actions: Vec::new(),
            data: Value::Object(Map::new()),
        }
    }
}

impl NotificationPayload {
    /// Normalize a raw push message into a complete display request.
    ///
    /// The message is parsed as JSON when possible and each recognized
    /// field is merged over the defaults. Anything that is not a JSON
    /// object (invalid JSON, bare scalars) falls back to plain-text
    /// mode: the message text becomes the body and every other field
    /// keeps its default. An empty message yields the pure default
    /// payload. Parsing never fails.
    pub fn from_push_message(raw: &[u8]) -> Self {
        if raw.is_empty() {
            return Self::default();
        }
        match serde_json::from_slice::<Value>(raw) {
            Ok(Value::Object(fields)) => Self::from_fields(&fields),
            Ok(_) => Self::default(),
            Err(_) => Self {
                body: String::from_utf8_lossy(raw).into_owned(),
                ..Self::default()
            },
        }
    }

    fn from_fields(fields: &Map<String, Value>) -> Self {
        let actions = fields
            .get("actions")
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default();
        Self {
            title: string_or(fields, "title", DEFAULT_TITLE),
            body: string_or(fields, "body", DEFAULT_BODY),
            icon: string_or(fields, "icon", DEFAULT_ICON),
            badge: string_or(fields, "badge", DEFAULT_BADGE),
            tag: string_or(fields, "tag", DEFAULT_TAG),
            require_interaction: fields
                .get("requireInteraction")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            actions,
            data: match fields.get("data") {
                Some(Value::Null) | None => Value::Object(Map::new()),
                Some(value) => value.clone(),
            },
        }
    }

    /// Path the app shell should route to when this notification is
    /// clicked. Falls back to the dashboard when `data.url` is absent.
    pub fn click_target(&self) -> &str {
        self.data
            .get("url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_CLICK_PATH)
    }
}

fn string_or(fields: &Map<String, Value>, key: &str, default: &str) -> String {
    match fields.get(key).and_then(Value::as_str) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => default.to_string(),
    }
}

/// A notification currently on screen, tracked until clicked or closed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveNotification {
    pub id: Uuid,
    #[serde(flatten)]
    pub payload: NotificationPayload,
    #[serde(with = "time::serde::rfc3339")]
    pub delivered_at: OffsetDateTime,
}
