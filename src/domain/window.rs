use serde::Serialize;
use time::OffsetDateTime;
use url::Origin;
use uuid::Uuid;

/// An open application window or tab known to the bridge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppWindow {
    pub id: Uuid,
    /// Full URL the window currently shows.
    pub url: String,
    pub focused: bool,
    /// Bridge generation controlling this window, if any. Freshly
    /// opened windows stay uncontrolled until a generation claims them.
    pub controlled_by: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
}

impl AppWindow {
    pub fn origin(&self) -> Option<Origin> {
        url::Url::parse(&self.url).ok().map(|url| url.origin())
    }

    pub fn same_origin(&self, origin: &Origin) -> bool {
        self.origin().as_ref() == Some(origin)
    }
}
