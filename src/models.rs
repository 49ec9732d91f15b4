use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Collection names in the content store. Field names on the wire stay
// camelCase to match the documents the site has always written.
pub const SERMONS: &str = "sermons";
pub const DEVOTIONALS: &str = "devotionals";
pub const EVENTS: &str = "events";
pub const TESTIMONIES: &str = "testimonies";
pub const PRAYER_REQUESTS: &str = "prayerRequests";
pub const SETTINGS: &str = "settings";

/// Fixed id of the singleton giving-details document in `settings`.
pub const GIVING_DOC_ID: &str = "giving";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Sermon {
    pub title: String,
    pub preacher: String,
    /// Calendar date as entered by the admin, YYYY-MM-DD.
    pub date: String,
    #[serde(default)]
    pub youtube_link: String,
    #[serde(default)]
    pub mixlr_link: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Devotional {
    pub date: String,
    pub title: String,
    pub scripture: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub description: String,
    /// Empty when no image was uploaded; the renderer substitutes the
    /// default event image.
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TestimonyStatus {
    #[default]
    Pending,
    Approved,
}

impl TestimonyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestimonyStatus::Pending => "pending",
            TestimonyStatus::Approved => "approved",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Testimony {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub status: TestimonyStatus,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

fn default_prayer_status() -> String {
    "New".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PrayerRequest {
    pub name: String,
    pub phone: String,
    pub request: String,
    /// Category string chosen on the public form (healing, guidance, ...).
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "default_prayer_status")]
    pub status: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GivingSettings {
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub account_name: String,
}

#[derive(Serialize, Debug, Clone, Copy, Default)]
pub struct DashboardStats {
    pub sermons: usize,
    pub prayers: usize,
    pub testimonies: usize,
    pub events: usize,
}
