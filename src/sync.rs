use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::{
    self, DashboardStats, Devotional, Event, PrayerRequest, Sermon, Testimony, TestimonyStatus,
};
use crate::store::{ContentStore, Direction, StoreQuery};

/// Which side of the site a sync call serves. The surface decides fetch
/// limits and filters applied to the same underlying collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Public,
    Admin,
}

pub const PUBLIC_SERMON_LIMIT: usize = 6;
pub const PUBLIC_TESTIMONY_LIMIT: usize = 6;

/// Media channel resolved from a sermon's links. A YouTube link wins over a
/// Mixlr link when both are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaKind {
    Video { video_id: String },
    Audio { link: String },
    None,
}

/// Pull the platform video id out of a YouTube link: the `v=` query
/// parameter when present, else the last path segment. Unrecognized formats
/// yield the unparsed remainder; there is no hard validation.
pub fn extract_video_id(link: &str) -> String {
    if let Some((_, rest)) = link.split_once("v=") {
        let id = rest.split('&').next().unwrap_or("");
        if !id.is_empty() {
            return id.to_string();
        }
    }
    link.rsplit('/').next().unwrap_or(link).to_string()
}

pub fn resolve_media(youtube_link: &str, mixlr_link: &str) -> MediaKind {
    if !youtube_link.is_empty() && youtube_link.contains("youtube") {
        MediaKind::Video {
            video_id: extract_video_id(youtube_link),
        }
    } else if !mixlr_link.is_empty() {
        MediaKind::Audio {
            link: mixlr_link.to_string(),
        }
    } else {
        MediaKind::None
    }
}

// Shaped view-records: store records plus the derived fields the renderer
// needs, independent of the wire schema.

#[derive(Debug, Clone)]
pub struct SermonView {
    pub id: String,
    pub title: String,
    pub preacher: String,
    pub date: String,
    pub media: MediaKind,
}

#[derive(Debug, Clone)]
pub struct DevotionalView {
    pub id: String,
    pub date: String,
    pub title: String,
    pub scripture: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct EventView {
    pub id: String,
    pub title: String,
    pub date: String,
    pub description: String,
    pub image_url: String,
}

#[derive(Debug, Clone)]
pub struct TestimonyView {
    pub id: String,
    pub name: String,
    pub content: String,
    pub image_url: String,
    pub status: TestimonyStatus,
}

#[derive(Debug, Clone)]
pub struct PrayerView {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub request: String,
    pub kind: String,
    pub date: Option<DateTime<Utc>>,
}

/// Runs the fetch -> filter/sort -> shape cycle for each content type. Every
/// call is idempotent and produces the full view state for its region; the
/// caller replaces the rendered region wholesale, never diffs it.
#[derive(Clone)]
pub struct Synchronizer {
    store: Arc<dyn ContentStore>,
}

impl Synchronizer {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Synchronizer { store }
    }

    /// Sermons, newest first. The public surface takes at most
    /// [`PUBLIC_SERMON_LIMIT`]; admin takes the full set.
    pub async fn sync_sermons(&self, surface: Surface) -> anyhow::Result<Vec<SermonView>> {
        let mut query = StoreQuery::order_by("date", Direction::Desc);
        if surface == Surface::Public {
            query = query.limit(PUBLIC_SERMON_LIMIT);
        }
        let docs = self.store.query(models::SERMONS, query).await?;
        docs.into_iter()
            .map(|doc| {
                let sermon: Sermon = doc.parse()?;
                Ok(SermonView {
                    id: doc.id,
                    media: resolve_media(&sermon.youtube_link, &sermon.mixlr_link),
                    title: sermon.title,
                    preacher: sermon.preacher,
                    date: sermon.date,
                })
            })
            .collect()
    }

    /// Latest devotional by date, if any. An empty collection is a valid
    /// terminal state, not an error.
    pub async fn sync_devotional(&self) -> anyhow::Result<Option<DevotionalView>> {
        let query = StoreQuery::order_by("date", Direction::Desc).limit(1);
        let docs = self.store.query(models::DEVOTIONALS, query).await?;
        match docs.into_iter().next() {
            Some(doc) => {
                let devotional: Devotional = doc.parse()?;
                Ok(Some(DevotionalView {
                    id: doc.id,
                    date: devotional.date,
                    title: devotional.title,
                    scripture: devotional.scripture,
                    content: devotional.content,
                }))
            }
            None => Ok(None),
        }
    }

    /// All devotionals, newest first, for the admin table.
    pub async fn sync_devotionals_admin(&self) -> anyhow::Result<Vec<DevotionalView>> {
        let query = StoreQuery::order_by("date", Direction::Desc);
        let docs = self.store.query(models::DEVOTIONALS, query).await?;
        docs.into_iter()
            .map(|doc| {
                let devotional: Devotional = doc.parse()?;
                Ok(DevotionalView {
                    id: doc.id,
                    date: devotional.date,
                    title: devotional.title,
                    scripture: devotional.scripture,
                    content: devotional.content,
                })
            })
            .collect()
    }

    /// Events ordered ascending by date (upcoming first) on both surfaces.
    pub async fn sync_events(&self, _surface: Surface) -> anyhow::Result<Vec<EventView>> {
        let query = StoreQuery::order_by("date", Direction::Asc);
        let docs = self.store.query(models::EVENTS, query).await?;
        docs.into_iter()
            .map(|doc| {
                let event: Event = doc.parse()?;
                Ok(EventView {
                    id: doc.id,
                    title: event.title,
                    date: event.date,
                    description: event.description,
                    image_url: event.image_url,
                })
            })
            .collect()
    }

    /// Public surface: approved only, capped at [`PUBLIC_TESTIMONY_LIMIT`],
    /// store natural order. Admin surface: everything, newest first.
    pub async fn sync_testimonies(&self, surface: Surface) -> anyhow::Result<Vec<TestimonyView>> {
        let query = match surface {
            Surface::Public => StoreQuery::default()
                .filter("status", TestimonyStatus::Approved.as_str())
                .limit(PUBLIC_TESTIMONY_LIMIT),
            Surface::Admin => StoreQuery::order_by("date", Direction::Desc),
        };
        let docs = self.store.query(models::TESTIMONIES, query).await?;
        docs.into_iter()
            .map(|doc| {
                let testimony: Testimony = doc.parse()?;
                Ok(TestimonyView {
                    id: doc.id,
                    name: testimony.name,
                    content: testimony.content,
                    image_url: testimony.image_url,
                    status: testimony.status,
                })
            })
            .collect()
    }

    /// Prayer requests, newest first. Admin-only; phone and request text are
    /// carried through untruncated.
    pub async fn sync_prayers(&self) -> anyhow::Result<Vec<PrayerView>> {
        let query = StoreQuery::order_by("date", Direction::Desc);
        let docs = self.store.query(models::PRAYER_REQUESTS, query).await?;
        docs.into_iter()
            .map(|doc| {
                let prayer: PrayerRequest = doc.parse()?;
                Ok(PrayerView {
                    id: doc.id,
                    name: prayer.name,
                    phone: prayer.phone,
                    request: prayer.request,
                    kind: prayer.kind,
                    date: prayer.date,
                })
            })
            .collect()
    }

    /// Raw collection counts for the admin stats panel. Counting on read is
    /// fine at this scale.
    pub async fn stats(&self) -> anyhow::Result<DashboardStats> {
        Ok(DashboardStats {
            sermons: self.store.count(models::SERMONS).await?,
            prayers: self.store.count(models::PRAYER_REQUESTS).await?,
            testimonies: self.store.count(models::TESTIMONIES).await?,
            events: self.store.count(models::EVENTS).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn synchronizer(store: Arc<MemoryStore>) -> Synchronizer {
        Synchronizer::new(store)
    }

    #[test]
    fn video_id_from_watch_url() {
        assert_eq!(
            extract_video_id("https://youtube.com/watch?v=abc123"),
            "abc123"
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc123&t=42"),
            "abc123"
        );
    }

    #[test]
    fn video_id_falls_back_to_last_path_segment() {
        assert_eq!(extract_video_id("https://youtu.be/xyz789"), "xyz789");
        // `v=` present but empty: fall through to the path segment.
        assert_eq!(
            extract_video_id("https://youtube.com/clip/zz?v="),
            "zz?v="
        );
    }

    #[test]
    fn youtube_wins_over_mixlr() {
        let media = resolve_media("https://youtube.com/watch?v=abc", "https://mixlr.com/x");
        assert_eq!(
            media,
            MediaKind::Video {
                video_id: "abc".to_string()
            }
        );
    }

    #[test]
    fn mixlr_only_resolves_to_audio() {
        let media = resolve_media("", "https://mixlr.com/church");
        assert_eq!(
            media,
            MediaKind::Audio {
                link: "https://mixlr.com/church".to_string()
            }
        );
        assert_eq!(resolve_media("", ""), MediaKind::None);
        // A non-YouTube link in the video slot does not make a video.
        assert_eq!(resolve_media("https://vimeo.com/1", ""), MediaKind::None);
    }

    async fn seed_sermon(store: &MemoryStore, title: &str, date: &str) {
        store
            .add(
                models::SERMONS,
                json!({ "title": title, "preacher": "Pastor A", "date": date }),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn public_sermons_are_capped_and_newest_first() {
        let store = Arc::new(MemoryStore::new());
        for day in 1..=8 {
            seed_sermon(&store, &format!("Sermon {day}"), &format!("2024-01-{day:02}")).await;
        }

        let sync = synchronizer(store.clone());
        let public = sync.sync_sermons(Surface::Public).await.unwrap();
        assert_eq!(public.len(), PUBLIC_SERMON_LIMIT);
        assert_eq!(public[0].date, "2024-01-08");

        let admin = sync.sync_sermons(Surface::Admin).await.unwrap();
        assert_eq!(admin.len(), 8);
    }

    #[tokio::test]
    async fn devotional_takes_latest_only_and_empty_is_ok() {
        let store = Arc::new(MemoryStore::new());
        let sync = synchronizer(store.clone());
        assert!(sync.sync_devotional().await.unwrap().is_none());

        for (date, title) in [("2024-01-01", "Old"), ("2024-02-01", "New")] {
            store
                .add(
                    models::DEVOTIONALS,
                    json!({ "date": date, "title": title, "scripture": "Ps 23", "content": "text" }),
                )
                .await
                .unwrap();
        }
        let latest = sync.sync_devotional().await.unwrap().unwrap();
        assert_eq!(latest.title, "New");
    }

    #[tokio::test]
    async fn events_are_upcoming_first() {
        let store = Arc::new(MemoryStore::new());
        for date in ["2024-06-01", "2024-03-01", "2024-09-01"] {
            store
                .add(models::EVENTS, json!({ "title": "Meeting", "date": date }))
                .await
                .unwrap();
        }
        let events = synchronizer(store).sync_events(Surface::Admin).await.unwrap();
        let dates: Vec<&str> = events.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, ["2024-03-01", "2024-06-01", "2024-09-01"]);
    }

    #[tokio::test]
    async fn public_testimonies_exclude_pending() {
        let store = Arc::new(MemoryStore::new());
        store
            .add(
                models::TESTIMONIES,
                json!({ "name": "Ada", "content": "healed", "status": "approved" }),
            )
            .await
            .unwrap();
        store
            .add(
                models::TESTIMONIES,
                json!({ "name": "Ben", "content": "waiting", "status": "pending" }),
            )
            .await
            .unwrap();

        let sync = synchronizer(store);
        let public = sync.sync_testimonies(Surface::Public).await.unwrap();
        assert_eq!(public.len(), 1);
        assert!(public
            .iter()
            .all(|t| t.status == TestimonyStatus::Approved));

        let admin = sync.sync_testimonies(Surface::Admin).await.unwrap();
        assert_eq!(admin.len(), 2);
    }

    #[tokio::test]
    async fn deleted_record_disappears_on_resync() {
        let store = Arc::new(MemoryStore::new());
        seed_sermon(&store, "Keep", "2024-01-01").await;
        seed_sermon(&store, "Drop", "2024-01-02").await;

        let sync = synchronizer(store.clone());
        let before = sync.sync_sermons(Surface::Admin).await.unwrap();
        let doomed = before.iter().find(|s| s.title == "Drop").unwrap().id.clone();

        store.delete(models::SERMONS, &doomed).await.unwrap();

        let after = sync.sync_sermons(Surface::Admin).await.unwrap();
        assert!(after.iter().all(|s| s.id != doomed));
        assert_eq!(after.len(), 1);
    }

    #[tokio::test]
    async fn stats_count_all_four_collections() {
        let store = Arc::new(MemoryStore::new());
        seed_sermon(&store, "One", "2024-01-01").await;
        store
            .add(models::EVENTS, json!({ "title": "Meeting", "date": "2024-05-01" }))
            .await
            .unwrap();

        let stats = synchronizer(store).stats().await.unwrap();
        assert_eq!(stats.sermons, 1);
        assert_eq!(stats.events, 1);
        assert_eq!(stats.prayers, 0);
        assert_eq!(stats.testimonies, 0);
    }
}
