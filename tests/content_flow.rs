//! End-to-end content workflow: form intake -> store -> sync -> render,
//! against the in-memory store and a scripted image host.

use std::sync::Arc;

use async_trait::async_trait;
use church_site::intake::{
    EventForm, Intake, IntakeError, PrayerForm, SermonForm, TestimonyForm,
};
use church_site::media::{MediaUploader, UploadOutcome};
use church_site::models::{self, TestimonyStatus};
use church_site::render;
use church_site::store::{ContentStore, Document, MemoryStore, StoreQuery};
use church_site::sync::{MediaKind, Surface, Synchronizer};
use serde_json::{json, Value};

struct RejectingUploader;

#[async_trait]
impl MediaUploader for RejectingUploader {
    async fn upload(&self, _: &str, _: Vec<u8>) -> anyhow::Result<UploadOutcome> {
        Ok(UploadOutcome {
            success: false,
            url: None,
        })
    }
}

struct HappyUploader;

#[async_trait]
impl MediaUploader for HappyUploader {
    async fn upload(&self, _: &str, _: Vec<u8>) -> anyhow::Result<UploadOutcome> {
        Ok(UploadOutcome {
            success: true,
            url: Some("https://img.example/u/1.jpg".to_string()),
        })
    }
}

/// Delegates to an in-memory store, except reads from one collection fail.
struct FlakyStore {
    inner: MemoryStore,
    broken: &'static str,
}

#[async_trait]
impl ContentStore for FlakyStore {
    async fn add(&self, collection: &str, record: Value) -> anyhow::Result<String> {
        self.inner.add(collection, record).await
    }

    async fn set(&self, collection: &str, id: &str, record: Value) -> anyhow::Result<()> {
        self.inner.set(collection, id, record).await
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> anyhow::Result<()> {
        self.inner.update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &str) -> anyhow::Result<()> {
        self.inner.delete(collection, id).await
    }

    async fn get(&self, collection: &str, id: &str) -> anyhow::Result<Option<Document>> {
        self.inner.get(collection, id).await
    }

    async fn query(&self, collection: &str, query: StoreQuery) -> anyhow::Result<Vec<Document>> {
        if collection == self.broken {
            anyhow::bail!("backend unavailable");
        }
        self.inner.query(collection, query).await
    }
}

fn harness(media: impl MediaUploader + 'static) -> (Arc<MemoryStore>, Intake, Synchronizer) {
    let store = Arc::new(MemoryStore::new());
    let intake = Intake::new(store.clone(), Arc::new(media));
    let sync = Synchronizer::new(store.clone());
    (store, intake, sync)
}

#[tokio::test]
async fn published_sermon_reaches_the_public_list_with_an_embed() {
    let (_, intake, sync) = harness(HappyUploader);

    intake
        .submit_sermon(SermonForm {
            title: "Faith".into(),
            preacher: "Pastor A".into(),
            date: "2024-01-07".into(),
            youtube_link: "https://youtube.com/watch?v=abc123".into(),
            mixlr_link: String::new(),
        })
        .await
        .unwrap();

    let sermons = sync.sync_sermons(Surface::Public).await.unwrap();
    assert_eq!(sermons.len(), 1);
    assert_eq!(
        sermons[0].media,
        MediaKind::Video {
            video_id: "abc123".into()
        }
    );

    let html = render::sermon_list(&sermons);
    assert!(html.contains("https://www.youtube.com/embed/abc123"));
}

#[tokio::test]
async fn testimony_stays_hidden_until_approved() {
    let (_, intake, sync) = harness(HappyUploader);

    let id = intake
        .submit_testimony(TestimonyForm {
            name: "Ada".into(),
            content: "God healed me".into(),
            image: None,
        })
        .await
        .unwrap();

    // Created pending, with an empty image url.
    let admin = sync.sync_testimonies(Surface::Admin).await.unwrap();
    assert_eq!(admin.len(), 1);
    assert_eq!(admin[0].status, TestimonyStatus::Pending);
    assert_eq!(admin[0].image_url, "");

    // Excluded from the public surface until approval.
    assert!(sync
        .sync_testimonies(Surface::Public)
        .await
        .unwrap()
        .is_empty());

    intake
        .update_status(models::TESTIMONIES, &id, "approved")
        .await
        .unwrap();

    let public = sync.sync_testimonies(Surface::Public).await.unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].id, id);
}

#[tokio::test]
async fn rejected_upload_leaves_no_event_behind() {
    let (store, intake, sync) = harness(RejectingUploader);

    let err = intake
        .submit_event(EventForm {
            title: "Crusade".into(),
            date: "2024-06-01".into(),
            description: "Open air".into(),
            image: Some(("flyer.jpg".into(), vec![0xFF, 0xD8])),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, IntakeError::Upload(_)));
    assert_eq!(store.count(models::EVENTS).await.unwrap(), 0);
    assert!(sync.sync_events(Surface::Admin).await.unwrap().is_empty());
}

#[tokio::test]
async fn successful_upload_lands_on_the_event_record() {
    let (_, intake, sync) = harness(HappyUploader);

    intake
        .submit_event(EventForm {
            title: "Crusade".into(),
            date: "2024-06-01".into(),
            description: String::new(),
            image: Some(("flyer.jpg".into(), vec![0xFF, 0xD8])),
        })
        .await
        .unwrap();

    let events = sync.sync_events(Surface::Public).await.unwrap();
    assert_eq!(events[0].image_url, "https://img.example/u/1.jpg");
}

#[tokio::test]
async fn resolving_a_prayer_is_a_hard_delete() {
    let (_, intake, sync) = harness(HappyUploader);

    let id = intake
        .submit_prayer(PrayerForm {
            name: "Ben".into(),
            phone: "0800".into(),
            request: "Travel mercies".into(),
            kind: "guidance".into(),
        })
        .await
        .unwrap();

    assert_eq!(sync.stats().await.unwrap().prayers, 1);

    intake
        .delete_item(models::PRAYER_REQUESTS, &id)
        .await
        .unwrap();

    let prayers = sync.sync_prayers().await.unwrap();
    assert!(prayers.iter().all(|p| p.id != id));
    assert!(prayers.is_empty());
    assert_eq!(sync.stats().await.unwrap().prayers, 0);
}

#[tokio::test]
async fn broken_region_degrades_to_its_placeholder_while_siblings_render() {
    let store = Arc::new(FlakyStore {
        inner: MemoryStore::new(),
        broken: models::SERMONS,
    });
    store
        .add(
            models::EVENTS,
            json!({ "title": "Crusade", "date": "2024-06-01" }),
        )
        .await
        .unwrap();

    let sync = Synchronizer::new(store);

    // The sermon fetch fails; its region falls back to the placeholder.
    let sermons_html = match sync.sync_sermons(Surface::Public).await {
        Ok(list) => render::sermon_list(&list),
        Err(_) => render::load_error("sermons"),
    };
    assert!(sermons_html.contains("Unable to load sermons at this time."));

    // The sibling region is untouched by the failure.
    let events = sync.sync_events(Surface::Public).await.unwrap();
    let events_html = render::event_list(&events);
    assert!(events_html.contains("Crusade"));
    assert!(!events_html.contains("Unable to load"));
}

#[tokio::test]
async fn devotional_preview_is_bounded_and_latest_wins() {
    let (_, intake, sync) = harness(HappyUploader);

    for (date, content) in [
        ("2024-01-01", "short".to_string()),
        ("2024-02-01", "y".repeat(1000)),
    ] {
        intake
            .submit_devotional(church_site::intake::DevotionalForm {
                date: date.into(),
                title: "Morning Word".into(),
                scripture: "Ps 23:1".into(),
                content,
            })
            .await
            .unwrap();
    }

    let latest = sync.sync_devotional().await.unwrap().unwrap();
    assert_eq!(latest.date, "2024-02-01");

    let html = render::devotional_card(Some(&latest));
    assert!(html.contains(&format!("{}...", "y".repeat(300))));
    assert!(!html.contains(&"y".repeat(301)));
}
