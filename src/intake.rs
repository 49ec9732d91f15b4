//! Form intake: presence validation, optional media upload, record
//! construction and the store write. The upload-before-create ordering for
//! image-bearing submissions is load-bearing: no record may be created when
//! its image upload did not report success.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::media::MediaUploader;
use crate::models::{
    self, Devotional, Event, PrayerRequest, Sermon, Testimony, TestimonyStatus,
};
use crate::store::ContentStore;

/// Collections the admin dashboard may delete from or patch.
pub const MUTABLE_COLLECTIONS: [&str; 5] = [
    models::SERMONS,
    models::DEVOTIONALS,
    models::EVENTS,
    models::TESTIMONIES,
    models::PRAYER_REQUESTS,
];

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("unknown collection: {0}")]
    UnknownCollection(String),
    #[error("image upload failed: {0}")]
    Upload(#[source] anyhow::Error),
    #[error(transparent)]
    Store(anyhow::Error),
}

/// An uploaded file from a multipart form: original file name plus bytes.
pub type FormFile = (String, Vec<u8>);

#[derive(Debug, Default, Clone)]
pub struct SermonForm {
    pub title: String,
    pub preacher: String,
    pub date: String,
    pub youtube_link: String,
    pub mixlr_link: String,
}

#[derive(Debug, Default, Clone)]
pub struct DevotionalForm {
    pub date: String,
    pub title: String,
    pub scripture: String,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct EventForm {
    pub title: String,
    pub date: String,
    pub description: String,
    pub image: Option<FormFile>,
}

#[derive(Debug, Default)]
pub struct TestimonyForm {
    pub name: String,
    pub content: String,
    pub image: Option<FormFile>,
}

#[derive(Debug, Default, Clone)]
pub struct PrayerForm {
    pub name: String,
    pub phone: String,
    pub request: String,
    pub kind: String,
}

fn require(value: &str, field: &'static str) -> Result<(), IntakeError> {
    if value.trim().is_empty() {
        Err(IntakeError::MissingField(field))
    } else {
        Ok(())
    }
}

fn to_record<T: Serialize>(record: &T) -> Result<Value, IntakeError> {
    serde_json::to_value(record).map_err(|e| IntakeError::Store(e.into()))
}

#[derive(Clone)]
pub struct Intake {
    store: Arc<dyn ContentStore>,
    media: Arc<dyn MediaUploader>,
}

impl Intake {
    pub fn new(store: Arc<dyn ContentStore>, media: Arc<dyn MediaUploader>) -> Self {
        Intake { store, media }
    }

    /// Upload first when a file is present; only a reported success yields a
    /// URL. Any other outcome aborts the enclosing submission.
    async fn upload_if_present(&self, image: Option<FormFile>) -> Result<String, IntakeError> {
        let Some((file_name, bytes)) = image else {
            return Ok(String::new());
        };
        let outcome = self
            .media
            .upload(&file_name, bytes)
            .await
            .map_err(IntakeError::Upload)?;
        if !outcome.success {
            return Err(IntakeError::Upload(anyhow::anyhow!(
                "image host reported failure"
            )));
        }
        Ok(outcome.url.unwrap_or_default())
    }

    pub async fn submit_sermon(&self, form: SermonForm) -> Result<String, IntakeError> {
        require(&form.title, "title")?;
        require(&form.preacher, "preacher")?;
        require(&form.date, "date")?;

        let record = Sermon {
            title: form.title,
            preacher: form.preacher,
            date: form.date,
            youtube_link: form.youtube_link,
            mixlr_link: form.mixlr_link,
            created_at: Some(Utc::now()),
        };
        self.store
            .add(models::SERMONS, to_record(&record)?)
            .await
            .map_err(IntakeError::Store)
    }

    pub async fn submit_devotional(&self, form: DevotionalForm) -> Result<String, IntakeError> {
        require(&form.date, "date")?;
        require(&form.title, "title")?;
        require(&form.scripture, "scripture")?;
        require(&form.content, "content")?;

        let record = Devotional {
            date: form.date,
            title: form.title,
            scripture: form.scripture,
            content: form.content,
            created_at: Some(Utc::now()),
        };
        self.store
            .add(models::DEVOTIONALS, to_record(&record)?)
            .await
            .map_err(IntakeError::Store)
    }

    pub async fn submit_event(&self, form: EventForm) -> Result<String, IntakeError> {
        require(&form.title, "title")?;
        require(&form.date, "date")?;

        let image_url = self.upload_if_present(form.image).await?;
        let record = Event {
            title: form.title,
            date: form.date,
            description: form.description,
            image_url,
            created_at: Some(Utc::now()),
        };
        self.store
            .add(models::EVENTS, to_record(&record)?)
            .await
            .map_err(IntakeError::Store)
    }

    /// Public testimony submission. Always enters as pending; an admin
    /// approval is the only path to public visibility.
    pub async fn submit_testimony(&self, form: TestimonyForm) -> Result<String, IntakeError> {
        require(&form.name, "name")?;
        require(&form.content, "content")?;

        let image_url = self.upload_if_present(form.image).await?;
        let record = Testimony {
            name: form.name,
            content: form.content,
            image_url,
            status: TestimonyStatus::Pending,
            date: Some(Utc::now()),
        };
        self.store
            .add(models::TESTIMONIES, to_record(&record)?)
            .await
            .map_err(IntakeError::Store)
    }

    pub async fn submit_prayer(&self, form: PrayerForm) -> Result<String, IntakeError> {
        require(&form.name, "name")?;
        require(&form.request, "request")?;

        let record = PrayerRequest {
            name: form.name,
            phone: form.phone,
            request: form.request,
            kind: form.kind,
            status: "New".to_string(),
            date: Some(Utc::now()),
        };
        self.store
            .add(models::PRAYER_REQUESTS, to_record(&record)?)
            .await
            .map_err(IntakeError::Store)
    }

    fn check_collection(collection: &str) -> Result<(), IntakeError> {
        if MUTABLE_COLLECTIONS.contains(&collection) {
            Ok(())
        } else {
            Err(IntakeError::UnknownCollection(collection.to_string()))
        }
    }

    /// Hard delete. Prayer "resolve" goes through here too; there is no
    /// archival state.
    pub async fn delete_item(&self, collection: &str, id: &str) -> Result<(), IntakeError> {
        Self::check_collection(collection)?;
        self.store
            .delete(collection, id)
            .await
            .map_err(IntakeError::Store)
    }

    /// Patch only the status field (testimony approval).
    pub async fn update_status(
        &self,
        collection: &str,
        id: &str,
        status: &str,
    ) -> Result<(), IntakeError> {
        Self::check_collection(collection)?;
        self.store
            .update(collection, id, serde_json::json!({ "status": status }))
            .await
            .map_err(IntakeError::Store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::UploadOutcome;
    use crate::store::{MemoryStore, StoreQuery};
    use async_trait::async_trait;

    struct NoUploads;

    #[async_trait]
    impl MediaUploader for NoUploads {
        async fn upload(&self, _: &str, _: Vec<u8>) -> anyhow::Result<UploadOutcome> {
            panic!("upload must not be called when no file is selected");
        }
    }

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

    fn intake_with(media: impl MediaUploader + 'static) -> (Intake, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Intake::new(store.clone(), Arc::new(media)), store)
    }

    #[tokio::test]
    async fn blank_required_field_is_rejected() {
        let (intake, store) = intake_with(NoUploads);
        let err = intake
            .submit_sermon(SermonForm {
                title: "  ".into(),
                preacher: "Pastor A".into(),
                date: "2024-01-07".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::MissingField("title")));
        assert_eq!(store.count(models::SERMONS).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn testimony_without_image_is_pending_with_empty_url() {
        let (intake, store) = intake_with(NoUploads);
        let id = intake
            .submit_testimony(TestimonyForm {
                name: "Ada".into(),
                content: "Healed".into(),
                image: None,
            })
            .await
            .unwrap();

        let doc = store.get(models::TESTIMONIES, &id).await.unwrap().unwrap();
        assert_eq!(doc.fields["imageUrl"], "");
        assert_eq!(doc.fields["status"], "pending");
    }

    #[tokio::test]
    async fn failed_upload_aborts_before_any_record_is_created() {
        let (intake, store) = intake_with(RejectingUploader);
        let err = intake
            .submit_event(EventForm {
                title: "Crusade".into(),
                date: "2024-06-01".into(),
                description: String::new(),
                image: Some(("flyer.jpg".into(), vec![1, 2, 3])),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::Upload(_)));
        assert_eq!(store.count(models::EVENTS).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_collection_is_refused() {
        let (intake, _) = intake_with(NoUploads);
        let err = intake.delete_item("users", "abc").await.unwrap_err();
        assert!(matches!(err, IntakeError::UnknownCollection(_)));
    }

    #[tokio::test]
    async fn prayer_enters_with_new_status_and_timestamp() {
        let (intake, store) = intake_with(NoUploads);
        intake
            .submit_prayer(PrayerForm {
                name: "Ben".into(),
                phone: "0800".into(),
                request: "Travel mercies".into(),
                kind: "guidance".into(),
            })
            .await
            .unwrap();

        let docs = store
            .query(models::PRAYER_REQUESTS, StoreQuery::default())
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].fields["status"], "New");
        assert!(docs[0].fields["date"].is_string());
    }
}
