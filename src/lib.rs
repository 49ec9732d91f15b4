pub mod auth;
pub mod intake;
pub mod media;
pub mod models;
pub mod render;
pub mod routes;
pub mod store;
pub mod sync;

use std::sync::Arc;

use intake::Intake;
use media::MediaUploader;
use store::ContentStore;
use sync::Synchronizer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub sync: Synchronizer,
    pub intake: Intake,
    pub index_template: String,
    pub admin_template: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ContentStore>,
        media: Arc<dyn MediaUploader>,
        index_template: String,
        admin_template: String,
    ) -> Self {
        AppState {
            sync: Synchronizer::new(store.clone()),
            intake: Intake::new(store.clone(), media),
            store,
            index_template,
            admin_template,
        }
    }
}
