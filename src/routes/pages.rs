//! Server-rendered surfaces. Pages are static templates with region slots;
//! each slot is filled from its own sync call, so one failed fetch degrades
//! only its own region. The fragment endpoints serve the same regions for
//! full-replace refreshes after mutations.

use axum::{
    extract::State,
    response::Html,
};

use crate::models::{GivingSettings, GIVING_DOC_ID, SETTINGS};
use crate::render;
use crate::sync::Surface;
use crate::AppState;

/// Render a region from its sync result, degrading to the "unable to load"
/// placeholder on failure. Sibling regions are unaffected.
fn region<T>(
    result: anyhow::Result<T>,
    label: &str,
    render_ok: impl FnOnce(T) -> String,
) -> String {
    match result {
        Ok(value) => render_ok(value),
        Err(e) => {
            tracing::error!("Error loading {}: {:#}", label, e);
            render::load_error(label)
        }
    }
}

pub async fn public_page(State(state): State<AppState>) -> Html<String> {
    let sermons = region(
        state.sync.sync_sermons(Surface::Public).await,
        "sermons",
        |list| render::sermon_list(&list),
    );
    let devotional = region(
        state.sync.sync_devotional().await,
        "devotional",
        |latest| render::devotional_card(latest.as_ref()),
    );
    let events = region(
        state.sync.sync_events(Surface::Public).await,
        "events",
        |list| render::event_list(&list),
    );
    let testimonies = region(
        state.sync.sync_testimonies(Surface::Public).await,
        "testimonies",
        |list| render::testimony_list(&list),
    );

    Html(
        state
            .index_template
            .replace("<!-- slot:sermons -->", &sermons)
            .replace("<!-- slot:devotional -->", &devotional)
            .replace("<!-- slot:events -->", &events)
            .replace("<!-- slot:testimonies -->", &testimonies),
    )
}

// Public fragments, one per region, for post-mutation refreshes.

pub async fn sermons_fragment(State(state): State<AppState>) -> Html<String> {
    Html(region(
        state.sync.sync_sermons(Surface::Public).await,
        "sermons",
        |list| render::sermon_list(&list),
    ))
}

pub async fn devotional_fragment(State(state): State<AppState>) -> Html<String> {
    Html(region(
        state.sync.sync_devotional().await,
        "devotional",
        |latest| render::devotional_card(latest.as_ref()),
    ))
}

pub async fn events_fragment(State(state): State<AppState>) -> Html<String> {
    Html(region(
        state.sync.sync_events(Surface::Public).await,
        "events",
        |list| render::event_list(&list),
    ))
}

pub async fn testimonies_fragment(State(state): State<AppState>) -> Html<String> {
    Html(region(
        state.sync.sync_testimonies(Surface::Public).await,
        "testimonies",
        |list| render::testimony_list(&list),
    ))
}

async fn giving_settings(state: &AppState) -> GivingSettings {
    match state.store.get(SETTINGS, GIVING_DOC_ID).await {
        Ok(Some(doc)) => doc.parse().unwrap_or_else(|e| {
            tracing::error!("Giving settings parse error: {:#}", e);
            GivingSettings::default()
        }),
        Ok(None) => GivingSettings::default(),
        Err(e) => {
            tracing::error!("Error loading giving settings: {:#}", e);
            GivingSettings::default()
        }
    }
}

/// The dashboard page. Auth is enforced by the `require_auth` middleware
/// before this handler runs.
pub async fn admin_page(State(state): State<AppState>) -> Html<String> {
    let stats = region(state.sync.stats().await, "stats", |s| {
        render::stats_panel(&s)
    });
    let sermons = region(
        state.sync.sync_sermons(Surface::Admin).await,
        "sermons",
        |list| render::sermon_rows(&list),
    );
    let devotionals = region(
        state.sync.sync_devotionals_admin().await,
        "devotionals",
        |list| render::devotional_rows(&list),
    );
    let events = region(
        state.sync.sync_events(Surface::Admin).await,
        "events",
        |list| render::event_cards_admin(&list),
    );
    let testimonies = region(
        state.sync.sync_testimonies(Surface::Admin).await,
        "testimonies",
        |list| render::testimony_rows(&list),
    );
    let prayers = region(state.sync.sync_prayers().await, "prayer requests", |list| {
        render::prayer_rows(&list)
    });
    let giving = giving_settings(&state).await;

    Html(
        state
            .admin_template
            .replace("<!-- slot:stats -->", &stats)
            .replace("<!-- slot:sermons -->", &sermons)
            .replace("<!-- slot:devotionals -->", &devotionals)
            .replace("<!-- slot:events -->", &events)
            .replace("<!-- slot:testimonies -->", &testimonies)
            .replace("<!-- slot:prayers -->", &prayers)
            .replace("{{bankName}}", &render::esc(&giving.bank_name))
            .replace("{{accountNumber}}", &render::esc(&giving.account_number))
            .replace("{{accountName}}", &render::esc(&giving.account_name)),
    )
}

// Admin fragments for region refreshes after mutations.

pub async fn admin_sermons_fragment(State(state): State<AppState>) -> Html<String> {
    Html(region(
        state.sync.sync_sermons(Surface::Admin).await,
        "sermons",
        |list| render::sermon_rows(&list),
    ))
}

pub async fn admin_devotionals_fragment(State(state): State<AppState>) -> Html<String> {
    Html(region(
        state.sync.sync_devotionals_admin().await,
        "devotionals",
        |list| render::devotional_rows(&list),
    ))
}

pub async fn admin_events_fragment(State(state): State<AppState>) -> Html<String> {
    Html(region(
        state.sync.sync_events(Surface::Admin).await,
        "events",
        |list| render::event_cards_admin(&list),
    ))
}

pub async fn admin_testimonies_fragment(State(state): State<AppState>) -> Html<String> {
    Html(region(
        state.sync.sync_testimonies(Surface::Admin).await,
        "testimonies",
        |list| render::testimony_rows(&list),
    ))
}

pub async fn admin_prayers_fragment(State(state): State<AppState>) -> Html<String> {
    Html(region(state.sync.sync_prayers().await, "prayer requests", |list| {
        render::prayer_rows(&list)
    }))
}

pub async fn admin_stats_fragment(State(state): State<AppState>) -> Html<String> {
    Html(region(state.sync.stats().await, "stats", |s| {
        render::stats_panel(&s)
    }))
}
