//! Pure view rendering: shaped records in, HTML fragments out. No store or
//! network access. Every list renderer emits the full region so callers can
//! replace the old markup wholesale.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{DashboardStats, TestimonyStatus};
use crate::sync::{DevotionalView, EventView, MediaKind, PrayerView, SermonView, TestimonyView};

pub const DEVOTIONAL_PREVIEW_CHARS: usize = 300;
pub const TESTIMONY_PREVIEW_CHARS: usize = 50;
pub const DEFAULT_EVENT_IMAGE: &str = "assets/images/default-event.jpg";
pub const DEFAULT_EVENT_DESCRIPTION: &str = "Join us for this special program.";

pub(crate) fn esc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Truncate to `max_chars` characters with a trailing ellipsis. Content at
/// or under the limit is returned unmodified.
fn preview(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        content.to_string()
    } else {
        let cut: String = content.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}

/// Calendar-date string rendered as a short locale date, e.g. "1/7/2024".
/// Unparseable input is shown as-is.
fn short_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%-m/%-d/%Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Calendar-date string rendered long-form, e.g. "Sun Jan 07 2024".
fn long_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%a %b %d %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Server timestamp rendered as a locale date; a missing timestamp renders
/// as the literal "N/A".
fn timestamp_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(dt) => dt.format("%-m/%-d/%Y").to_string(),
        None => "N/A".to_string(),
    }
}

/// Region placeholder for a failed fetch; sibling regions stay intact.
pub fn load_error(label: &str) -> String {
    format!("<p>Unable to load {} at this time.</p>", esc(label))
}

// ---- Public site fragments ----

fn sermon_media(media: &MediaKind) -> String {
    match media {
        MediaKind::Video { video_id } => format!(
            concat!(
                "<div class=\"video-wrapper\">",
                "<iframe src=\"https://www.youtube.com/embed/{}\" allowfullscreen></iframe>",
                "</div>"
            ),
            esc(video_id)
        ),
        MediaKind::Audio { link } => format!(
            concat!(
                "<div class=\"audio-card\">",
                "<i class=\"fas fa-microphone-alt\"></i>",
                "<h4>Audio Message</h4>",
                "<a href=\"{}\" target=\"_blank\" class=\"btn btn-outline\">Listen on Mixlr</a>",
                "</div>"
            ),
            esc(link)
        ),
        MediaKind::None => String::new(),
    }
}

pub fn sermon_card(sermon: &SermonView) -> String {
    format!(
        concat!(
            "<div class=\"card\">",
            "{media}",
            "<h3>{title}</h3>",
            "<p class=\"card-meta\">{preacher} | {date}</p>",
            "</div>"
        ),
        media = sermon_media(&sermon.media),
        title = esc(&sermon.title),
        preacher = esc(&sermon.preacher),
        date = short_date(&sermon.date),
    )
}

pub fn sermon_list(sermons: &[SermonView]) -> String {
    if sermons.is_empty() {
        return "<p>No sermons found.</p>".to_string();
    }
    sermons.iter().map(sermon_card).collect()
}

pub fn devotional_card(devotional: Option<&DevotionalView>) -> String {
    let Some(d) = devotional else {
        return "<div class=\"card\"><p>No devotional for today.</p></div>".to_string();
    };
    format!(
        concat!(
            "<div class=\"card devotional\">",
            "<span class=\"devotional-date\">{date}</span>",
            "<h2>{title}</h2>",
            "<p class=\"scripture\">\"{scripture}\"</p>",
            "<div class=\"devotional-body\">{body}</div>",
            // Deliberate stub: full reading is a future extension point.
            "<button class=\"btn btn-outline\" data-action=\"read-devotional\" data-id=\"{id}\">Read Full Devotional</button>",
            "</div>"
        ),
        date = long_date(&d.date),
        title = esc(&d.title),
        scripture = esc(&d.scripture),
        body = esc(&preview(&d.content, DEVOTIONAL_PREVIEW_CHARS)),
        id = esc(&d.id),
    )
}

pub fn event_card(event: &EventView) -> String {
    let image = if event.image_url.is_empty() {
        DEFAULT_EVENT_IMAGE
    } else {
        &event.image_url
    };
    let description = if event.description.is_empty() {
        DEFAULT_EVENT_DESCRIPTION
    } else {
        &event.description
    };
    format!(
        concat!(
            "<div class=\"card event-card\">",
            "<img src=\"{image}\" alt=\"{title}\">",
            "<div class=\"event-body\">",
            "<h4>{title}</h4>",
            "<p class=\"event-date\">{date}</p>",
            "<p>{description}</p>",
            "</div>",
            "</div>"
        ),
        image = esc(image),
        title = esc(&event.title),
        date = long_date(&event.date),
        description = esc(description),
    )
}

pub fn event_list(events: &[EventView]) -> String {
    if events.is_empty() {
        return "<p>No upcoming events.</p>".to_string();
    }
    events.iter().map(event_card).collect()
}

pub fn testimony_card(testimony: &TestimonyView) -> String {
    let avatar = if testimony.image_url.is_empty() {
        "<div class=\"avatar-placeholder\"><i class=\"fas fa-user\"></i></div>".to_string()
    } else {
        format!("<img class=\"avatar\" src=\"{}\">", esc(&testimony.image_url))
    };
    format!(
        concat!(
            "<div class=\"card\">",
            "<div class=\"testimony-head\">",
            "{avatar}",
            "<div><h4>{name}</h4><small>Testimony</small></div>",
            "</div>",
            "<p>\"{content}\"</p>",
            "</div>"
        ),
        avatar = avatar,
        name = esc(&testimony.name),
        content = esc(&testimony.content),
    )
}

pub fn testimony_list(testimonies: &[TestimonyView]) -> String {
    if testimonies.is_empty() {
        return "<p>No testimonies shared yet. Be the first!</p>".to_string();
    }
    testimonies.iter().map(testimony_card).collect()
}

// ---- Admin dashboard fragments ----
//
// Action buttons carry (action, collection, id) as data attributes; the
// dashboard's dispatch script maps them to the mutation endpoints.

fn delete_button(collection: &str, id: &str) -> String {
    format!(
        concat!(
            "<button class=\"action-btn btn-delete\" data-action=\"delete\" ",
            "data-collection=\"{}\" data-id=\"{}\"><i class=\"fas fa-trash\"></i></button>"
        ),
        esc(collection),
        esc(id)
    )
}

pub fn sermon_rows(sermons: &[SermonView]) -> String {
    sermons
        .iter()
        .map(|s| {
            let kind = match s.media {
                MediaKind::Video { .. } => "Video",
                _ => "Audio",
            };
            format!(
                concat!(
                    "<tr>",
                    "<td>{date}</td>",
                    "<td>{title}</td>",
                    "<td>{preacher}</td>",
                    "<td><span class=\"status-badge approved\">{kind}</span></td>",
                    "<td>{delete}</td>",
                    "</tr>"
                ),
                date = esc(&s.date),
                title = esc(&s.title),
                preacher = esc(&s.preacher),
                kind = kind,
                delete = delete_button("sermons", &s.id),
            )
        })
        .collect()
}

pub fn devotional_rows(devotionals: &[DevotionalView]) -> String {
    devotionals
        .iter()
        .map(|d| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                esc(&d.date),
                esc(&d.title),
                esc(&d.scripture),
                delete_button("devotionals", &d.id),
            )
        })
        .collect()
}

pub fn event_cards_admin(events: &[EventView]) -> String {
    events
        .iter()
        .map(|e| {
            let image = if e.image_url.is_empty() {
                DEFAULT_EVENT_IMAGE
            } else {
                &e.image_url
            };
            format!(
                concat!(
                    "<div class=\"card event-admin\">",
                    "<img src=\"{image}\">",
                    "<h4>{title}</h4>",
                    "<small>{date}</small>",
                    "{delete}",
                    "</div>"
                ),
                image = esc(image),
                title = esc(&e.title),
                date = long_date(&e.date),
                delete = delete_button("events", &e.id),
            )
        })
        .collect()
}

pub fn testimony_rows(testimonies: &[TestimonyView]) -> String {
    testimonies
        .iter()
        .map(|t| {
            let approve = if t.status != TestimonyStatus::Approved {
                format!(
                    concat!(
                        "<button class=\"action-btn btn-approve\" data-action=\"approve\" ",
                        "data-collection=\"testimonies\" data-id=\"{}\"><i class=\"fas fa-check\"></i></button>"
                    ),
                    esc(&t.id)
                )
            } else {
                String::new()
            };
            format!(
                concat!(
                    "<tr>",
                    "<td>{name}</td>",
                    "<td>{content}</td>",
                    "<td><span class=\"status-badge {status}\">{status}</span></td>",
                    "<td>{approve}{delete}</td>",
                    "</tr>"
                ),
                name = esc(&t.name),
                content = esc(&preview(&t.content, TESTIMONY_PREVIEW_CHARS)),
                status = t.status.as_str(),
                approve = approve,
                delete = delete_button("testimonies", &t.id),
            )
        })
        .collect()
}

pub fn prayer_rows(prayers: &[PrayerView]) -> String {
    prayers
        .iter()
        .map(|p| {
            format!(
                concat!(
                    "<tr>",
                    "<td>{date}</td>",
                    "<td>{name}<br><small>{phone}</small></td>",
                    "<td>{request}</td>",
                    "<td>{kind}</td>",
                    "<td><button class=\"action-btn btn-edit\" title=\"Mark Prayed\" ",
                    "data-action=\"delete\" data-collection=\"prayerRequests\" data-id=\"{id}\">",
                    "<i class=\"fas fa-check-double\"></i></button></td>",
                    "</tr>"
                ),
                date = timestamp_date(p.date),
                name = esc(&p.name),
                phone = esc(&p.phone),
                request = esc(&p.request),
                kind = esc(&p.kind),
                id = esc(&p.id),
            )
        })
        .collect()
}

pub fn stats_panel(stats: &DashboardStats) -> String {
    format!(
        concat!(
            "<div class=\"stat\"><span id=\"stat-sermons\">{}</span> Sermons</div>",
            "<div class=\"stat\"><span id=\"stat-prayers\">{}</span> Prayer Requests</div>",
            "<div class=\"stat\"><span id=\"stat-testimonies\">{}</span> Testimonies</div>",
            "<div class=\"stat\"><span id=\"stat-events\">{}</span> Events</div>"
        ),
        stats.sermons, stats.prayers, stats.testimonies, stats.events
    )
}
