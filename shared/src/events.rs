use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{BEACH_EVENTS, NEXT_CLEANUP};
use crate::geo::Coordinate;

/// Stable identifier for a configured event. Names are display text only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

#[derive(Debug, Clone, PartialEq)]
pub struct CleanupEvent {
    pub id: EventId,
    pub name: String,
    pub location: Coordinate,
    pub member_count: u32,
}

/// Events shown on the map, in catalogue order. Rows with an invalid
/// coordinate are skipped.
pub fn beach_events() -> Vec<CleanupEvent> {
    BEACH_EVENTS
        .iter()
        .filter_map(|&(id, name, lat, lng, members)| {
            let location = match Coordinate::new(lat, lng) {
                Ok(location) => location,
                Err(err) => {
                    log::warn!("skipping event {id}: {err}");
                    return None;
                }
            };
            Some(CleanupEvent {
                id: EventId(id.to_string()),
                name: name.to_string(),
                location,
                member_count: members,
            })
        })
        .collect()
}

pub fn find_event<'a>(events: &'a [CleanupEvent], id: &EventId) -> Option<&'a CleanupEvent> {
    events.iter().find(|event| &event.id == id)
}

#[derive(Debug, Clone, PartialEq)]
pub struct NextCleanup {
    pub name: String,
    pub location_label: String,
    pub location: Coordinate,
    pub date: String,
    pub time: String,
    pub members: u32,
    pub directions_url: String,
}

impl Default for NextCleanup {
    fn default() -> Self {
        Self {
            name: NEXT_CLEANUP.name.to_string(),
            location_label: NEXT_CLEANUP.location_label.to_string(),
            location: NEXT_CLEANUP.location,
            date: NEXT_CLEANUP.date.to_string(),
            time: NEXT_CLEANUP.time.to_string(),
            members: NEXT_CLEANUP.members,
            directions_url: NEXT_CLEANUP.directions_url.to_string(),
        }
    }
}

impl NextCleanup {
    pub fn join_message(&self) -> String {
        format!(
            "\u{1F389} You've joined the {} on {}!",
            self.name, self.date
        )
    }

    pub fn share_text(&self) -> String {
        format!(
            "\u{1F30A} Join ShoreSquad's next beach cleanup at {} on {} at {}! Rally your crew and help us clean up the beach. \u{1F4CD} Coordinates: {}\u{00B0}N, {}\u{00B0}E",
            self.name,
            self.date,
            self.time,
            self.location.latitude(),
            self.location.longitude(),
        )
    }

    pub fn share_data(&self, page_url: &str) -> ShareData {
        ShareData {
            title: "ShoreSquad - Next Beach Cleanup".to_string(),
            text: self.share_text(),
            url: page_url.to_string(),
        }
    }
}

/// Payload for the platform share sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareData {
    pub title: String,
    pub text: String,
    pub url: String,
}

pub const SHARE_COPIED_MESSAGE: &str = "\u{2713} Event details copied to clipboard!";

pub fn share_fallback_message(text: &str) -> String {
    format!("Share text: {text}")
}

/// Record written when the user joins the next cleanup. Never read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedCleanup {
    pub event: String,
    pub date: String,
    pub joined_at: String,
}

impl JoinedCleanup {
    pub fn new(next: &NextCleanup, at: DateTime<Utc>) -> Self {
        Self {
            event: next.name.clone(),
            date: next.date.clone(),
            joined_at: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
