use crate::geo::Coordinate;
use crate::map::TileLayer;

pub const APP_NAME: &str = "ShoreSquad";

pub const STATE_STORAGE_KEY: &str = "shoreSquadState";
pub const JOINED_CLEANUP_STORAGE_KEY: &str = "joinedCleanup";

/// Pasir Ris, Singapore.
pub const DEFAULT_LOCATION: Coordinate = Coordinate::raw(1.381497, 103.955574);
pub const MAP_ZOOM: u8 = 12;
pub const LOCATE_ZOOM: u8 = 14;

pub const OSM_TILES: TileLayer = TileLayer {
    url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
    subdomains: &["a", "b", "c"],
    max_zoom: 19,
    attribution: "\u{00A9} OpenStreetMap contributors",
};

pub const REFRESH_DELAY_MS: u32 = 800;

pub const TOAST_DISPLAY_MS: u32 = 3_000;
pub const TOAST_EXIT_MS: u32 = 300;
pub const TOAST_LIMIT: usize = 5;

pub const WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Build-time OpenWeatherMap key. Without one the widget shows the bundled sample report.
pub fn weather_api_key() -> Option<&'static str> {
    option_env!("SHORESQUAD_WEATHER_API_KEY").filter(|key| !key.trim().is_empty())
}

/// Static event catalogue: (id, name, lat, lng, members).
pub const BEACH_EVENTS: &[(&str, &str, f64, f64, u32)] = &[
    (
        "pasir-ris",
        "Pasir Ris Beach Cleanup",
        1.381497,
        103.955574,
        24,
    ),
    (
        "east-coast-park",
        "East Coast Park Cleanup",
        1.356521,
        103.940131,
        18,
    ),
    (
        "sentosa",
        "Sentosa Beach Initiative",
        1.291289,
        103.832361,
        15,
    ),
];

pub struct NextCleanupConfig {
    pub name: &'static str,
    pub location_label: &'static str,
    pub location: Coordinate,
    pub date: &'static str,
    pub time: &'static str,
    pub members: u32,
    pub directions_url: &'static str,
}

pub const NEXT_CLEANUP: NextCleanupConfig = NextCleanupConfig {
    name: "Pasir Ris Beach Cleanup",
    location_label: "Pasir Ris, Singapore",
    location: Coordinate::raw(1.381497, 103.955574),
    date: "2025-12-15",
    time: "09:00 AM",
    members: 24,
    directions_url: "https://www.google.com/maps/place/Pasir+Ris+Beach,+Singapore/@1.381497,103.955574,15z",
};

/// Crew leaderboard rows, already in rank order.
pub const TOP_CREWS: &[(&str, &str)] = &[
    ("Ocean Warriors", "\u{1F3C6} 1,250 lbs trash removed"),
    ("Coastal Guardians", "\u{1F3C6} 980 lbs trash removed"),
    ("Beach Legends", "\u{1F3C6} 875 lbs trash removed"),
    ("Tidal Force", "\u{1F3C6} 720 lbs trash removed"),
    ("Wave Riders", "\u{1F3C6} 650 lbs trash removed"),
];

/// Member leaderboard rows, already in rank order.
pub const TOP_MEMBERS: &[(&str, &str)] = &[
    ("Alex Chen", "\u{1F31F} 42 events, 180 hours"),
    ("Jordan Mills", "\u{1F31F} 38 events, 165 hours"),
    ("Casey Rivera", "\u{1F31F} 35 events, 155 hours"),
    ("Morgan Lee", "\u{1F31F} 31 events, 140 hours"),
    ("Taylor Park", "\u{1F31F} 28 events, 130 hours"),
];

/// Founding crews: (name, description, home beach, members, events, impact).
pub const FOUNDING_CREWS: &[(&str, &str, &str, u32, u32, &str)] = &[
    (
        "Founding Crew",
        "The original ShoreSquad volunteers.",
        "Pasir Ris",
        12,
        5,
        "250 lbs of trash removed",
    ),
    (
        "East Coast Squad",
        "Weekend regulars along East Coast Park.",
        "East Coast Park",
        8,
        3,
        "120 lbs of trash removed",
    ),
];
