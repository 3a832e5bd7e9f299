pub mod colors;
pub mod config;
pub mod crews;
pub mod events;
pub mod geo;
pub mod leaderboard;
pub mod location;
pub mod map;
pub mod modal;
pub mod notify;
pub mod projection;
pub mod session;
pub mod state;
pub mod store;
pub mod weather;

pub use colors::{crew_accent, crew_color};
pub use crews::{Crew, CrewId, CrewRoster};
pub use events::*;
pub use geo::{Coordinate, GeoError};
pub use map::*;
pub use session::Session;
pub use state::*;
pub use store::{KeyValueStore, StateStore, StoreError};
