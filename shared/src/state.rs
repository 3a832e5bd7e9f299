use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_LOCATION;
use crate::crews::CrewId;
use crate::geo::Coordinate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardTab {
    #[default]
    Crews,
    Members,
}

impl LeaderboardTab {
    pub const ALL: [LeaderboardTab; 2] = [LeaderboardTab::Crews, LeaderboardTab::Members];

    pub fn label(self) -> &'static str {
        match self {
            LeaderboardTab::Crews => "Top Crews",
            LeaderboardTab::Members => "Top Members",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            LeaderboardTab::Crews => "crews",
            LeaderboardTab::Members => "members",
        }
    }
}

/// The subset of [`AppState`] written to local storage. Every field is
/// optional; `null` and missing both mean "keep the default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedBlob {
    #[serde(default)]
    pub user_crew: Option<CrewId>,
    #[serde(default)]
    pub user_location: Option<Coordinate>,
    #[serde(default)]
    pub current_tab: Option<LeaderboardTab>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub user_location: Option<Coordinate>,
    pub selected_crew: Option<CrewId>,
    pub active_tab: LeaderboardTab,
    pub dark_mode: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StateAction {
    LocationResolved(Coordinate),
    LocationFailed,
    SelectTab(LeaderboardTab),
    SelectCrew(CrewId),
    ToggleDarkMode,
}

/// Follow-up work the caller owes after [`AppState::apply`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transition {
    pub persist: bool,
    pub recenter: Option<Coordinate>,
}

impl AppState {
    /// Shallow merge: a field overwrites the default only when present in the blob.
    pub fn merged(defaults: AppState, blob: PersistedBlob) -> AppState {
        AppState {
            user_location: blob.user_location.or(defaults.user_location),
            selected_crew: blob.user_crew.or(defaults.selected_crew),
            active_tab: blob.current_tab.unwrap_or(defaults.active_tab),
            dark_mode: defaults.dark_mode,
        }
    }

    pub fn persisted(&self) -> PersistedBlob {
        PersistedBlob {
            user_crew: self.selected_crew.clone(),
            user_location: self.user_location,
            current_tab: Some(self.active_tab),
        }
    }

    /// Where the map should open: last known location, else the configured default.
    pub fn map_center(&self) -> Coordinate {
        self.user_location.unwrap_or(DEFAULT_LOCATION)
    }

    /// The only mutation path for application state.
    pub fn apply(&mut self, action: StateAction) -> Transition {
        match action {
            StateAction::LocationResolved(location) => {
                self.user_location = Some(location);
                Transition {
                    persist: true,
                    recenter: Some(location),
                }
            }
            StateAction::LocationFailed => {
                self.user_location = Some(DEFAULT_LOCATION);
                Transition::default()
            }
            StateAction::SelectTab(tab) => {
                self.active_tab = tab;
                Transition {
                    persist: true,
                    recenter: None,
                }
            }
            StateAction::SelectCrew(crew) => {
                self.selected_crew = Some(crew);
                Transition {
                    persist: true,
                    recenter: None,
                }
            }
            StateAction::ToggleDarkMode => {
                self.dark_mode = !self.dark_mode;
                Transition::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_blob_merges_to_defaults() {
        let merged = AppState::merged(AppState::default(), PersistedBlob::default());
        assert_eq!(merged, AppState::default());
    }

    #[test]
    fn partial_blob_keeps_other_defaults() {
        let blob: PersistedBlob = serde_json::from_str(r#"{"currentTab":"members"}"#).unwrap();
        let defaults = AppState {
            selected_crew: Some(CrewId("founding-crew".into())),
            ..AppState::default()
        };
        let merged = AppState::merged(defaults, blob);
        assert_eq!(merged.active_tab, LeaderboardTab::Members);
        assert_eq!(merged.selected_crew, Some(CrewId("founding-crew".into())));
        assert_eq!(merged.user_location, None);
    }

    #[test]
    fn null_fields_mean_absent() {
        let blob: PersistedBlob =
            serde_json::from_str(r#"{"userCrew":null,"userLocation":null,"currentTab":null}"#)
                .unwrap();
        assert_eq!(blob, PersistedBlob::default());
    }

    #[test]
    fn persisted_blob_uses_wire_names() {
        let state = AppState {
            user_location: Some(Coordinate::new(1.3, 103.9).unwrap()),
            selected_crew: Some(CrewId("east-coast-squad".into())),
            active_tab: LeaderboardTab::Members,
            dark_mode: true,
        };
        let json = serde_json::to_value(state.persisted()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "userCrew": "east-coast-squad",
                "userLocation": { "lat": 1.3, "lng": 103.9 },
                "currentTab": "members",
            })
        );
    }

    #[test]
    fn location_resolution_persists_and_recenters() {
        let mut state = AppState::default();
        let here = Coordinate::new(1.35, 103.94).unwrap();
        let t = state.apply(StateAction::LocationResolved(here));
        assert_eq!(state.user_location, Some(here));
        assert!(t.persist);
        assert_eq!(t.recenter, Some(here));
    }

    #[test]
    fn location_failure_falls_back_without_side_effects() {
        let mut state = AppState::default();
        let t = state.apply(StateAction::LocationFailed);
        assert_eq!(state.user_location, Some(DEFAULT_LOCATION));
        assert_eq!(t, Transition::default());
    }

    #[test]
    fn dark_mode_is_not_persisted() {
        let mut state = AppState::default();
        let t = state.apply(StateAction::ToggleDarkMode);
        assert!(state.dark_mode);
        assert!(!t.persist);
    }
}
