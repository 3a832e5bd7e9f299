use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::config::{LOCATE_ZOOM, MAP_ZOOM, OSM_TILES};
use crate::crews::{CrewId, CrewRoster};
use crate::events::{
    CleanupEvent, EventId, JoinedCleanup, NextCleanup, ShareData, beach_events, find_event,
};
use crate::geo::Coordinate;
use crate::leaderboard::{RenderedList, records_for, render};
use crate::location::{LocationError, resolve};
use crate::map::{MapError, MapSurface, MapView, PopupAction};
use crate::modal::{
    CREW_CREATED, FormValues, ModalError, ModalId, ModalKind, ModalOutcome, ModalStack,
};
use crate::notify::{ToastId, ToastStack};
use crate::state::{AppState, LeaderboardTab, StateAction, Transition};
use crate::store::{KeyValueStore, StateStore};
use crate::weather::WeatherPanel;

pub const LOCATION_UNAVAILABLE: &str = "Location not available. Please enable location services.";
pub const OPENING_DIRECTIONS: &str = "Opening directions in Google Maps...";

/// Identifies one weather fetch; only the latest one may update the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherTicket(u64);

/// Everything one page session owns. All mutation goes through these
/// methods so that state changes and persistence stay in one place.
pub struct Session<K: KeyValueStore, S: MapSurface> {
    state: AppState,
    store: StateStore<K>,
    map: MapView<S>,
    events: Vec<CleanupEvent>,
    crews: CrewRoster,
    toasts: ToastStack,
    modals: ModalStack,
    next_cleanup: NextCleanup,
    weather: WeatherPanel,
    nav_open: bool,
    refreshing: bool,
    weather_generation: u64,
}

impl<K: KeyValueStore, S: MapSurface> Session<K, S> {
    /// Load saved preferences, mount the map on the last known (or default)
    /// center and place the configured events. The location request is the
    /// caller's to issue afterwards.
    pub fn boot(backend: K, surface: S) -> Result<Self, MapError> {
        let store = StateStore::new(backend);
        let state = AppState::merged(AppState::default(), store.load());

        let mut map = MapView::new(surface);
        map.initialize(state.map_center(), MAP_ZOOM, OSM_TILES)?;
        let events = beach_events();
        map.set_markers(&events)?;

        info!(
            "session ready: {} events, {} tab",
            events.len(),
            state.active_tab.key()
        );
        Ok(Self {
            state,
            store,
            map,
            events,
            crews: CrewRoster::default(),
            toasts: ToastStack::default(),
            modals: ModalStack::default(),
            next_cleanup: NextCleanup::default(),
            weather: WeatherPanel::Loading,
            nav_open: false,
            refreshing: false,
            weather_generation: 0,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &StateStore<K> {
        &self.store
    }

    pub fn map(&self) -> &MapView<S> {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut MapView<S> {
        &mut self.map
    }

    pub fn events(&self) -> &[CleanupEvent] {
        &self.events
    }

    pub fn crews(&self) -> &CrewRoster {
        &self.crews
    }

    pub fn toasts(&self) -> &ToastStack {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastStack {
        &mut self.toasts
    }

    pub fn modals(&self) -> &ModalStack {
        &self.modals
    }

    pub fn next_cleanup(&self) -> &NextCleanup {
        &self.next_cleanup
    }

    pub fn weather(&self) -> &WeatherPanel {
        &self.weather
    }

    pub fn nav_open(&self) -> bool {
        self.nav_open
    }

    pub fn refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn leaderboard(&self) -> RenderedList {
        let tab = self.state.active_tab;
        render(tab, &records_for(tab))
    }

    fn commit(&mut self, action: StateAction) -> Transition {
        let transition = self.state.apply(action);
        if transition.persist {
            self.store.save(&self.state);
        }
        transition
    }

    /// Apply a state change, persist it if needed and follow any camera move.
    pub fn dispatch(&mut self, action: StateAction) -> Result<Transition, MapError> {
        let transition = self.commit(action);
        if let Some(center) = transition.recenter {
            self.map.recenter(center, MAP_ZOOM)?;
        }
        Ok(transition)
    }

    pub fn on_location(
        &mut self,
        result: Result<Coordinate, LocationError>,
    ) -> Result<Transition, MapError> {
        self.dispatch(resolve(result))
    }

    pub fn select_tab(&mut self, tab: LeaderboardTab) {
        self.commit(StateAction::SelectTab(tab));
    }

    pub fn toggle_dark_mode(&mut self) {
        self.commit(StateAction::ToggleDarkMode);
    }

    pub fn notify(&mut self, message: impl Into<String>) -> ToastId {
        self.toasts.push(message)
    }

    pub fn open_modal(&mut self, kind: ModalKind) -> ModalId {
        self.modals.open(kind)
    }

    pub fn close_modal(&mut self, id: ModalId) {
        self.modals.close(id);
    }

    /// Escape: every open overlay goes, whatever its kind.
    pub fn dismiss_overlays(&mut self) -> usize {
        self.modals.close_all()
    }

    pub fn submit_modal(&mut self, id: ModalId, values: &FormValues) -> Result<(), ModalError> {
        match self.modals.submit(id, values)? {
            ModalOutcome::Welcome(message) => {
                self.notify(message);
            }
            ModalOutcome::CreateCrew {
                name,
                description,
                home_beach,
            } => {
                let crew = self.crews.create(&name, &description, &home_beach);
                info!("crew created: {}", crew.as_str());
                self.commit(StateAction::SelectCrew(crew));
                self.notify(CREW_CREATED);
            }
        }
        Ok(())
    }

    pub fn view_crew(&mut self, id: &CrewId) {
        let Some(name) = self.crews.get(id).map(|crew| crew.name.clone()) else {
            return;
        };
        self.commit(StateAction::SelectCrew(id.clone()));
        self.notify(format!("Viewing crew: {name}"));
    }

    /// Zoom in on the known location, or explain why we can't.
    pub fn locate_user(&mut self) -> Result<(), MapError> {
        let Some(location) = self.state.user_location else {
            self.notify(LOCATION_UNAVAILABLE);
            return Ok(());
        };
        self.map.recenter(location, LOCATE_ZOOM)?;
        self.map.highlight_user(location)?;
        info!("user located on map");
        Ok(())
    }

    pub fn begin_refresh(&mut self) {
        self.refreshing = true;
    }

    pub fn finish_refresh(&mut self) -> Result<(), MapError> {
        self.refreshing = false;
        self.map.set_markers(&self.events)?;
        info!("beach events refreshed");
        Ok(())
    }

    pub fn hover_marker(&mut self, marker: &S::Marker, hovered: bool) -> Result<(), MapError> {
        self.map.hover(marker, hovered)
    }

    pub fn open_marker_popup(&mut self, marker: &S::Marker) -> Result<(), MapError> {
        self.map.open_popup(marker)
    }

    pub fn close_popups(&mut self) -> Result<(), MapError> {
        self.map.close_popups()
    }

    pub fn popup_action(&mut self, action: &PopupAction) -> Option<ToastId> {
        match action {
            PopupAction::JoinEvent(id) => self.join_event(id),
        }
    }

    pub fn join_event(&mut self, id: &EventId) -> Option<ToastId> {
        let name = find_event(&self.events, id)?.name.clone();
        Some(self.notify(format!("\u{2728} You've joined: {name}!")))
    }

    pub fn join_next_cleanup(&mut self, at: DateTime<Utc>) -> ToastId {
        info!("joining next cleanup at {}", self.next_cleanup.name);
        self.store
            .record_join(&JoinedCleanup::new(&self.next_cleanup, at));
        let message = self.next_cleanup.join_message();
        self.notify(message)
    }

    /// The URL to open in a new browsing context.
    pub fn directions(&mut self) -> String {
        self.notify(OPENING_DIRECTIONS);
        self.next_cleanup.directions_url.clone()
    }

    pub fn share_data(&self, page_url: &str) -> ShareData {
        self.next_cleanup.share_data(page_url)
    }

    pub fn toggle_nav(&mut self) -> bool {
        self.nav_open = !self.nav_open;
        self.nav_open
    }

    pub fn close_nav(&mut self) {
        self.nav_open = false;
    }

    /// Start a weather fetch for the current location, showing the loading
    /// state. Returns where to fetch and the ticket to hand back with the
    /// result; `None` until a location is known.
    pub fn begin_weather_fetch(&mut self) -> Option<(Coordinate, WeatherTicket)> {
        let at = self.state.user_location?;
        self.weather_generation += 1;
        self.weather = WeatherPanel::Loading;
        Some((at, WeatherTicket(self.weather_generation)))
    }

    /// Apply a fetch result unless a newer fetch has started since.
    pub fn finish_weather_fetch(&mut self, ticket: WeatherTicket, panel: WeatherPanel) -> bool {
        if ticket.0 != self.weather_generation {
            debug!("dropping stale weather result #{}", ticket.0);
            return false;
        }
        self.weather = panel;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_LOCATION, JOINED_CLEANUP_STORAGE_KEY, STATE_STORAGE_KEY};
    use crate::leaderboard::BadgeTier;
    use crate::map::{MapScene, USER_MARKER};
    use crate::store::MemoryStore;
    use crate::store::tests::FailingStore;
    use crate::weather::WeatherReport;
    use chrono::TimeZone;

    fn boot_with(raw: Option<&str>) -> Session<MemoryStore, MapScene> {
        let backend = match raw {
            Some(raw) => MemoryStore::with_raw(STATE_STORAGE_KEY, raw),
            None => MemoryStore::new(),
        };
        Session::boot(backend, MapScene::new()).unwrap()
    }

    fn messages<K: KeyValueStore, S: MapSurface>(session: &Session<K, S>) -> Vec<String> {
        session
            .toasts()
            .visible()
            .iter()
            .map(|t| t.message.clone())
            .collect()
    }

    #[test]
    fn boot_places_events_at_default_center() {
        let session = boot_with(None);
        let camera = session.map().camera().unwrap();
        assert_eq!(camera.center, DEFAULT_LOCATION);
        assert_eq!(camera.zoom, MAP_ZOOM);
        assert_eq!(session.map().markers().len(), session.events().len());
        assert_eq!(session.state(), &AppState::default());
    }

    #[test]
    fn boot_opens_on_last_known_location() {
        let session = boot_with(Some(r#"{"userLocation":{"lat":1.29,"lng":103.83}}"#));
        let center = session.map().camera().unwrap().center;
        assert_eq!(center, Coordinate::new(1.29, 103.83).unwrap());
    }

    #[test]
    fn boot_survives_unusable_storage() {
        let session = Session::boot(FailingStore, MapScene::new()).unwrap();
        assert_eq!(session.state(), &AppState::default());
    }

    #[test]
    fn saved_members_tab_renders_member_records() {
        let session = boot_with(Some(r#"{"currentTab":"members"}"#));
        let list = session.leaderboard();
        assert_eq!(list.tab, LeaderboardTab::Members);
        assert_eq!(list.rows[0].name, "Alex Chen");
        assert_eq!(list.rows[0].badge, BadgeTier::Gold);
        assert!(list.rows.iter().all(|row| row.name != "Ocean Warriors"));
    }

    #[test]
    fn tab_switch_rerenders_and_persists() {
        let mut session = boot_with(None);
        session.select_tab(LeaderboardTab::Members);
        assert_eq!(session.leaderboard().rows[0].name, "Alex Chen");
        let raw = session.store().backend().raw(STATE_STORAGE_KEY).unwrap();
        assert!(raw.contains(r#""currentTab":"members""#));
    }

    #[test]
    fn failed_location_falls_back_and_map_stays_put() {
        let mut session = boot_with(None);
        let transition = session.on_location(Err(LocationError::Denied)).unwrap();
        assert_eq!(transition, Transition::default());
        assert_eq!(session.state().user_location, Some(DEFAULT_LOCATION));
        assert_eq!(session.map().camera().unwrap().center, DEFAULT_LOCATION);
        assert!(session.store().backend().raw(STATE_STORAGE_KEY).is_none());
        assert!(session.toasts().is_empty());
    }

    #[test]
    fn resolved_location_persists_and_recenters() {
        let mut session = boot_with(None);
        let here = Coordinate::new(1.35, 103.94).unwrap();
        session.on_location(Ok(here)).unwrap();
        assert_eq!(session.map().camera().unwrap().center, here);
        assert_eq!(session.map().camera().unwrap().zoom, MAP_ZOOM);
        let raw = session.store().backend().raw(STATE_STORAGE_KEY).unwrap();
        assert!(raw.contains(r#""userLocation":{"lat":1.35,"lng":103.94}"#));
    }

    #[test]
    fn creating_a_crew_confirms_updates_list_and_closes() {
        let mut session = boot_with(None);
        let before = session.crews().len();
        let id = session.open_modal(ModalKind::CreateCrew);
        let values: FormValues = [
            ("name", "Reef Rangers".to_string()),
            ("description", "Saturday sweeps".to_string()),
            ("location", "Changi Beach".to_string()),
        ]
        .into_iter()
        .collect();

        session.submit_modal(id, &values).unwrap();

        assert_eq!(messages(&session), vec![CREW_CREATED.to_string()]);
        assert_eq!(session.crews().len(), before + 1);
        assert!(session.crews().iter().any(|c| c.name == "Reef Rangers"));
        assert!(session.modals().is_empty());
        assert_eq!(
            session.state().selected_crew,
            Some(CrewId("reef-rangers".into()))
        );
    }

    #[test]
    fn incomplete_crew_form_stays_open_without_toast() {
        let mut session = boot_with(None);
        let id = session.open_modal(ModalKind::CreateCrew);
        let result = session.submit_modal(id, &FormValues::new());
        assert_eq!(result, Err(ModalError::MissingField("name")));
        assert_eq!(session.modals().len(), 1);
        assert!(session.toasts().is_empty());
    }

    #[test]
    fn escape_with_two_overlays_removes_both() {
        let mut session = boot_with(None);
        session.open_modal(ModalKind::Login);
        session.open_modal(ModalKind::Signup);
        assert_eq!(session.dismiss_overlays(), 2);
        assert!(session.modals().is_empty());
    }

    #[test]
    fn login_submit_welcomes_back() {
        let mut session = boot_with(None);
        let id = session.open_modal(ModalKind::Login);
        let values: FormValues = [
            ("email", "sam@example.com".to_string()),
            ("password", "hunter2".to_string()),
        ]
        .into_iter()
        .collect();
        session.submit_modal(id, &values).unwrap();
        assert_eq!(
            messages(&session),
            vec!["Welcome back to ShoreSquad! \u{1F30A}".to_string()]
        );
    }

    #[test]
    fn locate_without_location_explains() {
        let mut session = boot_with(None);
        session.locate_user().unwrap();
        assert_eq!(messages(&session), vec![LOCATION_UNAVAILABLE.to_string()]);
        assert!(session.map().user_marker().is_none());
    }

    #[test]
    fn locate_zooms_in_and_marks_user() {
        let mut session = boot_with(None);
        let here = Coordinate::new(1.33, 103.91).unwrap();
        session.on_location(Ok(here)).unwrap();
        session.locate_user().unwrap();
        let camera = session.map().camera().unwrap();
        assert_eq!(camera.zoom, LOCATE_ZOOM);
        assert_eq!(camera.center, here);
        let user = session
            .map()
            .surface()
            .markers()
            .iter()
            .find(|m| m.style == USER_MARKER)
            .unwrap();
        assert_eq!(user.position, here);
        assert!(user.popup_open);
    }

    #[test]
    fn refresh_replaces_markers_without_duplicates() {
        let mut session = boot_with(None);
        session.begin_refresh();
        assert!(session.refreshing());
        session.finish_refresh().unwrap();
        assert!(!session.refreshing());
        assert_eq!(
            session.map().surface().markers().len(),
            session.events().len()
        );
    }

    #[test]
    fn join_event_from_popup_action() {
        let mut session = boot_with(None);
        let action = PopupAction::JoinEvent(EventId("east-coast-park".into()));
        assert!(session.popup_action(&action).is_some());
        assert_eq!(
            messages(&session),
            vec!["\u{2728} You've joined: East Coast Park Cleanup!".to_string()]
        );
        assert!(session.join_event(&EventId("atlantis".into())).is_none());
    }

    #[test]
    fn joining_next_cleanup_records_and_confirms() {
        let mut session = boot_with(None);
        let at = Utc.with_ymd_and_hms(2025, 11, 2, 8, 30, 0).unwrap();
        session.join_next_cleanup(at);
        assert_eq!(
            messages(&session),
            vec!["\u{1F389} You've joined the Pasir Ris Beach Cleanup on 2025-12-15!".to_string()]
        );
        let raw = session
            .store()
            .backend()
            .raw(JOINED_CLEANUP_STORAGE_KEY)
            .unwrap();
        assert!(raw.contains(r#""joinedAt":"2025-11-02T08:30:00.000Z""#));
    }

    #[test]
    fn view_crew_selects_and_announces() {
        let mut session = boot_with(None);
        session.view_crew(&CrewId("east-coast-squad".into()));
        assert_eq!(messages(&session), vec!["Viewing crew: East Coast Squad".to_string()]);
        assert_eq!(
            session.state().selected_crew,
            Some(CrewId("east-coast-squad".into()))
        );
    }

    #[test]
    fn directions_and_nav() {
        let mut session = boot_with(None);
        let url = session.directions();
        assert!(url.starts_with("https://www.google.com/maps/place/Pasir+Ris+Beach"));
        assert_eq!(messages(&session), vec![OPENING_DIRECTIONS.to_string()]);

        assert!(session.toggle_nav());
        session.close_nav();
        assert!(!session.nav_open());
    }

    #[test]
    fn dark_mode_toggle_is_not_saved() {
        let mut session = boot_with(None);
        session.toggle_dark_mode();
        assert!(session.state().dark_mode);
        assert!(session.store().backend().raw(STATE_STORAGE_KEY).is_none());
    }

    #[test]
    fn weather_fetch_waits_for_a_location() {
        let mut session = boot_with(None);
        assert!(session.begin_weather_fetch().is_none());
    }

    #[test]
    fn stale_weather_result_is_dropped() {
        let mut session = boot_with(Some(r#"{"userLocation":{"lat":1.29,"lng":103.83}}"#));
        let (_, stale) = session.begin_weather_fetch().unwrap();
        session.on_location(Ok(Coordinate::new(1.35, 103.99).unwrap())).unwrap();
        let (at, fresh) = session.begin_weather_fetch().unwrap();
        assert_eq!(at, Coordinate::new(1.35, 103.99).unwrap());

        let fresh_report = WeatherReport::mock();
        assert!(session.finish_weather_fetch(fresh, WeatherPanel::Ready(fresh_report.clone())));
        assert!(!session.finish_weather_fetch(stale, WeatherPanel::Unavailable));
        assert_eq!(session.weather(), &WeatherPanel::Ready(fresh_report));
    }

    #[test]
    fn new_toasts_wait_for_their_timers() {
        let mut session = boot_with(None);
        let id = session.notify("hello");
        assert_eq!(session.toasts().visible()[0].id, id);
        assert_eq!(session.toasts_mut().take_unscheduled(), vec![id]);
    }
}
