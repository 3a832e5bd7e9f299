use std::fmt;

use log::debug;
use thiserror::Error;

use crate::events::{CleanupEvent, EventId};
use crate::geo::Coordinate;
use crate::projection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map view used before initialize()")]
    NotInitialized,
    #[error("map view is already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: Coordinate,
    pub zoom: u8,
}

/// Raster tile source in `{s}/{z}/{x}/{y}` template form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLayer {
    pub url_template: &'static str,
    pub subdomains: &'static [&'static str],
    pub max_zoom: u8,
    pub attribution: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill: &'static str,
    pub stroke: &'static str,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

pub const EVENT_MARKER: MarkerStyle = MarkerStyle {
    radius: 8.0,
    fill: "#0066CC",
    stroke: "#003d99",
    weight: 2.0,
    opacity: 1.0,
    fill_opacity: 0.8,
};
pub const EVENT_MARKER_HOVER_RADIUS: f64 = 12.0;

pub const USER_MARKER: MarkerStyle = MarkerStyle {
    radius: 6.0,
    fill: "#00AA66",
    stroke: "#006644",
    weight: 2.0,
    opacity: 1.0,
    fill_opacity: 0.9,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupAction {
    JoinEvent(EventId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub title: String,
    pub lines: Vec<String>,
    pub action: Option<(PopupAction, &'static str)>,
    /// Auto-closing popups close when another popup opens or the map is clicked.
    pub auto_close: bool,
}

impl Popup {
    pub fn for_event(event: &CleanupEvent) -> Self {
        Self {
            title: event.name.clone(),
            lines: vec![format!(
                "\u{1F465} {} members participating",
                event.member_count
            )],
            action: Some((PopupAction::JoinEvent(event.id.clone()), "Join This Event")),
            auto_close: true,
        }
    }

    pub fn user_location() -> Self {
        Self {
            title: "Your Location".to_string(),
            lines: Vec::new(),
            action: None,
            auto_close: false,
        }
    }
}

/// The map-rendering capability: place markers, bind popups, move the camera.
pub trait MapSurface {
    type Marker: Clone + PartialEq + fmt::Debug;

    fn mount(&mut self, camera: Camera, tiles: TileLayer);
    fn set_camera(&mut self, camera: Camera);
    fn add_marker(&mut self, at: Coordinate, style: MarkerStyle, popup: Popup) -> Self::Marker;
    fn remove_marker(&mut self, marker: &Self::Marker);
    fn set_marker_radius(&mut self, marker: &Self::Marker, radius: f64);
    fn open_popup(&mut self, marker: &Self::Marker);
    fn close_popups(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker<M> {
    pub event: EventId,
    pub handle: M,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Mounted {
    camera: Camera,
    tiles: TileLayer,
}

/// Owns a map surface and keeps its markers 1:1 with the current event list.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView<S: MapSurface> {
    surface: S,
    mounted: Option<Mounted>,
    markers: Vec<PlacedMarker<S::Marker>>,
    user_marker: Option<S::Marker>,
}

impl<S: MapSurface> MapView<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            mounted: None,
            markers: Vec::new(),
            user_marker: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn camera(&self) -> Result<Camera, MapError> {
        self.mounted
            .map(|m| m.camera)
            .ok_or(MapError::NotInitialized)
    }

    pub fn markers(&self) -> &[PlacedMarker<S::Marker>] {
        &self.markers
    }

    pub fn user_marker(&self) -> Option<&S::Marker> {
        self.user_marker.as_ref()
    }

    pub fn initialize(
        &mut self,
        center: Coordinate,
        zoom: u8,
        tiles: TileLayer,
    ) -> Result<(), MapError> {
        if self.mounted.is_some() {
            return Err(MapError::AlreadyInitialized);
        }
        let camera = Camera {
            center,
            zoom: zoom.min(tiles.max_zoom),
        };
        self.surface.mount(camera, tiles);
        self.mounted = Some(Mounted { camera, tiles });
        Ok(())
    }

    fn mounted_mut(&mut self) -> Result<&mut Mounted, MapError> {
        self.mounted.as_mut().ok_or(MapError::NotInitialized)
    }

    /// Replace every event marker with one per event. Calling twice with the
    /// same list leaves the same markers behind.
    pub fn set_markers(&mut self, events: &[CleanupEvent]) -> Result<(), MapError> {
        self.mounted_mut()?;
        for placed in self.markers.drain(..) {
            self.surface.remove_marker(&placed.handle);
        }
        for event in events {
            let handle = self
                .surface
                .add_marker(event.location, EVENT_MARKER, Popup::for_event(event));
            self.markers.push(PlacedMarker {
                event: event.id.clone(),
                handle,
            });
        }
        debug!("placed {} cleanup event markers", self.markers.len());
        Ok(())
    }

    /// Enlarge an event marker while hovered. The user marker is left alone.
    pub fn hover(&mut self, marker: &S::Marker, hovered: bool) -> Result<(), MapError> {
        self.mounted_mut()?;
        if self.markers.iter().any(|placed| &placed.handle == marker) {
            let radius = if hovered {
                EVENT_MARKER_HOVER_RADIUS
            } else {
                EVENT_MARKER.radius
            };
            self.surface.set_marker_radius(marker, radius);
        }
        Ok(())
    }

    pub fn recenter(&mut self, center: Coordinate, zoom: u8) -> Result<(), MapError> {
        let mounted = self.mounted_mut()?;
        mounted.camera = Camera {
            center,
            zoom: zoom.min(mounted.tiles.max_zoom),
        };
        let camera = mounted.camera;
        self.surface.set_camera(camera);
        Ok(())
    }

    /// Add (or move) the single "you are here" marker and open its popup.
    pub fn highlight_user(&mut self, at: Coordinate) -> Result<(), MapError> {
        self.mounted_mut()?;
        if let Some(old) = self.user_marker.take() {
            self.surface.remove_marker(&old);
        }
        let handle = self
            .surface
            .add_marker(at, USER_MARKER, Popup::user_location());
        self.surface.open_popup(&handle);
        self.user_marker = Some(handle);
        Ok(())
    }

    pub fn open_popup(&mut self, marker: &S::Marker) -> Result<(), MapError> {
        self.mounted_mut()?;
        self.surface.open_popup(marker);
        Ok(())
    }

    pub fn close_popups(&mut self) -> Result<(), MapError> {
        self.mounted_mut()?;
        self.surface.close_popups();
        Ok(())
    }

    /// Follow a screen-space drag.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> Result<(), MapError> {
        let mounted = self.mounted_mut()?;
        mounted.camera = projection::pan_camera(mounted.camera, dx, dy);
        let camera = mounted.camera;
        self.surface.set_camera(camera);
        Ok(())
    }

    /// Step the zoom level, clamped to what the tile layer serves.
    pub fn zoom_by(&mut self, delta: i8) -> Result<(), MapError> {
        let mounted = self.mounted_mut()?;
        let zoom = (mounted.camera.zoom as i16 + delta as i16)
            .clamp(0, mounted.tiles.max_zoom as i16);
        mounted.camera.zoom = zoom as u8;
        let camera = mounted.camera;
        self.surface.set_camera(camera);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneMarkerId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct SceneMarker {
    pub id: SceneMarkerId,
    pub position: Coordinate,
    pub style: MarkerStyle,
    pub radius: f64,
    pub popup: Popup,
    pub popup_open: bool,
}

/// Retained-mode surface: records what should be on the map so a view layer
/// can draw it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapScene {
    camera: Option<Camera>,
    tiles: Option<TileLayer>,
    markers: Vec<SceneMarker>,
    next_id: u64,
}

impl MapScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn camera(&self) -> Option<Camera> {
        self.camera
    }

    pub fn tiles(&self) -> Option<TileLayer> {
        self.tiles
    }

    pub fn markers(&self) -> &[SceneMarker] {
        &self.markers
    }

    pub fn marker(&self, id: SceneMarkerId) -> Option<&SceneMarker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn open_popup_markers(&self) -> impl Iterator<Item = &SceneMarker> {
        self.markers.iter().filter(|m| m.popup_open)
    }
}

impl MapSurface for MapScene {
    type Marker = SceneMarkerId;

    fn mount(&mut self, camera: Camera, tiles: TileLayer) {
        self.camera = Some(camera);
        self.tiles = Some(tiles);
    }

    fn set_camera(&mut self, camera: Camera) {
        self.camera = Some(camera);
    }

    fn add_marker(&mut self, at: Coordinate, style: MarkerStyle, popup: Popup) -> SceneMarkerId {
        self.next_id += 1;
        let id = SceneMarkerId(self.next_id);
        self.markers.push(SceneMarker {
            id,
            position: at,
            style,
            radius: style.radius,
            popup,
            popup_open: false,
        });
        id
    }

    fn remove_marker(&mut self, marker: &SceneMarkerId) {
        self.markers.retain(|m| m.id != *marker);
    }

    fn set_marker_radius(&mut self, marker: &SceneMarkerId, radius: f64) {
        if let Some(m) = self.markers.iter_mut().find(|m| m.id == *marker) {
            m.radius = radius;
        }
    }

    fn open_popup(&mut self, marker: &SceneMarkerId) {
        for m in &mut self.markers {
            if m.id == *marker {
                m.popup_open = true;
            } else if m.popup.auto_close {
                m.popup_open = false;
            }
        }
    }

    fn close_popups(&mut self) {
        for m in &mut self.markers {
            if m.popup.auto_close {
                m.popup_open = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_LOCATION, MAP_ZOOM, OSM_TILES};
    use crate::events::beach_events;

    fn ready_view() -> MapView<MapScene> {
        let mut view = MapView::new(MapScene::new());
        view.initialize(DEFAULT_LOCATION, MAP_ZOOM, OSM_TILES).unwrap();
        view
    }

    fn positions(view: &MapView<MapScene>) -> Vec<(f64, f64)> {
        view.surface()
            .markers()
            .iter()
            .map(|m| (m.position.latitude(), m.position.longitude()))
            .collect()
    }

    #[test]
    fn operations_before_initialize_fail() {
        let mut view = MapView::new(MapScene::new());
        assert_eq!(view.set_markers(&beach_events()), Err(MapError::NotInitialized));
        assert_eq!(view.recenter(DEFAULT_LOCATION, 3), Err(MapError::NotInitialized));
        assert_eq!(view.highlight_user(DEFAULT_LOCATION), Err(MapError::NotInitialized));
        assert_eq!(view.pan_by(1.0, 1.0), Err(MapError::NotInitialized));
        assert_eq!(view.camera(), Err(MapError::NotInitialized));
        assert!(view.surface().markers().is_empty());
    }

    #[test]
    fn second_initialize_is_rejected() {
        let mut view = ready_view();
        assert_eq!(
            view.initialize(DEFAULT_LOCATION, 5, OSM_TILES),
            Err(MapError::AlreadyInitialized)
        );
        assert_eq!(view.camera().unwrap().zoom, MAP_ZOOM);
    }

    #[test]
    fn set_markers_is_idempotent() {
        let events = beach_events();
        let mut once = ready_view();
        once.set_markers(&events).unwrap();

        let mut twice = ready_view();
        twice.set_markers(&events).unwrap();
        twice.set_markers(&events).unwrap();

        assert_eq!(twice.surface().markers().len(), events.len());
        assert_eq!(positions(&once), positions(&twice));
        assert_eq!(twice.markers().len(), events.len());
    }

    #[test]
    fn markers_are_bound_to_event_ids() {
        let events = beach_events();
        let mut view = ready_view();
        view.set_markers(&events).unwrap();
        let bound: Vec<&EventId> = view.markers().iter().map(|m| &m.event).collect();
        let expected: Vec<&EventId> = events.iter().map(|e| &e.id).collect();
        assert_eq!(bound, expected);
    }

    #[test]
    fn event_popup_shows_name_members_and_join_action() {
        let events = beach_events();
        let mut view = ready_view();
        view.set_markers(&events[..1]).unwrap();
        let marker = &view.surface().markers()[0];
        assert_eq!(marker.popup.title, "Pasir Ris Beach Cleanup");
        assert_eq!(marker.popup.lines, vec!["\u{1F465} 24 members participating"]);
        assert_eq!(
            marker.popup.action,
            Some((PopupAction::JoinEvent(events[0].id.clone()), "Join This Event"))
        );
    }

    #[test]
    fn hover_enlarges_and_restores_radius() {
        let mut view = ready_view();
        view.set_markers(&beach_events()).unwrap();
        let handle = view.markers()[1].handle;

        view.hover(&handle, true).unwrap();
        assert_eq!(view.surface().marker(handle).unwrap().radius, 12.0);
        view.hover(&handle, false).unwrap();
        assert_eq!(view.surface().marker(handle).unwrap().radius, 8.0);
    }

    #[test]
    fn highlight_user_replaces_previous_marker_and_opens_popup() {
        let mut view = ready_view();
        view.set_markers(&beach_events()).unwrap();
        let here = Coordinate::new(1.30, 103.85).unwrap();
        view.highlight_user(here).unwrap();
        view.highlight_user(here).unwrap();

        let user_markers: Vec<_> = view
            .surface()
            .markers()
            .iter()
            .filter(|m| m.style == USER_MARKER)
            .collect();
        assert_eq!(user_markers.len(), 1);
        assert!(user_markers[0].popup_open);
        assert_eq!(user_markers[0].popup.title, "Your Location");
    }

    #[test]
    fn user_popup_survives_opening_an_event_popup() {
        let mut view = ready_view();
        view.set_markers(&beach_events()).unwrap();
        view.highlight_user(DEFAULT_LOCATION).unwrap();
        let event_marker = view.markers()[0].handle;
        view.open_popup(&event_marker).unwrap();
        assert_eq!(view.surface().open_popup_markers().count(), 2);
        view.close_popups().unwrap();
        assert_eq!(view.surface().open_popup_markers().count(), 1);
    }

    #[test]
    fn recenter_moves_camera_and_clamps_zoom() {
        let mut view = ready_view();
        let target = Coordinate::new(1.29, 103.83).unwrap();
        view.recenter(target, 40).unwrap();
        let camera = view.surface().camera().unwrap();
        assert_eq!(camera.center, target);
        assert_eq!(camera.zoom, OSM_TILES.max_zoom);
    }

    #[test]
    fn zoom_by_stays_within_tile_range() {
        let mut view = ready_view();
        view.zoom_by(-100).unwrap();
        assert_eq!(view.camera().unwrap().zoom, 0);
        view.zoom_by(100).unwrap();
        assert_eq!(view.camera().unwrap().zoom, 19);
    }
}
