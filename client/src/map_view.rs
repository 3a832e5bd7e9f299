use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{MouseEvent, PointerEvent, WheelEvent};

use shoresquad_shared::config::{OSM_TILES, REFRESH_DELAY_MS};
use shoresquad_shared::projection::{ScreenViewport, TILE_SIZE};
use shoresquad_shared::{MarkerStyle, SceneMarkerId};

use crate::app::{SessionSignal, report};
use crate::colors::hex_with_alpha;

const MAP_HEIGHT: f64 = 420.0;
/// Pointer travel before a press becomes a drag rather than a click.
const DRAG_THRESHOLD_PX: f64 = 4.0;
/// Accumulated wheel delta per zoom step.
const WHEEL_STEP: f64 = 100.0;

struct ResizeBinding {
    window: web_sys::Window,
    _handler: wasm_bindgen::closure::Closure<dyn Fn()>,
}

thread_local! {
    static RESIZE_BINDING: RefCell<Option<ResizeBinding>> = const { RefCell::new(None) };
}

/// Press/drag bookkeeping for the map pane. A press turns into a drag once
/// the pointer travels past [`DRAG_THRESHOLD_PX`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct DragTracker {
    pressed: bool,
    dragging: bool,
    start: (f64, f64),
    last: (f64, f64),
}

impl DragTracker {
    fn press(&mut self, at: (f64, f64)) {
        *self = Self {
            pressed: true,
            dragging: false,
            start: at,
            last: at,
        };
    }

    fn dragging(&self) -> bool {
        self.dragging
    }

    /// Pan delta for this move, or `None` while not dragging.
    fn move_to(&mut self, at: (f64, f64)) -> Option<(f64, f64)> {
        if !self.pressed {
            return None;
        }
        if !self.dragging {
            let (sx, sy) = self.start;
            if (at.0 - sx).abs() < DRAG_THRESHOLD_PX && (at.1 - sy).abs() < DRAG_THRESHOLD_PX {
                return None;
            }
            self.dragging = true;
        }
        let (lx, ly) = self.last;
        self.last = at;
        Some((at.0 - lx, at.1 - ly))
    }

    fn release(&mut self) {
        self.pressed = false;
    }

    /// Whether the press that just ended was a drag. Clears the flag so the
    /// following click is only swallowed once.
    fn take_drag_ended(&mut self) -> bool {
        std::mem::take(&mut self.dragging)
    }
}

fn marker_style(style: &MarkerStyle, radius: f64, x: f64, y: f64) -> String {
    format!(
        "position: absolute; left: {x}px; top: {y}px; width: {d}px; height: {d}px; margin-left: -{radius}px; margin-top: -{radius}px; box-sizing: border-box; border-radius: 50%; background: {fill}; border: {w}px solid {stroke}; cursor: pointer; transition: width 0.15s, height 0.15s, margin 0.15s;",
        d = radius * 2.0,
        fill = hex_with_alpha(style.fill, style.fill_opacity),
        w = style.weight,
        stroke = hex_with_alpha(style.stroke, style.opacity),
    )
}

/// OpenStreetMap tiles with the session's markers drawn on top. Drag to pan,
/// wheel or the buttons to zoom.
#[component]
pub fn MapPanel() -> impl IntoView {
    let session: SessionSignal = expect_context();
    let container: NodeRef<leptos::html::Div> = NodeRef::new();
    let size: RwSignal<(f64, f64)> = RwSignal::new((800.0, MAP_HEIGHT));

    let measure = move || {
        if let Some(el) = container.get_untracked() {
            let (w, h) = (el.client_width() as f64, el.client_height() as f64);
            if w > 0.0 && h > 0.0 && size.get_untracked() != (w, h) {
                size.set((w, h));
            }
        }
    };

    // Measure once mounted, and again whenever the window resizes.
    Effect::new(move || {
        use wasm_bindgen::closure::Closure;
        if container.get().is_none() {
            return;
        }
        measure();
        let Some(window) = web_sys::window() else {
            return;
        };
        RESIZE_BINDING.with(|slot| {
            if let Some(old) = slot.borrow_mut().take() {
                let _ = old.window.remove_event_listener_with_callback(
                    "resize",
                    old._handler.as_ref().unchecked_ref(),
                );
            }
        });
        let handler = Closure::<dyn Fn()>::new(measure);
        if window
            .add_event_listener_with_callback("resize", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            RESIZE_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(ResizeBinding {
                    window: window.clone(),
                    _handler: handler,
                });
            });
        }
    });

    let viewport = Memo::new(move |_| {
        let camera = session.with(|s| s.map().surface().camera())?;
        let (w, h) = size.get();
        Some(ScreenViewport::new(camera, w, h))
    });
    let tiles = Memo::new(move |_| {
        viewport
            .get()
            .map(|vp| vp.visible_tiles())
            .unwrap_or_default()
    });
    let marker_ids = Memo::new(move |_| {
        session.with(|s| {
            s.map()
                .surface()
                .markers()
                .iter()
                .map(|m| m.id)
                .collect::<Vec<_>>()
        })
    });
    let refreshing = Memo::new(move |_| session.with(|s| s.refreshing()));
    let layer = session.with_untracked(|s| s.map().surface().tiles()).unwrap_or(OSM_TILES);

    // --- Input handlers ---
    let drag = Rc::new(Cell::new(DragTracker::default()));
    let wheel_acc = Rc::new(Cell::new(0.0));

    let on_pointer_down = {
        let drag = drag.clone();
        move |e: PointerEvent| {
            let mut tracker = drag.get();
            tracker.press((e.client_x() as f64, e.client_y() as f64));
            drag.set(tracker);
        }
    };

    let on_pointer_move = {
        let drag = drag.clone();
        move |e: PointerEvent| {
            let mut tracker = drag.get();
            let was_dragging = tracker.dragging();
            let step = tracker.move_to((e.client_x() as f64, e.client_y() as f64));
            drag.set(tracker);
            let Some((dx, dy)) = step else {
                return;
            };
            if !was_dragging {
                if let Some(el) = container.get_untracked() {
                    el.set_pointer_capture(e.pointer_id()).ok();
                    web_sys::HtmlElement::style(&el).set_property("cursor", "grabbing").ok();
                }
            }
            session.update(|s| report("panning map", s.map_mut().pan_by(dx, dy)));
        }
    };

    // Shared by pointerup and pointercancel.
    let end_press = {
        let drag = drag.clone();
        move |e: PointerEvent| {
            let mut tracker = drag.get();
            tracker.release();
            drag.set(tracker);
            if let Some(el) = container.get_untracked() {
                if el.has_pointer_capture(e.pointer_id()) {
                    el.release_pointer_capture(e.pointer_id()).ok();
                }
                web_sys::HtmlElement::style(&el).set_property("cursor", "grab").ok();
            }
        }
    };
    let on_pointer_up = end_press.clone();
    let on_pointer_cancel = {
        let drag = drag.clone();
        move |e: PointerEvent| {
            end_press(e);
            let mut tracker = drag.get();
            tracker.take_drag_ended();
            drag.set(tracker);
        }
    };

    // A click that was not the end of a drag closes event popups.
    let on_click = {
        let drag = drag.clone();
        move |_: MouseEvent| {
            let mut tracker = drag.get();
            let was_drag = tracker.take_drag_ended();
            drag.set(tracker);
            if !was_drag {
                session.update(|s| report("closing popups", s.close_popups()));
            }
        }
    };

    let on_wheel = {
        let wheel_acc = wheel_acc.clone();
        move |e: WheelEvent| {
            e.prevent_default();
            let acc = wheel_acc.get() + e.delta_y();
            if acc.abs() < WHEEL_STEP {
                wheel_acc.set(acc);
                return;
            }
            wheel_acc.set(0.0);
            let step = if acc < 0.0 { 1 } else { -1 };
            session.update(|s| report("zooming map", s.map_mut().zoom_by(step)));
        }
    };

    let zoom_in = move |e: MouseEvent| {
        e.stop_propagation();
        session.update(|s| report("zooming map", s.map_mut().zoom_by(1)));
    };
    let zoom_out = move |e: MouseEvent| {
        e.stop_propagation();
        session.update(|s| report("zooming map", s.map_mut().zoom_by(-1)));
    };
    let locate = move |e: MouseEvent| {
        e.stop_propagation();
        session.update(|s| report("locating user", s.locate_user()));
    };
    let refresh = move |e: MouseEvent| {
        e.stop_propagation();
        session.update(|s| s.begin_refresh());
        Timeout::new(REFRESH_DELAY_MS, move || {
            session.update(|s| report("refreshing events", s.finish_refresh()));
        })
        .forget();
    };

    view! {
        <div
            node_ref=container
            class="map-container"
            style=format!(
                "position: relative; width: 100%; height: {MAP_HEIGHT}px; overflow: hidden; background: #aad3df; border-radius: 12px; touch-action: none; cursor: grab; user-select: none;"
            )
            on:pointerdown=on_pointer_down
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_up
            on:pointercancel=on_pointer_cancel
            on:click=on_click
            on:wheel=on_wheel
        >
            <For
                each=move || tiles.get()
                key=|p| (p.tile.z, p.column, p.tile.y)
                children=move |p| {
                    let (column, row) = (p.column, p.tile.y);
                    let url = p.tile.url(&layer);
                    let style = move || {
                        let (ox, oy) = viewport
                            .get()
                            .map(|vp| vp.origin())
                            .unwrap_or_default();
                        format!(
                            "position: absolute; left: {}px; top: {}px; width: {TILE_SIZE}px; height: {TILE_SIZE}px; pointer-events: none;",
                            column as f64 * TILE_SIZE - ox,
                            row as f64 * TILE_SIZE - oy,
                        )
                    };
                    view! { <img src=url alt="" draggable="false" style=style /> }
                }
            />
            <For
                each=move || marker_ids.get()
                key=|id: &SceneMarkerId| *id
                children=move |id: SceneMarkerId| view! { <MarkerDot id=id viewport=viewport /> }
            />
            <div
                class="map-controls"
                style="position: absolute; top: 12px; right: 12px; display: flex; flex-direction: column; gap: 6px; z-index: 5;"
                on:pointerdown=|e: PointerEvent| e.stop_propagation()
            >
                <button class="map-btn" title="Zoom in" on:click=zoom_in>"+"</button>
                <button class="map-btn" title="Zoom out" on:click=zoom_out>"\u{2212}"</button>
                <button class="map-btn" title="Show my location" on:click=locate>"\u{1F4CD}"</button>
                <button
                    class="map-btn"
                    class:spin=move || refreshing.get()
                    title="Refresh events"
                    on:click=refresh
                >
                    "\u{1F504}"
                </button>
            </div>
            <div
                class="map-attribution"
                style="position: absolute; right: 0; bottom: 0; padding: 2px 6px; font-size: 11px; background: rgba(255,255,255,0.8); color: #333; z-index: 5;"
            >
                {layer.attribution}
            </div>
        </div>
    }
}

/// One circle marker and, when open, its popup.
#[component]
fn MarkerDot(id: SceneMarkerId, viewport: Memo<Option<ScreenViewport>>) -> impl IntoView {
    let session: SessionSignal = expect_context();
    let marker = Memo::new(move |_| session.with(|s| s.map().surface().marker(id).cloned()));
    let screen = Memo::new(move |_| {
        let vp = viewport.get()?;
        let position = marker.with(|m| m.as_ref().map(|m| m.position))?;
        Some(vp.world_to_screen(position))
    });

    let style = move || {
        let (Some(m), Some((x, y))) = (marker.get(), screen.get()) else {
            return "display: none;".to_string();
        };
        marker_style(&m.style, m.radius, x, y)
    };

    let popup = move || {
        let m = marker.get().filter(|m| m.popup_open)?;
        let (x, y) = screen.get()?;
        let action = m.popup.action.clone().map(|(action, label)| {
            view! {
                <button
                    class="btn btn-primary"
                    style="margin-top: 8px; padding: 6px 12px; font-size: 0.85rem;"
                    on:click=move |e: MouseEvent| {
                        e.stop_propagation();
                        session.update(|s| s.popup_action(&action));
                    }
                >
                    {label}
                </button>
            }
        });
        Some(view! {
            <div
                class="map-popup"
                style=format!(
                    "position: absolute; left: {x}px; top: {}px; transform: translate(-50%, -100%); min-width: 160px; padding: 10px 14px; background: white; border-radius: 8px; box-shadow: 0 3px 14px rgba(0,0,0,0.3); z-index: 4; cursor: default;",
                    y - m.radius - 8.0,
                )
                on:pointerdown=|e: PointerEvent| e.stop_propagation()
                on:click=|e: MouseEvent| e.stop_propagation()
            >
                <strong>{m.popup.title.clone()}</strong>
                {m.popup.lines.iter().map(|line| view! { <div style="font-size: 0.85rem; color: #444;">{line.clone()}</div> }).collect_view()}
                {action}
            </div>
        })
    };

    view! {
        <div
            class="map-marker"
            style=style
            on:mouseenter=move |_| {
                session.update(|s| report("hovering marker", s.hover_marker(&id, true)));
            }
            on:mouseleave=move |_| {
                session.update(|s| report("hovering marker", s.hover_marker(&id, false)));
            }
            on:pointerdown=|e: PointerEvent| e.stop_propagation()
            on:click=move |e: MouseEvent| {
                e.stop_propagation();
                session.update(|s| report("opening popup", s.open_marker_popup(&id)));
            }
        ></div>
        {popup}
    }
}

#[cfg(test)]
mod tests {
    use super::DragTracker;

    #[test]
    fn small_moves_stay_a_click() {
        let mut drag = DragTracker::default();
        drag.press((10.0, 10.0));
        assert_eq!(drag.move_to((12.0, 13.0)), None);
        drag.release();
        assert!(!drag.take_drag_ended());
    }

    #[test]
    fn drag_pans_by_each_step_after_the_threshold() {
        let mut drag = DragTracker::default();
        drag.press((0.0, 0.0));
        assert_eq!(drag.move_to((10.0, 0.0)), Some((10.0, 0.0)));
        assert_eq!(drag.move_to((15.0, -5.0)), Some((5.0, -5.0)));
        drag.release();
        assert!(drag.take_drag_ended());
        assert!(!drag.take_drag_ended());
    }

    #[test]
    fn moves_after_cancel_do_not_pan() {
        let mut drag = DragTracker::default();
        drag.press((0.0, 0.0));
        assert!(drag.move_to((20.0, 20.0)).is_some());
        drag.release();
        drag.take_drag_ended();
        assert_eq!(drag.move_to((40.0, 40.0)), None);
        assert_eq!(drag.move_to((80.0, 10.0)), None);
    }

    #[test]
    fn hovering_without_a_press_never_pans() {
        let mut drag = DragTracker::default();
        assert_eq!(drag.move_to((100.0, 100.0)), None);
    }
}
