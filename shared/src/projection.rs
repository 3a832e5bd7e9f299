//! Web-Mercator math for the slippy tile map: world pixels, screen placement
//! and the set of tiles covering a viewport.

use std::f64::consts::PI;

use crate::geo::Coordinate;
use crate::map::{Camera, TileLayer};

pub const TILE_SIZE: f64 = 256.0;
/// Latitude where the Mercator square ends.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Width (and height) of the whole world in pixels at `zoom`.
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * 2f64.powi(zoom as i32)
}

/// Project a coordinate to world pixels at `zoom`. Origin is the north-west corner.
pub fn project(coord: Coordinate, zoom: u8) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = coord.latitude().clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (coord.longitude() + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    (x, y)
}

/// Inverse of [`project`]. Longitude wraps around the antimeridian, latitude
/// clamps to the Mercator limit.
pub fn unproject(x: f64, y: f64, zoom: u8) -> Coordinate {
    let size = world_size(zoom);
    let lng = (x / size * 360.0).rem_euclid(360.0) - 180.0;
    let n = PI - 2.0 * PI * y / size;
    let lat = n.sinh().atan().to_degrees();
    Coordinate::raw(lat.clamp(-MAX_LATITUDE, MAX_LATITUDE), lng)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn url(&self, layer: &TileLayer) -> String {
        let subdomain = if layer.subdomains.is_empty() {
            ""
        } else {
            layer.subdomains[((self.x + self.y) as usize) % layer.subdomains.len()]
        };
        layer
            .url_template
            .replace("{s}", subdomain)
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
    }
}

/// A tile and where its top-left corner lands on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    pub tile: TileCoord,
    /// Column before wrapping; stays fixed while the view pans.
    pub column: i64,
    pub left: f64,
    pub top: f64,
}

/// Camera plus the pixel size of the element it is drawn into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenViewport {
    pub camera: Camera,
    pub width: f64,
    pub height: f64,
}

impl ScreenViewport {
    pub fn new(camera: Camera, width: f64, height: f64) -> Self {
        Self {
            camera,
            width,
            height,
        }
    }

    /// World pixel under the element's top-left corner.
    pub fn origin(&self) -> (f64, f64) {
        let (cx, cy) = project(self.camera.center, self.camera.zoom);
        (cx - self.width / 2.0, cy - self.height / 2.0)
    }

    /// Convert a coordinate to screen pixels relative to the element's top-left.
    pub fn world_to_screen(&self, coord: Coordinate) -> (f64, f64) {
        let (ox, oy) = self.origin();
        let (x, y) = project(coord, self.camera.zoom);
        (x - ox, y - oy)
    }

    /// Tiles covering the viewport, row-major. X wraps around the world,
    /// rows above or below the map are skipped.
    pub fn visible_tiles(&self) -> Vec<TilePlacement> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vec::new();
        }
        let zoom = self.camera.zoom;
        let per_axis = 1i64 << zoom;
        let (ox, oy) = self.origin();

        let x0 = (ox / TILE_SIZE).floor() as i64;
        let x1 = ((ox + self.width) / TILE_SIZE).ceil() as i64 - 1;
        let y0 = ((oy / TILE_SIZE).floor() as i64).max(0);
        let y1 = (((oy + self.height) / TILE_SIZE).ceil() as i64 - 1).min(per_axis - 1);

        let mut out = Vec::new();
        for ty in y0..=y1 {
            for tx in x0..=x1 {
                out.push(TilePlacement {
                    tile: TileCoord {
                        z: zoom,
                        x: tx.rem_euclid(per_axis) as u32,
                        y: ty as u32,
                    },
                    column: tx,
                    left: tx as f64 * TILE_SIZE - ox,
                    top: ty as f64 * TILE_SIZE - oy,
                });
            }
        }
        out
    }
}

/// Camera moved so the content follows a screen-space drag of (dx, dy).
pub fn pan_camera(camera: Camera, dx: f64, dy: f64) -> Camera {
    let (cx, cy) = project(camera.center, camera.zoom);
    let size = world_size(camera.zoom);
    let cy = (cy - dy).clamp(0.0, size);
    Camera {
        center: unproject(cx - dx, cy, camera.zoom),
        zoom: camera.zoom,
    }
}
