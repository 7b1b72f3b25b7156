//! Scene orchestration: one paint cycle from occupancy grids to pixels.
//!
//! A paint is atomic from the caller's perspective: it validates its
//! configuration, allocates fresh surfaces sized to the viewport plus a
//! tile-sized margin, generates every layer, runs the shadow and fill
//! passes back to front, and only then swaps the finished frame in. A
//! failed paint leaves the previous completed frame untouched.

use crate::color::Color;
use crate::contour::{self, ContourPath};
use crate::grid::{GridError, OccupancyGrid, PowerThreshold};
use crate::palette::{self, random_palette};
use crate::shadow::ShadowCompositor;
use rand::Rng;
use smallvec::SmallVec;
use thiserror::Error;
use tiny_skia::{
    FillRule, GradientStop, LinearGradient, Paint, Pixmap, Point, SpreadMode, Transform,
};
use tracing::{debug, info};

/// Default number of stacked layers.
pub const NUM_LAYERS: usize = 3;

/// Default shadow offset in pixels, applied on both axes.
pub const SHADOW_OFFSET: (i32, i32) = (16, 16);

/// Errors that can abort a paint. No partial frame is ever produced.
#[derive(Debug, Error)]
pub enum PaintError {
    /// The viewport has a zero dimension.
    #[error("viewport must be positive, got {width}x{height}")]
    EmptyViewport { width: u32, height: u32 },
    /// The scene was configured with zero layers.
    #[error("a scene needs at least one layer")]
    NoLayers,
    /// The palette provider returned no colors.
    #[error("palette provider returned an empty palette")]
    EmptyPalette,
    /// A drawing surface could not be allocated.
    #[error("could not allocate a {width}x{height} drawing surface")]
    SurfaceAllocation { width: u32, height: u32 },
    /// A layer's occupancy grid was invalid.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Geometry shared by every tracing and compositing step of one paint.
///
/// Passed explicitly so tracing stays a pure function of grid and config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    /// Surface width in pixels, viewport plus margins.
    pub width: u32,
    /// Surface height in pixels, viewport plus margins.
    pub height: u32,
    /// Shadow offset in pixels.
    pub shadow_offset: (i32, i32),
}

impl SceneConfig {
    /// The origin that centers `grid` on this surface, matching the
    /// integer-halved canvas center of the reference composition.
    pub fn centered_origin(&self, grid: &OccupancyGrid) -> (f32, f32) {
        let cx = (self.width >> 1) as f32;
        let cy = (self.height >> 1) as f32;
        (
            cx - grid.width_px() as f32 / 2.0,
            cy - grid.height_px() as f32 / 2.0,
        )
    }
}

/// Tunables for a [`Scene`], fixed across repaints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    pub num_layers: usize,
    pub shadow_offset: (i32, i32),
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            num_layers: NUM_LAYERS,
            shadow_offset: SHADOW_OFFSET,
        }
    }
}

/// One stacked layer: its mask and its traced silhouette.
struct Layer {
    grid: OccupancyGrid,
    contour: ContourPath,
}

/// A completed paint: the pixel surface and the margin hidden on each side.
pub struct Frame {
    pub pixmap: Pixmap,
    pub margin: u32,
}

/// Counters describing one completed paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintStats {
    pub layers: usize,
    pub shadow_passes: usize,
    /// Base tile size chosen for this paint, in pixels.
    pub tile_size: u32,
    /// Solid cells across all layers.
    pub occupied_cells: usize,
}

/// Per-layer gradient brightness, monotonically non-decreasing in the layer
/// index: lower layers are pulled further toward black.
pub fn layer_brightness(layer_index: usize, num_layers: usize) -> f64 {
    (0.3 + layer_index as f64 / num_layers as f64 * 0.7).powf(1.3)
}

/// Holds the last completed frame and repaints on demand.
///
/// Two states only: nothing painted yet, or exactly one completed frame.
/// Every successful [`Scene::paint`] replaces the frame wholesale.
pub struct Scene {
    viewport: (u32, u32),
    options: SceneOptions,
    frame: Option<Frame>,
}

impl Scene {
    /// Creates a scene for the given viewport with default options.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_options(width, height, SceneOptions::default())
    }

    /// Creates a scene with explicit options.
    pub fn with_options(width: u32, height: u32, options: SceneOptions) -> Self {
        Self {
            viewport: (width, height),
            options,
            frame: None,
        }
    }

    /// Updates the viewport for the next paint. The current frame, if any,
    /// is kept until then.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    /// The last completed frame.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Runs one full paint cycle and swaps in the new frame.
    ///
    /// Synchronous and atomic: grids, contours, shadows and fills for all
    /// layers happen within this call. On error the previous frame stays.
    pub fn paint<R: Rng>(&mut self, rng: &mut R) -> Result<PaintStats, PaintError> {
        let (view_w, view_h) = self.viewport;
        if view_w == 0 || view_h == 0 {
            return Err(PaintError::EmptyViewport {
                width: view_w,
                height: view_h,
            });
        }
        let num_layers = self.options.num_layers;
        if num_layers == 0 {
            return Err(PaintError::NoLayers);
        }

        let palette = random_palette(rng);
        if palette.is_empty() {
            return Err(PaintError::EmptyPalette);
        }

        // Base tile size from a random grid scale; the surface carries a
        // tile-sized margin on all sides so off-viewport tile edges never
        // clip visibly.
        let grid_scale = 0.04 + 0.03 * rng.gen::<f64>();
        let size = ((view_w.max(view_h) as f64 * grid_scale).round() as u32).max(1);
        let width = view_w + size * 2;
        let height = view_h + size * 2;

        let config = SceneConfig {
            width,
            height,
            shadow_offset: self.options.shadow_offset,
        };

        info!(width, height, tile_size = size, num_layers, "painting scene");

        let mut layers: SmallVec<[Layer; 4]> = SmallVec::new();
        for i in 0..num_layers {
            let tile = (size as f64 + i as f64 * size as f64 * 0.25).round() as u32;
            let columns = div_ceil(width, tile);
            let rows = div_ceil(height, tile);
            let model = PowerThreshold {
                layer_index: i,
                num_layers,
            };
            let grid = OccupancyGrid::generate(columns, rows, tile, || model.sample(rng))?;
            debug!(
                layer = i,
                tile,
                columns,
                rows,
                occupied = grid.occupied_count(),
                "generated layer"
            );
            let contour = contour::trace(&grid, &config);
            layers.push(Layer { grid, contour });
        }

        let mut primary =
            Pixmap::new(width, height).ok_or(PaintError::SurfaceAllocation { width, height })?;
        primary.fill(Color::BLACK.to_skia());

        let mut shadows = ShadowCompositor::new(width, height, config.shadow_offset)?;

        let mut shadow_passes = 0;
        for (i, layer) in layers.iter().enumerate() {
            // Layer 0 has nothing beneath it; it never receives a shadow.
            if i > 0 {
                shadows.cast(&mut primary, &layers[i - 1].contour, &layer.contour);
                shadow_passes += 1;
            }

            let brightness = layer_brightness(i, num_layers) as f32;
            let top = palette::pick(&palette, rng).mix(Color::BLACK, 1.0 - brightness);
            let bottom = palette::pick(&palette, rng).mix(Color::BLACK, 1.0 - brightness);
            fill_contour(&mut primary, &layer.contour, top, bottom);
            debug!(
                layer = i,
                top = %top.to_rgb_hex(),
                bottom = %bottom.to_rgb_hex(),
                "filled layer"
            );
        }

        let stats = PaintStats {
            layers: layers.len(),
            shadow_passes,
            tile_size: size,
            occupied_cells: layers.iter().map(|l| l.grid.occupied_count()).sum(),
        };
        self.frame = Some(Frame {
            pixmap: primary,
            margin: size,
        });
        Ok(stats)
    }
}

/// Fills a traced contour with a two-stop vertical gradient spanning the
/// full surface height. Both stops are independent palette picks, so a
/// layer may come out flat when they coincide.
fn fill_contour(target: &mut Pixmap, contour: &ContourPath, top: Color, bottom: Color) {
    let Some(path) = contour.to_path() else {
        return;
    };

    let mut paint = Paint::default();
    paint.anti_alias = true;
    let height = target.height() as f32;
    match LinearGradient::new(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(0.0, height),
        vec![
            GradientStop::new(0.0, top.to_skia()),
            GradientStop::new(1.0, bottom.to_skia()),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    ) {
        Some(shader) => paint.shader = shader,
        None => paint.set_color(top.to_skia()),
    }

    target.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
}

fn div_ceil(value: u32, divisor: u32) -> u32 {
    (value + divisor - 1) / divisor
}

#[cfg(test)]
mod tests {
    use super::{div_ceil, layer_brightness, SceneConfig};
    use crate::grid::OccupancyGrid;

    #[test]
    fn brightness_is_monotonic_in_layer_index() {
        for n in 1..6 {
            for i in 1..n {
                assert!(layer_brightness(i - 1, n) <= layer_brightness(i, n));
            }
        }
    }

    #[test]
    fn bottom_layer_brightness_matches_base() {
        let expected = 0.3f64.powf(1.3);
        assert!((layer_brightness(0, 3) - expected).abs() < 1e-12);
    }

    #[test]
    fn brightness_stays_below_one() {
        for n in 1..6 {
            for i in 0..n {
                assert!(layer_brightness(i, n) < 1.0);
            }
        }
    }

    #[test]
    fn centered_origin_splits_the_slack_evenly() {
        let config = SceneConfig {
            width: 100,
            height: 60,
            shadow_offset: (16, 16),
        };
        let grid = OccupancyGrid::generate(4, 2, 10, || true).unwrap();
        let (ox, oy) = config.centered_origin(&grid);
        assert_eq!(ox, 30.0);
        assert_eq!(oy, 20.0);
    }

    #[test]
    fn centered_origin_halves_odd_widths_like_an_integer_shift() {
        let config = SceneConfig {
            width: 101,
            height: 61,
            shadow_offset: (16, 16),
        };
        let grid = OccupancyGrid::generate(4, 2, 10, || true).unwrap();
        let (ox, oy) = config.centered_origin(&grid);
        // 101 >> 1 == 50, not 50.5
        assert_eq!(ox, 30.0);
        assert_eq!(oy, 20.0);
    }

    #[test]
    fn div_ceil_covers_partial_tiles() {
        assert_eq!(div_ceil(100, 10), 10);
        assert_eq!(div_ceil(101, 10), 11);
        assert_eq!(div_ceil(1, 10), 1);
    }
}
