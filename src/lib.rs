//! Procedural tiled-blob artwork.
//!
//! A scene is a stack of layers. Each layer is a randomly occupied tile
//! grid, traced into a single silhouette whose convex corners are rounded,
//! filled with a two-stop vertical gradient from a random palette, and
//! composited over a soft drop shadow cast onto the layer beneath it.
//! Painting is synchronous and atomic; every paint draws fresh random
//! grids, a fresh palette and a fresh grid scale.
//!
//! # Examples
//!
//! Painting a scene headlessly with a seeded RNG:
//!
//! ```
//! use rand::SeedableRng;
//! use tileblob::Scene;
//!
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
//! let mut scene = Scene::new(320, 200);
//! let stats = scene.paint(&mut rng).unwrap();
//! assert_eq!(stats.layers, 3);
//! assert_eq!(stats.shadow_passes, 2);
//! let frame = scene.frame().unwrap();
//! assert_eq!(frame.pixmap.width(), 320 + 2 * frame.margin);
//! ```

mod blur;
mod color;
mod contour;
mod grid;
mod palette;
mod scene;
mod shadow;

pub use blur::{box_blur, box_blur_region};
pub use color::Color;
pub use contour::{trace, trace_at, ContourPath, PathOp, BORDER_FACTOR};
pub use grid::{GridError, OccupancyGrid, PowerThreshold};
pub use palette::{random_palette, PHI};
pub use scene::{
    layer_brightness, Frame, PaintError, PaintStats, Scene, SceneConfig, SceneOptions, NUM_LAYERS,
    SHADOW_OFFSET,
};
pub use shadow::ShadowCompositor;
