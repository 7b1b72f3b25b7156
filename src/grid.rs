//! Binary tile masks and the stochastic model that fills them.

use rand::Rng;
use thiserror::Error;

/// Errors raised while constructing an [`OccupancyGrid`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// One of the grid dimensions or the tile size was zero.
    #[error("occupancy grid dimensions must be positive, got {columns}x{rows} cells of {tile_size}px")]
    ZeroDimension {
        columns: u32,
        rows: u32,
        tile_size: u32,
    },
}

/// A binary tile mask for one layer.
///
/// Cells are stored row-major (`index = y * columns + x`) and are immutable
/// after construction. Each paint builds fresh grids; they are never reused
/// across paints.
///
/// # Examples
///
/// ```
/// use tileblob::OccupancyGrid;
///
/// let grid = OccupancyGrid::generate(3, 2, 8, || true).unwrap();
/// assert_eq!(grid.columns(), 3);
/// assert_eq!(grid.rows(), 2);
/// assert_eq!(grid.occupied_count(), 6);
/// assert!(grid.is_occupied(2, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    cells: Vec<bool>,
    columns: u32,
    rows: u32,
    tile_size: u32,
}

impl OccupancyGrid {
    /// Builds a grid by evaluating `occupied` once per cell in row-major order.
    ///
    /// Fails fast on non-positive dimensions; there are no other error
    /// conditions.
    pub fn generate(
        columns: u32,
        rows: u32,
        tile_size: u32,
        mut occupied: impl FnMut() -> bool,
    ) -> Result<Self, GridError> {
        if columns == 0 || rows == 0 || tile_size == 0 {
            return Err(GridError::ZeroDimension {
                columns,
                rows,
                tile_size,
            });
        }

        let mut cells = Vec::with_capacity((columns * rows) as usize);
        for _y in 0..rows {
            for _x in 0..columns {
                cells.push(occupied());
            }
        }

        Ok(Self {
            cells,
            columns,
            rows,
            tile_size,
        })
    }

    /// Width of the grid in tiles.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Height of the grid in tiles.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Edge length of one tile in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Whether the cell at `(x, y)` is solid. Out-of-range coordinates are
    /// reported as unoccupied.
    pub fn is_occupied(&self, x: u32, y: u32) -> bool {
        x < self.columns && y < self.rows && self.cells[(y * self.columns + x) as usize]
    }

    /// Number of solid cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Width of the full grid in pixels.
    pub fn width_px(&self) -> u32 {
        self.columns * self.tile_size
    }

    /// Height of the full grid in pixels.
    pub fn height_px(&self) -> u32 {
        self.rows * self.tile_size
    }
}

/// The occupancy probability model for one layer, kept as plain data so the
/// threshold can be inspected without drawing from an RNG.
///
/// Occupancy gets sparser as the layer index grows: a cell is solid when a
/// uniform draw exceeds `(layer_index / num_layers)^1.8 + 0.4`, so the
/// innermost layer forms dense blobs and outer layers scatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerThreshold {
    pub layer_index: usize,
    pub num_layers: usize,
}

impl PowerThreshold {
    /// The rejection threshold in [0.4, 1.4).
    pub fn threshold(&self) -> f64 {
        let ratio = self.layer_index as f64 / self.num_layers as f64;
        ratio.powf(1.8) + 0.4
    }

    /// Samples one cell.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> bool {
        rng.gen::<f64>() > self.threshold()
    }
}
