//! Contour tracing: turning an occupancy grid into one fillable silhouette.
//!
//! Every occupied cell contributes an independently closed quad; adjacent
//! quads share edges exactly because they live on the same grid coordinate
//! system, so the winding fill rule merges them into a seamless blob with
//! no visible seams. A corner of a quad is replaced by a circular arc only
//! when both cells adjacent to that corner are unoccupied, which is exactly
//! the set of corners that are convex on the union silhouette.

use crate::grid::OccupancyGrid;
use crate::scene::SceneConfig;
use tiny_skia::{Path, PathBuilder};

/// Rounded corner radius as a fraction of the tile size.
pub const BORDER_FACTOR: f32 = 0.25;

// Cubic Bezier control distance approximating a quarter circle.
const ARC_KAPPA: f32 = 0.552_284_8;

/// One drawing instruction of a traced contour.
///
/// `ArcTo` carries HTML-canvas `arcTo` semantics: a straight segment from
/// the current point to the arc's start, then a circular arc of `radius`
/// tangent to both edges meeting at `corner`, heading toward `toward`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    ArcTo {
        corner: (f32, f32),
        toward: (f32, f32),
        radius: f32,
    },
}

/// The traced silhouette of one layer: an ordered instruction sequence,
/// consumed by filling or clipping and never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContourPath {
    ops: Vec<PathOp>,
}

impl ContourPath {
    /// The raw instruction sequence.
    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    /// True when the grid had no occupied cells.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of rounded corners in the whole contour.
    pub fn rounded_corner_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PathOp::ArcTo { .. }))
            .count()
    }

    /// Lowers the instruction sequence to a raster path, approximating each
    /// quarter-circle arc with a single cubic Bezier.
    ///
    /// Returns `None` for an empty contour.
    pub fn to_path(&self) -> Option<Path> {
        if self.ops.is_empty() {
            return None;
        }

        let mut pb = PathBuilder::new();
        let mut cursor = (0.0f32, 0.0f32);
        for op in &self.ops {
            match *op {
                PathOp::MoveTo { x, y } => {
                    pb.move_to(x, y);
                    cursor = (x, y);
                }
                PathOp::LineTo { x, y } => {
                    pb.line_to(x, y);
                    cursor = (x, y);
                }
                PathOp::ArcTo {
                    corner,
                    toward,
                    radius,
                } => {
                    cursor = emit_corner_arc(&mut pb, cursor, corner, toward, radius);
                }
            }
        }
        pb.finish()
    }
}

/// Traces `grid` centered on the surface described by `config`.
///
/// Pure function of its arguments: the same grid and config always produce
/// the same instruction sequence.
pub fn trace(grid: &OccupancyGrid, config: &SceneConfig) -> ContourPath {
    trace_at(grid, config.centered_origin(grid))
}

/// Traces `grid` with its top-left tile corner at `origin`.
pub fn trace_at(grid: &OccupancyGrid, origin: (f32, f32)) -> ContourPath {
    let (ox, oy) = origin;
    let w = grid.columns();
    let h = grid.rows();
    let tile = grid.tile_size() as f32;
    let radius = (tile * BORDER_FACTOR).round();

    let mut ops = Vec::new();
    for y in 0..h {
        for x in 0..w {
            if !grid.is_occupied(x, y) {
                continue;
            }

            // Top and left edges use strict guards: a cell on those grid
            // boundaries never rounds toward them. Right and bottom edges
            // treat the missing neighbor as unoccupied, so boundary cells
            // round as if a clear neighbor existed there.
            let up_clear = y > 0 && !grid.is_occupied(x, y - 1);
            let left_clear = x > 0 && !grid.is_occupied(x - 1, y);
            let right_clear = x + 1 >= w || !grid.is_occupied(x + 1, y);
            let down_clear = y + 1 >= h || !grid.is_occupied(x, y + 1);

            let arc_tl = up_clear && left_clear;
            let arc_tr = up_clear && right_clear;
            let arc_br = down_clear && right_clear;
            let arc_bl = down_clear && left_clear;

            let x0 = ox + x as f32 * tile;
            let y0 = oy + y as f32 * tile;
            let x1 = x0 + tile;
            let y1 = y0 + tile;

            // Clockwise quad from the top-left corner; each rounding arc is
            // emitted before the straight edge lands on the exact corner,
            // leaving a zero-area spur that the fill rule ignores.
            ops.push(PathOp::MoveTo { x: x0, y: y0 });
            if arc_tr {
                ops.push(PathOp::ArcTo {
                    corner: (x1, y0),
                    toward: (x1, y1),
                    radius,
                });
            }
            ops.push(PathOp::LineTo { x: x1, y: y0 });
            if arc_br {
                ops.push(PathOp::ArcTo {
                    corner: (x1, y1),
                    toward: (x0, y1),
                    radius,
                });
            }
            ops.push(PathOp::LineTo { x: x1, y: y1 });
            if arc_bl {
                ops.push(PathOp::ArcTo {
                    corner: (x0, y1),
                    toward: (x0, y0),
                    radius,
                });
            }
            ops.push(PathOp::LineTo { x: x0, y: y1 });
            if arc_tl {
                ops.push(PathOp::ArcTo {
                    corner: (x0, y0),
                    toward: (x1, y0),
                    radius,
                });
            }
            ops.push(PathOp::LineTo { x: x0, y: y0 });
        }
    }

    ContourPath { ops }
}

fn emit_corner_arc(
    pb: &mut PathBuilder,
    from: (f32, f32),
    corner: (f32, f32),
    toward: (f32, f32),
    radius: f32,
) -> (f32, f32) {
    let incoming = unit(corner.0 - from.0, corner.1 - from.1);
    let outgoing = unit(toward.0 - corner.0, toward.1 - corner.1);

    let start = (corner.0 - incoming.0 * radius, corner.1 - incoming.1 * radius);
    let end = (corner.0 + outgoing.0 * radius, corner.1 + outgoing.1 * radius);
    let c1 = (
        start.0 + incoming.0 * radius * ARC_KAPPA,
        start.1 + incoming.1 * radius * ARC_KAPPA,
    );
    let c2 = (
        end.0 - outgoing.0 * radius * ARC_KAPPA,
        end.1 - outgoing.1 * radius * ARC_KAPPA,
    );

    pb.line_to(start.0, start.1);
    pb.cubic_to(c1.0, c1.1, c2.0, c2.1, end.0, end.1);
    end
}

fn unit(dx: f32, dy: f32) -> (f32, f32) {
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        (0.0, 0.0)
    } else {
        (dx / len, dy / len)
    }
}

#[cfg(test)]
mod tests {
    use super::{trace_at, ContourPath, PathOp};
    use crate::grid::OccupancyGrid;

    fn grid_from(columns: u32, rows: u32, tile: u32, pattern: &[u8]) -> OccupancyGrid {
        assert_eq!(pattern.len(), (columns * rows) as usize);
        let mut it = pattern.iter();
        OccupancyGrid::generate(columns, rows, tile, || *it.next().unwrap() != 0).unwrap()
    }

    /// Splits a contour into per-cell quads at each MoveTo.
    fn quads(contour: &ContourPath) -> Vec<Vec<PathOp>> {
        let mut out: Vec<Vec<PathOp>> = Vec::new();
        for op in contour.ops() {
            if matches!(op, PathOp::MoveTo { .. }) {
                out.push(Vec::new());
            }
            out.last_mut().unwrap().push(*op);
        }
        out
    }

    fn arc_count(quad: &[PathOp]) -> usize {
        quad.iter()
            .filter(|op| matches!(op, PathOp::ArcTo { .. }))
            .count()
    }

    #[test]
    fn empty_grid_traces_to_empty_contour() {
        let grid = OccupancyGrid::generate(6, 4, 10, || false).unwrap();
        let contour = trace_at(&grid, (0.0, 0.0));
        assert!(contour.is_empty());
        assert!(contour.to_path().is_none());
    }

    #[test]
    fn full_grid_has_no_interior_rounding() {
        let grid = OccupancyGrid::generate(4, 4, 10, || true).unwrap();
        let contour = trace_at(&grid, (0.0, 0.0));
        // Only the bottom-right cell rounds, at its bottom-right corner,
        // where both missing neighbors count as clear.
        assert_eq!(contour.rounded_corner_count(), 1);
        let quads = quads(&contour);
        assert_eq!(quads.len(), 16);
        for (i, quad) in quads.iter().enumerate() {
            let expected = if i == 15 { 1 } else { 0 };
            assert_eq!(arc_count(quad), expected, "cell {i}");
        }
    }

    #[test]
    fn isolated_interior_cell_rounds_all_four_corners() {
        #[rustfmt::skip]
        let grid = grid_from(3, 3, 10, &[
            0, 0, 0,
            0, 1, 0,
            0, 0, 0,
        ]);
        let contour = trace_at(&grid, (0.0, 0.0));
        assert_eq!(contour.rounded_corner_count(), 4);
        for op in contour.ops() {
            if let PathOp::ArcTo { radius, .. } = op {
                assert_eq!(*radius, (10.0f32 * 0.25).round());
            }
        }
    }

    #[test]
    fn corner_radius_rounds_to_nearest_pixel() {
        #[rustfmt::skip]
        let grid = grid_from(3, 3, 10, &[
            0, 0, 0,
            0, 1, 0,
            0, 0, 0,
        ]);
        let contour = trace_at(&grid, (0.0, 0.0));
        let radii: Vec<f32> = contour
            .ops()
            .iter()
            .filter_map(|op| match op {
                PathOp::ArcTo { radius, .. } => Some(*radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii, vec![3.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn lone_cell_on_grid_corner_rounds_only_bottom_right() {
        // The strict top/left guards keep a (0, 0) cell square toward the
        // boundary; the lenient right/bottom rule rounds the far corner.
        let grid = OccupancyGrid::generate(1, 1, 8, || true).unwrap();
        let contour = trace_at(&grid, (0.0, 0.0));
        assert_eq!(contour.rounded_corner_count(), 1);
        match contour.ops()[2] {
            PathOp::ArcTo { corner, .. } => assert_eq!(corner, (8.0, 8.0)),
            ref op => panic!("expected bottom-right arc, got {op:?}"),
        }
    }

    #[test]
    fn checkerboard_interior_cells_round_all_four_corners() {
        let grid = OccupancyGrid::generate(5, 5, 12, {
            let mut i = 0u32;
            move || {
                let occupied = (i % 5 + i / 5) % 2 == 0;
                i += 1;
                occupied
            }
        })
        .unwrap();
        let contour = trace_at(&grid, (0.0, 0.0));
        for quad in quads(&contour) {
            let (x, y) = match quad[0] {
                PathOp::MoveTo { x, y } => ((x / 12.0) as u32, (y / 12.0) as u32),
                ref op => panic!("quad must start with MoveTo, got {op:?}"),
            };
            if x > 0 && y > 0 {
                assert_eq!(arc_count(&quad), 4, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn two_by_two_block_is_a_plain_rectangle_inside() {
        // End-to-end shape check: four quads, shared edges, and no rounding
        // anywhere except the far boundary corner.
        let grid = OccupancyGrid::generate(2, 2, 10, || true).unwrap();
        let contour = trace_at(&grid, (0.0, 0.0));
        let quads = quads(&contour);
        assert_eq!(quads.len(), 4);
        assert_eq!(contour.rounded_corner_count(), 1);
        // Quads of horizontally adjacent cells share the x = 10 edge exactly.
        assert!(matches!(quads[0][2], PathOp::LineTo { x, .. } if x == 10.0));
        assert!(matches!(quads[1][0], PathOp::MoveTo { x, .. } if x == 10.0));
    }

    #[test]
    fn tracing_is_idempotent() {
        let mut i = 0u32;
        let grid = OccupancyGrid::generate(6, 6, 9, || {
            i = i.wrapping_mul(1103515245).wrapping_add(12345);
            i % 3 == 0
        })
        .unwrap();
        let a = trace_at(&grid, (4.5, 4.5));
        let b = trace_at(&grid, (4.5, 4.5));
        assert_eq!(a, b);
    }

    #[test]
    fn origin_offsets_every_cell() {
        #[rustfmt::skip]
        let grid = grid_from(2, 1, 10, &[0, 1]);
        let contour = trace_at(&grid, (100.0, 50.0));
        assert!(matches!(
            contour.ops()[0],
            PathOp::MoveTo { x, y } if x == 110.0 && y == 50.0
        ));
    }

    #[test]
    fn lowered_path_covers_the_cell_footprint() {
        let grid = OccupancyGrid::generate(2, 2, 10, || true).unwrap();
        let path = trace_at(&grid, (0.0, 0.0)).to_path().unwrap();
        let bounds = path.bounds();
        assert_eq!(bounds.left(), 0.0);
        assert_eq!(bounds.top(), 0.0);
        assert_eq!(bounds.right(), 20.0);
        assert_eq!(bounds.bottom(), 20.0);
    }
}
