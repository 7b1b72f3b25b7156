//! In-place box blur over premultiplied RGBA pixels.
//!
//! Separable two-pass (rows then columns) sliding-window average with the
//! window shrunk at the edges, O(area) regardless of radius. Operating on
//! premultiplied data keeps the result correct for later compositing.

use tiny_skia::Pixmap;

/// Blurs the whole pixmap with the given radius. A radius of zero is a no-op.
pub fn box_blur(pixmap: &mut Pixmap, radius: u32) {
    let width = pixmap.width();
    let height = pixmap.height();
    box_blur_region(pixmap, 0, 0, width, height, radius);
}

/// Blurs a rectangular region of the pixmap in place.
///
/// The region is clamped to the pixmap bounds; pixels outside it are left
/// untouched and do not bleed in.
pub fn box_blur_region(pixmap: &mut Pixmap, x: u32, y: u32, width: u32, height: u32, radius: u32) {
    if radius == 0 {
        return;
    }

    let pm_width = pixmap.width() as usize;
    let x0 = (x as usize).min(pm_width);
    let y0 = (y as usize).min(pixmap.height() as usize);
    let x1 = (x as usize + width as usize).min(pm_width);
    let y1 = (y as usize + height as usize).min(pixmap.height() as usize);
    if x1 <= x0 || y1 <= y0 {
        return;
    }

    let region_w = x1 - x0;
    let region_h = y1 - y0;
    let radius = radius as usize;
    let data = pixmap.data_mut();

    let mut lane = vec![[0u8; 4]; region_w.max(region_h)];

    // Horizontal pass.
    for row in y0..y1 {
        let base = (row * pm_width + x0) * 4;
        for (i, px) in lane[..region_w].iter_mut().enumerate() {
            px.copy_from_slice(&data[base + i * 4..base + i * 4 + 4]);
        }
        blur_lane(&lane[..region_w], radius, |i, px| {
            data[base + i * 4..base + i * 4 + 4].copy_from_slice(&px);
        });
    }

    // Vertical pass.
    for col in x0..x1 {
        for (i, px) in lane[..region_h].iter_mut().enumerate() {
            let off = ((y0 + i) * pm_width + col) * 4;
            px.copy_from_slice(&data[off..off + 4]);
        }
        blur_lane(&lane[..region_h], radius, |i, px| {
            let off = ((y0 + i) * pm_width + col) * 4;
            data[off..off + 4].copy_from_slice(&px);
        });
    }
}

// Sliding-window average over one row or column. The window is
// [i - radius, i + radius] intersected with the lane, and the divisor is
// the actual window size so edges do not darken.
fn blur_lane(src: &[[u8; 4]], radius: usize, mut write: impl FnMut(usize, [u8; 4])) {
    let len = src.len();
    let mut acc = [0u32; 4];

    let initial_end = radius.min(len - 1);
    for px in &src[..=initial_end] {
        for c in 0..4 {
            acc[c] += px[c] as u32;
        }
    }
    let mut count = (initial_end + 1) as u32;

    for i in 0..len {
        let mut out = [0u8; 4];
        for c in 0..4 {
            out[c] = ((acc[c] + count / 2) / count) as u8;
        }
        write(i, out);

        let incoming = i + radius + 1;
        if incoming < len {
            for c in 0..4 {
                acc[c] += src[incoming][c] as u32;
            }
            count += 1;
        }
        if i >= radius {
            let outgoing = i - radius;
            for c in 0..4 {
                acc[c] -= src[outgoing][c] as u32;
            }
            count -= 1;
        }
    }
}
