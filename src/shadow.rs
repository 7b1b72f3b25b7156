//! Drop-shadow compositing between adjacent layers.
//!
//! For a pair of stacked layers, the shadow pass paints the upper layer's
//! silhouette in half-alpha black onto a scratch surface, clipped to the
//! lower layer's silhouette shifted back by the shadow offset, blurs the
//! scratch, and draws it onto the primary surface nudged forward by the
//! same offset. The result reads as the upper layer casting a soft shadow
//! onto the material of the layer beneath it, and nowhere else.

use crate::blur::box_blur;
use crate::contour::ContourPath;
use crate::scene::PaintError;
use tiny_skia::{Color, FillRule, Mask, Paint, Pixmap, PixmapPaint, Transform};

const SHADOW_ALPHA: u8 = 128;

/// Owns the scratch surface reused by every shadow pass of one paint.
pub struct ShadowCompositor {
    scratch: Pixmap,
    offset: (i32, i32),
}

impl ShadowCompositor {
    /// Allocates a scratch surface matching the primary surface size.
    pub fn new(width: u32, height: u32, offset: (i32, i32)) -> Result<Self, PaintError> {
        let scratch =
            Pixmap::new(width, height).ok_or(PaintError::SurfaceAllocation { width, height })?;
        Ok(Self { scratch, offset })
    }

    /// Blur radius derived from the shadow offset.
    pub fn blur_radius(&self) -> u32 {
        2 * self.offset.0.abs().max(self.offset.1.abs()) as u32
    }

    /// Casts the shadow of `above` onto the silhouette of `below`, drawing
    /// the result onto `target`.
    ///
    /// The scratch surface is cleared on entry, so a pass never observes a
    /// previous pass's pixels or clip. Empty contours make the whole pass a
    /// no-op on `target`.
    pub fn cast(&mut self, target: &mut Pixmap, below: &ContourPath, above: &ContourPath) {
        self.scratch.fill(Color::TRANSPARENT);

        let (ox, oy) = self.offset;

        // Clip region: the lower layer's footprint, shifted back by the
        // offset so the final composite lands it in place.
        let clip = below.to_path().and_then(|path| {
            let mut mask = Mask::new(self.scratch.width(), self.scratch.height())?;
            mask.fill_path(
                &path,
                FillRule::Winding,
                true,
                Transform::from_translate(-ox as f32, -oy as f32),
            );
            Some(mask)
        });

        let (Some(clip), Some(silhouette)) = (clip, above.to_path()) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(Color::from_rgba8(0, 0, 0, SHADOW_ALPHA));
        paint.anti_alias = true;
        self.scratch.fill_path(
            &silhouette,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            Some(&clip),
        );

        let radius = self.blur_radius();
        box_blur(&mut self.scratch, radius);

        target.draw_pixmap(
            ox,
            oy,
            self.scratch.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}
