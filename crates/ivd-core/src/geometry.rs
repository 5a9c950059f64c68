//! Object geometry: position, intrinsic size, scale, rotation and skew,
//! plus the axis-aligned bounding box the editor snaps and crops against.

use kurbo::{Affine, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// The canvas (artboard) dimensions in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

impl CanvasSize {
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Placement of an object on the canvas.
///
/// `left`/`top` is the object's origin (its unrotated top-left corner),
/// `width`/`height` its intrinsic size before scaling. Angles are in
/// degrees, as the property panel presents them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub angle: f64,
    pub skew_x: f64,
    pub skew_y: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            skew_x: 0.0,
            skew_y: 0.0,
        }
    }
}

impl Geometry {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
            ..Default::default()
        }
    }

    /// Object-local → canvas transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(Vec2::new(self.left, self.top))
            * Affine::rotate(self.angle.to_radians())
            * Affine::skew(
                self.skew_x.to_radians().tan(),
                self.skew_y.to_radians().tan(),
            )
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }

    /// Axis-aligned bounding box on the canvas (post-transform).
    pub fn bounding_box(&self) -> Rect {
        self.transform()
            .transform_rect_bbox(Rect::new(0.0, 0.0, self.width, self.height))
    }

    /// Rendered size ignoring rotation.
    pub fn scaled_size(&self) -> (f64, f64) {
        (self.width * self.scale_x, self.height * self.scale_y)
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.left += dx;
        self.top += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn unrotated_bbox_is_scaled_rect() {
        let mut g = Geometry::new(10.0, 20.0, 100.0, 50.0);
        g.scale_x = 2.0;
        g.scale_y = 0.5;
        let b = g.bounding_box();
        assert!(close(b.x0, 10.0) && close(b.y0, 20.0));
        assert!(close(b.width(), 200.0) && close(b.height(), 25.0));
    }

    #[test]
    fn quarter_turn_swaps_extent() {
        let mut g = Geometry::new(100.0, 100.0, 40.0, 10.0);
        g.angle = 90.0;
        let b = g.bounding_box();
        // Rotation is about the origin corner.
        assert!(close(b.x0, 90.0), "x0 = {}", b.x0);
        assert!(close(b.y0, 100.0), "y0 = {}", b.y0);
        assert!(close(b.width(), 10.0));
        assert!(close(b.height(), 40.0));
    }

    #[test]
    fn canvas_center() {
        let c = CanvasSize::default();
        assert_eq!(c.center(), (600.0, 400.0));
    }
}
