use super::*;

use na::Matrix4;

/// Which part of the plot is visible, mapped with equal scale on both axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    home: Bounds,
    center: Point,
    zoom: Float,
    width: u32,
    height: u32,
}

impl View {
    pub fn new(home: Bounds, width: u32, height: u32) -> Self {
        Self {
            home,
            center: home.center(),
            zoom: 1.,
            width: width.max(1),
            height: height.max(1),
        }
    }

    #[inline]
    pub fn aspect(&self) -> Float {
        Float::from(self.width) / Float::from(self.height)
    }

    #[inline]
    pub fn viewport(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.width = width;
            self.height = height;
        }
    }

    /// Back to the whole plot.
    pub fn reset(&mut self) {
        self.center = self.home.center();
        self.zoom = 1.;
    }

    /// Zoom in by `factor` (or out, if it is below 1) around the view's center.
    pub fn zoom_by(&mut self, factor: Float) {
        const MIN_ZOOM: Float = 1e-3;
        const MAX_ZOOM: Float = 1e6;

        if factor.is_finite() && factor > 0. {
            self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Move the visible region so the content follows a cursor drag of
    /// `(dx, dy)` physical pixels, `dy` pointing down.
    pub fn drag(&mut self, dx: Float, dy: Float) {
        let per_pixel = self.visible().height() / Float::from(self.height);
        self.center.x -= dx * per_pixel;
        self.center.y += dy * per_pixel;
    }

    /// The region of the plot currently mapped onto the viewport.
    pub fn visible(&self) -> Bounds {
        let fitted = self.home.fit_aspect(self.aspect());
        let half = (fitted.max - fitted.min) / (2. * self.zoom);

        Bounds {
            min: self.center - half,
            max: self.center + half,
        }
    }

    /// Orthographic projection of [`Self::visible`] onto clip space.
    pub fn projection(&self) -> Matrix4<f32> {
        let Bounds { min, max } = self.visible();
        Matrix4::new_orthographic(
            min.x as f32,
            max.x as f32,
            min.y as f32,
            max.y as f32,
            -1.,
            1.,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Bounds {
        Bounds {
            min: Point::new(-1., -1.),
            max: Point::new(1., 1.),
        }
    }

    #[test]
    fn wide_viewport_keeps_equal_scale() {
        let view = View::new(square(), 800, 400);
        let visible = view.visible();

        assert_relative_eq!(visible.height(), 2.);
        assert_relative_eq!(visible.width(), 4.);
        assert_relative_eq!(
            visible.width() / 800.,
            visible.height() / 400.,
        );
    }

    #[test]
    fn projection_maps_visible_corners_to_clip_corners() {
        let view = View::new(square(), 800, 400);
        let m = view.projection();

        let corner = m * na::Vector4::new(2f32, 1., 0., 1.);
        assert_relative_eq!(corner.x, 1., epsilon = 1e-6);
        assert_relative_eq!(corner.y, 1., epsilon = 1e-6);

        let corner = m * na::Vector4::new(-2f32, -1., 0., 1.);
        assert_relative_eq!(corner.x, -1., epsilon = 1e-6);
        assert_relative_eq!(corner.y, -1., epsilon = 1e-6);
    }

    #[test]
    fn zoom_drag_and_reset() {
        let mut view = View::new(square(), 400, 400);

        view.zoom_by(2.);
        assert_relative_eq!(view.visible().width(), 1.);

        // dragging right by half the window shows what was on the left
        view.drag(200., 0.);
        assert_relative_eq!(view.visible().center().x, -0.5);

        view.drag(0., 200.);
        assert_relative_eq!(view.visible().center().y, 0.5);

        view.zoom_by(0.);
        assert_relative_eq!(view.visible().width(), 1.);

        view.reset();
        assert_eq!(view.visible(), square());
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let mut view = View::new(square(), 400, 400);
        view.resize(0, 300);
        assert_eq!(view.viewport(), [400., 400.]);
    }
}
