use super::*;

/// Sampling and filtering parameters shared by both renderers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderParams {
    /// Points per half of a spherical profile.
    pub spherical_samples: usize,
    /// Points along a conic profile.
    pub conic_samples: usize,
    /// Paths with fewer samples than this are not drawn. `0` draws everything.
    pub min_path_samples: usize,
    /// Where labels sit, as a fraction of the surface's height.
    pub label_height: Float,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            spherical_samples: 150,
            conic_samples: 50,
            min_path_samples: 0,
            label_height: 0.9,
        }
    }
}

/// A surface that can draw its own cross-section.
pub trait Surface {
    /// Draw the cross-section onto `canvas` and return where its label goes.
    ///
    /// Nothing is drawn if the surface is invalid.
    fn draw<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        params: &RenderParams,
    ) -> core::result::Result<Point, InvalidSurface>;
}

impl Surface for LineSurface {
    fn draw<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        params: &RenderParams,
    ) -> core::result::Result<Point, InvalidSurface> {
        let [start, end] = self.endpoints();
        canvas.segment(start, end, Style::Boundary);

        Ok(Point::new(self.x, self.y + params.label_height * self.height))
    }
}

impl Surface for SphericalSurface {
    fn draw<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        params: &RenderParams,
    ) -> core::result::Result<Point, InvalidSurface> {
        let [upper, lower] = self.arcs(params.spherical_samples)?;
        canvas.polyline(&upper, Style::Boundary);
        canvas.polyline(&lower, Style::Boundary);

        Ok(Point::new(self.apex_x(), params.label_height * self.height))
    }
}

impl Surface for ConicSurface {
    fn draw<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        params: &RenderParams,
    ) -> core::result::Result<Point, InvalidSurface> {
        let profile = self.profile(params.conic_samples)?;
        canvas.polyline(&profile, Style::Boundary);

        Ok(Point::new(
            self.sag(self.height) + self.midpoint,
            params.label_height * self.height,
        ))
    }
}

impl Surface for Shape {
    fn draw<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        params: &RenderParams,
    ) -> core::result::Result<Point, InvalidSurface> {
        match self {
            Self::Line(l) => l.draw(canvas, params),
            Self::Spherical(s) => s.draw(canvas, params),
            Self::Conic(c) => c.draw(canvas, params),
        }
    }
}

/// A boundary that was left out of the plot.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedSurface {
    /// Position of the boundary in the input sequence.
    pub index: usize,
    pub boundary: Boundary,
    pub reason: InvalidSurface,
}

/// Draw every boundary in order, each followed by its label.
///
/// Invalid surfaces are logged, skipped and returned; the others are still drawn.
pub fn render_boundaries<C: Canvas + ?Sized>(
    boundaries: &[Boundary],
    params: &RenderParams,
    canvas: &mut C,
) -> Vec<SkippedSurface> {
    let mut skipped = vec![];

    for (index, boundary) in boundaries.iter().enumerate() {
        match boundary.shape.draw(canvas, params) {
            Ok(anchor) => {
                canvas.text(anchor, &boundary.opt_idx.to_string(), Style::Boundary);
            }
            Err(reason) => {
                log::warn!(
                    "Invalid parameters for {} boundary at index {index}: {reason}, skipping it",
                    boundary.shape.type_name(),
                );
                skipped.push(SkippedSurface {
                    index,
                    boundary: boundary.clone(),
                    reason,
                });
            }
        }
    }

    skipped
}

/// Draw every ray path as a polyline, in the order of `paths`.
///
/// Returns the number of paths drawn.
pub fn render_paths<C: Canvas + ?Sized>(
    paths: &RayPaths,
    params: &RenderParams,
    canvas: &mut C,
) -> usize {
    let mut points = vec![];
    let mut drawn = 0;

    for path in paths {
        if path.len() < params.min_path_samples {
            log::debug!(
                "ray {} has {} samples (minimum {}), not drawing it",
                path.id,
                path.len(),
                params.min_path_samples,
            );
            continue;
        }

        points.clear();
        points.extend(path.points());
        canvas.polyline(&points, Style::Ray);
        drawn += 1;
    }

    drawn
}

/// What happened while rendering a scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderReport {
    pub skipped: Vec<SkippedSurface>,
    pub paths_drawn: usize,
    pub paths_filtered: usize,
}

/// Render a whole scene: boundaries first, then paths.
pub fn render_scene<C: Canvas + ?Sized>(
    boundaries: &[Boundary],
    paths: &RayPaths,
    params: &RenderParams,
    canvas: &mut C,
) -> RenderReport {
    let skipped = render_boundaries(boundaries, params, canvas);
    let paths_drawn = render_paths(paths, params, canvas);

    RenderReport {
        skipped,
        paths_drawn,
        paths_filtered: paths.len() - paths_drawn,
    }
}
