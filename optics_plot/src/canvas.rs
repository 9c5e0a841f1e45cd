use super::*;

/// What a primitive depicts, which decides the color it is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Style {
    /// Optical surfaces and their labels.
    Boundary,
    /// Traced ray paths.
    Ray,
}

/// A 2D drawing surface.
///
/// Renderers receive the canvas explicitly; there is no implicit global
/// figure to draw into.
pub trait Canvas {
    /// A connected line through `points`, in order.
    fn polyline(&mut self, points: &[Point], style: Style);

    /// A single straight line from `start` to `end`.
    fn segment(&mut self, start: Point, end: Point, style: Style) {
        self.polyline(&[start, end], style);
    }

    /// A text annotation anchored (bottom left) at `anchor`.
    fn text(&mut self, anchor: Point, text: &str, style: Style);
}

impl<C: Canvas + ?Sized> Canvas for &mut C {
    fn polyline(&mut self, points: &[Point], style: Style) {
        (**self).polyline(points, style);
    }

    fn segment(&mut self, start: Point, end: Point, style: Style) {
        (**self).segment(start, end, style);
    }

    fn text(&mut self, anchor: Point, text: &str, style: Style) {
        (**self).text(anchor, text, style);
    }
}

/// A single recorded drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Polyline { points: Vec<Point>, style: Style },
    Segment { start: Point, end: Point, style: Style },
    Text { anchor: Point, text: String, style: Style },
}

impl Primitive {
    #[inline]
    pub fn style(&self) -> Style {
        match self {
            Self::Polyline { style, .. }
            | Self::Segment { style, .. }
            | Self::Text { style, .. } => *style,
        }
    }

    /// Every point this primitive covers in plot coordinates.
    ///
    /// For text that is only the anchor, glyphs have no extent in plot space.
    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        let (slice, end) = match self {
            Self::Polyline { points, .. } => (points.as_slice(), None),
            Self::Segment { start, end, .. } => (core::slice::from_ref(start), Some(*end)),
            Self::Text { anchor, .. } => (core::slice::from_ref(anchor), None),
        };
        slice.iter().copied().chain(end)
    }
}

/// A [`Canvas`] that records every primitive in draw order.
///
/// Rendering the same scene twice into fresh plots yields equal plots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Plot {
    primitives: Vec<Primitive>,
}

impl Plot {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn iter_style(&self, style: Style) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(move |p| p.style() == style)
    }

    /// The smallest box containing every drawn point, text anchors included.
    ///
    /// Non-finite coordinates are ignored. Returns `None` if nothing finite was drawn.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;

        for p in self.primitives.iter().flat_map(Primitive::vertices) {
            if !(p.x.is_finite() && p.y.is_finite()) {
                continue;
            }

            match bounds.as_mut() {
                Some(b) => b.include(p),
                None => bounds = Some(Bounds::point(p)),
            }
        }

        bounds
    }
}

impl Canvas for Plot {
    fn polyline(&mut self, points: &[Point], style: Style) {
        self.primitives.push(Primitive::Polyline {
            points: points.to_vec(),
            style,
        });
    }

    fn segment(&mut self, start: Point, end: Point, style: Style) {
        self.primitives
            .push(Primitive::Segment { start, end, style });
    }

    fn text(&mut self, anchor: Point, text: &str, style: Style) {
        self.primitives.push(Primitive::Text {
            anchor,
            text: text.into(),
            style,
        });
    }
}

/// An axis aligned rectangle in plot coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    #[inline]
    pub fn point(p: Point) -> Self {
        Self { min: p, max: p }
    }

    #[inline]
    pub fn include(&mut self, p: Point) {
        self.min = self.min.inf(&p);
        self.max = self.max.sup(&p);
    }

    #[inline]
    pub fn width(&self) -> Float {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> Float {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Point {
        (self.min + self.max) / 2.
    }

    /// Grow every side by `fraction` of the larger dimension.
    pub fn padded(&self, fraction: Float) -> Self {
        let pad = self.width().max(self.height()) * fraction;
        let pad = Point::new(pad, pad);
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// The smallest rectangle with the same center containing `self` whose
    /// `width / height` equals `aspect`, so that one unit spans the same
    /// distance on both axes once mapped onto a viewport of that aspect.
    ///
    /// Degenerate (zero-sized) bounds are widened to one unit first.
    pub fn fit_aspect(&self, aspect: Float) -> Self {
        let center = self.center();
        let mut half_w = (self.width() / 2.).max(0.5);
        let mut half_h = (self.height() / 2.).max(0.5);

        if half_w / half_h > aspect {
            half_h = half_w / aspect;
        } else {
            half_w = half_h * aspect;
        }

        let half = Point::new(half_w, half_h);
        Self {
            min: center - half,
            max: center + half,
        }
    }
}
