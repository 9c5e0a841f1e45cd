use super::*;

use core::fmt;

/// The annotation attached to a boundary, usually its refractive index.
#[derive(Clone, Debug, PartialEq)]
pub enum Label {
    Integer(i64),
    Number(Float),
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            // `Debug` keeps the trailing `.0` on whole numbers ("1.0", not "1")
            Self::Number(n) => write!(f, "{n:?}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Label {
    #[inline]
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<Float> for Label {
    #[inline]
    fn from(n: Float) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Label {
    #[inline]
    fn from(s: &str) -> Self {
        Self::Text(s.into())
    }
}

impl From<String> for Label {
    #[inline]
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Why a surface can't be drawn with its current parameters.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum InvalidSurface {
    #[error("radius must be non-zero")]
    ZeroRadius,
    #[error(
        "height {height} exceeds the maximum value allowed by the lens parametrisation \
         (H < {max_height})"
    )]
    HeightExceedsAperture { height: Float, max_height: Float },
}

/// A planar surface: a straight segment through `(x, y)` of half-length
/// `height` (measured along the optical axis' normal), tilted by `angle`
/// radians away from the vertical.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSurface {
    pub x: Float,
    pub y: Float,
    pub height: Float,
    pub angle: Float,
}

impl LineSurface {
    /// A vertical line at `x`, centered on the optical axis.
    #[inline]
    pub fn vertical(x: Float, height: Float) -> Self {
        Self {
            x,
            y: 0.,
            height,
            angle: 0.,
        }
    }

    pub fn endpoints(&self) -> [Point; 2] {
        let dx = self.height * self.angle.tan();
        [
            Point::new(self.x - dx, self.y - self.height),
            Point::new(self.x + dx, self.y + self.height),
        ]
    }
}

/// A spherical surface, whose profile is a circle of signed `radius` centered
/// at `(midpoint, 0)`, cut off at `height` from the optical axis.
///
/// A positive radius opens towards `+x` (the vertex sits at `midpoint - radius`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphericalSurface {
    pub midpoint: Float,
    pub radius: Float,
    pub height: Float,
}

impl SphericalSurface {
    pub fn validate(&self) -> Result<(), InvalidSurface> {
        if self.radius == 0. {
            return Err(InvalidSurface::ZeroRadius);
        }

        if self.height.abs() > self.radius.abs() {
            return Err(InvalidSurface::HeightExceedsAperture {
                height: self.height,
                max_height: self.radius.abs(),
            });
        }

        Ok(())
    }

    /// The x coordinate where the arc reaches `height`.
    #[inline]
    pub fn apex_x(&self) -> Float {
        let d = (self.radius.powi(2) - self.height.powi(2)).sqrt();
        if self.radius > 0. {
            self.midpoint - d
        } else {
            self.midpoint + d
        }
    }

    /// The upper and lower halves of the profile, `samples` points each,
    /// running from the vertex to the rim.
    pub fn arcs(&self, samples: usize) -> Result<[Vec<Point>; 2], InvalidSurface> {
        self.validate()?;

        let r2 = self.radius.powi(2);

        let upper: Vec<_> = linspace(self.midpoint - self.radius, self.apex_x(), samples)
            .map(|x| {
                // clamped, rounding can push the rim point slightly outside the circle
                let y = (r2 - (x - self.midpoint).powi(2)).max(0.).sqrt();
                Point::new(x, y)
            })
            .collect();

        let lower = upper.iter().map(|p| Point::new(p.x, -p.y)).collect();

        Ok([upper, lower])
    }
}

/// A rotationally symmetric conic surface with vertex at `midpoint`,
/// vertex radius of curvature `radius` and conic constant `conic_param`.
///
/// `conic_param` is 0 for a sphere, in (-1, 0) for a prolate ellipse,
/// -1 for a parabola and below -1 for a hyperbola.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConicSurface {
    pub midpoint: Float,
    pub radius: Float,
    pub conic_param: Float,
    pub height: Float,
}

impl ConicSurface {
    /// The largest height the parametrisation is defined for,
    /// `None` when it is unbounded (`conic_param <= -1`).
    pub fn max_height(&self) -> Option<Float> {
        (self.conic_param > -1.).then(|| (self.radius.powi(2) / (1. + self.conic_param)).sqrt())
    }

    pub fn validate(&self) -> Result<(), InvalidSurface> {
        if self.radius == 0. {
            return Err(InvalidSurface::ZeroRadius);
        }

        if self.conic_param > -1.
            && self.height.powi(2) > self.radius.powi(2) / (1. + self.conic_param)
        {
            return Err(InvalidSurface::HeightExceedsAperture {
                height: self.height,
                max_height: self.max_height().unwrap_or(Float::INFINITY),
            });
        }

        Ok(())
    }

    /// Displacement of the surface along the optical axis at distance `h`
    /// from it, relative to the vertex.
    #[inline]
    pub fn sag(&self, h: Float) -> Float {
        let k1 = 1. + self.conic_param;
        h.powi(2) / (self.radius * (1. + (1. - k1 * (h / self.radius).powi(2)).sqrt()))
    }

    /// The profile sampled at `samples` heights evenly spread over `[-height, height]`.
    pub fn profile(&self, samples: usize) -> Result<Vec<Point>, InvalidSurface> {
        self.validate()?;

        Ok(linspace(-self.height, self.height, samples)
            .map(|h| Point::new(self.sag(h) + self.midpoint, h))
            .collect())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Line(LineSurface),
    Spherical(SphericalSurface),
    Conic(ConicSurface),
}

impl Shape {
    /// The tag this shape is known by in scene descriptions.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Line(_) => "Line",
            Self::Spherical(_) => "Spherical",
            Self::Conic(_) => "Conic",
        }
    }
}

/// One optical surface of the simulated system.
#[derive(Clone, Debug, PartialEq)]
pub struct Boundary {
    pub opt_idx: Label,
    pub shape: Shape,
}

impl Boundary {
    #[inline]
    pub fn new(opt_idx: impl Into<Label>, shape: Shape) -> Self {
        Self {
            opt_idx: opt_idx.into(),
            shape,
        }
    }

    #[inline]
    pub fn line(opt_idx: impl Into<Label>, line: LineSurface) -> Self {
        Self::new(opt_idx, Shape::Line(line))
    }

    #[inline]
    pub fn spherical(opt_idx: impl Into<Label>, sphere: SphericalSurface) -> Self {
        Self::new(opt_idx, Shape::Spherical(sphere))
    }

    #[inline]
    pub fn conic(opt_idx: impl Into<Label>, conic: ConicSurface) -> Self {
        Self::new(opt_idx, Shape::Conic(conic))
    }
}
