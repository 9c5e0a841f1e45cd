//! Geometry and rendering core for plotting optical boundaries and the ray
//! paths traced through them.
//!
//! Nothing here knows about windows or files on disk beyond reading a path
//! table: every drawing operation goes through an explicit [`Canvas`] handle,
//! and [`Plot`] is the canvas that records what was drawn.

pub use nalgebra;

use nalgebra::Vector2;

pub mod boundary;
pub mod canvas;
pub mod error;
pub mod paths;
pub mod render;

pub use boundary::*;
pub use canvas::*;
pub use error::{Error, RowError};
pub use paths::*;
pub use render::*;

pub type Float = f64;

/// A point in the plotting plane, `x` along the optical axis.
pub type Point = Vector2<Float>;

/// `n` evenly spaced values from `start` to `end`, both included.
///
/// Yields nothing when `n == 0` and only `start` when `n == 1`.
pub fn linspace(start: Float, end: Float, n: usize) -> impl Iterator<Item = Float> + Clone {
    let step = if n > 1 {
        (end - start) / (n - 1) as Float
    } else {
        0.
    };

    (0..n).map(move |i| {
        // pin the last value so it does not drift from `end`
        if n > 1 && i == n - 1 {
            end
        } else {
            start + step * i as Float
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_both_ends() {
        let v: Vec<_> = linspace(-1., 1., 5).collect();
        assert_eq!(v, [-1., -0.5, 0., 0.5, 1.]);
    }

    #[test]
    fn linspace_degenerate_counts() {
        assert_eq!(linspace(3., 7., 0).count(), 0);
        assert_eq!(linspace(3., 7., 1).collect::<Vec<_>>(), [3.]);
    }
}
