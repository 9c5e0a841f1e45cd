use core::array;
use num_traits::AsPrimitive;

use gl::{backend::glutin::DisplayCreationError, glutin};

use glutin::{dpi, event_loop, window};
use optics_plot::{nalgebra as na, Bounds, Float, Plot, Point, Primitive, Style};
use na::SVector;

mod label;
mod plot_render_data;
mod view;

use plot_render_data::PlotRenderData;

pub use glium as gl;
pub use label::*;
pub use view::View;

#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Vertex<const N: usize> {
    pub position: [f32; N],
}

impl<const D: usize> Default for Vertex<D> {
    fn default() -> Self {
        Self { position: [0.; D] }
    }
}

pub type Vertex2D = Vertex<2>;
gl::implement_vertex!(Vertex2D, position);

impl<S, const D: usize> From<SVector<S, D>> for Vertex<D>
where
    S: AsPrimitive<f32>,
{
    fn from(v: SVector<S, D>) -> Self {
        Self {
            position: array::from_fn(|i| v[i].as_()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("failed to build display: {0}")]
    Display(#[from] DisplayCreationError),
    #[error("failed to compile shaders: {0}")]
    Program(#[from] gl::ProgramCreationError),
    #[error("failed to upload vertices: {0}")]
    VertexBuffer(#[from] gl::vertex::BufferCreationError),
    #[error("failed to upload label texture: {0}")]
    Texture(#[from] gl::texture::TextureCreationError),
    #[error("draw call failed: {0}")]
    Draw(#[from] gl::DrawError),
    #[error("failed to present frame: {0}")]
    Swap(#[from] gl::SwapBuffersError),
    #[error("invalid label font: {0}")]
    Font(&'static str),
}

/// Colors and sizes used to display a plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotParams {
    pub boundary_color: [f32; 4],
    pub ray_color: [f32; 4],
    pub bg_color: [f32; 4],
    pub line_width: f32,
    /// Label glyph size, in pixels.
    pub label_size: f32,
    /// Empty space left around the plot, as a fraction of its larger side.
    pub margin: Float,
    /// Font used for labels, see [`LabelFont::system`] for what is used if `None`.
    pub font: Option<Vec<u8>>,
}

impl PlotParams {
    #[inline]
    pub fn color(&self, style: Style) -> [f32; 4] {
        match style {
            Style::Boundary => self.boundary_color,
            Style::Ray => self.ray_color,
        }
    }
}

impl Default for PlotParams {
    fn default() -> Self {
        Self {
            boundary_color: [0.839, 0.153, 0.157, 1.],
            ray_color: [0.122, 0.467, 0.706, 1.],
            bg_color: [1., 1., 1., 1.],
            line_width: 1.5,
            label_size: 16.,
            margin: 0.05,
            font: None,
        }
    }
}

/// A handle for the window used to look at plots.
pub struct PlotWindow {
    events_loop: glutin::event_loop::EventLoop<()>,
    display: gl::Display,
}

impl PlotWindow {
    #[inline]
    /// Create a new window to display plots in from a `winit`
    /// [`WindowBuilder`](window::WindowBuilder) and a [`glutin::ContextBuilder`].
    pub fn new<T: glutin::ContextCurrentState>(
        wb: window::WindowBuilder,
        cb: glutin::ContextBuilder<T>,
    ) -> Result<Self, DisplayCreationError> {
        let events_loop = event_loop::EventLoop::default();
        gl::Display::new(wb, cb, &events_loop).map(|display| Self {
            events_loop,
            display,
        })
    }

    /// A window with the default size and multisampling.
    pub fn with_title(title: &str) -> Result<Self, DisplayCreationError> {
        Self::new(
            window::WindowBuilder::new()
                .with_inner_size(dpi::LogicalSize::new(1067, 600))
                .with_title(title),
            glutin::ContextBuilder::new()
                .with_vsync(true)
                .with_multisampling(1 << 3),
        )
    }

    /// Show `plot` until the window is closed, at which point the process exits.
    ///
    /// Only returns if uploading the plot to the GPU fails.
    pub fn display(self, plot: &Plot, params: PlotParams) -> Result<(), ViewerError> {
        let Self {
            events_loop,
            display,
        } = self;

        let app = PlotRenderData::from_plot(plot, &display, params)?;

        app.run(display, events_loop)
    }
}
