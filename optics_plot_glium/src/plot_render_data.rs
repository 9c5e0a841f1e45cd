use super::*;

use gl::index::{NoIndices, PrimitiveType};
use glutin::event::{self, ElementState, MouseButton, MouseScrollDelta, VirtualKeyCode};

const LINE_STRIP: NoIndices = NoIndices(PrimitiveType::LineStrip);
const TRIANGLES: NoIndices = NoIndices(PrimitiveType::TrianglesList);

const LINE_VERTEX_SHADER_SRC: &str = r"
    #version 140

    in vec2 position;
    uniform mat4 projection;

    void main() {
        gl_Position = projection * vec4(position, 0.0, 1.0);
    }
";

const LINE_FRAGMENT_SHADER_SRC: &str = r"
    #version 140

    uniform vec4 color_vec;

    out vec4 color;

    void main() {
        color = color_vec;
    }
";

// labels keep their pixel size whatever the zoom, only the anchor is projected
const LABEL_VERTEX_SHADER_SRC: &str = r"
    #version 140

    in vec2 anchor;
    in vec2 offset;
    in vec2 tex_coords;
    uniform mat4 projection;
    uniform vec2 viewport;

    out vec2 v_tex_coords;

    void main() {
        vec4 pos = projection * vec4(anchor, 0.0, 1.0);
        gl_Position = pos + vec4(offset * 2.0 / viewport, 0.0, 0.0);
        v_tex_coords = tex_coords;
    }
";

const LABEL_FRAGMENT_SHADER_SRC: &str = r"
    #version 140

    in vec2 v_tex_coords;
    uniform sampler2D glyphs;
    uniform vec4 color_vec;

    out vec4 color;

    void main() {
        color = vec4(color_vec.rgb, color_vec.a * texture(glyphs, v_tex_coords).r);
    }
";

/// Horizontal gap between a label's anchor and its first glyph, in pixels.
const LABEL_PADDING: f32 = 2.;

struct LineRenderData {
    vertices: gl::VertexBuffer<Vertex2D>,
    style: Style,
}

struct LabelRenderData {
    quad: gl::VertexBuffer<LabelVertex>,
    texture: gl::texture::Texture2d,
    style: Style,
}

pub(crate) struct PlotRenderData {
    lines: Vec<LineRenderData>,
    labels: Vec<LabelRenderData>,
    home: Bounds,
    line_program: gl::Program,
    label_program: gl::Program,
    params: PlotParams,
}

impl PlotRenderData {
    pub(crate) fn from_plot(
        plot: &Plot,
        display: &gl::Display,
        params: PlotParams,
    ) -> Result<Self, ViewerError> {
        let line_program = gl::Program::from_source(
            display,
            LINE_VERTEX_SHADER_SRC,
            LINE_FRAGMENT_SHADER_SRC,
            None,
        )?;

        let label_program = gl::Program::from_source(
            display,
            LABEL_VERTEX_SHADER_SRC,
            LABEL_FRAGMENT_SHADER_SRC,
            None,
        )?;

        let font = match params.font.as_deref() {
            Some(bytes) => Some(LabelFont::from_bytes(bytes)?),
            None => LabelFont::system(),
        };

        let has_labels = plot
            .primitives()
            .iter()
            .any(|p| matches!(p, Primitive::Text { .. }));

        if font.is_none() && has_labels {
            log::warn!("no usable font found, labels will not be displayed");
        }

        let mut vertex_scratch: Vec<Vertex2D> = vec![];
        let mut lines = vec![];
        let mut labels = vec![];

        for primitive in plot.primitives() {
            match primitive {
                Primitive::Polyline { .. } | Primitive::Segment { .. } => {
                    vertex_scratch.clear();
                    vertex_scratch.extend(primitive.vertices().map(Vertex::from));

                    lines.push(LineRenderData {
                        vertices: gl::VertexBuffer::immutable(display, &vertex_scratch)?,
                        style: primitive.style(),
                    });
                }
                Primitive::Text {
                    anchor,
                    text,
                    style,
                } => {
                    let Some(bitmap) = font
                        .as_ref()
                        .and_then(|font| font.rasterize(text, params.label_size))
                    else {
                        continue;
                    };

                    let image = gl::texture::RawImage2d::from_raw_rgba(
                        bitmap.to_rgba(),
                        (bitmap.width as u32, bitmap.height as u32),
                    );

                    let quad = label_quad(
                        *anchor,
                        bitmap.width as f32,
                        bitmap.height as f32,
                        LABEL_PADDING,
                    );

                    labels.push(LabelRenderData {
                        quad: gl::VertexBuffer::immutable(display, &quad)?,
                        texture: gl::texture::Texture2d::new(display, image)?,
                        style: *style,
                    });
                }
            }
        }

        lines.shrink_to_fit();
        labels.shrink_to_fit();

        let home = plot
            .bounds()
            .unwrap_or(Bounds::point(Point::zeros()))
            .padded(params.margin);

        log::debug!(
            "uploaded {} lines and {} labels, plot bounds {:?}",
            lines.len(),
            labels.len(),
            home,
        );

        Ok(Self {
            lines,
            labels,
            home,
            line_program,
            label_program,
            params,
        })
    }

    pub(crate) fn run(
        self,
        display: gl::Display,
        events_loop: glutin::event_loop::EventLoop<()>,
    ) -> ! {
        /// Zoom factor for one wheel notch.
        const ZOOM_STEP: Float = 1.1;
        /// Pixels of touchpad scrolling worth one wheel notch.
        const PIXELS_PER_LINE: Float = 50.;

        let (width, height) = display.get_framebuffer_dimensions();
        let mut view = View::new(self.home, width, height);

        let mut dragging = false;
        let mut cursor: Option<dpi::PhysicalPosition<f64>> = None;

        events_loop.run(move |ev, _, control_flow| {
            *control_flow = event_loop::ControlFlow::Wait;

            match ev {
                event::Event::WindowEvent { event, .. } => match event {
                    event::WindowEvent::CloseRequested => {
                        *control_flow = event_loop::ControlFlow::Exit
                    }

                    event::WindowEvent::Resized(physical_size) => {
                        view.resize(physical_size.width, physical_size.height);
                        display.gl_window().resize(physical_size);
                        display.gl_window().window().request_redraw();
                    }

                    event::WindowEvent::MouseWheel { delta, .. } => {
                        let notches = match delta {
                            MouseScrollDelta::LineDelta(_, y) => Float::from(y),
                            MouseScrollDelta::PixelDelta(p) => p.y / PIXELS_PER_LINE,
                        };
                        view.zoom_by(ZOOM_STEP.powf(notches));
                        display.gl_window().window().request_redraw();
                    }

                    event::WindowEvent::MouseInput {
                        button: MouseButton::Left,
                        state,
                        ..
                    } => dragging = state == ElementState::Pressed,

                    event::WindowEvent::CursorMoved { position, .. } => {
                        if let (true, Some(last)) = (dragging, cursor) {
                            view.drag(position.x - last.x, position.y - last.y);
                            display.gl_window().window().request_redraw();
                        }
                        cursor = Some(position);
                    }

                    event::WindowEvent::KeyboardInput { input, .. } => {
                        if input.state == ElementState::Pressed
                            && input.virtual_keycode == Some(VirtualKeyCode::R)
                        {
                            view.reset();
                            display.gl_window().window().request_redraw();
                        }
                    }
                    _ => {}
                },
                event::Event::RedrawRequested(_) => {
                    if let Err(e) = self.render(&display, &view) {
                        log::error!("{e}");
                        *control_flow = event_loop::ControlFlow::ExitWithCode(1);
                    }
                }
                _ => (),
            }
        })
    }

    fn render(&self, display: &gl::Display, view: &View) -> Result<(), ViewerError> {
        let mut target = display.draw();

        use gl::Surface;
        let [r, g, b, a] = self.params.bg_color;
        target.clear_color(r, g, b, a);

        let drawn = self.draw_primitives(&mut target, view);

        // the frame has to be finished even if a draw call failed
        target.finish()?;
        drawn
    }

    fn draw_primitives(&self, target: &mut gl::Frame, view: &View) -> Result<(), ViewerError> {
        use gl::Surface;

        let projection: [[f32; 4]; 4] = view.projection().into();
        let viewport = view.viewport();

        let params = gl::DrawParameters {
            line_width: Some(self.params.line_width),
            multisampling: true,
            blend: gl::Blend::alpha_blending(),
            ..Default::default()
        };

        for line in &self.lines {
            target.draw(
                &line.vertices,
                LINE_STRIP,
                &self.line_program,
                &gl::uniform! {
                    projection: projection,
                    color_vec: self.params.color(line.style),
                },
                &params,
            )?;
        }

        for label in &self.labels {
            target.draw(
                &label.quad,
                TRIANGLES,
                &self.label_program,
                &gl::uniform! {
                    projection: projection,
                    viewport: viewport,
                    glyphs: &label.texture,
                    color_vec: self.params.color(label.style),
                },
                &params,
            )?;
        }

        Ok(())
    }
}
