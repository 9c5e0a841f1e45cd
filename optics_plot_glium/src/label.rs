use super::*;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

/// Places fonts are commonly installed at, tried in order by [`LabelFont::system`].
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A single channel coverage image, rows from top to bottom.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelBitmap {
    pub width: usize,
    pub height: usize,
    pub coverage: Vec<u8>,
}

impl LabelBitmap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            coverage: vec![0; width * height],
        }
    }

    /// Draw a `w * h` glyph bitmap with its top left corner at `(x, y)`,
    /// clipping what falls outside. Overlapping glyphs keep the stronger coverage.
    pub fn blit(&mut self, x: usize, y: usize, w: usize, h: usize, glyph: &[u8]) {
        for row in 0..h.min(self.height.saturating_sub(y)) {
            for col in 0..w.min(self.width.saturating_sub(x)) {
                let Some(&src) = glyph.get(row * w + col) else {
                    continue;
                };
                let dst = &mut self.coverage[(y + row) * self.width + x + col];
                *dst = (*dst).max(src);
            }
        }
    }

    /// Expand into RGBA with every channel set to the coverage.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.coverage.iter().flat_map(|&c| [c; 4]).collect()
    }
}

/// The font labels are rasterized with.
pub struct LabelFont {
    font: fontdue::Font,
}

impl LabelFont {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ViewerError> {
        fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map(|font| Self { font })
            .map_err(ViewerError::Font)
    }

    /// The first usable font out of [`SYSTEM_FONT_PATHS`].
    pub fn system() -> Option<Self> {
        SYSTEM_FONT_PATHS.iter().find_map(|path| {
            let bytes = std::fs::read(path).ok()?;
            match Self::from_bytes(&bytes) {
                Ok(font) => {
                    log::debug!("using label font {path}");
                    Some(font)
                }
                Err(e) => {
                    log::debug!("skipping label font {path}: {e}");
                    None
                }
            }
        })
    }

    /// Lay out `text` on a single line at `px` pixels and rasterize it.
    ///
    /// Returns `None` for text with no visible glyphs.
    pub fn rasterize(&self, text: &str, px: f32) -> Option<LabelBitmap> {
        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[&self.font], &TextStyle::new(text, px, 0));

        let glyphs: Vec<_> = layout
            .glyphs()
            .iter()
            .filter(|g| g.width > 0 && g.height > 0)
            .collect();

        let width = glyphs
            .iter()
            .map(|g| (g.x.max(0.) + g.width as f32).ceil() as usize)
            .max()?;
        let height = glyphs
            .iter()
            .map(|g| (g.y.max(0.) + g.height as f32).ceil() as usize)
            .fold(layout.height().ceil() as usize, usize::max);

        let mut bitmap = LabelBitmap::new(width, height);

        for g in glyphs {
            let (metrics, coverage) = self.font.rasterize_config(g.key);
            bitmap.blit(
                g.x.max(0.) as usize,
                g.y.max(0.) as usize,
                metrics.width,
                metrics.height,
                &coverage,
            );
        }

        Some(bitmap)
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct LabelVertex {
    anchor: [f32; 2],
    offset: [f32; 2],
    tex_coords: [f32; 2],
}

gl::implement_vertex!(LabelVertex, anchor, offset, tex_coords);

/// Two triangles covering a `width * height` pixel rectangle whose bottom left
/// corner sits `padding` pixels to the right of `anchor`.
pub(crate) fn label_quad(anchor: Point, width: f32, height: f32, padding: f32) -> [LabelVertex; 6] {
    let anchor = Vertex::from(anchor).position;
    let (x0, x1) = (padding, padding + width);

    // texture rows are stored top first, so v grows downwards
    let bottom_left = LabelVertex {
        anchor,
        offset: [x0, 0.],
        tex_coords: [0., 1.],
    };
    let bottom_right = LabelVertex {
        anchor,
        offset: [x1, 0.],
        tex_coords: [1., 1.],
    };
    let top_right = LabelVertex {
        anchor,
        offset: [x1, height],
        tex_coords: [1., 0.],
    };
    let top_left = LabelVertex {
        anchor,
        offset: [x0, height],
        tex_coords: [0., 0.],
    };

    [
        bottom_left,
        bottom_right,
        top_right,
        bottom_left,
        top_right,
        top_left,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blit_clips_and_keeps_max() {
        let mut bitmap = LabelBitmap::new(3, 2);
        bitmap.blit(1, 0, 2, 2, &[10, 20, 30, 40]);
        bitmap.blit(2, 1, 2, 2, &[255, 255, 255, 255]);
        bitmap.blit(0, 0, 1, 1, &[5]);

        assert_eq!(bitmap.coverage, [5, 10, 20, 0, 30, 255]);
    }

    #[test]
    fn rgba_repeats_coverage() {
        let mut bitmap = LabelBitmap::new(2, 1);
        bitmap.blit(0, 0, 2, 1, &[7, 9]);
        assert_eq!(bitmap.to_rgba(), [7, 7, 7, 7, 9, 9, 9, 9]);
    }

    #[test]
    fn invalid_font_bytes() {
        assert!(matches!(
            LabelFont::from_bytes(b"not a font"),
            Err(ViewerError::Font(_))
        ));
    }

    #[test]
    fn quad_spans_label_size() {
        let quad = label_quad(Point::new(3., 4.5), 20., 10., 2.);
        assert!(quad.iter().all(|v| v.anchor == [3., 4.5]));
        assert_eq!(quad[0].offset, [2., 0.]);
        assert_eq!(quad[2].offset, [22., 10.]);
        assert_eq!(quad[5].tex_coords, [0., 0.]);
    }
}
