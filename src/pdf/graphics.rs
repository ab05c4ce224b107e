//! Graphics-state machine for content-stream replay.
//!
//! State is pushed and popped on `Save`/`Restore` through an explicit
//! [`Vec`] stack. A `Restore` with nothing on the stack records a diagnostic
//! and leaves the state unchanged instead of unbalancing the replay.

use crate::common::error::Diagnostics;

use super::SOURCE;
use super::content::Operator;

/// Identity transform.
pub const IDENTITY: [f64; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// RGB triple with components in `0.0..=1.0`.
pub type Rgb = [f64; 3];

pub const BLACK: Rgb = [0.0, 0.0, 0.0];

/// One level of graphics state.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    pub fill_color: Rgb,
    pub stroke_color: Rgb,
    /// Last selected named fill color space, if any.
    pub color_space: Option<String>,
    /// Current transformation matrix.
    pub ctm: [f64; 6],
    pub font_name: Option<String>,
    pub font_size: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            fill_color: BLACK,
            stroke_color: BLACK,
            color_space: None,
            ctm: IDENTITY,
            font_name: None,
            font_size: 0.0,
        }
    }
}

/// The live state plus its save stack.
#[derive(Debug, Default)]
pub struct GraphicsStack {
    current: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl GraphicsStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> &GraphicsState {
        &self.current
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Apply one operator to the state. Text-showing and image-painting
    /// operators are no-ops here; the extraction walk reacts to those.
    pub fn apply(&mut self, op: &Operator, diags: &mut Diagnostics) {
        match op {
            Operator::Save => self.saved.push(self.current.clone()),
            Operator::Restore => match self.saved.pop() {
                Some(state) => self.current = state,
                None => {
                    diags.warn(SOURCE, "restore with empty graphics-state stack");
                },
            },
            Operator::Transform(m) => {
                self.current.ctm = concat(m, &self.current.ctm);
            },
            Operator::SetFillGray(g) => self.current.fill_color = [*g, *g, *g],
            Operator::SetFillRgb(r, g, b) => self.current.fill_color = [*r, *g, *b],
            Operator::SetFillCmyk(c, m, y, k) => {
                self.current.fill_color = cmyk_to_rgb(*c, *m, *y, *k);
            },
            Operator::SetFillColorSpace(name) => {
                self.current.color_space = Some(name.clone());
            },
            // Pattern and separation fills are out of scope: black stand-in.
            Operator::SetFillColorN(_) => {
                self.current.fill_color = BLACK;
                diags.warn(SOURCE, "pattern/separation fill color, using black");
            },
            Operator::SetStrokeGray(g) => self.current.stroke_color = [*g, *g, *g],
            Operator::SetStrokeRgb(r, g, b) => self.current.stroke_color = [*r, *g, *b],
            Operator::SetStrokeCmyk(c, m, y, k) => {
                self.current.stroke_color = cmyk_to_rgb(*c, *m, *y, *k);
            },
            Operator::SetFont { name, size } => {
                self.current.font_name = Some(name.clone());
                self.current.font_size = *size;
            },
            Operator::PaintImageXObject { .. } | Operator::ShowText => {},
        }
    }
}

/// Concatenate two transforms: the result applies `a` first, then `b`.
pub fn concat(a: &[f64; 6], b: &[f64; 6]) -> [f64; 6] {
    [
        a[0] * b[0] + a[1] * b[2],
        a[0] * b[1] + a[1] * b[3],
        a[2] * b[0] + a[3] * b[2],
        a[2] * b[1] + a[3] * b[3],
        a[4] * b[0] + a[5] * b[2] + b[4],
        a[4] * b[1] + a[5] * b[3] + b[5],
    ]
}

/// Approximate CMYK to RGB: `r = 1 - min(1, c·(1-k) + k)` and likewise for
/// g/b. Not a color-managed transform.
pub fn cmyk_to_rgb(c: f64, m: f64, y: f64, k: f64) -> Rgb {
    let channel = |v: f64| 1.0 - (v * (1.0 - k) + k).min(1.0);
    [channel(c), channel(m), channel(y)]
}

/// Quantize a unit-range RGB triple to a lowercase hex color.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("{:02x}{:02x}{:02x}", q(rgb[0]), q(rgb[1]), q(rgb[2]))
}
