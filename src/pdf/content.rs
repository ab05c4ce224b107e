//! Input contract of the external content-stream decoder.
//!
//! One [`PageContent`] per page: positioned text items, the decoded operator
//! list as a closed enum, raw annotations, and the viewport. Everything is in
//! PDF user space with the origin at the bottom-left corner.

use serde::Serialize;

/// A decoded content-stream operator.
///
/// Only the operators the extraction engine reacts to are distinguished; the
/// decoder drops everything else (path painting, clipping, marked content)
/// before handing over the list.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// `q` — push the graphics state.
    Save,
    /// `Q` — pop the graphics state.
    Restore,
    /// `cm` — concatenate a matrix onto the CTM.
    Transform([f64; 6]),
    /// `g` — fill gray level, 0.0 black to 1.0 white.
    SetFillGray(f64),
    /// `rg` — fill RGB, components 0.0..=1.0.
    SetFillRgb(f64, f64, f64),
    /// `k` — fill CMYK.
    SetFillCmyk(f64, f64, f64, f64),
    /// `cs` — select a named fill color space.
    SetFillColorSpace(String),
    /// `scn` — pattern/separation fill components.
    SetFillColorN(Vec<f64>),
    /// `G` — stroke gray level.
    SetStrokeGray(f64),
    /// `RG` — stroke RGB.
    SetStrokeRgb(f64, f64, f64),
    /// `K` — stroke CMYK.
    SetStrokeCmyk(f64, f64, f64, f64),
    /// `Tf` — active font and size.
    SetFont { name: String, size: f64 },
    /// `Do` on an image XObject, with the intrinsic pixel dimensions.
    PaintImageXObject {
        object_ref: String,
        width: f64,
        height: f64,
    },
    /// A text-showing operator; consumes the next entry of `text_items`.
    ShowText,
}

/// One positioned text item from the decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    /// Text placement matrix `[a, b, c, d, e, f]`.
    pub transform: [f64; 6],
    /// Advance width in text space.
    pub width: f64,
    /// Line height in text space.
    pub height: f64,
    pub font_name: String,
}

/// A raw page annotation. Only `Link` annotations with a URL and rectangle
/// participate in extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub subtype: String,
    pub url: Option<String>,
    /// `[x1, y1, x2, y2]`, not necessarily normalized.
    pub rect: Option<[f64; 4]>,
}

impl Annotation {
    pub fn link(url: impl Into<String>, rect: [f64; 4]) -> Self {
        Self {
            subtype: "Link".to_string(),
            url: Some(url.into()),
            rect: Some(rect),
        }
    }
}

/// Page viewport in user-space units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Everything the decoder provides for one page.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub text_items: Vec<TextItem>,
    pub operators: Vec<Operator>,
    pub annotations: Vec<Annotation>,
    pub viewport: Viewport,
}

impl Default for TextItem {
    fn default() -> Self {
        Self {
            text: String::new(),
            transform: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            width: 0.0,
            height: 0.0,
            font_name: String::new(),
        }
    }
}

/// A normalized axis-aligned rectangle (`x1 <= x2`, `y1 <= y2`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rect {
    /// Build from corner pairs, swapping so the invariant holds.
    pub fn normalized(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }

    /// Whether two rectangles overlap at all.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x1 <= other.x2 && other.x1 <= self.x2 && self.y1 <= other.y2 && other.y1 <= self.y2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalization() {
        let r = Rect::normalized(10.0, 20.0, 2.0, 5.0);
        assert_eq!(r, Rect { x1: 2.0, y1: 5.0, x2: 10.0, y2: 20.0 });
    }

    #[test]
    fn test_rect_containment() {
        let r = Rect::normalized(0.0, 0.0, 100.0, 100.0);
        assert!(r.contains(50.0, 50.0));
        assert!(r.contains(0.0, 100.0));
        assert!(!r.contains(150.0, 150.0));
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::normalized(0.0, 0.0, 10.0, 10.0);
        let b = Rect::normalized(5.0, 5.0, 20.0, 20.0);
        let c = Rect::normalized(11.0, 11.0, 20.0, 20.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
