use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pt2D {
    pub x: f64,
    pub y: f64,
}

impl Pt2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dist_to(self, other: Pt2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned box covering at least one point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_pt(pt: Pt2D) -> Self {
        Self {
            min_x: pt.x,
            max_x: pt.x,
            min_y: pt.y,
            max_y: pt.y,
        }
    }

    /// None if there are no points
    pub fn from_pts<I: IntoIterator<Item = Pt2D>>(pts: I) -> Option<Self> {
        let mut iter = pts.into_iter();
        let mut bounds = Self::from_pt(iter.next()?);
        for pt in iter {
            bounds.update(pt);
        }
        Some(bounds)
    }

    pub fn update(&mut self, pt: Pt2D) {
        self.min_x = self.min_x.min(pt.x);
        self.max_x = self.max_x.max(pt.x);
        self.min_y = self.min_y.min(pt.y);
        self.max_y = self.max_y.max(pt.y);
    }
}
