use crate::units::Pt;

/// Margins are the insets of the usable area from the page edges. When columns are
/// enabled, a snapshot of the page margins becomes the baseline every column band is
/// measured from.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

/// The inset of one column's content box inside its band. Same shape as [`Margins`],
/// listed top, right, bottom, left.
pub type Padding = Margins;

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl<D: Into<Pt>>(top: D, right: D, bottom: D, left: D) -> Margins {
        Margins {
            top: top.into(),
            right: right.into(),
            bottom: bottom.into(),
            left: left.into(),
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<Pt>>(value: D) -> Margins {
        let value: Pt = value.into();
        Margins {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric<D: Into<Pt>>(vertical: D, horizontal: D) -> Margins {
        let vertical: Pt = vertical.into();
        let horizontal: Pt = horizontal.into();
        Margins {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Create margins where all values are 0.0
    pub fn empty() -> Margins {
        Margins::default()
    }

    /// Sum of the left and right insets
    pub fn horizontal(&self) -> Pt {
        self.left + self.right
    }

    /// Sum of the top and bottom insets
    pub fn vertical(&self) -> Pt {
        self.top + self.bottom
    }
}

impl<D: Into<Pt>> From<[D; 4]> for Margins {
    /// `[top, right, bottom, left]`
    fn from(values: [D; 4]) -> Self {
        let [top, right, bottom, left] = values;
        Margins::trbl(top, right, bottom, left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Mm;

    #[test]
    fn array_order_is_clockwise_from_top() {
        let m = Margins::from([1.0, 2.0, 3.0, 4.0].map(Pt));
        assert_eq!(m, Margins::trbl(Pt(1.0), Pt(2.0), Pt(3.0), Pt(4.0)));
        assert_eq!(m.horizontal(), Pt(6.0));
        assert_eq!(m.vertical(), Pt(4.0));
    }

    #[test]
    fn accepts_other_units() {
        let m = Margins::all(Mm(25.4));
        assert!((m.left.0 - 72.0).abs() < 1e-4);
    }
}
