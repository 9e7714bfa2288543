//! Page geometry and line breaking, independent of any surface.
//!
//! - [`ColumnGrid`] splits the area inside the page margins into equal-width column
//!   bands and answers where each column's content box is
//! - [`wrap_lines`] breaks text into lines that fit a width
//! - [`BreakHooks`] is the ordered chain of callbacks that can veto a break
//!
//! # Example
//!
//! ```
//! use pdf_columns::layout::{ColumnGrid, Corner, Margins, Padding};
//! use pdf_columns::Pt;
//!
//! let grid = ColumnGrid::new(
//!     (Pt(200.0), Pt(300.0)),
//!     Margins::all(Pt(10.0)),
//!     vec![Padding::empty(), Padding::all(Pt(5.0))],
//! )
//! .unwrap();
//!
//! assert_eq!(grid.column_width(), Pt(90.0));
//! assert_eq!(grid.corner(Corner::TopLeft, 1), (Pt(105.0), Pt(15.0)));
//! ```

mod breaks;
mod geometry;
mod margins;
mod text;

pub use breaks::*;
pub use geometry::*;
pub use margins::*;
pub use text::*;
