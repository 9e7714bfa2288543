//! Multi-column page composition with automatic column and page breaks.
//!
//! A [`Composer`] flows cells, paragraphs, bulleted lists and images down the columns
//! of a page, moving to the next column, and after the last column to a new page,
//! whenever content runs past the bottom. Named pre-break hooks can veto any break.
//! Drawing itself goes through a [`Surface`]: [`pdf::PdfSurface`] writes real PDF
//! documents, [`RecordingSurface`] measures with fixed-width glyphs and records what
//! would be drawn.

mod colour;
pub use colour::*;

mod composer;
pub use composer::*;

mod error;
pub use error::*;

/// Column geometry, line wrapping and break hooks
pub mod layout;
pub use layout::{Advance, BreakOutcome, ColumnGrid, Corner, HookOutcome, Margins, Padding};

/// Standard page sizes
pub mod pagesize;

/// PDF output
pub mod pdf;

mod recording;
pub use recording::*;

mod rect;
pub use rect::*;

mod style;
pub use style::*;

mod surface;
pub use surface::*;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;
