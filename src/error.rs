use crate::units::Pt;
use thiserror::Error;

/// All errors that the layout engine and its surfaces can generate
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// An image could not be loaded or measured
    Asset(#[from] AssetError),

    #[error("a column layout needs at least one column")]
    /// An empty padding table was supplied
    NoColumns,

    #[error("column {column} has no room left for content ({width} x {height})")]
    /// The padding of a column leaves a content box with no area
    DegenerateColumn { column: usize, width: Pt, height: Pt },

    #[error("the surface cannot emit another page")]
    /// The surface refused to add a page, so an advance could not complete
    PageUnavailable,

    #[error("no font registered for family `{family}` ({variant})")]
    /// A font family / variant pair that the surface doesn't know about
    UnknownFont { family: String, variant: String },

    #[error("invalid colour `{0}`, expected #RRGGBB")]
    InvalidColour(String),

    #[error("invalid length `{0}`")]
    InvalidLength(String),

    #[error("indent would drop below zero ({0})")]
    /// More indent was removed than was added
    IndentUnderflow(Pt),
}

/// Errors resolving images into placeable assets
#[derive(Error, Debug)]
pub enum AssetError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [image] failed to decode the image
    Image(#[from] image::ImageError),

    #[error("image has no usable aspect ratio ({width} x {height})")]
    /// Width or height is zero, so the aspect ratio can't be computed
    ZeroDimension { width: f32, height: f32 },

    #[error("unknown image handle")]
    UnknownImage,
}
