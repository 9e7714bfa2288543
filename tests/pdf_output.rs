use image::{DynamicImage, RgbaImage};
use pdf_columns::pdf::{Image, Info, PdfSurface};
use pdf_columns::{pagesize, Composer, ImageStyle, LayoutError, Padding, Paint, Pt};

#[test]
fn images_flow_through_columns_into_a_document() {
    let mut surface = PdfSurface::new(pagesize::A5);
    surface.set_info(Info::new().title("Columns").author("pdf-columns"));
    let photo = surface.add_image(Image::from_image(DynamicImage::ImageRgba8(
        RgbaImage::new(40, 30),
    )));

    let mut composer = Composer::new(surface);
    composer.set_columns(vec![Padding::all(Pt(4.0)); 3]).unwrap();
    for _ in 0..30 {
        composer.image_styled(photo, &ImageStyle::default()).unwrap();
    }
    composer.rect(Pt(10.0), Pt(10.0), Paint::Stroke).unwrap();
    assert!(composer.advances() >= 3);
    let pages = composer.page_no();

    let mut out = Vec::new();
    composer.finish().unwrap().write(&mut out).unwrap();

    assert!(out.starts_with(b"%PDF-"));
    let text = String::from_utf8_lossy(&out);
    assert!(text.contains(&format!("/Count {pages}")));
    assert!(text.contains("/Title (Columns)"));
    assert!(text.contains("/SMask"));
}

#[test]
fn unregistered_fonts_are_reported() {
    let mut composer = Composer::new(PdfSurface::new(pagesize::A4));
    let err = composer.set_font("Garamond", "BI", Pt(12.0)).unwrap_err();
    assert!(matches!(err, LayoutError::UnknownFont { .. }));
    // the previous selection stays in effect
    assert_eq!(composer.current_font().family, "Helvetica");
}

#[test]
fn bad_image_styles_are_rejected_before_drawing() {
    let mut surface = PdfSurface::new(pagesize::A4);
    let photo = surface.add_image(Image::from_image(DynamicImage::ImageRgba8(
        RgbaImage::new(2, 2),
    )));
    let mut composer = Composer::new(surface);
    assert!(matches!(
        composer.image_properties(photo, [("width", "wide")]),
        Err(LayoutError::InvalidLength(_))
    ));
    assert_eq!(composer.page_no(), 0);
}
