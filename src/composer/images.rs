use super::{Composer, EPSILON};
use crate::error::{AssetError, LayoutError};
use crate::rect::Rect;
use crate::style::{ImageAlign, ImageStyle};
use crate::surface::Surface;
use crate::units::Pt;

/// Width over height, for images whose intrinsic size can be used for scaling
pub(crate) fn aspect_ratio((width, height): (f32, f32)) -> Result<f32, AssetError> {
    let usable = |v: f32| v.is_finite() && v > 0.0;
    if !usable(width) || !usable(height) {
        return Err(AssetError::ZeroDimension { width, height });
    }
    Ok(width / height)
}

impl<S: Surface> Composer<S> {
    /// Place an image in the flow, scaled to the style's width (the whole column by
    /// default) and shrunk, keeping its aspect ratio, to the room left in the column.
    /// Moves to the next column first when the column is already full. The cursor ends
    /// below the image. Returns where the image was drawn.
    pub fn image_styled(&mut self, image: S::Image, style: &ImageStyle) -> Result<Rect, LayoutError> {
        let aspect = aspect_ratio(self.surface.image_size(image)?)?;
        self.ensure_page()?;
        self.y += style.margin_top;
        if self.remaining_height() <= EPSILON && !self.at_column_top() {
            self.page_break()?;
        }

        let x = self.x;
        let column_width = self.content_width();
        let mut width = style
            .width
            .map(|w| w.resolve(column_width))
            .unwrap_or(column_width);
        let mut height = width / aspect;

        let remaining = self.remaining_height();
        if remaining > EPSILON && height > remaining {
            height = remaining;
            width = height * aspect;
        }

        let left = match style.align {
            ImageAlign::Left => x,
            ImageAlign::Center => x + (column_width - width) / 2.0,
            ImageAlign::Right => x + column_width - width,
        };
        let bounds = Rect::from_xywh(left, self.y, width, height);
        self.surface.image(image, bounds)?;

        self.x = x;
        self.y += height;
        Ok(bounds)
    }

    /// Resolve an image style from a property map and place the image with it
    pub fn image_properties<I, K, V>(
        &mut self,
        image: S::Image,
        properties: I,
    ) -> Result<Rect, LayoutError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let style = ImageStyle::from_properties(properties)?;
        self.image_styled(image, &style)
    }

    /// Draw an image with its top-left corner at the cursor, without moving it and
    /// without any break checks. A missing dimension follows from the other one and
    /// the aspect ratio; with neither given the intrinsic size is used, in points.
    pub fn image(
        &mut self,
        image: S::Image,
        width: Option<Pt>,
        height: Option<Pt>,
    ) -> Result<Rect, LayoutError> {
        let size = self.surface.image_size(image)?;
        let (width, height) = match (width, height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w / aspect_ratio(size)?),
            (None, Some(h)) => (h * aspect_ratio(size)?, h),
            (None, None) => (Pt(size.0), Pt(size.1)),
        };
        self.ensure_page()?;
        let bounds = Rect::from_xywh(self.x, self.y, width, height);
        self.surface.image(image, bounds)?;
        Ok(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{HookOutcome, Margins, Padding};
    use crate::recording::RecordingSurface;
    use crate::style::Length;

    fn composer() -> Composer<RecordingSurface> {
        let mut c = Composer::new(RecordingSurface::new((Pt(200.0), Pt(300.0))));
        c.set_margins(Margins::empty());
        c.add_page().unwrap();
        c
    }

    #[test]
    fn rejects_degenerate_images() {
        assert!(matches!(
            aspect_ratio((0.0, 10.0)),
            Err(AssetError::ZeroDimension { .. })
        ));
        assert!(aspect_ratio((f32::NAN, 1.0)).is_err());
        assert_eq!(aspect_ratio((4.0, 2.0)).unwrap(), 2.0);
    }

    #[test]
    fn half_width_image_in_a_column() {
        let mut c = composer();
        c.set_columns([Padding::empty(); 2]).unwrap();
        let img = c.surface_mut().add_image(400.0, 200.0);
        let style = ImageStyle {
            width: Some(Length::Percent(50.0)),
            ..ImageStyle::default()
        };
        let bounds = c.image_styled(img, &style).unwrap();
        assert_eq!(bounds, Rect::from_xywh(Pt(0.0), Pt(0.0), Pt(50.0), Pt(25.0)));
        assert_eq!((c.x(), c.y()), (Pt(0.0), Pt(25.0)));
    }

    #[test]
    fn aligns_within_the_column() {
        let mut c = composer();
        let img = c.surface_mut().add_image(10.0, 10.0);
        let centred = ImageStyle::from_properties([("align", "center"), ("width", "100")]).unwrap();
        let right = ImageStyle::from_properties([("align", "right"), ("width", "50%")]).unwrap();

        assert_eq!(c.image_styled(img, &centred).unwrap().x1, Pt(50.0));
        assert_eq!(c.image_styled(img, &right).unwrap().x1, Pt(100.0));
    }

    #[test]
    fn shrinks_to_the_room_left() {
        let mut c = composer();
        let img = c.surface_mut().add_image(2.0, 1.0);
        c.set_y(Pt(260.0));
        // full width would be 200 x 100, only 40 is left
        let bounds = c.image_styled(img, &ImageStyle::default()).unwrap();
        assert_eq!(bounds.height(), Pt(40.0));
        assert_eq!(bounds.width(), Pt(80.0));
        assert_eq!(c.y(), Pt(300.0));
    }

    #[test]
    fn full_column_breaks_first() {
        let mut c = composer();
        c.set_columns([Padding::empty(); 2]).unwrap();
        let img = c.surface_mut().add_image(1.0, 1.0);
        c.set_y(Pt(300.0));
        let bounds = c.image_styled(img, &ImageStyle::default()).unwrap();
        assert_eq!(c.column(), 1);
        assert_eq!(bounds, Rect::from_xywh(Pt(100.0), Pt(0.0), Pt(100.0), Pt(100.0)));
    }

    #[test]
    fn vetoed_break_draws_at_full_size() {
        let mut c = composer();
        c.add_before_page_break("stay", |_| HookOutcome::Veto);
        let img = c.surface_mut().add_image(1.0, 1.0);
        c.set_y(Pt(300.0));
        let bounds = c.image_styled(img, &ImageStyle::default()).unwrap();
        assert_eq!(bounds.y1, Pt(300.0));
        assert_eq!(bounds.height(), Pt(200.0));
        assert_eq!(c.page_no(), 1);
    }

    #[test]
    fn image_at_cursor_keeps_the_cursor() {
        let mut c = composer();
        let img = c.surface_mut().add_image(30.0, 20.0);
        c.set_xy(Pt(5.0), Pt(6.0));
        let bounds = c.image(img, Some(Pt(60.0)), None).unwrap();
        assert_eq!(bounds, Rect::from_xywh(Pt(5.0), Pt(6.0), Pt(60.0), Pt(40.0)));
        let bounds = c.image(img, None, None).unwrap();
        assert_eq!(bounds.width(), Pt(30.0));
        assert_eq!((c.x(), c.y()), (Pt(5.0), Pt(6.0)));
    }

    #[test]
    fn unknown_images_are_errors() {
        let mut c = composer();
        assert!(matches!(
            c.image_styled(7, &ImageStyle::default()),
            Err(LayoutError::Asset(AssetError::UnknownImage))
        ));
    }
}
