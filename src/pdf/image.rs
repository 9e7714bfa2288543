use super::refs::{ObjectReferences, RefType};
use crate::error::AssetError;
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};
use std::path::Path;

enum ImageData {
    /// RGB JPEGs go into the document as they are
    Jpeg(Vec<u8>),
    Raster(DynamicImage),
}

/// A raster image that can be placed on pages. Its width and height are in pixels,
/// which is also its size in points when drawn without scaling.
pub struct Image {
    data: ImageData,
    pub width: f32,
    pub height: f32,
}

struct EncodeOutput {
    filter: Filter,
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl Image {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Image, AssetError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        // TGA has no magic number to sniff
        let is_tga = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("tga"));
        let format = if is_tga {
            ImageFormat::Tga
        } else {
            image::guess_format(&data)?
        };
        Image::decode(data, format)
    }

    /// Decode an image held in memory, guessing its format
    pub fn from_bytes(data: Vec<u8>) -> Result<Image, AssetError> {
        let format = image::guess_format(&data)?;
        Image::decode(data, format)
    }

    fn decode(data: Vec<u8>, format: ImageFormat) -> Result<Image, AssetError> {
        let image = image::load_from_memory_with_format(&data, format)?;
        match (format, image.color()) {
            (ImageFormat::Jpeg, ColorType::Rgb8) => Ok(Image {
                width: image.width() as f32,
                height: image.height() as f32,
                data: ImageData::Jpeg(data),
            }),
            _ => Ok(Image::from_image(image)),
        }
    }

    pub fn from_image(image: DynamicImage) -> Image {
        Image {
            width: image.width() as f32,
            height: image.height() as f32,
            data: ImageData::Raster(image),
        }
    }

    fn encode(&self) -> EncodeOutput {
        match &self.data {
            ImageData::Jpeg(bytes) => EncodeOutput {
                filter: Filter::DctDecode,
                bytes: bytes.clone(),
                mask: None,
            },
            ImageData::Raster(image) => {
                let level = CompressionLevel::DefaultLevel as u8;

                let mask = image.color().has_alpha().then(|| {
                    let alphas: Vec<u8> = image.pixels().map(|p| (p.2).0[3]).collect();
                    compress_to_vec_zlib(&alphas, level)
                });

                let bytes = compress_to_vec_zlib(image.to_rgb8().as_raw(), level);

                EncodeOutput {
                    filter: Filter::FlateDecode,
                    bytes,
                    mask,
                }
            }
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Image(image_index));
        let encoded = self.encode();

        let mut image = writer.image_xobject(id, encoded.bytes.as_slice());
        image.filter(encoded.filter);
        image.width(self.width as i32);
        image.height(self.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        let mask_id = encoded
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        if let (Some(mask_id), Some(mask)) = (mask_id, encoded.mask) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.width as i32);
            s_mask.height(self.height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn raster_images_keep_their_pixel_size() {
        let image = Image::from_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            4,
            2,
            Rgba([255, 0, 0, 128]),
        )));
        assert_eq!((image.width, image.height), (4.0, 2.0));
        let encoded = image.encode();
        assert!(encoded.mask.is_some());
        assert!(matches!(encoded.filter, Filter::FlateDecode));
    }

    #[test]
    fn undecodable_bytes_are_errors() {
        assert!(matches!(
            Image::from_bytes(b"definitely not an image".to_vec()),
            Err(AssetError::Image(_))
        ));
    }
}
