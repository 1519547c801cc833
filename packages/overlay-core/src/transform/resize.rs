use crate::constants::MAX_PIXELS;
use crate::errors::CompositeError;
use crate::transform::dimensions::overlay_dimensions;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, RgbaImage};

/// 入力画像をオーバーレイ幅に合わせてリサイズする
///
/// fast_image_resize の Lanczos3 フィルタを使用する。
/// アルファ付き画像はプリマルチプライしてから畳み込むので、透明部分の色がにじまない
pub fn scale_overlay(img: &DynamicImage, target_w: u32) -> Result<RgbaImage, CompositeError> {
    let (dst_w, dst_h) = overlay_dimensions(img.width(), img.height(), target_w)?;

    let total_pixels = dst_w as u64 * dst_h as u64;
    if total_pixels > MAX_PIXELS {
        return Err(CompositeError::ResolutionTooLarge {
            width: dst_w,
            height: dst_h,
        });
    }

    let rgba = img.to_rgba8();
    if rgba.dimensions() == (dst_w, dst_h) {
        return Ok(rgba);
    }

    let (src_w, src_h) = rgba.dimensions();
    let src_image = Image::from_vec_u8(src_w, src_h, rgba.into_raw(), PixelType::U8x4)
        .map_err(|e| {
            CompositeError::InvalidInputImage(format!("failed to create source image: {e}"))
        })?;

    let mut dst_image = Image::new(dst_w, dst_h, PixelType::U8x4);

    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
    Resizer::new()
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| CompositeError::InvalidInputImage(format!("resize failed: {e}")))?;

    tracing::debug!(src_w, src_h, dst_w, dst_h, "overlay scaled");

    RgbaImage::from_raw(dst_w, dst_h, dst_image.into_vec()).ok_or_else(|| {
        CompositeError::InvalidInputImage("failed to convert resized image".to_string())
    })
}
