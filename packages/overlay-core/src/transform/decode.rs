use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};

use crate::constants::MAX_PIXELS;
use crate::errors::{CompositeError, OverlayError};
use crate::transform::orientation::normalize_orientation;

/// 受け付けるアップロード形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Jpeg,
    Png,
}

impl UploadFormat {
    /// ファイル名の拡張子からデコーダを選ぶ（大文字小文字は区別しない）
    pub fn from_filename(filename: &str) -> Result<Self, OverlayError> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("jpg" | "jpeg") => Ok(Self::Jpeg),
            Some("png") => Ok(Self::Png),
            _ => Err(OverlayError::UnsupportedFormat(
                "invalid file extension (only .jpg, .jpeg, .png supported)".to_string(),
            )),
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
        }
    }
}

/// アップロードされた静止画をデコードし、EXIF Orientation を適用する
pub fn decode_upload(data: &[u8], format: UploadFormat) -> Result<DynamicImage, CompositeError> {
    let reader = ImageReader::with_format(Cursor::new(data), format.image_format());
    let decoder = reader
        .into_decoder()
        .map_err(|e| CompositeError::InvalidInputImage(format!("decode failed: {e}")))?;

    // 全体をデコードする前にサイズを確認する
    let (width, height) = decoder.dimensions();
    if width as u64 * height as u64 > MAX_PIXELS {
        return Err(CompositeError::ResolutionTooLarge { width, height });
    }
    if width == 0 || height == 0 {
        return Err(CompositeError::InvalidInputImage(format!(
            "image has zero dimension ({width}x{height})"
        )));
    }

    let img = DynamicImage::from_decoder(decoder)
        .map_err(|e| CompositeError::InvalidInputImage(format!("decode failed: {e}")))?;

    Ok(normalize_orientation(img, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 40])));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_upload_format_from_filename() {
        assert_eq!(UploadFormat::from_filename("cat.jpg").unwrap(), UploadFormat::Jpeg);
        assert_eq!(UploadFormat::from_filename("cat.JPEG").unwrap(), UploadFormat::Jpeg);
        assert_eq!(UploadFormat::from_filename("dir/cat.png").unwrap(), UploadFormat::Png);
    }

    #[test]
    fn test_upload_format_rejects_others() {
        for name in ["cat.gif", "cat.webp", "cat", "", ".png.exe"] {
            let err = UploadFormat::from_filename(name).unwrap_err();
            assert!(matches!(err, OverlayError::UnsupportedFormat(_)), "{name}");
        }
    }

    #[test]
    fn test_decode_png_keeps_alpha() {
        let img = decode_upload(&png_bytes(12, 7), UploadFormat::Png).unwrap();
        assert_eq!((img.width(), img.height()), (12, 7));
        assert_eq!(img.to_rgba8().get_pixel(0, 0), &Rgba([10, 20, 30, 40]));
    }

    #[test]
    fn test_decode_wrong_format() {
        // PNG のバイト列を JPEG として読ませる
        let result = decode_upload(&png_bytes(4, 4), UploadFormat::Jpeg);
        assert!(matches!(result, Err(CompositeError::InvalidInputImage(_))));
    }

    #[test]
    fn test_decode_garbage() {
        let result = decode_upload(b"garbage", UploadFormat::Png);
        assert!(matches!(result, Err(CompositeError::InvalidInputImage(_))));
    }
}
