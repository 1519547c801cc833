use bytes::Bytes;

use overlay_core::{
    compose_frames, decode_upload, encode_animation, scale_overlay, OverlayError, UploadFormat,
};

use crate::AppState;

/// アップロード画像をテンプレートの全フレームに合成し、GIF バイト列を返す
///
/// CPU のみを使う同期処理なので、呼び出し側は spawn_blocking で実行する。
/// 途中で失敗した場合は何も出力しない
pub fn render(input: &[u8], format: UploadFormat, state: &AppState) -> Result<Bytes, OverlayError> {
    let img = decode_upload(input, format)?;
    let (src_w, src_h) = (img.width(), img.height());

    let overlay = scale_overlay(&img, state.overlay_width)?;
    let animation = compose_frames(&overlay, &state.template, &state.table)?;
    let output = encode_animation(&animation)?;

    tracing::info!(
        src_w,
        src_h,
        overlay_w = overlay.width(),
        overlay_h = overlay.height(),
        frames = animation.frame_count(),
        bytes = output.len(),
        "animation rendered"
    );

    Ok(Bytes::from(output))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;

    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use overlay_core::{
        decode_template, Animation, AnimationMetadata, CanvasConfig, CompositeError,
        CoordinateTable, DisposalMethod, IndexedFrame, Repeat, TemplateAnimation,
    };

    /// 白黒パレット・10 フレームの 16x16 テンプレートを持つ状態
    pub(crate) fn test_state() -> AppState {
        let frame = IndexedFrame {
            left: 0,
            top: 0,
            width: 16,
            height: 16,
            palette: None,
            transparent: None,
            indices: vec![0; 256],
        };
        let animation = Animation {
            frames: vec![frame; 10],
            meta: AnimationMetadata {
                canvas: CanvasConfig {
                    width: 16,
                    height: 16,
                    global_palette: Some(vec![0, 0, 0, 255, 255, 255]),
                    background_index: Some(0),
                },
                delays: vec![4; 10],
                disposal: vec![DisposalMethod::Background; 10],
                loop_count: Repeat::Infinite,
            },
        };

        AppState {
            template: Arc::new(TemplateAnimation::new(animation).unwrap()),
            table: Arc::new(CoordinateTable::new(
                (0..10).map(|i| overlay_core::Anchor { x: i - 2, y: i }),
                0,
                0,
            )),
            overlay_width: 4,
        }
    }

    pub(crate) fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255])));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_render_produces_gif() {
        let state = test_state();
        let output = render(&png_bytes(40, 20), UploadFormat::Png, &state).unwrap();

        assert_eq!(&output[0..6], b"GIF89a");
        let decoded = decode_template(output.as_ref()).unwrap();
        assert_eq!(decoded.frame_count(), 10);
        assert_eq!(decoded.meta.delays, vec![4; 10]);

        // フレーム 3 のアンカーは (1,3)、オーバーレイは 4x2
        let frame = &decoded.frames[3];
        assert_eq!(frame.indices[3 * 16 + 1], 1);
        assert_eq!(frame.indices[4 * 16 + 4], 1);
        assert_eq!(frame.indices[5 * 16 + 1], 0);
    }

    #[test]
    fn test_render_rejects_undecodable_input() {
        let state = test_state();
        let result = render(b"not an image", UploadFormat::Jpeg, &state);
        assert!(matches!(
            result,
            Err(OverlayError::Composite(CompositeError::InvalidInputImage(_)))
        ));
    }
}
