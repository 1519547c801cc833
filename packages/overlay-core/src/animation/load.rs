use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::animation::model::{
    Animation, AnimationMetadata, CanvasConfig, IndexedFrame, TemplateAnimation,
};
use crate::errors::TemplateError;

/// ファイルからテンプレート GIF を読み込み、検証する
///
/// 起動時に 1 回だけ呼ぶ。失敗した場合はサービスを起動してはいけない
pub fn load_template(path: &Path) -> Result<TemplateAnimation, TemplateError> {
    let file = File::open(path)?;
    let template = decode_template(BufReader::new(file))?;

    tracing::info!(
        path = %path.display(),
        frames = template.frame_count(),
        width = template.meta.canvas.width,
        height = template.meta.canvas.height,
        "template loaded"
    );

    Ok(template)
}

/// GIF バイト列をパレットインデックスのまま全フレームデコードする
pub fn decode_template<R: Read>(reader: R) -> Result<TemplateAnimation, TemplateError> {
    TemplateAnimation::new(decode_animation(reader)?)
}

pub(crate) fn decode_animation<R: Read>(reader: R) -> Result<Animation, TemplateError> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options.read_info(reader)?;

    let width = decoder.width();
    let height = decoder.height();
    let global_palette = decoder.global_palette().map(<[u8]>::to_vec);
    let background_index = decoder.bg_color().and_then(|i| u8::try_from(i).ok());

    let mut frames = Vec::new();
    let mut delays = Vec::new();
    let mut disposal = Vec::new();

    while let Some(frame) = decoder.read_next_frame()? {
        delays.push(frame.delay);
        disposal.push(frame.dispose);
        frames.push(IndexedFrame {
            left: frame.left,
            top: frame.top,
            width: frame.width,
            height: frame.height,
            palette: frame.palette.clone(),
            transparent: frame.transparent,
            indices: frame.buffer.to_vec(),
        });
    }

    // ループ拡張はフレームの前に現れるので、全フレーム読了後に確定している
    let loop_count = decoder.repeat();

    tracing::debug!(frames = frames.len(), ?loop_count, "decoded animation");

    Ok(Animation {
        frames,
        meta: AnimationMetadata {
            canvas: CanvasConfig {
                width,
                height,
                global_palette,
                background_index,
            },
            delays,
            disposal,
            loop_count,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    fn encode_fixture(frames: u16, repeat: Option<gif::Repeat>) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let palette = [0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255];
            let mut encoder = gif::Encoder::new(&mut buf, 6, 4, &palette).unwrap();
            if let Some(repeat) = repeat {
                encoder.set_repeat(repeat).unwrap();
            }
            for i in 0..frames {
                let frame = gif::Frame {
                    width: 6,
                    height: 4,
                    delay: 5 + i,
                    dispose: gif::DisposalMethod::Background,
                    buffer: Cow::Owned(vec![(i % 3) as u8; 24]),
                    ..gif::Frame::default()
                };
                encoder.write_frame(&frame).unwrap();
            }
        }
        buf
    }

    #[test]
    fn test_decode_template() {
        let bytes = encode_fixture(3, Some(gif::Repeat::Infinite));
        let template = decode_template(bytes.as_slice()).unwrap();

        assert_eq!(template.frame_count(), 3);
        assert_eq!(template.meta.canvas.width, 6);
        assert_eq!(template.meta.canvas.height, 4);
        assert_eq!(template.meta.delays, vec![5, 6, 7]);
        assert_eq!(
            template.meta.disposal,
            vec![gif::DisposalMethod::Background; 3]
        );
        assert_eq!(template.meta.loop_count, gif::Repeat::Infinite);
        assert_eq!(template.frames[2].indices, vec![2; 24]);
        assert_eq!(
            template.meta.canvas.global_palette.as_deref(),
            Some(&[0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255][..])
        );
    }

    #[test]
    fn test_decode_without_loop_extension() {
        let bytes = encode_fixture(1, None);
        let template = decode_template(bytes.as_slice()).unwrap();
        assert_eq!(template.meta.loop_count, gif::Repeat::Finite(0));
    }

    #[test]
    fn test_decode_zero_frames_is_invalid() {
        let bytes = encode_fixture(0, None);
        let result = decode_template(bytes.as_slice());
        assert!(matches!(result, Err(TemplateError::InvalidTemplate(_))));
    }

    #[test]
    fn test_decode_garbage() {
        let result = decode_template(&b"not a gif"[..]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_template(Path::new("/nonexistent/template.gif"));
        assert!(matches!(result, Err(TemplateError::Io(_))));
    }
}
