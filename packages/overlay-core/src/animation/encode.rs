use std::borrow::Cow;

use gif::Repeat;

use crate::animation::model::Animation;
use crate::errors::CompositeError;

/// Logical Screen Descriptor 内の背景色インデックスの位置
const BACKGROUND_INDEX_OFFSET: usize = 11;

/// アニメーションを GIF89a としてエンコードする
///
/// パレット・遅延・廃棄方法・ループ回数・背景色インデックスはそのまま書き出す
pub fn encode_animation(animation: &Animation) -> Result<Vec<u8>, CompositeError> {
    let meta = &animation.meta;
    let global_palette = meta.canvas.global_palette.as_deref().unwrap_or(&[]);

    let mut encoder = gif::Encoder::new(
        Vec::new(),
        meta.canvas.width,
        meta.canvas.height,
        global_palette,
    )?;

    // Finite(0) はループ拡張なし
    if meta.loop_count != Repeat::Finite(0) {
        encoder.set_repeat(meta.loop_count)?;
    }

    for (i, frame) in animation.frames.iter().enumerate() {
        let gif_frame = gif::Frame {
            left: frame.left,
            top: frame.top,
            width: frame.width,
            height: frame.height,
            delay: meta.delays.get(i).copied().unwrap_or_default(),
            dispose: meta.disposal.get(i).copied().unwrap_or(gif::DisposalMethod::Any),
            transparent: frame.transparent,
            palette: frame.palette.clone(),
            buffer: Cow::Borrowed(&frame.indices),
            ..gif::Frame::default()
        };
        encoder.write_frame(&gif_frame)?;
    }

    let mut buf = encoder
        .into_inner()
        .map_err(|e| CompositeError::EncodeFailed(format!("failed to finish GIF: {e}")))?;

    // gif クレートは背景色インデックスを常に 0 で書くため上書きする
    if let Some(index) = meta.canvas.background_index
        && let Some(byte) = buf.get_mut(BACKGROUND_INDEX_OFFSET)
    {
        *byte = index;
    }

    Ok(buf)
}
