use crate::errors::CompositeError;

/// 目標幅に合わせたオーバーレイ寸法を計算する
///
/// 高さは `round(src_h * target_w / src_w)`。極端に横長な画像でも最小 1px を保証する
pub fn overlay_dimensions(
    src_w: u32,
    src_h: u32,
    target_w: u32,
) -> Result<(u32, u32), CompositeError> {
    if src_w == 0 || src_h == 0 {
        return Err(CompositeError::InvalidInputImage(format!(
            "image has zero dimension ({src_w}x{src_h})"
        )));
    }
    if target_w == 0 {
        return Err(CompositeError::InvalidParams(
            "overlay width must be greater than 0".to_string(),
        ));
    }

    let height = (src_h as f64 * target_w as f64 / src_w as f64).round() as u32;

    Ok((target_w, height.max(1)))
}
