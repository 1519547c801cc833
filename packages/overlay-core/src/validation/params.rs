use crate::constants::MAX_OVERLAY_WIDTH;
use crate::errors::OverlayError;

/// 起動時の合成パラメータを検証する
pub fn validate_config(overlay_width: u32, x_offset: i32, y_offset: i32) -> Result<(), OverlayError> {
    // オーバーレイ幅の検証
    if overlay_width == 0 || overlay_width > MAX_OVERLAY_WIDTH {
        return Err(OverlayError::Validation(format!(
            "overlay width must be 1-{MAX_OVERLAY_WIDTH}, got {overlay_width}"
        )));
    }

    // オフセットの検証
    if x_offset < 0 || y_offset < 0 {
        return Err(OverlayError::Validation(format!(
            "offsets must not be negative, got ({x_offset}, {y_offset})"
        )));
    }

    Ok(())
}
