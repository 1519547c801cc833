/// オーバーレイ幅のデフォルト値（px）
pub const DEFAULT_OVERLAY_WIDTH: u32 = 80;

/// オーバーレイ幅の上限（テンプレートのキャンバスより十分大きい値）
pub const MAX_OVERLAY_WIDTH: u32 = 1024;

/// X 方向オフセットのデフォルト値（アンカー座標から差し引く）
pub const DEFAULT_X_OFFSET: i32 = 16;

/// Y 方向オフセットのデフォルト値（アンカー座標から差し引く）
pub const DEFAULT_Y_OFFSET: i32 = 20;

/// 入力画像の最大ピクセル数（デコード後のメモリ枯渇を防止）
pub const MAX_PIXELS: u64 = 50_000_000;

/// アップロードの最大バイト数
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// テンプレート GIF のデフォルトパス
pub const DEFAULT_TEMPLATE_PATH: &str = "parrot.gif";
