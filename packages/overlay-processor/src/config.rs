use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use overlay_core::{
    CoordinateTable, TemplateError, DEFAULT_OVERLAY_WIDTH, DEFAULT_TEMPLATE_PATH,
    DEFAULT_X_OFFSET, DEFAULT_Y_OFFSET,
};

/// 起動パラメータ
///
/// すべてのフラグは環境変数でも指定できる
#[derive(Debug, Parser)]
#[command(name = "overlay-processor", version, about)]
pub struct Config {
    /// 待ち受けアドレス
    #[arg(long, env = "OVERLAY_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,

    /// オーバーレイ画像の幅（px）
    #[arg(long, env = "OVERLAY_WIDTH", default_value_t = DEFAULT_OVERLAY_WIDTH)]
    pub overlay_width: u32,

    /// アンカー座標から差し引く X オフセット
    #[arg(long, env = "OVERLAY_X_OFFSET", default_value_t = DEFAULT_X_OFFSET)]
    pub x_offset: i32,

    /// アンカー座標から差し引く Y オフセット
    #[arg(long, env = "OVERLAY_Y_OFFSET", default_value_t = DEFAULT_Y_OFFSET)]
    pub y_offset: i32,

    /// テンプレート GIF のパス
    #[arg(long, env = "OVERLAY_TEMPLATE_PATH", default_value = DEFAULT_TEMPLATE_PATH)]
    pub template_path: PathBuf,

    /// アンカー座標の JSON（`[[x, y], ...]`）。省略時は同梱テンプレートの座標を使う
    #[arg(long, env = "OVERLAY_ANCHORS_PATH")]
    pub anchors_path: Option<PathBuf>,
}

impl Config {
    /// オフセット適用済みの座標表を作る
    pub fn coordinate_table(&self) -> Result<CoordinateTable, TemplateError> {
        match &self.anchors_path {
            Some(path) => CoordinateTable::load(path, self.x_offset, self.y_offset),
            None => Ok(CoordinateTable::parrot(self.x_offset, self.y_offset)),
        }
    }
}
