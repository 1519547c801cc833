use std::ops::Deref;

use gif::{DisposalMethod, Repeat};

use crate::errors::TemplateError;

/// 論理キャンバスの設定（Logical Screen Descriptor 相当）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasConfig {
    pub width: u16,
    pub height: u16,
    /// RGB 3 バイト並びのグローバルパレット
    pub global_palette: Option<Vec<u8>>,
    pub background_index: Option<u8>,
}

/// アニメーション全体のメタデータ
///
/// 合成結果にはテンプレートの値がそのままコピーされ、再計算はしない
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationMetadata {
    pub canvas: CanvasConfig,
    /// フレームごとの表示時間（1/100 秒単位）
    pub delays: Vec<u16>,
    pub disposal: Vec<DisposalMethod>,
    /// `Finite(0)` はループ拡張なし（1 回だけ再生）を表す
    pub loop_count: Repeat,
}

/// パレットインデックスで表現された 1 フレーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFrame {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    /// ローカルパレット（なければグローバルパレットを使う）
    pub palette: Option<Vec<u8>>,
    pub transparent: Option<u8>,
    /// 行優先のパレットインデックス（width * height 要素）
    pub indices: Vec<u8>,
}

impl IndexedFrame {
    /// フレームが参照すべきパレットを返す
    pub fn effective_palette<'a>(&'a self, canvas: &'a CanvasConfig) -> Option<&'a [u8]> {
        self.palette
            .as_deref()
            .or(canvas.global_palette.as_deref())
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// フレーム列とメタデータの組
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub frames: Vec<IndexedFrame>,
    pub meta: AnimationMetadata,
}

impl Animation {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// 検証済みのテンプレートアニメーション
///
/// 構築後は変更できない。プロセス全体で `Arc` 経由で共有する
#[derive(Debug)]
pub struct TemplateAnimation(Animation);

impl TemplateAnimation {
    /// アニメーションを検証してテンプレートとして確定する
    pub fn new(animation: Animation) -> Result<Self, TemplateError> {
        validate_animation(&animation)?;
        Ok(Self(animation))
    }

    pub fn animation(&self) -> &Animation {
        &self.0
    }
}

impl Deref for TemplateAnimation {
    type Target = Animation;

    fn deref(&self) -> &Animation {
        &self.0
    }
}

fn invalid(msg: String) -> TemplateError {
    TemplateError::InvalidTemplate(msg)
}

fn validate_animation(animation: &Animation) -> Result<(), TemplateError> {
    let meta = &animation.meta;
    let frame_count = animation.frames.len();

    if frame_count == 0 {
        return Err(invalid("template has no frames".to_string()));
    }

    if meta.delays.len() != frame_count || meta.disposal.len() != frame_count {
        return Err(invalid(format!(
            "metadata covers {} delays and {} disposal entries for {frame_count} frames",
            meta.delays.len(),
            meta.disposal.len()
        )));
    }

    if let Some(palette) = &meta.canvas.global_palette
        && (palette.is_empty() || palette.len() % 3 != 0)
    {
        return Err(invalid(format!(
            "global palette length {} is not a multiple of 3",
            palette.len()
        )));
    }

    for (i, frame) in animation.frames.iter().enumerate() {
        let Some(palette) = frame.effective_palette(&meta.canvas) else {
            return Err(invalid(format!("frame {i} has no palette")));
        };
        if palette.is_empty() || palette.len() % 3 != 0 {
            return Err(invalid(format!(
                "frame {i} palette length {} is not a multiple of 3",
                palette.len()
            )));
        }

        if frame.indices.len() != frame.pixel_count() {
            return Err(invalid(format!(
                "frame {i} has {} pixels, expected {}x{}",
                frame.indices.len(),
                frame.width,
                frame.height
            )));
        }

        let right = u32::from(frame.left) + u32::from(frame.width);
        let bottom = u32::from(frame.top) + u32::from(frame.height);
        if right > u32::from(meta.canvas.width) || bottom > u32::from(meta.canvas.height) {
            return Err(invalid(format!(
                "frame {i} extends outside the {}x{} canvas",
                meta.canvas.width, meta.canvas.height
            )));
        }
    }

    Ok(())
}
