use std::path::Path;

use serde::Deserialize;

use crate::errors::{CompositeError, TemplateError};

/// 同梱テンプレート（parrot.gif）の生アンカー座標
///
/// テンプレート作者の座標系で記録した値で、オフセット適用前のもの
pub const PARROT_ANCHORS: [(i32, i32); 10] = [
    (64, 64),
    (40, 50),
    (26, 53),
    (17, 58),
    (12, 59),
    (18, 65),
    (35, 67),
    (47, 70),
    (56, 66),
    (64, 62),
];

/// オーバーレイ左上を置くフレームローカル座標（負の値も可）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "[i32; 2]")]
pub struct Anchor {
    pub x: i32,
    pub y: i32,
}

impl From<[i32; 2]> for Anchor {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

/// フレーム番号と 1 対 1 で対応する貼り付け位置の表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateTable {
    anchors: Vec<Anchor>,
}

impl CoordinateTable {
    /// 生アンカーからオフセットを差し引いて表を作る
    pub fn new(raw: impl IntoIterator<Item = Anchor>, x_offset: i32, y_offset: i32) -> Self {
        let anchors = raw
            .into_iter()
            .map(|a| Anchor {
                x: a.x.saturating_sub(x_offset),
                y: a.y.saturating_sub(y_offset),
            })
            .collect();
        Self { anchors }
    }

    /// 同梱テンプレート用の表
    pub fn parrot(x_offset: i32, y_offset: i32) -> Self {
        Self::new(
            PARROT_ANCHORS.iter().map(|&(x, y)| Anchor { x, y }),
            x_offset,
            y_offset,
        )
    }

    /// `[[x, y], ...]` 形式の JSON から表を作る
    pub fn from_json(json: &str, x_offset: i32, y_offset: i32) -> Result<Self, TemplateError> {
        let raw: Vec<Anchor> = serde_json::from_str(json)
            .map_err(|e| TemplateError::InvalidAnchors(e.to_string()))?;

        if raw.is_empty() {
            return Err(TemplateError::InvalidAnchors(
                "anchor list is empty".to_string(),
            ));
        }

        Ok(Self::new(raw, x_offset, y_offset))
    }

    /// JSON ファイルから表を読み込む
    pub fn load(path: &Path, x_offset: i32, y_offset: i32) -> Result<Self, TemplateError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json, x_offset, y_offset)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Anchor> {
        self.anchors.get(index).copied()
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// 表の長さがフレーム数と一致するか検証する
    pub fn ensure_matches(&self, frame_count: usize) -> Result<(), CompositeError> {
        if self.anchors.len() != frame_count {
            return Err(CompositeError::CoordinateTableMismatch {
                frames: frame_count,
                anchors: self.anchors.len(),
            });
        }
        Ok(())
    }
}
