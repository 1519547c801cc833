use std::collections::HashMap;

use image::RgbaImage;

use crate::animation::{
    Anchor, Animation, CanvasConfig, CoordinateTable, IndexedFrame, TemplateAnimation,
};
use crate::errors::CompositeError;

/// プリマルチプライ済み RGBA
type PremulRgba8 = [u8; 4];

/// テンプレートの全フレームにオーバーレイを合成する
///
/// テンプレートは読み取るだけで、フレームはすべて新しく確保する。
/// メタデータ（遅延・廃棄方法・ループ回数・キャンバス設定）はテンプレートからそのままコピーする
pub fn compose_frames(
    overlay: &RgbaImage,
    template: &TemplateAnimation,
    table: &CoordinateTable,
) -> Result<Animation, CompositeError> {
    // 部分的な出力を作る前に検証する
    table.ensure_matches(template.frame_count())?;

    let canvas = &template.meta.canvas;
    let frames = template
        .frames
        .iter()
        .zip(table.anchors())
        .map(|(frame, &anchor)| composite_frame(frame, canvas, overlay, anchor))
        .collect();

    Ok(Animation {
        frames,
        meta: template.meta.clone(),
    })
}

/// 1 フレーム分の合成
///
/// テンプレートフレームを複製（Src）し、その上にオーバーレイを source-over で描く。
/// 枠外にはみ出した部分は切り捨てる
fn composite_frame(
    frame: &IndexedFrame,
    canvas: &CanvasConfig,
    overlay: &RgbaImage,
    anchor: Anchor,
) -> IndexedFrame {
    let mut out = frame.clone();

    // 検証済みテンプレートでは必ずパレットがある
    let Some(palette) = frame.effective_palette(canvas) else {
        return out;
    };
    let mut lookup = PaletteLookup::new(palette, frame.transparent);

    let frame_w = i64::from(frame.width);
    let frame_h = i64::from(frame.height);
    let (ax, ay) = (i64::from(anchor.x), i64::from(anchor.y));

    let x_start = ax.max(0);
    let y_start = ay.max(0);
    let x_end = (ax + i64::from(overlay.width())).min(frame_w);
    let y_end = (ay + i64::from(overlay.height())).min(frame_h);

    for y in y_start..y_end {
        for x in x_start..x_end {
            let src = overlay.get_pixel((x - ax) as u32, (y - ay) as u32).0;
            if src[3] == 0 {
                continue;
            }

            let idx = (y * frame_w + x) as usize;
            let dst = lookup.color(out.indices[idx]);
            out.indices[idx] = lookup.nearest(over(dst, src));
        }
    }

    out
}

/// ストレートアルファの src をプリマルチプライ済みの dst に重ねる
fn over(dst: PremulRgba8, src: [u8; 4]) -> PremulRgba8 {
    let sa = u16::from(src[3]);
    if sa == 255 {
        return src;
    }
    let inv = 255 - sa;

    let mut out = [0u8; 4];
    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), sa);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out[3] = (src[3]).saturating_add(mul_div255(u16::from(dst[3]), inv));
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

/// パレット色の参照と最近傍色の探索
///
/// 同じ色の探索が繰り返されるのでフレームごとにキャッシュする
struct PaletteLookup {
    colors: Vec<PremulRgba8>,
    transparent: Option<u8>,
    cache: HashMap<PremulRgba8, u8>,
}

impl PaletteLookup {
    fn new(palette: &[u8], transparent: Option<u8>) -> Self {
        let colors = palette
            .chunks_exact(3)
            .take(256)
            .enumerate()
            .map(|(i, rgb)| {
                if transparent == Some(i as u8) {
                    [0, 0, 0, 0]
                } else {
                    [rgb[0], rgb[1], rgb[2], 255]
                }
            })
            .collect();

        Self {
            colors,
            transparent,
            cache: HashMap::new(),
        }
    }

    /// インデックスの色。パレット外は透過インデックスなら透明、それ以外は黒として扱う
    fn color(&self, index: u8) -> PremulRgba8 {
        match self.colors.get(index as usize) {
            Some(&c) => c,
            None if self.transparent == Some(index) => [0, 0, 0, 0],
            None => [0, 0, 0, 255],
        }
    }

    /// 二乗距離が最小のパレットインデックス（同距離なら小さいインデックス）
    fn nearest(&mut self, color: PremulRgba8) -> u8 {
        if let Some(&index) = self.cache.get(&color) {
            return index;
        }

        let mut best = 0usize;
        let mut best_dist = u32::MAX;
        for (i, c) in self.colors.iter().enumerate() {
            let dist: u32 = c
                .iter()
                .zip(color.iter())
                .map(|(&a, &b)| {
                    let d = i32::from(a) - i32::from(b);
                    (d * d) as u32
                })
                .sum();
            if dist < best_dist {
                best = i;
                best_dist = dist;
                if dist == 0 {
                    break;
                }
            }
        }

        let index = best as u8;
        self.cache.insert(color, index);
        index
    }
}
