use image::DynamicImage;
use image::metadata::Orientation;

/// バイト列から EXIF Orientation タグを読み取る
pub fn read_orientation(data: &[u8]) -> Option<Orientation> {
    let mut cursor = std::io::Cursor::new(data);
    let exif = exif::Reader::new().read_from_container(&mut cursor).ok()?;

    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    let value = u8::try_from(field.value.get_uint(0)?).ok()?;

    Orientation::from_exif(value)
}

/// EXIF Orientation があれば画像を正立させる
///
/// スマートフォンで撮った写真は横倒しで保存されていることが多い
pub fn normalize_orientation(mut img: DynamicImage, data: &[u8]) -> DynamicImage {
    if let Some(orientation) = read_orientation(data)
        && orientation != Orientation::NoTransforms
    {
        tracing::debug!(?orientation, "applying EXIF orientation");
        img.apply_orientation(orientation);
    }
    img
}
