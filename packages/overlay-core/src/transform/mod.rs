pub mod composite;
pub mod decode;
pub mod dimensions;
pub mod orientation;
pub mod resize;

pub use composite::compose_frames;
pub use decode::{decode_upload, UploadFormat};
pub use dimensions::overlay_dimensions;
pub use orientation::{normalize_orientation, read_orientation};
pub use resize::scale_overlay;
