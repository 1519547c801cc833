pub mod animation;
pub mod constants;
pub mod errors;
pub mod transform;
pub mod validation;

// 公開API
pub use animation::{
    decode_template, encode_animation, load_template, Anchor, Animation, AnimationMetadata,
    CanvasConfig, CoordinateTable, DisposalMethod, IndexedFrame, Repeat, TemplateAnimation,
    PARROT_ANCHORS,
};
pub use constants::{
    DEFAULT_OVERLAY_WIDTH, DEFAULT_TEMPLATE_PATH, DEFAULT_X_OFFSET, DEFAULT_Y_OFFSET,
    MAX_OVERLAY_WIDTH, MAX_PIXELS, MAX_UPLOAD_BYTES,
};
pub use errors::{CompositeError, OverlayError, TemplateError};
pub use transform::{
    compose_frames, decode_upload, normalize_orientation, overlay_dimensions, read_orientation,
    scale_overlay, UploadFormat,
};
pub use validation::validate_config;
