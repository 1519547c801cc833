pub mod coordinates;
pub mod encode;
pub mod load;
pub mod model;

pub use gif::{DisposalMethod, Repeat};

pub use coordinates::{Anchor, CoordinateTable, PARROT_ANCHORS};
pub use encode::encode_animation;
pub use load::{decode_template, load_template};
pub use model::{Animation, AnimationMetadata, CanvasConfig, IndexedFrame, TemplateAnimation};
