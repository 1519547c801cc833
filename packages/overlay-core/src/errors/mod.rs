mod types;

pub use types::{CompositeError, OverlayError, TemplateError};
