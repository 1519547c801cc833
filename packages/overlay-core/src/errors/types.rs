use thiserror::Error;

/// オーバーレイ処理の統合エラー型
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("composite error: {0}")]
    Composite(#[from] CompositeError),
}

/// テンプレート読み込みエラー（起動時のみ発生し、致命的）
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode template: {0}")]
    Decode(String),

    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    #[error("invalid anchors: {0}")]
    InvalidAnchors(String),
}

/// 合成処理エラー（リクエスト単位で発生する）
#[derive(Debug, Error)]
pub enum CompositeError {
    #[error("invalid input image: {0}")]
    InvalidInputImage(String),

    #[error("coordinate table has {anchors} anchors but template has {frames} frames")]
    CoordinateTableMismatch { frames: usize, anchors: usize },

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("image resolution exceeds maximum ({width}x{height})")]
    ResolutionTooLarge { width: u32, height: u32 },

    #[error("encode failed: {0}")]
    EncodeFailed(String),
}

impl From<gif::DecodingError> for TemplateError {
    fn from(err: gif::DecodingError) -> Self {
        match err {
            gif::DecodingError::Io(e) => TemplateError::Io(e),
            other => TemplateError::Decode(other.to_string()),
        }
    }
}

impl From<gif::EncodingError> for CompositeError {
    fn from(err: gif::EncodingError) -> Self {
        CompositeError::EncodeFailed(err.to_string())
    }
}
