use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("color histogram is empty")]
    EmptyHistogram,

    #[error("palette color count must be at least 1, got {0}")]
    InvalidColorCount(usize),

    #[error("max_iterations must be at least 1, got {0}")]
    InvalidMaxIterations(usize),
}
