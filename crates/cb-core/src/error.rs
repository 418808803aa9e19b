use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Pixel buffer length differs from `width * height`.
    BufferLength {
        width: usize,
        height: usize,
        len: usize,
    },
    /// `width * height` does not fit in `usize`.
    TooLarge { width: usize, height: usize },
    /// Two rasters that must cover the same canvas do not.
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferLength { width, height, len } => {
                write!(
                    f,
                    "{width}x{height} image needs {} pixels, got {len}",
                    width.saturating_mul(*height)
                )
            }
            Self::TooLarge { width, height } => write!(f, "{width}x{height} image is too large"),
            Self::DimensionMismatch { expected, actual } => write!(
                f,
                "dimension mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
        }
    }
}

impl std::error::Error for Error {}
