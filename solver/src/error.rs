pub type MazeResult<T> = Result<T, MazeError>;

/// Everything that can stop a run, from argument validation to writing the output
#[derive(thiserror::Error, Debug)]
pub enum MazeError {
    #[error("bad arguments: {0}")]
    BadArgs(String),

    #[error("invalid color '{0}': expected R,G,B with each channel in 0-255")]
    BadColor(String),

    #[error("invalid duration '{0}': expected a number of seconds greater than 0")]
    BadDuration(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not decode input image: {0}")]
    Decode(String),

    #[error("expected exactly 5 colors, got {0}")]
    BadPalette(usize),

    #[error("input image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error(
        "can not find the solution to the maze\n\
         try changing the colors, did you mark the source and destination point?"
    )]
    NotFound,

    #[error("could not encode output: {0}")]
    Encode(String),
}

impl MazeError {
    pub fn bad_args(msg: impl Into<String>) -> Self {
        Self::BadArgs(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

impl From<image::ImageError> for MazeError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => MazeError::Io(e),
            other => MazeError::Decode(other.to_string()),
        }
    }
}

impl From<gif::EncodingError> for MazeError {
    fn from(err: gif::EncodingError) -> Self {
        match err {
            gif::EncodingError::Io(e) => MazeError::Io(e),
            other => MazeError::Encode(other.to_string()),
        }
    }
}
