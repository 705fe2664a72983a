use std::error::Error;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum StrataError {
    IoError(io::Error),
    /// The source ended before the format said it would.
    IoTruncated,
    InvalidTagKind(u8),
    PathNotFound(String),
    IndexOutOfRange {
        index: usize,
        len: usize,
    },
    WrongTagKind {
        expected: &'static str,
        found: &'static str,
    },
    /// A list element whose kind differs from the list's declared element kind.
    ListKindMismatch {
        expected: &'static str,
        found: &'static str,
    },
    DepthLimitExceeded(usize),
    UnsupportedCompression(u8),
    InvalidData(String),
    InvalidProfile(String),
}

impl fmt::Display for StrataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrataError::IoError(err) => write!(f, "IO error: {}", err),
            StrataError::IoTruncated => write!(f, "Unexpected end of input"),
            StrataError::InvalidTagKind(id) => write!(f, "Invalid tag kind: {}", id),
            StrataError::PathNotFound(path) => write!(f, "Path not found: {}", path),
            StrataError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range (len {})", index, len)
            }
            StrataError::WrongTagKind { expected, found } => {
                write!(f, "Wrong tag kind: expected {}, found {}", expected, found)
            }
            StrataError::ListKindMismatch { expected, found } => write!(
                f,
                "List element kind mismatch: list holds {}, got {}",
                expected, found
            ),
            StrataError::DepthLimitExceeded(depth) => {
                write!(f, "Tag nesting exceeds {} levels", depth)
            }
            StrataError::UnsupportedCompression(id) => {
                write!(f, "Unsupported compression scheme: {}", id)
            }
            StrataError::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            StrataError::InvalidProfile(msg) => write!(f, "Invalid profile: {}", msg),
        }
    }
}

impl Error for StrataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StrataError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for StrataError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => StrataError::IoTruncated,
            _ => StrataError::IoError(err),
        }
    }
}
