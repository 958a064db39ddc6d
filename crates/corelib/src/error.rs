use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal load failures. Only I/O-level problems abort a parse;
/// malformed content degrades to defaults inside the loader instead.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to read line {line}: {source}")]
    Read {
        line: usize,
        source: io::Error,
    },
    #[error("mesh has more than {} unique vertices", u32::MAX)]
    VertexOverflow,
}

/// Convenience alias for fallible load operations.
pub type LoadResult<T> = Result<T, LoadError>;
