use thiserror::Error;

/// Errors raised by the WDATA codec.
///
/// All variants are fatal to the decode/encode call in progress; there is no
/// field-level recovery and no partial document.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not a WDATA stream: signature {found:?}")]
    InvalidFormat { found: String },

    #[error("unknown event box kind {kind} in offset table (body declared at offset {offset:#x})")]
    UnknownVariant { kind: i32, offset: usize },

    #[error("unexpected end of data at offset {offset:#x} (need {need} bytes, have {have})")]
    TruncatedStream {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("document cannot be encoded: {message}")]
    InvalidArgument { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
