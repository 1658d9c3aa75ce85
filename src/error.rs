use thiserror::Error;

/// Represents an error while converting an SMF file.
///
/// Specific information on what exact part of the MIDI format was not
/// respected is carried as a non-normative string literal.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the underlying byte source or text sink.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Fatal errors while reading the file. It is likely that the input is not
    /// a MIDI file at all. These abort the conversion before or between
    /// tracks; no partial output is of any use.
    #[error("invalid midi: {0}")]
    Invalid(&'static str),

    /// The stream ended before the data it declared.
    ///
    /// Inside a track body this is only raised with the `strict` feature
    /// enabled; without it the track is cut short and the conversion summary
    /// is marked unclean.
    #[error("truncated midi: {0}")]
    Truncated(&'static str),

    /// An event could not be decoded, but the surrounding file structure is
    /// intact.
    ///
    /// Only raised with the `strict` feature enabled; without it the rest of
    /// the offending track is skipped.
    #[error("malformed midi: {0}")]
    Malformed(&'static str),
}

/// The result type used by the converter.
pub type Result<T> = std::result::Result<T, Error>;
