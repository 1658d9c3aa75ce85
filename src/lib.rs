//! # Overview
//!
//! `mid2txt` converts Standard Midi Files (SMF) into a flat, time-ordered text
//! log of note on/off events, one line per event:
//!
//! ```text
//! [time in milliseconds][note number][1 for on, 0 for off]
//! ```
//!
//! The file is decoded incrementally from a readable, seekable byte stream and
//! events are staged in a fixed-capacity buffer, so memory usage stays bounded
//! no matter how large the input is.
//!
//! Converting a file on disk:
//!
//! ```rust,no_run
//! let summary = mid2txt::convert("song.mid", "song.txt").unwrap();
//! println!("wrote {} events from {} tracks", summary.events, summary.tracks);
//! ```
//!
//! Converting between arbitrary streams:
//!
//! ```rust
//! use mid2txt::Converter;
//! use std::io::Cursor;
//!
//! let bytes = b"MThd\x00\x00\x00\x06\x00\x00\x00\x01\x00\x60MTrk\x00\x00\x00\x04\x00\xFF\x2F\x00";
//! let mut log = Vec::new();
//! let summary = Converter::new(Cursor::new(&bytes[..]), &mut log).run().unwrap();
//! assert_eq!(summary.tracks, 1);
//! ```
//!
//! # About features
//!
//! By default the converter will plow through truncated and even corrupted
//! track bodies, converting whatever events could be read and recording the
//! damage in the returned [`Summary`](struct.Summary.html).
//! Enabling the `strict` feature turns these conditions into hard errors of
//! the kinds `Error::Truncated` and `Error::Malformed`.

macro_rules! bail {
    ($err:expr) => {{
        return Err($err.into());
    }};
}
macro_rules! ensure {
    ($cond:expr, $err:expr) => {{
        if !$cond {
            bail!($err)
        }
    }};
}

mod prelude {
    pub(crate) use crate::{
        error::{Error, Result},
        io::ByteReader,
    };
    pub(crate) use std::io::{Read, Seek, Write};
}

mod error;
pub mod io;
mod riff;
mod sink;
mod smf;
mod timing;
mod track;

pub use crate::{
    error::{Error, Result},
    sink::{EventSink, MidiEvent, DEFAULT_CAPACITY},
    smf::{convert, Converter, Header, Summary},
    timing::{TickClock, Timing, DEFAULT_TEMPO},
    track::{TrackParser, TrackResult},
};
