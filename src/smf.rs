//! Specific to the SMF packaging of MIDI streams: header validation, track
//! enumeration, and the top-level converter.

use crate::{
    prelude::*,
    riff,
    sink::EventSink,
    timing::Timing,
    track::{TrackParser, TrackResult},
};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

/// The fields of an `MThd` chunk.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Header {
    /// SMF format: 0, 1 or 2. The converter treats all three the same, since
    /// every track is flattened into one log anyway.
    pub format: u16,
    /// Number of track chunks the file claims to contain.
    pub track_count: u16,
    /// Ticks per quarter note. Always nonzero and always metrical: SMPTE
    /// timecode divisions are rejected.
    pub division: u16,
}

impl Header {
    /// Read and validate the header chunk. The reader must be at the start of
    /// the SMF stream (after any RIFF unwrapping).
    pub fn read<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<Header> {
        let magic = match reader.read_magic() {
            Ok(Some(magic)) => magic,
            //An empty or shorter-than-a-magic stream is not a MIDI file, not
            //a truncated one
            Ok(None) | Err(Error::Truncated(_)) => {
                bail!(Error::Invalid("not a standard midi file"))
            }
            Err(err) => return Err(err),
        };
        ensure!(&magic == b"MThd", Error::Invalid("not a standard midi file"));
        //The declared header length is assumed to be 6 and not checked
        let _len = reader.read_u32()?;
        let format = reader.read_u16()?;
        let track_count = reader.read_u16()?;
        let division = reader.read_u16()?;
        ensure!(division != 0, Error::Invalid("division of zero ticks per beat"));
        ensure!(
            division & 0x8000 == 0,
            Error::Invalid("smpte timecode division is not supported")
        );
        Ok(Header {
            format,
            track_count,
            division,
        })
    }
}

/// What a finished conversion produced.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Summary {
    /// Number of track chunks that were parsed.
    pub tracks: u16,
    /// Number of note events written to the output.
    pub events: u64,
    /// `false` when any track body was truncated or malformed, or when the
    /// stream ended before all declared tracks.
    ///
    /// Without the `strict` feature these conditions do not fail the
    /// conversion; this flag is how they stay detectable.
    pub clean: bool,
}

/// Streaming converter from an SMF byte stream to a text event log.
///
/// All conversion state (tempo, event buffer, stream positions) is owned by
/// the converter value, so concurrent conversions share nothing.
pub struct Converter<R, W: Write> {
    reader: ByteReader<R>,
    sink: EventSink<W>,
}

impl<R: Read + Seek, W: Write> Converter<R, W> {
    #[inline]
    pub fn new(input: R, output: W) -> Converter<R, W> {
        Converter {
            reader: ByteReader::new(input),
            sink: EventSink::new(output),
        }
    }

    /// Like [`new`](#method.new), with an explicit event buffer capacity.
    pub fn with_capacity(input: R, output: W, capacity: usize) -> Converter<R, W> {
        Converter {
            reader: ByteReader::new(input),
            sink: EventSink::with_capacity(output, capacity),
        }
    }

    /// Run the conversion to completion and flush the output.
    pub fn run(mut self) -> Result<Summary> {
        riff::unwrap(&mut self.reader)?;
        let header = Header::read(&mut self.reader)?;
        convert_tracks(&mut self.reader, &mut self.sink, &header)
    }
}

/// Convert the SMF at `input` into a text log at `output`.
///
/// The input is opened and its header validated before the output file is
/// created, so a file that fails the magic check leaves the output path
/// untouched.
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<Summary> {
    fn convert_impl(input: &Path, output: &Path) -> Result<Summary> {
        let mut reader = ByteReader::new(BufReader::new(File::open(input)?));
        riff::unwrap(&mut reader)?;
        let header = Header::read(&mut reader)?;
        let mut sink = EventSink::new(BufWriter::new(File::create(output)?));
        convert_tracks(&mut reader, &mut sink, &header)
    }
    convert_impl(input.as_ref(), output.as_ref())
}

fn convert_tracks<R: Read + Seek, W: Write>(
    reader: &mut ByteReader<R>,
    sink: &mut EventSink<W>,
    header: &Header,
) -> Result<Summary> {
    log::debug!(
        "format {} with {} declared tracks at {} ticks per beat",
        header.format,
        header.track_count,
        header.division
    );
    let mut timing = Timing::new(header.division)?;
    let mut tracks: u16 = 0;
    let mut clean = true;
    for parsed in 0..header.track_count {
        let (magic, len) = match read_track_header(reader) {
            Ok(Some(pair)) => pair,
            Ok(None) | Err(Error::Truncated(_)) => {
                ensure!(
                    !cfg!(feature = "strict"),
                    Error::Truncated("stream ended before all declared tracks")
                );
                log::warn!(
                    "stream ended after {} of {} declared tracks",
                    parsed,
                    header.track_count
                );
                clean = false;
                break;
            }
            Err(err) => return Err(err),
        };
        //A bad track magic aborts the whole conversion; there is no way to
        //know where the next track starts
        ensure!(&magic == b"MTrk", Error::Invalid("expected an mtrk chunk"));
        let track_end = reader.position() + len as u64;
        let result = TrackParser::new(reader, sink, &mut timing).parse(track_end)?;
        match result {
            TrackResult::Complete => (),
            TrackResult::Truncated => {
                ensure!(
                    !cfg!(feature = "strict"),
                    Error::Truncated("track body ended early")
                );
                clean = false;
            }
            TrackResult::Malformed => {
                ensure!(
                    !cfg!(feature = "strict"),
                    Error::Malformed("track body could not be decoded")
                );
                clean = false;
            }
        }
        tracks += 1;
        //Re-sync on the declared chunk length, whatever the body contained
        reader.seek_to(track_end)?;
    }
    sink.flush()?;
    Ok(Summary {
        tracks,
        events: sink.events(),
        clean,
    })
}

/// Read the magic and declared length of the next track chunk. `None` when
/// the stream ends cleanly at the chunk boundary.
fn read_track_header<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<Option<([u8; 4], u32)>> {
    let magic = match reader.read_magic()? {
        Some(magic) => magic,
        None => return Ok(None),
    };
    let len = reader.read_u32()?;
    Ok(Some((magic, len)))
}
