//! Event-level parsing of a single track body.

use crate::{
    prelude::*,
    sink::{EventSink, MidiEvent},
    timing::{TickClock, Timing},
};

/// How the parse of a track body ended.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TrackResult {
    /// Every event up to the declared track end was decoded.
    Complete,
    /// The stream ended before the declared track end; events read up to that
    /// point were converted.
    Truncated,
    /// An event could not be decoded; the rest of the track was skipped.
    Malformed,
}

/// Consumes the byte range of one `MTrk` chunk, pushing note transitions into
/// the sink.
///
/// Running status and the tick clock live for a single `parse` call. The
/// tempo inside `timing` is shared with the rest of the file: a tempo meta
/// event seen here carries over into later tracks.
pub struct TrackParser<'a, R, W> {
    reader: &'a mut ByteReader<R>,
    sink: &'a mut EventSink<W>,
    timing: &'a mut Timing,
}

impl<'a, R: Read + Seek, W: Write> TrackParser<'a, R, W> {
    pub fn new(
        reader: &'a mut ByteReader<R>,
        sink: &'a mut EventSink<W>,
        timing: &'a mut Timing,
    ) -> TrackParser<'a, R, W> {
        TrackParser {
            reader,
            sink,
            timing,
        }
    }

    /// Parse delta-time/event pairs until the stream position reaches
    /// `track_end`.
    ///
    /// Truncation and undecodable events end the track early but are not
    /// errors at this level; the caller decides what to make of the returned
    /// [`TrackResult`](enum.TrackResult.html).
    pub fn parse(&mut self, track_end: u64) -> Result<TrackResult> {
        let mut clock = TickClock::new();
        let mut running_status: Option<u8> = None;
        while self.reader.position() < track_end {
            match self.event(&mut clock, &mut running_status) {
                Ok(()) => (),
                Err(Error::Truncated(what)) => {
                    log::warn!("track cut short: {}", what);
                    return Ok(TrackResult::Truncated);
                }
                Err(Error::Malformed(what)) => {
                    log::warn!("skipping rest of track: {}", what);
                    return Ok(TrackResult::Malformed);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(TrackResult::Complete)
    }

    /// Decode one delta-time and the event that follows it.
    fn event(&mut self, clock: &mut TickClock, running_status: &mut Option<u8>) -> Result<()> {
        let delta = self.reader.read_varlen()?;
        clock.advance(delta);

        let mut status = self.reader.expect_u8("eof at event status")?;
        if status < 0x80 {
            //Not a status byte but the first data byte of a running-status
            //event: rewind and reuse the previous status
            self.reader.push_back(1)?;
            status = running_status
                .ok_or(Error::Malformed("data byte with no running status active"))?;
        } else {
            *running_status = Some(status);
        }

        match status {
            //Note off and note on
            0x80..=0x9F => {
                let note = self.data_byte()?;
                let velocity = self.data_byte()?;
                //A note on with velocity 0 is a note off by MIDI convention
                let on = status & 0xF0 == 0x90 && velocity > 0;
                self.sink.push(MidiEvent {
                    time_ms: clock.time_ms(self.timing),
                    note,
                    on,
                })?;
            }
            //Aftertouch, controller and pitch bend: two data bytes, discarded
            0xA0..=0xBF | 0xE0..=0xEF => {
                self.data_byte()?;
                self.data_byte()?;
            }
            //Program change and channel aftertouch: one data byte, discarded
            0xC0..=0xDF => {
                self.data_byte()?;
            }
            0xFF => self.meta(clock)?,
            //System exclusive: length-prefixed payload, skipped unread
            0xF0 | 0xF7 => {
                let len = self.reader.read_varlen()?;
                self.reader.skip(len as u64)?;
            }
            _ => bail!(Error::Malformed("status byte not allowed in an smf track")),
        }
        Ok(())
    }

    /// Decode a meta event. Only the tempo meta has an effect; everything
    /// else is skipped by its declared length.
    fn meta(&mut self, clock: &mut TickClock) -> Result<()> {
        let meta_type = self.data_byte()?;
        let len = self.reader.read_varlen()?;
        if meta_type == 0x51 && len == 3 {
            let mut tempo: u32 = 0;
            for _ in 0..3 {
                tempo = tempo << 8 | self.data_byte()? as u32;
            }
            //Freeze time under the old tempo before switching
            clock.rebase(self.timing);
            self.timing.set_tempo(tempo);
            log::debug!("tempo {} us/beat from tick {}", tempo, clock.ticks());
        } else {
            self.reader.skip(len as u64)?;
        }
        Ok(())
    }

    fn data_byte(&mut self) -> Result<u8> {
        self.reader.expect_u8("eof inside event data")
    }
}
