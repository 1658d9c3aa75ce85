//! Bounded in-memory staging of decoded events.

use crate::prelude::*;

/// Default number of events staged in memory before they are written out.
pub const DEFAULT_CAPACITY: usize = 1024;

/// A single note transition at an absolute millisecond offset from the start
/// of its track.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct MidiEvent {
    /// Time of the transition in milliseconds.
    pub time_ms: u32,
    /// MIDI note number (0-127, 60 is middle C).
    pub note: u8,
    /// `true` for note on, `false` for note off.
    pub on: bool,
}

/// Accumulates decoded events and writes them to the output sink in push
/// order, one `[time][note][on]` line per event.
///
/// The buffer is allocated once and cleared on flush, never reallocated, so
/// a conversion peaks at `capacity` staged events regardless of file size.
pub struct EventSink<W> {
    out: W,
    buf: Vec<MidiEvent>,
    capacity: usize,
    total: u64,
}

impl<W: Write> EventSink<W> {
    #[inline]
    pub fn new(out: W) -> EventSink<W> {
        EventSink::with_capacity(out, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(out: W, capacity: usize) -> EventSink<W> {
        assert!(capacity > 0, "event sink capacity must be nonzero");
        EventSink {
            out,
            buf: Vec::with_capacity(capacity),
            capacity,
            total: 0,
        }
    }

    /// Stage one event, flushing synchronously if the buffer is now full.
    pub fn push(&mut self, ev: MidiEvent) -> Result<()> {
        self.buf.push(ev);
        self.total += 1;
        if self.buf.len() >= self.capacity {
            self.flush()?;
        }
        Ok(())
    }

    /// Write every buffered event, clear the buffer and flush the underlying
    /// writer, so that an i/o failure surfaces here instead of being dropped
    /// when a buffered writer goes out of scope.
    pub fn flush(&mut self) -> Result<()> {
        for ev in &self.buf {
            writeln!(self.out, "[{}][{}][{}]", ev.time_ms, ev.note, ev.on as u8)?;
        }
        self.buf.clear();
        self.out.flush()?;
        Ok(())
    }

    /// Number of events currently staged.
    #[inline]
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Total number of events pushed over the lifetime of the sink.
    #[inline]
    pub fn events(&self) -> u64 {
        self.total
    }
}
