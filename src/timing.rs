//! Conversion of MIDI ticks to wall-clock time.
//!
//! The resolution of a file is fixed by the `division` field of its header
//! (ticks per quarter note), while the tempo (microseconds per quarter note)
//! starts at a default and can change mid-file through a meta event. One
//! `Timing` value is shared by all tracks of a conversion; each track keeps
//! its own `TickClock`.

use crate::prelude::*;

/// The tempo assumed until a tempo meta event is seen: 500000 microseconds
/// per quarter note, that is, 120 BPM.
pub const DEFAULT_TEMPO: u32 = 500_000;

/// Tick resolution and running tempo for one conversion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timing {
    division: u16,
    tempo: u32,
}

impl Timing {
    /// Create the timing state for a file with the given division.
    ///
    /// A division of zero would make every tick-to-time conversion divide by
    /// zero, so it is rejected here, right after the header is read.
    pub fn new(division: u16) -> Result<Timing> {
        ensure!(division != 0, Error::Invalid("division of zero ticks per beat"));
        Ok(Timing {
            division,
            tempo: DEFAULT_TEMPO,
        })
    }

    /// Ticks per quarter note, as declared by the file header.
    #[inline]
    pub fn division(&self) -> u16 {
        self.division
    }

    /// The current tempo in microseconds per quarter note.
    #[inline]
    pub fn tempo(&self) -> u32 {
        self.tempo
    }

    #[inline]
    pub(crate) fn set_tempo(&mut self, tempo: u32) {
        self.tempo = tempo;
    }

    /// Microseconds spanned by `ticks` at the current tempo.
    #[inline]
    pub fn ticks_to_us(&self, ticks: u64) -> u64 {
        ticks * self.tempo as u64 / self.division as u64
    }

    /// Duration of a single tick in microseconds.
    #[inline]
    pub fn tick_duration_us(&self) -> f64 {
        self.tempo as f64 / self.division as f64
    }
}

/// Per-track clock mapping the accumulated delta-times to absolute time.
///
/// The clock is re-based whenever the tempo changes: time accumulated up to
/// the change tick is frozen under the old tempo, and only ticks after the
/// change are scaled by the new one.
#[derive(Copy, Clone, Debug, Default)]
pub struct TickClock {
    base_us: u64,
    base_ticks: u64,
    ticks: u64,
}

impl TickClock {
    #[inline]
    pub fn new() -> TickClock {
        TickClock::default()
    }

    /// Advance the clock by a delta-time.
    #[inline]
    pub fn advance(&mut self, delta: u32) {
        self.ticks += delta as u64;
    }

    /// Ticks accumulated since the start of the track.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Absolute time of the current tick, in milliseconds from track start.
    #[inline]
    pub fn time_ms(&self, timing: &Timing) -> u32 {
        let us = self.base_us + timing.ticks_to_us(self.ticks - self.base_ticks);
        (us / 1000) as u32
    }

    /// Freeze the time accumulated so far under the tempo in `timing`.
    ///
    /// Must be called at the tick of a tempo change, before the new tempo is
    /// stored, so that earlier ticks are not retroactively rescaled.
    pub(crate) fn rebase(&mut self, timing: &Timing) {
        self.base_us += timing.ticks_to_us(self.ticks - self.base_ticks);
        self.base_ticks = self.ticks;
    }
}
