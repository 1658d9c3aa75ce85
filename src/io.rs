//! Sequential big-endian primitive decoding over a readable, seekable byte
//! stream.
//!
//! All reads advance the stream position. End of stream is reported
//! explicitly: `read_u8` yields `None` and the reader remembers that it ran
//! off the end, so callers can distinguish a cleanly finished stream from a
//! truncated one after the fact.

use crate::prelude::*;
use std::io::SeekFrom;

/// Decodes MIDI primitives from an underlying byte stream, one byte at a time.
///
/// The stream is expected to be at its start when the reader is created.
pub struct ByteReader<R> {
    inner: R,
    pos: u64,
    hit_eof: bool,
}

impl<R: Read + Seek> ByteReader<R> {
    #[inline]
    pub fn new(inner: R) -> ByteReader<R> {
        ByteReader {
            inner,
            pos: 0,
            hit_eof: false,
        }
    }

    /// Current offset from the start of the stream.
    #[inline]
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Whether any read ever ran past the end of the stream.
    #[inline]
    pub fn hit_eof(&self) -> bool {
        self.hit_eof
    }

    /// Read a single byte. `None` signals end of stream.
    pub fn read_u8(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => {
                    self.hit_eof = true;
                    return Ok(None);
                }
                Ok(_) => {
                    self.pos += 1;
                    return Ok(Some(byte[0]));
                }
                Err(ref err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Read a byte that must be present, typically the continuation of a
    /// value whose first byte was already read.
    pub fn expect_u8(&mut self, what: &'static str) -> Result<u8> {
        self.read_u8()?.ok_or(Error::Truncated(what))
    }

    /// Big-endian 16-bit read.
    pub fn read_u16(&mut self) -> Result<u16> {
        let hi = self.expect_u8("eof inside 16-bit value")?;
        let lo = self.expect_u8("eof inside 16-bit value")?;
        Ok((hi as u16) << 8 | lo as u16)
    }

    /// Big-endian 32-bit read.
    pub fn read_u32(&mut self) -> Result<u32> {
        let mut acc: u32 = 0;
        for _ in 0..4 {
            acc = acc << 8 | self.expect_u8("eof inside 32-bit value")? as u32;
        }
        Ok(acc)
    }

    /// Little-endian 32-bit read. Only RIFF wrappers use this byte order.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let mut acc: u32 = 0;
        for shift in 0..4 {
            acc |= (self.expect_u8("eof inside 32-bit value")? as u32) << (shift * 8);
        }
        Ok(acc)
    }

    /// Read a MIDI variable-length quantity: the bottom 7 bits of each byte
    /// are accumulated while the top bit marks continuation.
    ///
    /// At most 4 bytes are read, since the SMF spec limits these values to
    /// 28 bits.
    pub fn read_varlen(&mut self) -> Result<u32> {
        let mut acc: u32 = 0;
        for _ in 0..4 {
            let byte = self.expect_u8("eof inside varlen value")?;
            acc = acc << 7 | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok(acc);
            }
        }
        if cfg!(feature = "strict") {
            bail!(Error::Malformed("varlen value longer than 4 bytes"));
        }
        //Use the 4 bytes as-is
        Ok(acc)
    }

    /// Read exactly 4 bytes of chunk magic. `None` if the stream ended right
    /// at the chunk boundary; truncation inside the magic is an error.
    pub fn read_magic(&mut self) -> Result<Option<[u8; 4]>> {
        let first = match self.read_u8()? {
            Some(byte) => byte,
            None => return Ok(None),
        };
        let mut magic = [first, 0, 0, 0];
        for byte in &mut magic[1..] {
            *byte = self.expect_u8("eof inside chunk magic")?;
        }
        Ok(Some(magic))
    }

    /// Rewind the stream by `n` bytes. Used to re-read the first data byte of
    /// a running-status event.
    pub fn push_back(&mut self, n: u64) -> Result<()> {
        debug_assert!(n <= self.pos);
        self.inner.seek(SeekFrom::Current(-(n as i64)))?;
        self.pos -= n;
        Ok(())
    }

    /// Skip `n` bytes without reading them.
    ///
    /// Skipping may move past the end of the stream; the next read then
    /// reports end of stream.
    pub fn skip(&mut self, n: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Current(n as i64))?;
        self.pos += n;
        Ok(())
    }

    /// Jump to an absolute offset.
    pub fn seek_to(&mut self, pos: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(pos))?;
        self.pos = pos;
        Ok(())
    }
}
