//! There's an abomination called RMID, MIDI embedded in a RIFF file.
//! Support for these files is provided by seeking through the RIFF chunk list
//! until the `data` chunk that holds the raw SMF stream.

use crate::prelude::*;

/// If the stream starts with a RIFF/RMID wrapper, leave the reader positioned
/// at the embedded SMF stream. Otherwise rewind to where the reader started.
pub(crate) fn unwrap<R: Read + Seek>(reader: &mut ByteReader<R>) -> Result<()> {
    let start = reader.position();
    //A stream too short to hold a whole magic cannot be RIFF; rewind and let
    //the header check produce the error
    match reader.read_magic() {
        Ok(Some(magic)) if &magic == b"RIFF" => (),
        Ok(_) | Err(Error::Truncated(_)) => {
            reader.seek_to(start)?;
            return Ok(());
        }
        Err(err) => return Err(err),
    }
    //RIFF sizes are little-endian, unlike everything in SMF
    let _riff_len = reader.read_u32_le()?;
    let formtype = reader
        .read_magic()?
        .ok_or(Error::Truncated("eof inside riff header"))?;
    ensure!(&formtype == b"RMID", Error::Invalid("not an rmid riff file"));
    loop {
        let id = match reader.read_magic()? {
            Some(id) => id,
            None => bail!(Error::Invalid("no rmid data chunk")),
        };
        let len = reader.read_u32_le()?;
        if &id == b"data" {
            return Ok(());
        }
        //Chunks are padded to even sizes
        reader.skip(len as u64 + (len % 2) as u64)?;
    }
}
