use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// The two-character placeholder an empty path is stored as.
const PATH_PLACEHOLDER: [u16; 2] = [b'.' as u16, 0];

/// Borrowing reader over a WDATA byte buffer.
///
/// All multi-byte values are little-endian. The cursor tracks an absolute
/// position so the event box offset table can `seek` to declared body
/// positions, and every failed read reports that position.
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Cursor { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Jump to an absolute byte offset. Out-of-range positions are allowed
    /// here; the next read reports them as truncation.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    fn take(&mut self, need: usize) -> Result<&'a [u8]> {
        let have = self.remaining();
        if have < need {
            return Err(Error::TruncatedStream {
                offset: self.pos,
                need,
                have,
            });
        }
        let slice = &self.data[self.pos..self.pos + need];
        self.pos += need;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    /// Read an `i32` element count and check that `count` elements of at
    /// least `min_elem_size` bytes each can still fit in the buffer. Keeps a
    /// hostile count from driving a huge allocation before the per-element
    /// reads would fail anyway.
    pub fn read_count(&mut self, min_elem_size: usize) -> Result<usize> {
        let offset = self.pos;
        let raw = self.read_i32()?;
        let count = if raw < 0 { usize::MAX } else { raw as usize };
        let need = count.saturating_mul(min_elem_size.max(1));
        if need > self.remaining() {
            return Err(Error::TruncatedStream {
                offset,
                need,
                have: self.remaining(),
            });
        }
        Ok(count)
    }

    /// Read a length-prefixed UTF-16LE string: `u16` char count, then that
    /// many code units, no terminator. Trailing NULs are trimmed. With
    /// `empty_if_dot` the stored `'.', NUL` placeholder collapses to `""`.
    pub fn read_string(&mut self, empty_if_dot: bool) -> Result<String> {
        let count = self.read_u16()? as usize;
        if count == 0 {
            return Ok(String::new());
        }
        let bytes = self.take(count * 2)?;
        let mut units = Vec::with_capacity(count);
        for pair in bytes.chunks_exact(2) {
            units.push(u16::from_le_bytes([pair[0], pair[1]]));
        }
        while units.last() == Some(&0) {
            units.pop();
        }
        if empty_if_dot && units == [b'.' as u16] {
            return Ok(String::new());
        }
        Ok(String::from_utf16_lossy(&units))
    }
}

/// Growable little-endian output buffer.
///
/// `position` and `patch_i32` exist for the event box offset table, which is
/// written as placeholders first and back-filled once the variable-length
/// bodies land.
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Writer { buf: Vec::new() }
    }

    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(value as u8);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Overwrite a previously written `i32` at an absolute offset.
    pub fn patch_i32(&mut self, at: usize, value: i32) {
        self.buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    /// Write a length-prefixed UTF-16LE string. With `dot_if_empty` an empty
    /// value goes out as the `'.', NUL` placeholder instead of a zero count.
    pub fn write_string(&mut self, value: &str, dot_if_empty: bool) -> Result<()> {
        if value.is_empty() && dot_if_empty {
            self.write_u16(PATH_PLACEHOLDER.len() as u16);
            for unit in PATH_PLACEHOLDER {
                self.write_u16(unit);
            }
            return Ok(());
        }
        let units: Vec<u16> = value.encode_utf16().collect();
        if units.len() > u16::MAX as usize {
            return Err(Error::InvalidArgument {
                message: format!(
                    "string of {} UTF-16 units does not fit the u16 length prefix",
                    units.len()
                ),
            });
        }
        self.write_u16(units.len() as u16);
        for unit in units {
            self.write_u16(unit);
        }
        Ok(())
    }
}

impl Default for Writer {
    fn default() -> Self {
        Writer::new()
    }
}
