use crate::errors::DomainError;

/// Big-endian reader over a borrowed message buffer.
///
/// Every read either returns exactly the requested bytes and advances the
/// offset, or fails with [`DomainError::OutOfBounds`]; nothing is zero-filled.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Moves to an absolute offset. Seeking to the end of the buffer is
    /// allowed; seeking past it is not.
    pub fn seek(&mut self, offset: usize) -> Result<(), DomainError> {
        if offset > self.buf.len() {
            return Err(DomainError::OutOfBounds {
                offset,
                requested: 0,
                available: self.buf.len(),
            });
        }
        self.offset = offset;
        Ok(())
    }

    /// Returns a reader at the same offset that cannot see past `end`.
    /// Bytes before `end` (including earlier parts of the message, which
    /// compression pointers refer to) stay visible.
    pub fn limit_to(&self, end: usize) -> Result<WireReader<'a>, DomainError> {
        if end > self.buf.len() || end < self.offset {
            return Err(DomainError::OutOfBounds {
                offset: self.offset,
                requested: end.saturating_sub(self.offset),
                available: self.remaining(),
            });
        }
        Ok(WireReader {
            buf: &self.buf[..end],
            offset: self.offset,
        })
    }

    pub fn read_u8(&mut self) -> Result<u8, DomainError> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, DomainError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, DomainError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DomainError> {
        let available = self.remaining();
        if n > available {
            return Err(DomainError::OutOfBounds {
                offset: self.offset,
                requested: n,
                available,
            });
        }
        let start = self.offset;
        self.offset += n;
        Ok(&self.buf[start..self.offset])
    }
}

/// Big-endian writer over a growable buffer.
#[derive(Debug, Default, Clone)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Overwrites two bytes written earlier, e.g. a length placeholder.
    pub fn patch_u16(&mut self, position: usize, value: u16) -> Result<(), DomainError> {
        let available = self.buf.len();
        match self.buf.get_mut(position..position.saturating_add(2)) {
            Some(slot) => {
                slot.copy_from_slice(&value.to_be_bytes());
                Ok(())
            }
            None => Err(DomainError::OutOfBounds {
                offset: position,
                requested: 2,
                available,
            }),
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
