use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderError {
    #[error("not enough bytes available")]
    InvalidSize,
    #[error("invalid value encountered")]
    InvalidValue,
}

// Canonical wire encoding reader over a borrowed byte slice
pub struct Reader<'a> {
    bytes: &'a [u8],
    total: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, total: 0 }
    }

    fn advance(&mut self, count: usize) -> Result<&'a [u8], ReaderError> {
        if count > self.bytes.len() {
            return Err(ReaderError::InvalidSize);
        }

        let (chunk, rest) = self.bytes.split_at(count);
        self.bytes = rest;
        self.total += count;
        Ok(chunk)
    }

    pub fn read_bool(&mut self) -> Result<bool, ReaderError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(ReaderError::InvalidValue),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, ReaderError> {
        let chunk = self.advance(1)?;
        Ok(chunk[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, ReaderError> {
        let chunk = self.advance(2)?;
        // advance returned exactly 2 bytes
        Ok(u16::from_be_bytes(chunk.try_into().map_err(|_| ReaderError::InvalidSize)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, ReaderError> {
        let chunk = self.advance(4)?;
        Ok(u32::from_be_bytes(chunk.try_into().map_err(|_| ReaderError::InvalidSize)?))
    }

    pub fn read_u64(&mut self) -> Result<u64, ReaderError> {
        let chunk = self.advance(8)?;
        Ok(u64::from_be_bytes(chunk.try_into().map_err(|_| ReaderError::InvalidSize)?))
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, ReaderError> {
        self.advance(count).map(|chunk| chunk.to_vec())
    }

    pub fn read_bytes_ref(&mut self, count: usize) -> Result<&'a [u8], ReaderError> {
        self.advance(count)
    }

    pub fn read_bytes_32(&mut self) -> Result<[u8; 32], ReaderError> {
        let chunk = self.advance(32)?;
        chunk.try_into().map_err(|_| ReaderError::InvalidSize)
    }

    // Remaining unread bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    // Total bytes consumed so far
    pub fn total_read(&self) -> usize {
        self.total
    }
}
