//! Extensions for IO operations.
use std::io::*;

/// A trait to help read fixed-size little-endian integers from any reader.
pub trait ReadExt {
    /// Reads a single byte.
    fn read_u8(&mut self) -> Result<u8>;
    /// Reads a [u16] in little-endian order.
    fn read_u16(&mut self) -> Result<u16>;
    /// Reads a [u32] in little-endian order.
    fn read_u32(&mut self) -> Result<u32>;
    /// Reads `len` bytes into a newly allocated [Vec].
    fn read_exact_vec(&mut self, len: usize) -> Result<Vec<u8>>;
}

impl<T: Read> ReadExt for T {
    fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_exact_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }
}

/// A trait to help write fixed-size little-endian integers to any writer.
pub trait WriteExt {
    /// Writes a single byte.
    fn write_u8(&mut self, value: u8) -> Result<()>;
    /// Writes a [u16] in little-endian order.
    fn write_u16(&mut self, value: u16) -> Result<()>;
    /// Writes a [u32] in little-endian order.
    fn write_u32(&mut self, value: u32) -> Result<()>;
}

impl<T: Write> WriteExt for T {
    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_all(&[value])
    }

    fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_all(&value.to_le_bytes())
    }
}

/// A trait to help peek an absolute offset without disturbing the caller's stream position.
pub trait SeekExt {
    /// Returns the current stream position, seeks to `offset`, runs `f`, then restores
    /// the original position regardless of whether `f` succeeded.
    fn with_position_at<R>(&mut self, offset: u64, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R>;
}

impl<T: Seek> SeekExt for T {
    fn with_position_at<R>(&mut self, offset: u64, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        let pos = self.stream_position()?;
        self.seek(SeekFrom::Start(offset))?;
        let result = f(self);
        self.seek(SeekFrom::Start(pos))?;
        result
    }
}

#[derive(Debug, Clone)]
/// An in-memory reader over an owned buffer that supports seeking.
pub struct MemReader {
    data: Vec<u8>,
    pos: usize,
}

impl MemReader {
    /// Creates a new [MemReader] from an owned buffer.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consumes the reader, returning the underlying buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl Read for MemReader {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let remaining = &self.data[self.pos.min(self.data.len())..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl Seek for MemReader {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let new_pos = match pos {
            SeekFrom::Start(p) => p as i64,
            SeekFrom::End(p) => self.data.len() as i64 + p,
            SeekFrom::Current(p) => self.pos as i64 + p,
        };
        if new_pos < 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "seek position would be negative",
            ));
        }
        self.pos = new_pos as usize;
        Ok(self.pos as u64)
    }
}

/// A cheap, non-owning view over a borrowed buffer, for peeking without copying.
pub struct MemReaderRef<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> MemReaderRef<'a> {
    /// Creates a new [MemReaderRef] over a borrowed buffer.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl<'a> Read for MemReaderRef<'a> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let remaining = &self.data[self.pos.min(self.data.len())..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl<'a> Seek for MemReaderRef<'a> {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let new_pos = match pos {
            SeekFrom::Start(p) => p as i64,
            SeekFrom::End(p) => self.data.len() as i64 + p,
            SeekFrom::Current(p) => self.pos as i64 + p,
        };
        if new_pos < 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "seek position would be negative",
            ));
        }
        self.pos = new_pos as usize;
        Ok(self.pos as u64)
    }
}

#[derive(Debug, Default)]
/// An in-memory writer that supports seeking, growing the buffer as needed.
pub struct MemWriter {
    data: Vec<u8>,
    pos: usize,
}

impl MemWriter {
    /// Creates a new, empty [MemWriter].
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the writer, returning the underlying buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl Write for MemWriter {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let end = self.pos + buf.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.pos..end].copy_from_slice(buf);
        self.pos = end;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Seek for MemWriter {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let new_pos = match pos {
            SeekFrom::Start(p) => p as i64,
            SeekFrom::End(p) => self.data.len() as i64 + p,
            SeekFrom::Current(p) => self.pos as i64 + p,
        };
        if new_pos < 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "seek position would be negative",
            ));
        }
        self.pos = new_pos as usize;
        Ok(self.pos as u64)
    }
}

/// A writer that discards everything written to it, useful for dry-run size computation.
pub struct EmptyWriter {
    pos: u64,
}

impl EmptyWriter {
    /// Creates a new [EmptyWriter].
    pub fn new() -> Self {
        Self { pos: 0 }
    }
}

impl Write for EmptyWriter {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.pos += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Seek for EmptyWriter {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let new_pos = match pos {
            SeekFrom::Start(p) => p as i64,
            SeekFrom::End(p) => self.pos as i64 + p,
            SeekFrom::Current(p) => self.pos as i64 + p,
        };
        if new_pos < 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "seek position would be negative",
            ));
        }
        self.pos = new_pos as u64;
        Ok(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mem_reader_round_trips_seek_and_read() {
        let mut r = MemReader::new(vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(r.read_u32().unwrap(), u32::from_le_bytes([1, 2, 3, 4]));
        r.seek(SeekFrom::Start(4)).unwrap();
        assert_eq!(r.read_u32().unwrap(), u32::from_le_bytes([5, 6, 7, 8]));
    }

    #[test]
    fn mem_writer_grows_and_overwrites() {
        let mut w = MemWriter::new();
        w.write_u32(0xdeadcafe).unwrap();
        w.seek(SeekFrom::Start(0)).unwrap();
        w.write_u8(0xff).unwrap();
        let data = w.into_inner();
        assert_eq!(data[0], 0xff);
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn seek_ext_restores_position() {
        let mut r = MemReader::new(vec![0, 0, 0, 0, 9, 9, 9, 9]);
        r.seek(SeekFrom::Start(2)).unwrap();
        let peeked = r.with_position_at(4, |r| r.read_u32()).unwrap();
        assert_eq!(peeked, u32::from_le_bytes([9, 9, 9, 9]));
        assert_eq!(r.stream_position().unwrap(), 2);
    }
}
