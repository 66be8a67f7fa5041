//! The RGSSAD/RGSS2A/RGSS3A archive container codec.
//!
//! Versions 1 and 2 share one on-disk layout: a single keystream advances
//! continuously through the index and every entry body, in file order, with each
//! entry's body stored immediately after its index fields. Version 3 moves all
//! index records to the front of the file (terminated by a zero-offset sentinel)
//! and keys the index with one constant value derived from the header, storing each
//! entry's own body seed explicitly.
pub mod cipher;
pub mod entry;
pub mod keystream;

use crate::error::{Error, Result};
use crate::ext::io::{ReadExt, WriteExt};
use cipher::StreamCipher;
use entry::Entry;
use keystream::{v3_index_key, FixedKey, Keystream};
use std::io::{Read, Seek, SeekFrom, Write};

const SIGNATURE: &[u8; 7] = b"RGSSAD\0";
const BODY_SEED: u32 = 0xDEADCAFE;

/// Which on-disk layout an archive uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// RGSSAD, used by RPG Maker XP.
    V1,
    /// RGSSAD, used by RPG Maker VX (same layout as v1, different version byte).
    V2,
    /// RGSS3A, used by RPG Maker VX Ace.
    V3,
}

impl Version {
    /// Maps a header version byte to a [Version], rejecting anything outside `{1,2,3}`.
    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            1 => Ok(Version::V1),
            2 => Ok(Version::V2),
            3 => Ok(Version::V3),
            other => Err(Error::UnsupportedVersion(other)),
        }
    }

    /// The header version byte this variant writes.
    pub fn to_byte(self) -> u8 {
        match self {
            Version::V1 => 1,
            Version::V2 => 2,
            Version::V3 => 3,
        }
    }
}

/// A parsed archive index, bound to a seekable reader over the archive bytes.
pub struct Archive<R> {
    reader: R,
    version: Version,
    entries: Vec<Entry>,
}

impl<R: Read + Seek> Archive<R> {
    /// Parses an archive's header and full index from `reader`.
    pub fn open(mut reader: R) -> Result<Self> {
        let mut header = [0u8; 8];
        reader.read_exact(&mut header).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                Error::TruncatedInput {
                    expected: 8,
                    found: 0,
                }
            } else {
                Error::Io(e)
            }
        })?;
        if &header[..7] != SIGNATURE {
            return Err(Error::HeaderMismatch {
                found: u32::from_le_bytes(header[0..4].try_into().unwrap()),
            });
        }
        let version = Version::from_byte(header[7])?;

        let entries = match version {
            Version::V1 | Version::V2 => Self::read_index_v1v2(&mut reader)?,
            Version::V3 => Self::read_index_v3(&mut reader)?,
        };

        Ok(Self {
            reader,
            version,
            entries,
        })
    }

    fn read_index_v1v2(reader: &mut R) -> Result<Vec<Entry>> {
        let mut keystream = Keystream::new(BODY_SEED);
        let mut entries = Vec::new();
        loop {
            let name_len = match reader.read_u32() {
                Ok(v) => v ^ keystream.next_word_key(),
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(Error::Io(e)),
            };
            if name_len == 0 || name_len > 4096 {
                return Err(Error::InvalidNameLength(name_len));
            }
            let mut name_bytes = reader.read_exact_vec(name_len as usize)?;
            for byte in name_bytes.iter_mut() {
                *byte ^= keystream.next_name_byte_key();
            }
            let name = normalize_name(&name_bytes);
            let size = reader.read_u32()? ^ keystream.next_word_key();

            let start_magic = keystream.peek();
            let offset = reader.stream_position()?;
            reader.seek(SeekFrom::Current(size as i64))?;
            keystream_skip_body(&mut keystream, size);

            entries.push(Entry {
                name,
                offset,
                size,
                start_magic,
            });
        }
        Ok(entries)
    }

    fn read_index_v3(reader: &mut R) -> Result<Vec<Entry>> {
        let raw_magic = reader.read_u32()?;
        let key = FixedKey(v3_index_key(raw_magic));
        let mut entries = Vec::new();
        loop {
            let offset = reader.read_u32()? ^ key.word_key();
            if offset == 0 {
                break;
            }
            let size = reader.read_u32()? ^ key.word_key();
            let start_magic = reader.read_u32()? ^ key.word_key();
            let name_len = reader.read_u32()? ^ key.word_key();
            if name_len == 0 || name_len > 4096 {
                return Err(Error::InvalidNameLength(name_len));
            }
            let mut name_bytes = reader.read_exact_vec(name_len as usize)?;
            for (i, byte) in name_bytes.iter_mut().enumerate() {
                *byte ^= key.name_byte_key(i);
            }
            entries.push(Entry {
                name: normalize_name(&name_bytes),
                offset: offset as u64,
                size,
                start_magic,
            });
        }
        Ok(entries)
    }

    /// Returns the archive's format version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the parsed entries in index order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Decrypts one entry's body into `writer`.
    pub fn extract_entry(&mut self, entry: &Entry, writer: &mut impl Write) -> Result<()> {
        self.reader.seek(SeekFrom::Start(entry.offset))?;
        let mut cipher = StreamCipher::new(entry.start_magic);
        cipher
            .transform_copy(&mut self.reader, writer, entry.size as u64)
            .map_err(Error::Io)
    }
}

/// Advances `keystream` as if `size` bytes of body had just been encrypted, without
/// needing the actual bytes. Used while scanning the v1/v2 index, where each entry's
/// body sits between the current index fields and the next entry's.
fn keystream_skip_body(keystream: &mut Keystream, size: u32) {
    let aligned_words = size / 4;
    for _ in 0..aligned_words {
        keystream.next_word_key();
    }
}

/// Normalizes a raw, possibly backslash-separated, possibly non-UTF-8 entry name into
/// the archive's canonical `/`-separated form.
fn normalize_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).replace('\\', "/")
}

/// Writes a brand-new archive of the given version, built from `files` (name, content)
/// pairs in the order given.
pub fn write_archive<W: Write + Seek>(
    writer: &mut W,
    version: Version,
    files: &[(String, Vec<u8>)],
) -> Result<()> {
    writer.write_all(SIGNATURE)?;
    writer.write_u8(version.to_byte())?;
    match version {
        Version::V1 | Version::V2 => write_v1v2(writer, files),
        Version::V3 => write_v3(writer, files),
    }
}

fn write_v1v2<W: Write + Seek>(writer: &mut W, files: &[(String, Vec<u8>)]) -> Result<()> {
    let mut keystream = Keystream::new(BODY_SEED);
    for (name, data) in files {
        let encoded_name = name.replace('/', "\\");
        let name_bytes = encoded_name.as_bytes();
        writer.write_u32(name_bytes.len() as u32 ^ keystream.next_word_key())?;
        for &byte in name_bytes {
            writer.write_u8(byte ^ keystream.next_name_byte_key())?;
        }
        writer.write_u32(data.len() as u32 ^ keystream.next_word_key())?;

        let start_magic = keystream.peek();
        let mut cipher = StreamCipher::new(start_magic);
        cipher
            .transform_copy(&mut std::io::Cursor::new(data), writer, data.len() as u64)
            .map_err(Error::Io)?;
        keystream_skip_body(&mut keystream, data.len() as u32);
    }
    Ok(())
}

fn write_v3<W: Write + Seek>(writer: &mut W, files: &[(String, Vec<u8>)]) -> Result<()> {
    // Header so far: 7-byte signature + version byte = 8 bytes.
    // The raw header word is free to choose; write 0, as a fresh archive would.
    let raw_magic: u32 = 0;
    writer.write_u32(raw_magic)?;
    let key = FixedKey(v3_index_key(raw_magic));

    let encoded_names: Vec<String> = files.iter().map(|(n, _)| n.replace('/', "\\")).collect();

    // offset = end of the fixed 8-byte header + 4-byte raw magic field + index + terminator.
    let mut offset: u32 = 8 + 4;
    for name in &encoded_names {
        offset += 16 + name.len() as u32;
    }
    offset += 4; // zero-offset terminator

    let mut records = Vec::with_capacity(files.len());
    for ((_, data), name) in files.iter().zip(encoded_names.iter()) {
        records.push((offset, data.len() as u32, BODY_SEED, name.clone()));
        offset += data.len() as u32;
    }

    for (entry_offset, size, start_magic, name) in &records {
        writer.write_u32(entry_offset ^ key.word_key())?;
        writer.write_u32(size ^ key.word_key())?;
        writer.write_u32(start_magic ^ key.word_key())?;
        let name_bytes = name.as_bytes();
        writer.write_u32(name_bytes.len() as u32 ^ key.word_key())?;
        for (i, &byte) in name_bytes.iter().enumerate() {
            writer.write_u8(byte ^ key.name_byte_key(i))?;
        }
    }
    writer.write_u32(0 ^ key.word_key())?;

    for (_, data) in files {
        let mut cipher = StreamCipher::new(BODY_SEED);
        cipher
            .transform_copy(&mut std::io::Cursor::new(data), writer, data.len() as u64)
            .map_err(Error::Io)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ext::io::MemWriter;
    use std::io::Cursor;

    fn roundtrip(version: Version, files: &[(String, Vec<u8>)]) -> Vec<(String, Vec<u8>)> {
        let mut w = MemWriter::new();
        write_archive(&mut w, version, files).unwrap();
        let bytes = w.into_inner();
        let mut archive = Archive::open(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.version(), version);
        let entries: Vec<_> = archive.entries().to_vec();
        entries
            .iter()
            .map(|e| {
                let mut out = Vec::new();
                archive.extract_entry(e, &mut out).unwrap();
                (e.name.clone(), out)
            })
            .collect()
    }

    #[test]
    fn v1_round_trips_single_small_file() {
        let files = vec![("a/b.txt".to_string(), b"hello".to_vec())];
        let out = roundtrip(Version::V1, &files);
        assert_eq!(out, files);
    }

    #[test]
    fn v2_round_trips_multiple_files() {
        let files = vec![
            ("data/a.rxdata".to_string(), vec![1u8, 2, 3, 4, 5, 6, 7]),
            ("data/b.rxdata".to_string(), (0u8..=255).collect()),
        ];
        let out = roundtrip(Version::V2, &files);
        assert_eq!(out, files);
    }

    #[test]
    fn v3_round_trips_and_handles_empty_archive() {
        let files: Vec<(String, Vec<u8>)> = Vec::new();
        let mut w = MemWriter::new();
        write_archive(&mut w, Version::V3, &files).unwrap();
        let bytes = w.into_inner();
        let archive = Archive::open(Cursor::new(bytes)).unwrap();
        assert!(archive.entries().is_empty());

        let files = vec![
            ("Data/Actors.rvdata2".to_string(), b"\x04\x08[\x00".to_vec()),
            ("Graphics/icon.png".to_string(), vec![0u8; 37]),
        ];
        let out = roundtrip(Version::V3, &files);
        assert_eq!(out, files);
    }

    #[test]
    fn rejects_bad_signature() {
        let bytes = b"NOT-RGSSAD".to_vec();
        let err = Archive::open(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, Error::HeaderMismatch { .. }));
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut bytes = SIGNATURE.to_vec();
        bytes.push(9);
        let err = Archive::open(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion(9)));
    }
}
