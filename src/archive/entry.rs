//! The in-memory representation of one archived file.

/// One file recorded in an archive's index.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The entry's path within the archive, using `/` as the separator.
    pub name: String,
    /// Byte offset of the entry's (still encrypted) body within the archive stream.
    pub offset: u64,
    /// Size of the entry's body in bytes.
    pub size: u32,
    /// The keystream seed the body cipher starts from for this entry.
    pub start_magic: u32,
}
