//! Body encryption: copies entry payloads between streams, XORing each 32-bit word
//! against an advancing keystream, with a byte-wise tail for lengths not divisible by 4.
use crate::archive::keystream::Keystream;
use std::io::{Read, Result, Write};

/// Maximum number of bytes moved through a single chunk buffer.
const CHUNK_SIZE: usize = 8192;

/// A body cipher bound to one entry's starting magic. Used identically for encryption
/// and decryption, since XOR is its own inverse.
pub struct StreamCipher {
    keystream: Keystream,
}

impl StreamCipher {
    /// Creates a cipher seeded at `start_magic`, the per-entry body key recorded in
    /// the archive index.
    pub fn new(start_magic: u32) -> Self {
        Self {
            keystream: Keystream::new(start_magic),
        }
    }

    /// Copies exactly `len` bytes from `reader` to `writer`, XOR-transforming them
    /// against the keystream in 8 KiB chunks. Chunk boundaries stay 4-byte aligned
    /// except for the final chunk, whose trailing 1-3 bytes are XORed against the
    /// byte lanes of the next (un-consumed) key word without advancing the stream
    /// further.
    pub fn transform_copy<R: Read + ?Sized, W: Write + ?Sized>(
        &mut self,
        reader: &mut R,
        writer: &mut W,
        len: u64,
    ) -> Result<()> {
        let mut remaining = len;
        let mut buf = vec![0u8; CHUNK_SIZE];
        while remaining > 0 {
            let chunk_len = remaining.min(CHUNK_SIZE as u64) as usize;
            let chunk = &mut buf[..chunk_len];
            reader.read_exact(chunk)?;
            self.transform_chunk(chunk);
            writer.write_all(chunk)?;
            remaining -= chunk_len as u64;
        }
        Ok(())
    }

    /// Transforms a chunk of at most [CHUNK_SIZE] bytes in place.
    fn transform_chunk(&mut self, chunk: &mut [u8]) {
        let aligned_len = (chunk.len() / 4) * 4;
        let mut i = 0;
        while i < aligned_len {
            let word = u32::from_le_bytes(chunk[i..i + 4].try_into().unwrap());
            let key = self.keystream.next_word_key();
            chunk[i..i + 4].copy_from_slice(&(word ^ key).to_le_bytes());
            i += 4;
        }
        let tail_key = self.keystream.peek();
        for (j, byte) in chunk[aligned_len..].iter_mut().enumerate() {
            *byte ^= ((tail_key >> ((j % 4) * 8)) & 0xFF) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn xor_cipher_is_involutive() {
        let plaintext = b"hello, world! this is a test payload that is not a multiple of four".to_vec();
        let mut ciphertext = Vec::new();
        StreamCipher::new(0xDEADCAFE)
            .transform_copy(&mut Cursor::new(&plaintext), &mut ciphertext, plaintext.len() as u64)
            .unwrap();
        assert_ne!(ciphertext, plaintext);

        let mut decrypted = Vec::new();
        StreamCipher::new(0xDEADCAFE)
            .transform_copy(&mut Cursor::new(&ciphertext), &mut decrypted, ciphertext.len() as u64)
            .unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn chunk_boundary_crossing_matches_single_pass() {
        let plaintext: Vec<u8> = (0u32..5000).map(|i| (i % 251) as u8).collect();
        let mut one_shot = Vec::new();
        StreamCipher::new(123)
            .transform_copy(&mut Cursor::new(&plaintext), &mut one_shot, plaintext.len() as u64)
            .unwrap();

        // Split the copy into two calls against the same cipher instance and check
        // that the keystream carries across the split exactly as it would in one call.
        let mut cipher = StreamCipher::new(123);
        let mut first = Vec::new();
        let mut reader = Cursor::new(&plaintext);
        cipher.transform_copy(&mut reader, &mut first, 4096).unwrap();
        let mut second = Vec::new();
        cipher
            .transform_copy(&mut reader, &mut second, plaintext.len() as u64 - 4096)
            .unwrap();
        let mut combined = first;
        combined.extend(second);
        assert_eq!(combined, one_shot);
    }
}
