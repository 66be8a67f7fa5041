//! A reader for Ruby's Marshal format (version 4.8), producing [ValueTree]s.
//!
//! Covers exactly the subset RPG Maker VX Ace's data files use: nil, booleans,
//! fixnums, bignums, floats, symbols (with their link table), strings (with their
//! `I`-wrapped encoding ivars discarded), arrays, hashes, plain objects (`o`), and
//! `_dump`/`_load` user-defined blobs (`u`) such as `Table`. Object back-references
//! (`@`) are resolved against a table built in parse order; a value that referenced
//! itself before being fully read - not something RPG Maker's editor ever emits for
//! static data - would not resolve correctly.
use super::ValueTree;
use crate::error::{Error, Result};

const SUPPORTED_MAJOR: u8 = 4;
const SUPPORTED_MINOR: u8 = 8;

/// Parses a complete Marshal byte stream into one [ValueTree].
pub fn load(data: &[u8]) -> Result<ValueTree> {
    let mut reader = MarshalReader::new(data);
    reader.read_header()?;
    reader.read_value()
}

struct MarshalReader<'a> {
    data: &'a [u8],
    pos: usize,
    symbols: Vec<String>,
    objects: Vec<ValueTree>,
}

impl<'a> MarshalReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            symbols: Vec::new(),
            objects: Vec::new(),
        }
    }

    fn read_header(&mut self) -> Result<()> {
        let major = self.read_u8()?;
        let minor = self.read_u8()?;
        if major != SUPPORTED_MAJOR || minor != SUPPORTED_MINOR {
            return Err(Error::UnexpectedShape {
                context: "marshal header".to_string(),
                detail: format!("unsupported marshal version {major}.{minor}"),
            });
        }
        Ok(())
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn require(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            Err(Error::TruncatedInput {
                expected: n,
                found: self.remaining(),
            })
        } else {
            Ok(())
        }
    }

    fn read_u8(&mut self) -> Result<u8> {
        self.require(1)?;
        let b = self.data[self.pos];
        self.pos += 1;
        Ok(b)
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.require(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Reads Ruby Marshal's variable-length integer encoding.
    fn read_long(&mut self) -> Result<i64> {
        let c = self.read_u8()? as i8;
        Ok(match c {
            0 => 0,
            4..=127 => (c as i64) - 5,
            -128..=-4 => (c as i64) + 5,
            c if c > 0 => {
                let n = c as usize;
                let mut result: i64 = 0;
                for i in 0..n {
                    result |= (self.read_u8()? as i64) << (8 * i);
                }
                result
            }
            c => {
                let n = (-(c as i32)) as usize;
                let mut magnitude: i64 = 0;
                for i in 0..n {
                    magnitude |= (self.read_u8()? as i64) << (8 * i);
                }
                magnitude - (1i64 << (8 * n))
            }
        })
    }

    fn read_symbol(&mut self) -> Result<String> {
        match self.read_u8()? {
            b':' => {
                let len = self.read_long()? as usize;
                let bytes = self.read_bytes(len)?;
                let s = String::from_utf8_lossy(bytes).into_owned();
                self.symbols.push(s.clone());
                Ok(s)
            }
            b';' => {
                let idx = self.read_long()? as usize;
                self.symbols.get(idx).cloned().ok_or_else(|| Error::UnexpectedShape {
                    context: "symbol link".to_string(),
                    detail: format!("symbol index {idx} out of range"),
                })
            }
            other => Err(Error::UnexpectedShape {
                context: "symbol".to_string(),
                detail: format!("expected ':' or ';', found {:?}", other as char),
            }),
        }
    }

    fn read_value(&mut self) -> Result<ValueTree> {
        let tag = self.read_u8()?;
        match tag {
            b'0' => Ok(ValueTree::Nil),
            b'T' => Ok(ValueTree::Boolean(true)),
            b'F' => Ok(ValueTree::Boolean(false)),
            b'i' => Ok(ValueTree::Integer(self.read_long()?)),
            b'l' => self.read_bignum(),
            b'f' => self.read_float(),
            b':' | b';' => {
                // Rewind so read_symbol can re-read its own tag byte.
                self.pos -= 1;
                Ok(ValueTree::Symbol(self.read_symbol()?))
            }
            b'"' => {
                let len = self.read_long()? as usize;
                let bytes = self.read_bytes(len)?.to_vec();
                let value = ValueTree::ByteString(bytes);
                self.objects.push(value.clone());
                Ok(value)
            }
            b'[' => {
                let len = self.read_long()? as usize;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.read_value()?);
                }
                let value = ValueTree::Array(items);
                self.objects.push(value.clone());
                Ok(value)
            }
            b'{' => {
                let len = self.read_long()? as usize;
                let mut pairs = Vec::with_capacity(len);
                for _ in 0..len {
                    let k = self.read_value()?;
                    let v = self.read_value()?;
                    pairs.push((k, v));
                }
                let value = ValueTree::Mapping(pairs);
                self.objects.push(value.clone());
                Ok(value)
            }
            b'I' => {
                let inner = self.read_value()?;
                let ivar_count = self.read_long()?;
                for _ in 0..ivar_count {
                    self.read_symbol()?;
                    self.read_value()?;
                }
                Ok(inner)
            }
            b'C' => {
                // user-subclassed builtin: discard the subclass name, keep the value.
                self.read_symbol()?;
                self.read_value()
            }
            b'e' => {
                // module-extended object: discard the module name, keep the value.
                self.read_symbol()?;
                self.read_value()
            }
            b'o' => {
                let class = self.read_symbol()?;
                let ivar_count = self.read_long()?;
                let mut attrs = Vec::with_capacity(ivar_count as usize);
                for _ in 0..ivar_count {
                    let key = self.read_symbol()?;
                    let value = self.read_value()?;
                    attrs.push((strip_ivar_sigil(&key), value));
                }
                let value = ValueTree::Object { class, attrs };
                self.objects.push(value.clone());
                Ok(value)
            }
            b'u' => {
                let class = self.read_symbol()?;
                let len = self.read_long()? as usize;
                let bytes = self.read_bytes(len)?.to_vec();
                let value = ValueTree::UserDefined { class, bytes };
                self.objects.push(value.clone());
                Ok(value)
            }
            b'@' => {
                let idx = self.read_long()? as usize;
                self.objects.get(idx).cloned().ok_or_else(|| Error::UnexpectedShape {
                    context: "object link".to_string(),
                    detail: format!("object index {idx} out of range"),
                })
            }
            other => Err(Error::UnexpectedShape {
                context: "marshal value".to_string(),
                detail: format!("unsupported tag byte {:?}", other as char),
            }),
        }
    }

    fn read_bignum(&mut self) -> Result<ValueTree> {
        let sign = self.read_u8()?;
        let size = self.read_long()? as usize;
        let limbs = self.read_bytes(size * 2)?;
        let mut magnitude: i128 = 0;
        for (i, chunk) in limbs.chunks(2).enumerate() {
            let limb = u16::from_le_bytes([chunk[0], *chunk.get(1).unwrap_or(&0)]);
            magnitude |= (limb as i128) << (16 * i);
        }
        if sign == b'-' {
            magnitude = -magnitude;
        }
        Ok(ValueTree::Integer(magnitude as i64))
    }

    fn read_float(&mut self) -> Result<ValueTree> {
        let len = self.read_long()? as usize;
        let bytes = self.read_bytes(len)?;
        let s = std::str::from_utf8(bytes).map_err(|_| Error::UnexpectedShape {
            context: "float".to_string(),
            detail: "non-utf8 float literal".to_string(),
        })?;
        let value: f64 = match s {
            "inf" => f64::INFINITY,
            "-inf" => f64::NEG_INFINITY,
            "nan" => f64::NAN,
            s => s.parse().map_err(|_| Error::UnexpectedShape {
                context: "float".to_string(),
                detail: format!("could not parse float literal {s:?}"),
            })?,
        };
        Ok(ValueTree::Float(value))
    }
}

fn strip_ivar_sigil(name: &str) -> String {
    name.strip_prefix('@').unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marshal_bytes(body: &[u8]) -> Vec<u8> {
        let mut v = vec![4, 8];
        v.extend_from_slice(body);
        v
    }

    #[test]
    fn reads_nil_true_false() {
        assert_eq!(load(&marshal_bytes(b"0")).unwrap(), ValueTree::Nil);
        assert_eq!(load(&marshal_bytes(b"T")).unwrap(), ValueTree::Boolean(true));
        assert_eq!(load(&marshal_bytes(b"F")).unwrap(), ValueTree::Boolean(false));
    }

    #[test]
    fn reads_small_positive_and_negative_fixnums() {
        // Ruby encodes 0 as 0x00, 5 as 0x0a (5+5), -5 as 0xf6 ((-5)-5 as i8 wraps to 0xf6).
        assert_eq!(load(&marshal_bytes(&[b'i', 0x00])).unwrap(), ValueTree::Integer(0));
        assert_eq!(load(&marshal_bytes(&[b'i', 0x0a])).unwrap(), ValueTree::Integer(5));
        assert_eq!(load(&marshal_bytes(&[b'i', 0xf6])).unwrap(), ValueTree::Integer(-5));
    }

    #[test]
    fn reads_multi_byte_fixnum() {
        // 1000 encodes as c=2 (2 bytes follow), little-endian 0xE8 0x03.
        assert_eq!(
            load(&marshal_bytes(&[b'i', 2, 0xE8, 0x03])).unwrap(),
            ValueTree::Integer(1000)
        );
    }

    #[test]
    fn reads_string_and_symlink() {
        let mut body = vec![b'['];
        body.push(2 + 5); // array length 2, fixnum-encoded
        body.push(b'"');
        body.push(5 + 5); // string length 5
        body.extend_from_slice(b"hello");
        body.push(b'"');
        body.push(5 + 5);
        body.extend_from_slice(b"hello");
        let tree = load(&marshal_bytes(&body)).unwrap();
        match tree {
            ValueTree::Array(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].as_str_lossy().unwrap(), "hello");
                assert_eq!(items[1].as_str_lossy().unwrap(), "hello");
            }
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn reads_plain_object_with_ivars() {
        let mut body = vec![b'o'];
        body.push(b':');
        body.push(10 + 5); // "RPG::Actor" length 10
        body.extend_from_slice(b"RPG::Actor");
        body.push(1 + 5); // one ivar
        body.push(b':');
        body.push(3 + 5); // "@id"
        body.extend_from_slice(b"@id");
        body.push(b'i');
        body.push(7 + 5);
        let tree = load(&marshal_bytes(&body)).unwrap();
        match tree {
            ValueTree::Object { class, attrs } => {
                assert_eq!(class, "RPG::Actor");
                assert_eq!(attrs, vec![("id".to_string(), ValueTree::Integer(7))]);
            }
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn reads_user_defined_table_blob() {
        let mut body = vec![b'u'];
        body.push(b':');
        body.push(5 + 5);
        body.extend_from_slice(b"Table");
        let payload = vec![0u8; 0x14 + 4];
        body.push((payload.len() as i64 + 5) as u8);
        body.extend_from_slice(&payload);
        let tree = load(&marshal_bytes(&body)).unwrap();
        match tree {
            ValueTree::UserDefined { class, bytes } => {
                assert_eq!(class, "Table");
                assert_eq!(bytes.len(), 0x14 + 4);
            }
            _ => panic!("expected user-defined blob"),
        }
    }
}
