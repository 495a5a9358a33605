use std::io::{self, Cursor, Read, Write};

use bitvec::prelude::*;

/// The complete compressed artifact: the flattened encoding tree (shape bits
/// plus leaf symbols in pre-order) and the encoded message bits.
///
/// The three sequences are the logical package; [`to_bytes`](Self::to_bytes)
/// and [`from_bytes`](Self::from_bytes) give them a concrete byte layout
/// with explicit little-endian counts, since bit sequences carry no
/// terminator of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPackage {
    pub tree_shape: BitVec<u8, Msb0>,
    pub tree_leaves: Vec<char>,
    pub message_bits: BitVec<u8, Msb0>,
}

impl EncodedPackage {
    /// Serializes the package.
    ///
    /// Layout, all counts `u64` little-endian: shape bit count, shape byte
    /// length, shape bytes; leaf symbol count, leaf UTF-8 byte length, leaf
    /// bytes; message bit count, message byte length, message bytes.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();

        write_bits(&mut bytes, &self.tree_shape)?;

        let leaves: String = self.tree_leaves.iter().collect();
        bytes.write_all(&(self.tree_leaves.len() as u64).to_le_bytes())?;
        bytes.write_all(&(leaves.len() as u64).to_le_bytes())?;
        bytes.write_all(leaves.as_bytes())?;

        write_bits(&mut bytes, &self.message_bits)?;

        Ok(bytes)
    }

    /// Parses a package serialized by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(data: &[u8]) -> io::Result<EncodedPackage> {
        let mut cursor = Cursor::new(data);

        let tree_shape = read_bits(&mut cursor)?;

        let leaf_count = read_u64(&mut cursor)? as usize;
        let leaf_byte_len = read_len(&mut cursor)?;
        let mut leaf_bytes = vec![0u8; leaf_byte_len];
        cursor.read_exact(&mut leaf_bytes)?;
        let leaves = String::from_utf8(leaf_bytes)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "leaf symbols are not UTF-8"))?;
        let tree_leaves: Vec<char> = leaves.chars().collect();
        if tree_leaves.len() != leaf_count {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "leaf symbol count disagrees with leaf bytes",
            ));
        }

        let message_bits = read_bits(&mut cursor)?;

        if cursor.position() != data.len() as u64 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "unconsumed bytes after the message section",
            ));
        }

        Ok(EncodedPackage {
            tree_shape,
            tree_leaves,
            message_bits,
        })
    }
}

fn write_bits(bytes: &mut Vec<u8>, bits: &BitVec<u8, Msb0>) -> io::Result<()> {
    bytes.write_all(&(bits.len() as u64).to_le_bytes())?;
    let raw = bits.as_raw_slice();
    bytes.write_all(&(raw.len() as u64).to_le_bytes())?;
    bytes.write_all(raw)?;
    Ok(())
}

fn read_bits(cursor: &mut Cursor<&[u8]>) -> io::Result<BitVec<u8, Msb0>> {
    let bit_count = read_u64(cursor)? as usize;
    let byte_len = read_len(cursor)?;
    if byte_len.checked_mul(8).map_or(true, |max| bit_count > max) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "bit count exceeds stored bytes",
        ));
    }
    let mut raw = vec![0u8; byte_len];
    cursor.read_exact(&mut raw)?;
    let mut bits = BitVec::from_vec(raw);
    bits.truncate(bit_count);
    Ok(bits)
}

/// Reads a length count and bounds it by the bytes actually remaining, so a
/// hostile count cannot drive a huge allocation before `read_exact` fails.
fn read_len(cursor: &mut Cursor<&[u8]>) -> io::Result<usize> {
    let len = read_u64(cursor)?;
    let remaining = cursor.get_ref().len() as u64 - cursor.position();
    if len > remaining {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stated length exceeds remaining bytes",
        ));
    }
    Ok(len as usize)
}

fn read_u64(cursor: &mut Cursor<&[u8]>) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    cursor.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::huffman_codec::{compress, decompress};

    #[test]
    fn bytes_round_trip() {
        let package = compress("STREETTEST").unwrap();
        let bytes = package.to_bytes().unwrap();
        let parsed = EncodedPackage::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, package);
        assert_eq!(decompress(&parsed).unwrap(), "STREETTEST");
    }

    #[test]
    fn bytes_round_trip_with_multibyte_symbols() {
        let package = compress("héllo wörld – ünïcode").unwrap();
        let bytes = package.to_bytes().unwrap();
        let parsed = EncodedPackage::from_bytes(&bytes).unwrap();
        assert_eq!(decompress(&parsed).unwrap(), "héllo wörld – ünïcode");
    }

    #[test]
    fn from_bytes_rejects_truncated_input() {
        let bytes = compress("STREETTEST").unwrap().to_bytes().unwrap();
        for len in [0, 7, bytes.len() / 2, bytes.len() - 1] {
            assert!(EncodedPackage::from_bytes(&bytes[..len]).is_err());
        }
    }

    #[test]
    fn from_bytes_rejects_overstated_byte_length() {
        // Shape section claims u64::MAX payload bytes; the stated length
        // must be rejected against the bytes actually present, without
        // allocating or overflowing.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0u64.to_le_bytes());
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        assert!(EncodedPackage::from_bytes(&bytes).is_err());
    }

    #[test]
    fn from_bytes_rejects_huge_bit_count() {
        // Bit count of u64::MAX against a single stored byte.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.push(0xff);
        assert!(EncodedPackage::from_bytes(&bytes).is_err());
    }

    #[test]
    fn from_bytes_rejects_trailing_bytes() {
        let mut bytes = compress("STREETTEST").unwrap().to_bytes().unwrap();
        bytes.push(0);
        assert!(EncodedPackage::from_bytes(&bytes).is_err());
    }

    #[test]
    fn from_bytes_rejects_overstated_bit_count() {
        // Bit count of 9 against a single stored byte.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&9u64.to_le_bytes());
        bytes.extend_from_slice(&1u64.to_le_bytes());
        bytes.push(0xff);
        assert!(EncodedPackage::from_bytes(&bytes).is_err());
    }
}
