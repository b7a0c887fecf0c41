use crate::{
    Error, Result,
    blocks::common::{BlockHeader, BlockParse},
};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

#[derive(Debug)]
pub struct DataGroupBlock {
    pub header: BlockHeader, // Common header
    pub next_dg_addr: u64,
    pub first_cg_addr: u64,
    pub data_block_addr: u64,
    pub comment_addr: u64,
    pub record_id_len: u8,
    pub reserved1: String,
}

impl BlockParse<'_> for DataGroupBlock {
    const ID: &'static str = "##DG";
    /// Parse a `DataGroupBlock` from a 64 byte slice.
    ///
    /// # Arguments
    /// * `bytes` - Byte slice beginning at the DG block header.
    ///
    /// # Returns
    /// The populated [`DataGroupBlock`] on success or an [`Error`] if the
    /// slice is too small or malformed.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = Self::parse_header(bytes)?;

        let expected_bytes = 64;
        if bytes.len() < expected_bytes {
            return Err(Error::TooShortBuffer {
                actual: bytes.len(),
                expected: expected_bytes,
                file: file!(),
                line: line!(),
            });
        }

        let record_id_len = bytes[56];
        if !matches!(record_id_len, 0 | 1 | 2 | 4 | 8) {
            return Err(Error::UnsupportedError(format!(
                "unsupported record_id_len {record_id_len}, expected one of 0, 1, 2, 4, 8"
            )));
        }

        Ok(Self {
            header,
            next_dg_addr: u64::from_le_bytes(bytes[24..32].try_into().unwrap()),
            first_cg_addr: u64::from_le_bytes(bytes[32..40].try_into().unwrap()),
            data_block_addr: u64::from_le_bytes(bytes[40..48].try_into().unwrap()),
            comment_addr: u64::from_le_bytes(bytes[48..56].try_into().unwrap()),
            record_id_len,
            reserved1: String::from_utf8_lossy(&bytes[57..64]).to_string(),
        })
    }
}

impl DataGroupBlock {
    /// Serializes the DataGroupBlock to bytes according to MDF 4.1 specification.
    ///
    /// # Structure (64 bytes total):
    /// - BlockHeader (24 bytes): Standard block header with id="##DG"
    /// - next_dg_addr (8 bytes): Link to next data group block
    /// - first_cg_addr (8 bytes): Link to first channel group block
    /// - data_block_addr (8 bytes): Link to the data block
    /// - comment_addr (8 bytes): Link to comment text block
    /// - record_id_len (1 byte): Record ID length
    /// - reserved1 (7 bytes): Reserved space
    ///
    /// # Returns
    /// - `Ok(Vec<u8>)` containing the serialized data group block
    /// - `Err(MdfError)` if serialization fails
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        // Validate the header before serializing
        if self.header.id != "##DG" {
            return Err(Error::BlockSerializationError(format!(
                "DataGroupBlock must have ID '##DG', found '{}'",
                self.header.id
            )));
        }

        if self.header.length != 64 {
            return Err(Error::BlockSerializationError(format!(
                "DataGroupBlock must have length=64, found {}",
                self.header.length
            )));
        }

        // Create a buffer with exact capacity for efficiency
        let mut buffer = Vec::with_capacity(64);

        // 1. Write the block header (24 bytes)
        buffer.extend_from_slice(&self.header.to_bytes()?);

        // 2. Write the link addresses (32 bytes total)
        buffer.extend_from_slice(&self.next_dg_addr.to_le_bytes());
        buffer.extend_from_slice(&self.first_cg_addr.to_le_bytes());
        buffer.extend_from_slice(&self.data_block_addr.to_le_bytes());
        buffer.extend_from_slice(&self.comment_addr.to_le_bytes());

        // 3. Write record ID length (1 byte)
        buffer.push(self.record_id_len);

        // 4. Write reserved space (7 bytes)
        // The reserved field is stored as a String for reading, but for writing
        // we just write 7 bytes of zeros as per spec
        buffer.extend_from_slice(&[0u8; 7]);

        // Verify the buffer is exactly 64 bytes
        if buffer.len() != 64 {
            return Err(Error::BlockSerializationError(format!(
                "DataGroupBlock must be exactly 64 bytes, got {}",
                buffer.len()
            )));
        }

        // Ensure 8-byte alignment (should always be true since 64 is divisible by 8)
        debug_assert_eq!(
            buffer.len() % 8,
            0,
            "DataGroupBlock size is not 8-byte aligned"
        );

        Ok(buffer)
    }
}

impl Default for DataGroupBlock {
    fn default() -> Self {
        let header = BlockHeader {
            id: String::from("##DG"),
            reserved: 0,
            length: 64,
            link_count: 4,
        };

        DataGroupBlock {
            header,
            next_dg_addr: 0,
            first_cg_addr: 0,
            data_block_addr: 0,
            comment_addr: 0,
            record_id_len: 0,
            reserved1: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes() -> Vec<u8> {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(b"##DG");
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&64u64.to_le_bytes());
        buf.extend_from_slice(&4u64.to_le_bytes());
        buf.extend_from_slice(&0u64.to_le_bytes()); // next_dg_addr
        buf.extend_from_slice(&0u64.to_le_bytes()); // first_cg_addr
        buf.extend_from_slice(&0u64.to_le_bytes()); // data_block_addr
        buf.extend_from_slice(&0u64.to_le_bytes()); // comment_addr
        buf
    }

    fn with_record_id_len(len: u8) -> Vec<u8> {
        let mut buf = header_bytes();
        buf.push(len);
        buf.extend_from_slice(&[0u8; 7]);
        buf
    }

    #[test]
    fn accepts_each_valid_record_id_len() {
        for len in [0u8, 1, 2, 4, 8] {
            let bytes = with_record_id_len(len);
            let dg = DataGroupBlock::from_bytes(&bytes).expect("valid record_id_len");
            assert_eq!(dg.record_id_len, len);
        }
    }

    #[test]
    fn rejects_unsupported_record_id_len() {
        for len in [3u8, 5, 6, 7, 9, 255] {
            let bytes = with_record_id_len(len);
            match DataGroupBlock::from_bytes(&bytes) {
                Err(Error::UnsupportedError(_)) => {}
                other => panic!("expected UnsupportedError for len={len}, got {other:?}"),
            }
        }
    }

    #[test]
    fn round_trips_through_to_bytes() {
        let mut dg = DataGroupBlock::default();
        dg.record_id_len = 2;
        dg.next_dg_addr = 128;
        let bytes = dg.to_bytes().unwrap();
        let parsed = DataGroupBlock::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.record_id_len, 2);
        assert_eq!(parsed.next_dg_addr, 128);
    }
}
