//! A bit reader that supports reading numbers from a bit stream, with a number of bits
//! up to 32.

/// A bit size between 1 and 32.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct BitSize(u8);

impl BitSize {
    /// Create a new `BitSize`. Returns `None` if the number is 0 or bigger than 32.
    pub fn from_u8(value: u8) -> Option<Self> {
        if value == 0 || value > 32 {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Return the number of bits.
    pub fn bits(&self) -> usize {
        self.0 as usize
    }

    /// Return the bit mask.
    pub fn mask(&self) -> u32 {
        ((1_u64 << self.0 as u64) - 1) as u32
    }
}

/// A reader for big-endian, bit-packed unsigned numbers.
pub struct BitReader<'a> {
    data: &'a [u8],
    cur_pos: usize,
}

impl<'a> BitReader<'a> {
    /// Create a new bit reader.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, cur_pos: 0 }
    }

    /// Read the given number of bits from the byte stream.
    pub fn read(&mut self, bit_size: BitSize) -> Option<u32> {
        let byte_pos = self.byte_pos();

        if byte_pos >= self.data.len() {
            return None;
        }

        let item = match bit_size.0 {
            8 => {
                let item = self.data[byte_pos] as u32;
                self.cur_pos += 8;

                item
            }
            _ => {
                let bit_pos = self.bit_pos();
                let end_byte_pos = (bit_pos + bit_size.bits() - 1) / 8;
                let mut read = [0_u8; 8];

                for (i, r) in read.iter_mut().enumerate().take(end_byte_pos + 1) {
                    *r = *self.data.get(byte_pos + i)?;
                }

                let item = (u64::from_be_bytes(read) >> (64 - bit_pos - bit_size.bits())) as u32
                    & bit_size.mask();
                self.cur_pos += bit_size.bits();

                item
            }
        };

        Some(item)
    }

    fn byte_pos(&self) -> usize {
        self.cur_pos / 8
    }

    fn bit_pos(&self) -> usize {
        self.cur_pos % 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_sizes() {
        assert!(BitSize::from_u8(0).is_none());
        assert!(BitSize::from_u8(33).is_none());
        assert_eq!(BitSize::from_u8(32).unwrap().mask(), u32::MAX);
    }

    #[test]
    fn bits_1() {
        let data = [0b10110001];
        let mut reader = BitReader::new(&data);
        let size = BitSize::from_u8(1).unwrap();

        let bits = (0..8)
            .map(|_| reader.read(size).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(bits, vec![1, 0, 1, 1, 0, 0, 0, 1]);
        assert!(reader.read(size).is_none());
    }

    #[test]
    fn bits_4() {
        let data = [0xab, 0xcd];
        let mut reader = BitReader::new(&data);
        let size = BitSize::from_u8(4).unwrap();

        assert_eq!(reader.read(size), Some(0xa));
        assert_eq!(reader.read(size), Some(0xb));
        assert_eq!(reader.read(size), Some(0xc));
        assert_eq!(reader.read(size), Some(0xd));
    }

    #[test]
    fn bits_12() {
        let data = [0x12, 0x34, 0x56];
        let mut reader = BitReader::new(&data);
        let size = BitSize::from_u8(12).unwrap();

        assert_eq!(reader.read(size), Some(0x123));
        assert_eq!(reader.read(size), Some(0x456));
        assert_eq!(reader.read(size), None);
    }

    #[test]
    fn bits_16_24_32() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read(BitSize::from_u8(16).unwrap()), Some(0x0102));
        assert_eq!(reader.read(BitSize::from_u8(24).unwrap()), Some(0x030405));
        assert_eq!(reader.read(BitSize::from_u8(32).unwrap()), Some(0x06070809));
    }

    #[test]
    fn unaligned_32() {
        let data = [0x0f, 0xff, 0xff, 0xff, 0xf0];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read(BitSize::from_u8(4).unwrap()), Some(0));
        assert_eq!(reader.read(BitSize::from_u8(32).unwrap()), Some(u32::MAX));
    }

    #[test]
    fn truncated() {
        let data = [0xff];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read(BitSize::from_u8(16).unwrap()), None);
    }

    #[test]
    fn packed_across_bytes() {
        let data = [0b1011_0110, 0b0100_0000];
        let mut reader = BitReader::new(&data);
        let two = BitSize::from_u8(2).unwrap();
        let twelve = BitSize::from_u8(12).unwrap();

        assert_eq!(reader.read(two), Some(0b10));
        assert_eq!(reader.read(twelve), Some(0b1101_1001_0000));
        assert_eq!(reader.read(two), Some(0));
        assert_eq!(reader.read(two), None);
    }
}
