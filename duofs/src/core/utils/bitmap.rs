// SPDX-License-Identifier: MIT

//! Bit manipulation over byte slices used as usage maps.
//!
//! Bit `n` lives in byte `n / 8` at position `n % 8` (LSB first).

pub trait BitmapOps {
    /// Sets or clears a bit. Out-of-bounds bits are ignored.
    fn set_bit(&mut self, bit: usize, value: bool);

    /// Out-of-bounds bits read as `false`.
    fn get_bit(&self, bit: usize) -> bool;

    /// First clear bit at or after `start`, bounded by `limit` bits.
    fn find_first_zero(&self, start: usize, limit: usize) -> Option<usize>;

    fn count_ones(&self) -> usize;
}

impl BitmapOps for [u8] {
    #[inline]
    fn set_bit(&mut self, bit: usize, value: bool) {
        if let Some(byte) = self.get_mut(bit / 8) {
            let mask = 1u8 << (bit % 8);
            if value {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
    }

    #[inline]
    fn get_bit(&self, bit: usize) -> bool {
        self.get(bit / 8)
            .is_some_and(|b| (b & (1 << (bit % 8))) != 0)
    }

    fn find_first_zero(&self, start: usize, limit: usize) -> Option<usize> {
        let limit = limit.min(self.len() * 8);
        let mut bit = start;
        while bit < limit {
            // whole byte in use
            if bit.is_multiple_of(8) && self[bit / 8] == 0xFF {
                bit += 8;
                continue;
            }
            if !self.get_bit(bit) {
                return Some(bit);
            }
            bit += 1;
        }
        None
    }

    fn count_ones(&self) -> usize {
        self.iter().map(|b| b.count_ones() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_bit() {
        let mut bitmap = [0u8; 2];

        bitmap.set_bit(0, true);
        bitmap.set_bit(9, true);
        assert!(bitmap.get_bit(0));
        assert!(bitmap.get_bit(9));
        assert_eq!(bitmap, [0b0000_0001, 0b0000_0010]);

        bitmap.set_bit(0, false);
        assert!(!bitmap.get_bit(0));

        bitmap.set_bit(100, true);
        assert!(!bitmap.get_bit(100));
    }

    #[test]
    fn test_find_first_zero() {
        let bitmap = [0xFFu8, 0b1111_1101, 0x00];
        assert_eq!(bitmap.find_first_zero(0, 24), Some(9));
        assert_eq!(bitmap.find_first_zero(10, 24), Some(16));
        assert_eq!(bitmap.find_first_zero(10, 16), None);

        let full = [0xFFu8; 2];
        assert_eq!(full.find_first_zero(0, 16), None);
        assert_eq!(full.count_ones(), 16);
    }
}
