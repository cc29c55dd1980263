//! Conversion between arbitrary precision integers and the sign and magnitude representation used by the small and
//! large bignum tags. The magnitude is stored least significant byte first.

use malachite::base::num::conversion::traits::PowerOf2Digits;
use malachite::{Integer, Natural};

/// Splits `value` into its sign and its magnitude in little endian byte order. Zero has an empty magnitude.
pub fn to_le_magnitude(value: &Integer) -> (bool, Vec<u8>) {
    let negative = *value < Integer::from(0);
    (negative, PowerOf2Digits::<u8>::to_power_of_2_digits_asc(value.unsigned_abs_ref(), 8))
}

/// Builds an integer from its sign and little endian magnitude
pub fn from_le_magnitude(negative: bool, bytes: &[u8]) -> Integer {
    // 8 bit digits never exceed the base
    let magnitude = <Natural as PowerOf2Digits<u8>>::from_power_of_2_digits_asc(8, bytes.iter().copied())
        .map(Integer::from)
        .unwrap_or_default();
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::{from_le_magnitude, to_le_magnitude};
    use malachite::Integer;
    use std::time::{Duration, Instant};

    #[test]
    fn magnitude_is_little_endian() {
        assert_eq!((false, vec![0, 232, 118, 72, 23]), to_le_magnitude(&Integer::from(100_000_000_000i64)));
        assert_eq!((true, vec![0, 232, 118, 72, 23]), to_le_magnitude(&Integer::from(-100_000_000_000i64)));
        assert_eq!((false, Vec::new()), to_le_magnitude(&Integer::from(0)));
    }

    #[test]
    fn roundtrip() {
        for value in [i64::MIN, -1 << 40, -1, 0, 1, 1 << 40, i64::MAX] {
            let value = Integer::from(value);
            let (negative, bytes) = to_le_magnitude(&value);
            assert_eq!(value, from_le_magnitude(negative, &bytes));
        }
        let huge = Integer::from(u128::MAX) * Integer::from(u128::MAX);
        let (negative, bytes) = to_le_magnitude(&huge);
        assert_eq!(32, bytes.len());
        assert_eq!(huge, from_le_magnitude(negative, &bytes));
    }

    #[test]
    fn megabyte_magnitude() {
        let started = Instant::now();
        let bytes = vec![0xffu8; 1 << 20];
        let value = from_le_magnitude(true, &bytes);
        assert_eq!((true, bytes), to_le_magnitude(&value));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

}
