//! Known-answer checks for benchmarked routines.
//!
//! Before a routine is timed its output is compared byte by byte with a
//! fixed vector, so a broken build is not benchmarked silently.

use core::fmt;

/// Why an output did not match its vector.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mismatch {
    /// Output and vector differ in length.
    Length { expected: usize, actual: usize },
    /// First differing byte.
    Byte { index: usize, expected: u8, actual: u8 },
}

impl fmt::Display for Mismatch {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match *self {
            Self::Length { expected, actual } => {
                write!(f, "length mismatch (expected {expected} bytes, got {actual})")
            }
            Self::Byte { index, expected, actual } => {
                write!(f, "mismatch at byte {index} (expected {expected:#04x}, got {actual:#04x})")
            }
        }
    }
}

impl core::error::Error for Mismatch {}

/// Compare `actual` against `expected`, reporting the first difference.
pub fn compare(
    actual: &[u8],
    expected: &[u8],
) -> Result<(), Mismatch> {
    if actual.len() != expected.len() {
        return Err(Mismatch::Length {
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    match actual.iter().zip(expected).position(|(a, e)| a != e) {
        Some(index) => Err(Mismatch::Byte {
            index,
            expected: expected[index],
            actual: actual[index],
        }),
        None => Ok(()),
    }
}

/// A labelled expected output.
#[derive(Clone, Copy, Debug)]
pub struct KnownAnswer<'a> {
    /// Name used in report lines.
    pub label: &'static str,
    /// Expected bytes.
    pub expected: &'a [u8],
}

impl<'a> KnownAnswer<'a> {
    pub const fn new(
        label: &'static str,
        expected: &'a [u8],
    ) -> Self {
        Self { label, expected }
    }

    /// Check `actual` against this vector.
    pub fn check(
        &self,
        actual: &[u8],
    ) -> Result<(), Mismatch> {
        compare(actual, self.expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_slices_pass() {
        assert_eq!(compare(&[1, 2, 3], &[1, 2, 3]), Ok(()));
        assert_eq!(compare(&[], &[]), Ok(()));
    }

    #[test]
    fn test_first_difference_reported() {
        assert_eq!(
            compare(&[1, 9, 8], &[1, 2, 3]),
            Err(Mismatch::Byte {
                index: 1,
                expected: 2,
                actual: 9
            })
        );
    }

    #[test]
    fn test_length_checked_first() {
        assert_eq!(
            compare(&[1, 2], &[1, 2, 3]),
            Err(Mismatch::Length {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_display() {
        let err = Mismatch::Byte {
            index: 4,
            expected: 0x54,
            actual: 0x05,
        };
        assert_eq!(err.to_string(), "mismatch at byte 4 (expected 0x54, got 0x05)");

        let err = Mismatch::Length {
            expected: 32,
            actual: 31,
        };
        assert_eq!(err.to_string(), "length mismatch (expected 32 bytes, got 31)");
    }

    #[test]
    fn test_known_answer_check() {
        let kat = KnownAnswer::new("pk0", &[0xde, 0xad]);
        assert!(kat.check(&[0xde, 0xad]).is_ok());
        assert!(kat.check(&[0xde, 0xae]).is_err());
    }
}
