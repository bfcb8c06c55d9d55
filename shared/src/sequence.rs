use thiserror::Error;

/// Errors that can occur during wrapping sequence arithmetic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// Integer overflow occurred during wrapping difference calculation.
    /// This should be mathematically impossible with valid u16 inputs.
    #[error("integer overflow in sequence_diff({a}, {b}) - this should not happen")]
    IntegerOverflow { a: u16, b: u16 },
}

/// Returns whether a wrapping sequence number is greater than another.
/// sequence_greater_than(2,1) will return true
/// sequence_greater_than(1,2) will return false
/// sequence_greater_than(1,1) will return false
pub fn sequence_greater_than(s1: u16, s2: u16) -> bool {
    ((s1 > s2) && (s1 - s2 <= 32768)) || ((s1 < s2) && (s2 - s1 > 32768))
}

/// Returns whether a wrapping sequence number is less than another.
pub fn sequence_less_than(s1: u16, s2: u16) -> bool {
    sequence_greater_than(s2, s1)
}

/// Retrieves the wrapping difference between 2 u16 values (`b - a`).
/// Returns an error if an impossible integer overflow occurs.
pub fn try_sequence_diff(a: u16, b: u16) -> Result<i16, SequenceError> {
    const MAX: i32 = i16::MAX as i32;
    const MIN: i32 = i16::MIN as i32;
    const ADJUST: i32 = (u16::MAX as i32) + 1;

    let a_i32 = i32::from(a);
    let b_i32 = i32::from(b);

    let mut result = b_i32 - a_i32;
    if (MIN..=MAX).contains(&result) {
        Ok(result as i16)
    } else if b_i32 > a_i32 {
        result = b_i32 - (a_i32 + ADJUST);
        if (MIN..=MAX).contains(&result) {
            Ok(result as i16)
        } else {
            Err(SequenceError::IntegerOverflow { a, b })
        }
    } else {
        result = (b_i32 + ADJUST) - a_i32;
        if (MIN..=MAX).contains(&result) {
            Ok(result as i16)
        } else {
            Err(SequenceError::IntegerOverflow { a, b })
        }
    }
}

/// Retrieves the wrapping difference between 2 u16 values (`b - a`).
///
/// # Panics
///
/// Panics on an impossible integer overflow (cannot happen with valid u16
/// inputs).
pub fn sequence_diff(a: u16, b: u16) -> i16 {
    try_sequence_diff(a, b).expect("integer overflow in sequence_diff - this should not happen")
}

#[cfg(test)]
mod compare_tests {
    use super::{sequence_greater_than, sequence_less_than};

    #[test]
    fn greater_is_greater() {
        assert!(sequence_greater_than(2, 1));
    }

    #[test]
    fn greater_is_not_equal() {
        assert!(!sequence_greater_than(2, 2));
    }

    #[test]
    fn greater_wraps_across_zero() {
        assert!(sequence_greater_than(1, u16::MAX));
    }

    #[test]
    fn less_is_less() {
        assert!(sequence_less_than(1, 2));
    }

    #[test]
    fn less_wraps_across_zero() {
        assert!(sequence_less_than(u16::MAX, 0));
    }
}

#[cfg(test)]
mod diff_tests {
    use super::sequence_diff;

    #[test]
    fn simple() {
        assert_eq!(sequence_diff(10, 12), 2);
    }

    #[test]
    fn simple_backwards() {
        assert_eq!(sequence_diff(12, 10), -2);
    }

    #[test]
    fn max_wrap() {
        let a = u16::MAX;
        let b = a.wrapping_add(2);
        assert_eq!(sequence_diff(a, b), 2);
    }

    #[test]
    fn min_wrap() {
        let a: u16 = 0;
        let b = a.wrapping_sub(2);
        assert_eq!(sequence_diff(a, b), -2);
    }

    #[test]
    fn medium_wrap() {
        let diff = u16::MAX / 2;
        let a: u16 = 0;
        let b = a.wrapping_sub(diff);
        assert_eq!(i32::from(sequence_diff(a, b)), -i32::from(diff));
        assert_eq!(i32::from(sequence_diff(b, a)), i32::from(diff));
    }
}
