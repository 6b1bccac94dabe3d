//! Tick arithmetic
//!
//! The clock is a free-running 32-bit counter that wraps. Two ticks are
//! compared through their signed difference, which is correct as long as
//! they are less than 2^31 ticks apart.

/// Absolute time in clock ticks
pub type Ticks = u32;

/// Check if `a` happens strictly before `b`
#[inline]
pub fn is_before(a: Ticks, b: Ticks) -> bool {
    (a.wrapping_sub(b) as i32) < 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_ordering() {
        assert!(is_before(1000, 1001));
        assert!(!is_before(1001, 1000));
        assert!(!is_before(1000, 1000));
    }

    #[test]
    fn test_across_wrap() {
        assert!(is_before(u32::MAX - 10, 5));
        assert!(!is_before(5, u32::MAX - 10));
    }

    proptest! {
        #[test]
        fn test_offset_is_after_base(base in any::<u32>(), delta in 1u32..0x8000_0000) {
            let later = base.wrapping_add(delta);
            prop_assert!(is_before(base, later));
            prop_assert!(!is_before(later, base));
        }

        #[test]
        fn test_never_before_itself(t in any::<u32>()) {
            prop_assert!(!is_before(t, t));
        }
    }
}
