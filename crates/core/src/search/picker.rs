//! Choice of a substitute keyword in demo mode.

use rand::Rng;

/// Picks an index into a non-empty list of recommendations.
pub trait KeywordPicker: Send + Sync {
    /// Return a value in `0..len`. `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

/// Uniform random choice.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl KeywordPicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always picks the same position (wrapped to the list length).
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl KeywordPicker for FixedPicker {
    fn pick(&self, len: usize) -> usize {
        self.0 % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_picker_stays_in_range() {
        let picker = RandomPicker;
        for len in 1..50 {
            assert!(picker.pick(len) < len);
        }
    }

    #[test]
    fn test_fixed_picker_wraps() {
        assert_eq!(FixedPicker(1).pick(3), 1);
        assert_eq!(FixedPicker(5).pick(3), 2);
    }
}
