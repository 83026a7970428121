/// Rounds `value` up to the next multiple of `base`.
///
/// `base` must be a power of two.
///
/// # Examples
///
/// ```rust
/// use rlmm::round_up;
///
/// assert_eq!(round_up!(25, 16), 32);
/// assert_eq!(round_up!(32, 16), 32);
/// assert_eq!(round_up!(0, 16), 0);
/// ```
#[macro_export]
macro_rules! round_up {
  ($value:expr, $base:expr) => {
    ($value + $base - 1) & !($base - 1)
  };
}

/// Rounds `value` down to the previous multiple of `base`.
///
/// `base` must be a power of two.
///
/// # Examples
///
/// ```rust
/// use rlmm::cut_down;
///
/// assert_eq!(cut_down!(250, 16), 240);
/// assert_eq!(cut_down!(256, 16), 256);
/// ```
#[macro_export]
macro_rules! cut_down {
  ($value:expr, $base:expr) => {
    $value & !($base - 1)
  };
}

/// Rounds a requested size up to the block granule, or `None` on overflow.
pub(crate) fn checked_round_up(
  value: usize,
  base: usize,
) -> Option<usize> {
  debug_assert!(base.is_power_of_two());
  Some(value.checked_add(base - 1)? & !(base - 1))
}

#[cfg(test)]
mod tests {
  use super::checked_round_up;

  #[test]
  fn test_round_up() {
    let granule = 16usize;

    let mut roundings = Vec::new();

    for i in 0..10 {
      let sizes = (granule * i + 1)..=(granule * (i + 1));
      roundings.push((sizes, granule * (i + 1)));
    }

    for (sizes, expected) in roundings {
      for size in sizes {
        assert_eq!(expected, round_up!(size, granule));
        assert_eq!(Some(expected), checked_round_up(size, granule));
      }
    }
  }

  #[test]
  fn test_cut_down() {
    assert_eq!(cut_down!(128usize, 16), 128);
    assert_eq!(cut_down!(143usize, 16), 128);
    assert_eq!(cut_down!(15usize, 16), 0);
  }

  #[test]
  fn checked_round_up_rejects_overflow() {
    assert_eq!(checked_round_up(usize::MAX, 16), None);
    assert_eq!(checked_round_up(usize::MAX - 14, 16), None);
    assert_eq!(checked_round_up(0, 16), Some(0));
  }
}
