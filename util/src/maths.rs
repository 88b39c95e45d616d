//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

/// Clamp a value into the range `[min, max]`.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Linearly spaced values between `start` and `end` inclusive.
///
/// Returns an empty vector for `num == 0` and `[start]` for `num == 1`.
pub fn linspace<T>(start: T, end: T, num: usize) -> Vec<T>
where
    T: Float
{
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let last = T::from(num - 1).unwrap_or_else(T::one);
            (0..num)
                .map(|i| {
                    let i_t = T::from(i).unwrap_or_else(T::zero);
                    lin_map((T::zero(), last), (start, end), i_t)
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(1.5f64, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-0.5f64, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.25f64, 0.0, 1.0), 0.25);
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0f64, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2f64, 4.0, 1), vec![2.0]);
        assert!(linspace(0f64, 1.0, 0).is_empty());

        // End points must be exact so resampled curves keep their end points
        let v = linspace(0f64, 1.0, 7);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[6], 1.0);
    }
}
