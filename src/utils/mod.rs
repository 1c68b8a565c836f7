pub mod time;

pub use self::time::*;

/// Returns `n` when it is already a power of two, otherwise the smallest
/// power of two greater than `n`. Zero maps to zero.
pub fn next_power_of_two(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    n.next_power_of_two()
}

/// Returns `f` rounded to `n` decimal places, half away from zero.
pub fn round(f: f64, n: i32) -> f64 {
    let pow = 10f64.powi(n);
    (f * pow).round() / pow
}

/// Returns a uniform `f64` in `[0, 1)` from the thread-local generator.
pub fn random_ratio() -> f64 {
    rand::random::<f64>()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn find_next_power_of_two() {
        let tests = [
            (0usize, 0usize),
            (1, 1),
            (2, 2),
            (3, 4),
            (4, 4),
            (5, 8),
            (10, 16),
            (16, 16),
            (17, 32),
            (100, 128),
        ];
        for (n, expected) in tests {
            assert_eq!(
                next_power_of_two(n),
                expected,
                "next_power_of_two({})",
                n
            );
        }
    }

    #[test]
    fn round_to_decimal_places() {
        let tests = [
            (0.12345, 2, 0.12),
            (0.6789, 3, 0.679),
            (1.234_567_89, 4, 1.2346),
            (3.14159, 0, 3.0),
            (5.678, 1, 5.7),
        ];
        for (f, n, expected) in tests {
            assert_eq!(round(f, n), expected, "round({}, {})", f, n);
        }
    }

    #[test]
    fn random_ratio_stays_in_unit_interval() {
        for _ in 0..1000 {
            let r = random_ratio();
            assert!((0.0..1.0).contains(&r), "out of range: {}", r);
        }
    }
}
