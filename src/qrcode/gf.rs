//! GF(2^8) arithmetic with exp/log tables.
//!
//! The field is built over the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
//! (0x11D) with generator α = 2. Tables are computed on first use and are
//! read-only afterwards, so concurrent encoders share them freely.

use once_cell::sync::Lazy;

const PRIMITIVE: u16 = 0x11d;

struct Tables {
    /// α^i for i in 0..510; the upper half repeats the lower so that
    /// `log a + log b` never needs a modulo.
    exp: [u8; 510],
    /// log_α(x) for x in 1..=255. `log[0]` is unused.
    log: [u8; 256],
}

static TABLES: Lazy<Tables> = Lazy::new(|| {
    let mut exp = [0u8; 510];
    let mut log = [0u8; 256];
    let mut x: u16 = 1;
    for i in 0..255 {
        exp[i] = x as u8;
        log[x as usize] = i as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE;
        }
    }
    for i in 255..510 {
        exp[i] = exp[i - 255];
    }
    Tables { exp, log }
});

/// GF(256) field operations.
pub struct Gf256;

impl Gf256 {
    /// α raised to `power`.
    #[inline]
    pub fn exp(power: usize) -> u8 {
        TABLES.exp[power % 255]
    }

    #[inline]
    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let t = &*TABLES;
        t.exp[usize::from(t.log[usize::from(a)]) + usize::from(t.log[usize::from(b)])]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Carry-less multiply with reduction, independent of the tables.
    fn slow_mul(x: u8, y: u8) -> u8 {
        let mut z: u8 = 0;
        for i in (0..8).rev() {
            z = (z << 1) ^ ((z >> 7) * 0x1d);
            z ^= ((y >> i) & 1) * x;
        }
        z
    }

    #[test]
    fn test_exp_known_values() {
        assert_eq!(Gf256::exp(0), 1);
        assert_eq!(Gf256::exp(1), 2);
        assert_eq!(Gf256::exp(8), 29);
        assert_eq!(Gf256::exp(25), 3);
        assert_eq!(Gf256::exp(255), 1);
    }

    #[test]
    fn test_mul_matches_bitwise_multiply() {
        for a in 0..=255u8 {
            for b in [0u8, 1, 2, 3, 0x1d, 0x53, 0x80, 0xca, 0xff] {
                assert_eq!(Gf256::mul(a, b), slow_mul(a, b), "{} * {}", a, b);
            }
        }
    }

    #[test]
    fn test_exp_is_a_permutation() {
        let mut seen = [false; 256];
        for i in 0..255 {
            let v = Gf256::exp(i);
            assert!(!seen[usize::from(v)]);
            seen[usize::from(v)] = true;
        }
        assert!(!seen[0]);
    }
}
