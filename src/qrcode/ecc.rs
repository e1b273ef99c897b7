//! Reed–Solomon error correction codewords.

use super::gf::Gf256;
use super::tables::Version;

/// Divisor polynomial for a given number of ECC codewords.
///
/// The generator is the product of `(x - α^i)` for `i` in `0..degree`. Its
/// leading coefficient is always 1 and is not stored; `divisor` holds the
/// remaining coefficients from highest to lowest degree.
pub struct ReedSolomonGenerator {
    divisor: Vec<u8>,
}

impl ReedSolomonGenerator {
    /// Builds the generator polynomial of the given degree.
    ///
    /// # Panics
    ///
    /// Panics if `degree` is outside 1..=255.
    pub fn new(degree: usize) -> Self {
        assert!((1..=255).contains(&degree), "Degree out of range");
        // Start with the monomial x^0 and multiply in one root at a time
        let mut divisor = vec![0u8; degree];
        divisor[degree - 1] = 1;
        for i in 0..degree {
            let root = Gf256::exp(i);
            for j in 0..degree {
                divisor[j] = Gf256::mul(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
            }
        }
        Self { divisor }
    }

    pub fn degree(&self) -> usize {
        self.divisor.len()
    }

    /// Full generator coefficients, highest degree first, leading 1 included.
    pub fn coefficients(&self) -> Vec<u8> {
        let mut coefs = Vec::with_capacity(self.divisor.len() + 1);
        coefs.push(1);
        coefs.extend_from_slice(&self.divisor);
        coefs
    }

    /// Remainder of `data(x) * x^degree` divided by the generator.
    pub fn compute_remainder(&self, data: &[u8]) -> Vec<u8> {
        let mut result = vec![0u8; self.degree()];
        for b in data {
            let factor: u8 = b ^ result[0];
            result.rotate_left(1);
            if let Some(last) = result.last_mut() {
                *last = 0;
            }
            for (x, &y) in result.iter_mut().zip(self.divisor.iter()) {
                *x ^= Gf256::mul(y, factor);
            }
        }
        result
    }
}

/// Returns `data` followed by its ECC codewords for `version` at level L.
///
/// Versions 1–4 at level L use a single block, so no interleaving happens.
pub fn append_ecc(data: &[u8], version: Version) -> Vec<u8> {
    assert_eq!(data.len(), version.data_codewords(), "Illegal argument");
    let rs = ReedSolomonGenerator::new(version.ecc_codewords());
    let mut result = Vec::with_capacity(version.total_codewords());
    result.extend_from_slice(data);
    result.extend(rs.compute_remainder(data));
    debug_assert_eq!(result.len(), version.total_codewords());
    result
}
