/// GF(256) arithmetic using log/exp tables
use std::sync::OnceLock;

use super::poly::GfPoly;
use crate::error::DecodeError;

/// Number of elements in the field
pub const FIELD_SIZE: usize = 256;

/// Order of the multiplicative group
const ORDER: usize = FIELD_SIZE - 1;

/// A Galois field GF(2^8) built from a primitive polynomial.
///
/// `generator_base` is the exponent of the first root of the code's
/// generator polynomial (0 for QR codes, 1 for Data Matrix).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaloisField {
    exp_table: [u8; FIELD_SIZE],
    log_table: [u8; FIELD_SIZE],
    primitive: u16,
    generator_base: usize,
}

static QR_CODE_FIELD_256: OnceLock<GaloisField> = OnceLock::new();
static DATA_MATRIX_FIELD_256: OnceLock<GaloisField> = OnceLock::new();

impl GaloisField {
    /// Build the exp/log tables for `primitive` (x^8 term included, e.g. 0x011D).
    ///
    /// Returns `None` if the polynomial is not of degree 8 or is not primitive.
    pub fn new(primitive: u16, generator_base: usize) -> Option<Self> {
        if !(0x100..0x200).contains(&primitive) {
            return None;
        }

        let mut exp_table = [0u8; FIELD_SIZE];
        let mut log_table = [0u8; FIELD_SIZE];
        let mut seen = [false; FIELD_SIZE];

        let mut x: u16 = 1;
        for (i, slot) in exp_table.iter_mut().enumerate().take(ORDER) {
            // A repeated element before 255 steps means alpha is not a generator
            if seen[x as usize] {
                return None;
            }
            seen[x as usize] = true;
            *slot = x as u8;
            log_table[x as usize] = i as u8;
            x <<= 1;
            if x as usize >= FIELD_SIZE {
                x ^= primitive;
            }
        }
        exp_table[ORDER] = exp_table[0];

        Some(Self {
            exp_table,
            log_table,
            primitive,
            generator_base,
        })
    }

    /// The QR code field: x^8 + x^4 + x^3 + x^2 + 1, generator base 0.
    pub fn qr_code_field() -> &'static GaloisField {
        QR_CODE_FIELD_256.get_or_init(|| Self::build_known(0x011D, 0))
    }

    /// The Data Matrix / Aztec 8-bit field: x^8 + x^5 + x^3 + x^2 + 1, generator base 1.
    pub fn data_matrix_field() -> &'static GaloisField {
        DATA_MATRIX_FIELD_256.get_or_init(|| Self::build_known(0x012D, 1))
    }

    fn build_known(primitive: u16, generator_base: usize) -> GaloisField {
        match Self::new(primitive, generator_base) {
            Some(field) => field,
            None => unreachable!("0x{:03X} is a primitive polynomial", primitive),
        }
    }

    pub fn size(&self) -> usize {
        FIELD_SIZE
    }

    pub fn primitive(&self) -> u16 {
        self.primitive
    }

    pub fn generator_base(&self) -> usize {
        self.generator_base
    }

    /// alpha^a, periodic in `a` with period 255
    pub fn exp(&self, a: usize) -> u8 {
        self.exp_table[a % ORDER]
    }

    /// Discrete logarithm of a nonzero element
    pub fn log(&self, a: u8) -> Result<usize, DecodeError> {
        if a == 0 {
            return Err(DecodeError::DivisionByZero);
        }
        Ok(self.log_table[a as usize] as usize)
    }

    pub fn inverse(&self, a: u8) -> Result<u8, DecodeError> {
        let log_a = self.log(a)?;
        Ok(self.exp_table[ORDER - log_a])
    }

    pub fn multiply(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log_a = self.log_table[a as usize] as usize;
        let log_b = self.log_table[b as usize] as usize;
        self.exp_table[(log_a + log_b) % ORDER]
    }

    /// Addition and subtraction are both XOR in characteristic 2.
    pub fn add_or_subtract(a: u8, b: u8) -> u8 {
        a ^ b
    }

    /// coefficient * x^degree
    pub fn build_monomial(&self, degree: usize, coefficient: u8) -> GfPoly<'_> {
        if coefficient == 0 {
            return GfPoly::zero(self);
        }
        let mut coefficients = vec![0u8; degree + 1];
        coefficients[0] = coefficient;
        GfPoly::from_normalized(self, coefficients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exp_log_roundtrip() {
        let field = GaloisField::qr_code_field();
        for a in 1..=255u8 {
            let log_a = field.log(a).unwrap();
            assert_eq!(field.exp(log_a), a);
        }
        assert_eq!(field.log(0), Err(DecodeError::DivisionByZero));
    }

    #[test]
    fn test_known_table_values() {
        // First wrap-around of x^8 + x^4 + x^3 + x^2 + 1
        let field = GaloisField::qr_code_field();
        assert_eq!(field.exp(0), 1);
        assert_eq!(field.exp(7), 128);
        assert_eq!(field.exp(8), 29);
        assert_eq!(field.exp(25), 3);
        assert_eq!(field.exp(255), 1);
        assert_eq!(field.exp(256), 2);
    }

    #[test]
    fn test_multiply_and_inverse() {
        let field = GaloisField::qr_code_field();
        assert_eq!(field.multiply(0, 5), 0);
        assert_eq!(field.multiply(5, 0), 0);
        assert_eq!(field.multiply(1, 77), 77);
        for a in 1..=255u8 {
            let inv = field.inverse(a).unwrap();
            assert_eq!(field.multiply(a, inv), 1, "a = {}", a);
        }
        assert_eq!(field.inverse(0), Err(DecodeError::DivisionByZero));
    }

    #[test]
    fn test_multiply_is_commutative_and_distributive() {
        let field = GaloisField::data_matrix_field();
        let samples = [1u8, 2, 3, 29, 87, 128, 200, 255];
        for &a in &samples {
            for &b in &samples {
                assert_eq!(field.multiply(a, b), field.multiply(b, a));
                for &c in &samples {
                    let lhs = field.multiply(a, GaloisField::add_or_subtract(b, c));
                    let rhs = field.multiply(a, b) ^ field.multiply(a, c);
                    assert_eq!(lhs, rhs);
                }
            }
        }
    }

    #[test]
    fn test_rejects_non_primitive_polynomial() {
        // x^8 + 1 is reducible
        assert!(GaloisField::new(0x101, 0).is_none());
        // Not degree 8
        assert!(GaloisField::new(0x1D, 0).is_none());
        assert!(GaloisField::new(0x011D, 0).is_some());
    }

    #[test]
    fn test_build_monomial() {
        let field = GaloisField::qr_code_field();
        let mono = field.build_monomial(3, 7);
        assert_eq!(mono.degree(), 3);
        assert_eq!(mono.coefficients(), &[7, 0, 0, 0]);
        assert!(field.build_monomial(5, 0).is_zero());
    }
}
