/// Polynomials with coefficients in GF(256)
use super::gf::GaloisField;
use crate::error::DecodeError;

/// Polynomial over a [`GaloisField`], coefficients stored highest degree first.
///
/// The leading coefficient is nonzero unless the polynomial is zero, which is
/// represented as the single coefficient `[0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GfPoly<'f> {
    field: &'f GaloisField,
    coefficients: Vec<u8>,
}

impl<'f> GfPoly<'f> {
    /// Create a polynomial, stripping leading zero coefficients.
    pub fn new(field: &'f GaloisField, coefficients: &[u8]) -> Result<Self, DecodeError> {
        if coefficients.is_empty() {
            return Err(DecodeError::MalformedStructure("polynomial without coefficients"));
        }
        Ok(Self::from_normalized(field, coefficients.to_vec()))
    }

    /// Takes ownership of `coefficients` and normalizes them; must be non-empty.
    pub(crate) fn from_normalized(field: &'f GaloisField, mut coefficients: Vec<u8>) -> Self {
        let leading_zeros = coefficients.iter().take_while(|&&c| c == 0).count();
        if leading_zeros == coefficients.len() {
            coefficients.clear();
            coefficients.push(0);
        } else if leading_zeros > 0 {
            coefficients.drain(..leading_zeros);
        }
        Self {
            field,
            coefficients,
        }
    }

    pub fn zero(field: &'f GaloisField) -> Self {
        Self {
            field,
            coefficients: vec![0],
        }
    }

    pub fn one(field: &'f GaloisField) -> Self {
        Self {
            field,
            coefficients: vec![1],
        }
    }

    pub fn field(&self) -> &'f GaloisField {
        self.field
    }

    pub fn coefficients(&self) -> &[u8] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients[0] == 0
    }

    /// Coefficient of the x^degree term (0 above the polynomial's degree)
    pub fn coefficient(&self, degree: usize) -> u8 {
        match self.degree().checked_sub(degree) {
            Some(idx) => self.coefficients[idx],
            None => 0,
        }
    }

    /// Evaluate at `a` using Horner's method
    pub fn evaluate_at(&self, a: u8) -> u8 {
        if a == 0 {
            // Constant term; avoids taking log(0)
            return self.coefficient(0);
        }
        if a == 1 {
            return self.coefficients.iter().fold(0, |acc, &c| acc ^ c);
        }
        self.coefficients[1..]
            .iter()
            .fold(self.coefficients[0], |acc, &c| {
                GaloisField::add_or_subtract(self.field.multiply(a, acc), c)
            })
    }

    pub fn add_or_subtract(&self, other: &GfPoly<'f>) -> GfPoly<'f> {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }

        let (smaller, larger) = if self.coefficients.len() > other.coefficients.len() {
            (&other.coefficients, &self.coefficients)
        } else {
            (&self.coefficients, &other.coefficients)
        };
        let length_diff = larger.len() - smaller.len();

        let mut sum = larger.clone();
        for (dst, &src) in sum[length_diff..].iter_mut().zip(smaller.iter()) {
            *dst ^= src;
        }
        GfPoly::from_normalized(self.field, sum)
    }

    pub fn multiply(&self, other: &GfPoly<'f>) -> GfPoly<'f> {
        if self.is_zero() || other.is_zero() {
            return GfPoly::zero(self.field);
        }
        let a = &self.coefficients;
        let b = &other.coefficients;
        let mut product = vec![0u8; a.len() + b.len() - 1];
        for (i, &a_coeff) in a.iter().enumerate() {
            for (j, &b_coeff) in b.iter().enumerate() {
                product[i + j] ^= self.field.multiply(a_coeff, b_coeff);
            }
        }
        GfPoly::from_normalized(self.field, product)
    }

    pub fn multiply_scalar(&self, scalar: u8) -> GfPoly<'f> {
        match scalar {
            0 => GfPoly::zero(self.field),
            1 => self.clone(),
            _ => {
                let product = self
                    .coefficients
                    .iter()
                    .map(|&c| self.field.multiply(c, scalar))
                    .collect();
                GfPoly::from_normalized(self.field, product)
            }
        }
    }

    /// self * coefficient * x^degree
    pub fn multiply_by_monomial(&self, degree: usize, coefficient: u8) -> GfPoly<'f> {
        if coefficient == 0 {
            return GfPoly::zero(self.field);
        }
        let mut product = Vec::with_capacity(self.coefficients.len() + degree);
        product.extend(
            self.coefficients
                .iter()
                .map(|&c| self.field.multiply(c, coefficient)),
        );
        product.resize(self.coefficients.len() + degree, 0);
        GfPoly::from_normalized(self.field, product)
    }

    /// Formal derivative. In characteristic 2 the even-power terms vanish.
    pub fn formal_derivative(&self) -> GfPoly<'f> {
        let degree = self.degree();
        if degree == 0 {
            return GfPoly::zero(self.field);
        }
        // Term k of the result is k * c_(k+1), i.e. c_(k+1) when k+1 is odd
        let derivative = (0..degree)
            .rev()
            .map(|k| {
                if (k + 1) % 2 == 1 {
                    self.coefficient(k + 1)
                } else {
                    0
                }
            })
            .collect();
        GfPoly::from_normalized(self.field, derivative)
    }

    /// Polynomial long division, returning `(quotient, remainder)`.
    pub fn divide(&self, other: &GfPoly<'f>) -> Result<(GfPoly<'f>, GfPoly<'f>), DecodeError> {
        if other.is_zero() {
            return Err(DecodeError::DivisionByZero);
        }

        let mut quotient = GfPoly::zero(self.field);
        let mut remainder = self.clone();

        let denominator_leading_term = other.coefficient(other.degree());
        let inverse_denominator_leading_term = self.field.inverse(denominator_leading_term)?;

        while remainder.degree() >= other.degree() && !remainder.is_zero() {
            let degree_difference = remainder.degree() - other.degree();
            let scale = self.field.multiply(
                remainder.coefficient(remainder.degree()),
                inverse_denominator_leading_term,
            );
            let term = other.multiply_by_monomial(degree_difference, scale);
            let iteration_quotient = self.field.build_monomial(degree_difference, scale);
            quotient = quotient.add_or_subtract(&iteration_quotient);
            remainder = remainder.add_or_subtract(&term);
        }

        Ok((quotient, remainder))
    }
}
