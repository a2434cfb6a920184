//! Reed-Solomon error correction with error position tracking
//!
//! Syndromes are solved for the error locator (sigma) and error evaluator
//! (omega) with the extended Euclidean algorithm, error locations are found by
//! brute-force root search and magnitudes with Forney's formula.

pub mod gf;
pub mod poly;


pub use gf::GaloisField;
pub use poly::GfPoly;

use crate::error::DecodeError;

/// Reed-Solomon decoder over a shared, read-only field
#[derive(Debug, Clone, Copy)]
pub struct ReedSolomonDecoder<'f> {
    field: &'f GaloisField,
}

impl<'f> ReedSolomonDecoder<'f> {
    pub fn new(field: &'f GaloisField) -> Self {
        Self { field }
    }

    /// Decoder over the QR code field
    pub fn qr_code() -> ReedSolomonDecoder<'static> {
        ReedSolomonDecoder::new(GaloisField::qr_code_field())
    }

    pub fn field(&self) -> &'f GaloisField {
        self.field
    }

    /// Correct `received` in place and return the number of errors corrected.
    pub fn decode(&self, received: &mut [u8], two_s: usize) -> Result<usize, DecodeError> {
        self.decode_with_error_positions(received, two_s)
            .map(|positions| positions.len())
    }

    /// Correct `received` in place and return the corrected positions.
    ///
    /// `two_s` is the number of error-correction codewords at the end of
    /// `received`. Positions are indices into `received`, in the order the
    /// root search found them (not sorted).
    ///
    /// More than `two_s / 2` errors can land within `two_s / 2` of a different
    /// valid codeword. That codeword is returned as a successful correction;
    /// the syndrome check after correcting cannot tell the two cases apart.
    pub fn decode_with_error_positions(
        &self,
        received: &mut [u8],
        two_s: usize,
    ) -> Result<Vec<usize>, DecodeError> {
        if received.len() >= self.field.size() {
            return Err(DecodeError::MalformedStructure(
                "codeword block longer than the field order",
            ));
        }
        if two_s == 0 || two_s >= received.len() {
            return Err(DecodeError::MalformedStructure(
                "invalid number of error-correction codewords",
            ));
        }

        let syndrome = self.syndrome(received, two_s)?;
        if syndrome.is_zero() {
            return Ok(Vec::new());
        }

        let (sigma, omega) =
            self.run_euclidean_algorithm(&self.field.build_monomial(two_s, 1), &syndrome, two_s)?;
        let error_locations = self.find_error_locations(&sigma)?;
        let error_magnitudes = self.find_error_magnitudes(&sigma, &omega, &error_locations)?;

        let mut positions = Vec::with_capacity(error_locations.len());
        for (&location, &magnitude) in error_locations.iter().zip(error_magnitudes.iter()) {
            let position = received.len() as isize - 1 - self.field.log(location)? as isize;
            if position < 0 {
                return Err(DecodeError::BadErrorLocation {
                    position,
                    len: received.len(),
                });
            }
            let position = position as usize;
            received[position] = GaloisField::add_or_subtract(received[position], magnitude);
            positions.push(position);
        }

        // A locator with the right number of roots can still point at the
        // wrong codeword once the error budget is exceeded
        if !self.syndrome(received, two_s)?.is_zero() {
            return Err(DecodeError::CorrectionFailed(
                "syndrome is nonzero after correction",
            ));
        }

        Ok(positions)
    }

    /// Syndrome polynomial S(x), highest degree first
    pub fn syndrome(&self, received: &[u8], two_s: usize) -> Result<GfPoly<'f>, DecodeError> {
        let poly = GfPoly::new(self.field, received)?;
        let mut syndrome_coefficients = vec![0u8; two_s];
        for i in 0..two_s {
            let eval = poly.evaluate_at(self.field.exp(i + self.field.generator_base()));
            syndrome_coefficients[two_s - 1 - i] = eval;
        }
        GfPoly::new(self.field, &syndrome_coefficients)
    }

    /// Extended Euclidean algorithm on `a = x^R` and `b = S(x)`.
    ///
    /// Stops once `deg r < R / 2` and returns `(sigma, omega)` scaled so
    /// that `sigma(0) == 1`.
    pub fn run_euclidean_algorithm(
        &self,
        a: &GfPoly<'f>,
        b: &GfPoly<'f>,
        big_r: usize,
    ) -> Result<(GfPoly<'f>, GfPoly<'f>), DecodeError> {
        let (a, b) = if a.degree() < b.degree() {
            (b, a)
        } else {
            (a, b)
        };

        let mut r_last = a.clone();
        let mut r = b.clone();
        let mut t_last = GfPoly::zero(self.field);
        let mut t = GfPoly::one(self.field);

        while 2 * r.degree() >= big_r {
            let r_last_last = r_last;
            let t_last_last = t_last;
            r_last = r;
            t_last = t;

            if r_last.is_zero() {
                return Err(DecodeError::CorrectionFailed("r_{i-1} was zero"));
            }

            let (q, remainder) = r_last_last.divide(&r_last)?;
            r = remainder;
            t = q.multiply(&t_last).add_or_subtract(&t_last_last);

            if !r.is_zero() && r.degree() >= r_last.degree() {
                return Err(DecodeError::CorrectionFailed(
                    "division algorithm failed to reduce polynomial",
                ));
            }
        }

        let sigma_tilde_at_zero = t.coefficient(0);
        if sigma_tilde_at_zero == 0 {
            return Err(DecodeError::CorrectionFailed("sigma tilde(0) was zero"));
        }

        let inverse = self.field.inverse(sigma_tilde_at_zero)?;
        let sigma = t.multiply_scalar(inverse);
        let omega = r.multiply_scalar(inverse);
        Ok((sigma, omega))
    }

    /// Error locators X_k: inverses of the roots of sigma, in scan order.
    pub fn find_error_locations(&self, error_locator: &GfPoly<'f>) -> Result<Vec<u8>, DecodeError> {
        let num_errors = error_locator.degree();
        if num_errors == 1 {
            return Ok(vec![error_locator.coefficient(1)]);
        }

        let mut result = Vec::with_capacity(num_errors);
        for i in 1..self.field.size() {
            if result.len() >= num_errors {
                break;
            }
            let candidate = i as u8;
            if error_locator.evaluate_at(candidate) == 0 {
                result.push(self.field.inverse(candidate)?);
            }
        }

        if result.len() != num_errors {
            return Err(DecodeError::CorrectionFailed(
                "error locator degree does not match number of roots",
            ));
        }
        Ok(result)
    }

    /// Forney's formula: e_k = X_k^(1-b) * omega(X_k^-1) / sigma'(X_k^-1)
    pub fn find_error_magnitudes(
        &self,
        error_locator: &GfPoly<'f>,
        error_evaluator: &GfPoly<'f>,
        error_locations: &[u8],
    ) -> Result<Vec<u8>, DecodeError> {
        let derivative = error_locator.formal_derivative();
        let generator_base = self.field.generator_base();

        let mut result = Vec::with_capacity(error_locations.len());
        for &location in error_locations {
            let xi_inverse = self.field.inverse(location)?;

            let denominator = derivative.evaluate_at(xi_inverse);
            if denominator == 0 {
                return Err(DecodeError::CorrectionFailed(
                    "error locator derivative vanished at a root",
                ));
            }

            let mut magnitude = self.field.multiply(
                error_evaluator.evaluate_at(xi_inverse),
                self.field.inverse(denominator)?,
            );
            // X_k^(1-b): one factor of X_k, then b factors of X_k^-1
            magnitude = self.field.multiply(magnitude, location);
            for _ in 0..generator_base {
                magnitude = self.field.multiply(magnitude, xi_inverse);
            }
            result.push(magnitude);
        }
        Ok(result)
    }
}
