//! Script numbers.
//!
//! Numbers on the stack are little-endian sign-magnitude byte strings: the
//! high bit of the last byte is the sign. Values are held as big integers so
//! intermediate results never wrap. Only decoding is bounded, by
//! `Config::max_script_number_length`; a result that grows past the bound
//! is caught the next time it is read as an operand.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

use super::error::{InterpreterError, InterpreterErrorCode};

/// An integer operand of the script machine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ScriptNumber(BigInt);

impl ScriptNumber {
    /// Decode a stack element.
    ///
    /// Fails with `NumberTooBig` when `bytes` is longer than `max_len`, and
    /// with `MinimalData` when `require_minimal` is set and the encoding
    /// carries a redundant high byte.
    pub fn decode(
        bytes: &[u8],
        max_len: usize,
        require_minimal: bool,
    ) -> Result<Self, InterpreterError> {
        if bytes.len() > max_len {
            return Err(InterpreterError::new(
                InterpreterErrorCode::NumberTooBig,
                format!("{}-byte number exceeds the limit of {}", bytes.len(), max_len),
            ));
        }
        if require_minimal {
            check_minimal_data_encoding(bytes)?;
        }

        let (last, rest) = match bytes.split_last() {
            Some(split) => split,
            None => return Ok(ScriptNumber::default()),
        };
        let mut magnitude = rest.to_vec();
        magnitude.push(last & 0x7f);
        let sign = if last & 0x80 != 0 { Sign::Minus } else { Sign::Plus };
        Ok(ScriptNumber(BigInt::from_bytes_le(sign, &magnitude)))
    }

    /// Encode the number for the stack. Zero is the empty string.
    pub fn encode(&self) -> Vec<u8> {
        if self.0.is_zero() {
            return Vec::new();
        }
        let (sign, mut out) = self.0.to_bytes_le();
        let sign_bit = if sign == Sign::Minus { 0x80 } else { 0x00 };
        match out.last_mut() {
            Some(top) if *top & 0x80 == 0 => *top |= sign_bit,
            _ => out.push(sign_bit),
        }
        out
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn abs(&self) -> ScriptNumber {
        ScriptNumber(self.0.abs())
    }

    /// Quotient truncated toward zero, or `None` for a zero divisor.
    pub fn checked_div(&self, rhs: &ScriptNumber) -> Option<ScriptNumber> {
        (!rhs.is_zero()).then(|| ScriptNumber(self.0.div_rem(&rhs.0).0))
    }

    /// Remainder with the sign of the dividend, or `None` for a zero divisor.
    pub fn checked_rem(&self, rhs: &ScriptNumber) -> Option<ScriptNumber> {
        (!rhs.is_zero()).then(|| ScriptNumber(self.0.div_rem(&rhs.0).1))
    }

    pub fn shift_left(&self, bits: usize) -> ScriptNumber {
        ScriptNumber(&self.0 << bits)
    }

    /// Arithmetic shift; negative values round toward negative infinity.
    pub fn shift_right(&self, bits: usize) -> ScriptNumber {
        ScriptNumber(&self.0 >> bits)
    }

    /// The value as an `i32`, saturating at the type's bounds.
    pub fn clamp_i32(&self) -> i32 {
        self.0.to_i32().unwrap_or(match self.0.sign() {
            Sign::Minus => i32::MIN,
            _ => i32::MAX,
        })
    }

    /// The value as an `i64`, saturating at the type's bounds.
    pub fn clamp_i64(&self) -> i64 {
        self.0.to_i64().unwrap_or(match self.0.sign() {
            Sign::Minus => i64::MIN,
            _ => i64::MAX,
        })
    }

    /// The value as an amount or timestamp, if it is one.
    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }
}

impl From<i64> for ScriptNumber {
    fn from(v: i64) -> Self {
        ScriptNumber(BigInt::from(v))
    }
}

impl From<u64> for ScriptNumber {
    fn from(v: u64) -> Self {
        ScriptNumber(BigInt::from(v))
    }
}

impl From<usize> for ScriptNumber {
    fn from(v: usize) -> Self {
        ScriptNumber(BigInt::from(v))
    }
}

impl From<bool> for ScriptNumber {
    fn from(v: bool) -> Self {
        ScriptNumber(BigInt::from(u8::from(v)))
    }
}

impl Add for &ScriptNumber {
    type Output = ScriptNumber;

    fn add(self, rhs: &ScriptNumber) -> ScriptNumber {
        ScriptNumber(&self.0 + &rhs.0)
    }
}

impl Sub for &ScriptNumber {
    type Output = ScriptNumber;

    fn sub(self, rhs: &ScriptNumber) -> ScriptNumber {
        ScriptNumber(&self.0 - &rhs.0)
    }
}

impl Mul for &ScriptNumber {
    type Output = ScriptNumber;

    fn mul(self, rhs: &ScriptNumber) -> ScriptNumber {
        ScriptNumber(&self.0 * &rhs.0)
    }
}

impl Neg for ScriptNumber {
    type Output = ScriptNumber;

    fn neg(self) -> ScriptNumber {
        ScriptNumber(-self.0)
    }
}

impl PartialEq<i64> for ScriptNumber {
    fn eq(&self, other: &i64) -> bool {
        self.0 == BigInt::from(*other)
    }
}

impl PartialOrd<i64> for ScriptNumber {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        self.0.partial_cmp(&BigInt::from(*other))
    }
}

impl fmt::Display for ScriptNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reject a number encoding whose last byte adds nothing but a sign.
///
/// The empty string is minimal. `0x00` and `0x80` alone are not, and neither
/// is a trailing `0x00`/`0x80` unless the byte before it has its high bit set.
pub fn check_minimal_data_encoding(v: &[u8]) -> Result<(), InterpreterError> {
    let redundant = match v {
        [] => false,
        [only] => only & 0x7f == 0,
        [.., prev, last] => last & 0x7f == 0 && prev & 0x80 == 0,
    };
    if redundant {
        return Err(InterpreterError::new(
            InterpreterErrorCode::MinimalData,
            format!("number {} is not minimally encoded", hex::encode(v)),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: i64) -> ScriptNumber {
        ScriptNumber::from(v)
    }

    #[test]
    fn test_encode() {
        let cases: &[(i64, &str)] = &[
            (0, ""),
            (1, "01"),
            (-1, "81"),
            (127, "7f"),
            (-127, "ff"),
            (128, "8000"),
            (-128, "8080"),
            (255, "ff00"),
            (256, "0001"),
            (-256, "0081"),
            (32768, "008000"),
            (-32768, "008080"),
            (2147483647, "ffffff7f"),
            (-2147483648, "0000008080"),
            (4294967296, "0000000001"),
            (i64::MAX, "ffffffffffffff7f"),
            (-i64::MAX, "ffffffffffffffff"),
        ];
        for (v, want) in cases {
            assert_eq!(hex::encode(num(*v).encode()), *want, "encode({})", v);
        }
    }

    #[test]
    fn test_decode() {
        let cases: &[(&str, usize, bool, Option<i64>)] = &[
            ("", 4, true, Some(0)),
            ("01", 4, true, Some(1)),
            ("81", 4, true, Some(-1)),
            ("8000", 4, true, Some(128)),
            ("ffffff7f", 4, true, Some(2147483647)),
            ("ffffffff7f", 5, true, Some(549755813887)),
            // Too long for the limit.
            ("0000008000", 4, true, None),
            // Negative zero and padding.
            ("80", 4, true, None),
            ("00", 4, true, None),
            ("0100", 4, true, None),
            ("0100", 4, false, Some(1)),
            ("80", 4, false, Some(0)),
        ];
        for (h, max_len, minimal, want) in cases {
            let bytes = hex::decode(h).unwrap();
            let got = ScriptNumber::decode(&bytes, *max_len, *minimal).ok();
            assert_eq!(got.map(|n| n.clamp_i64()), *want, "decode({})", h);
        }
    }

    #[test]
    fn test_amount_sized_numbers() {
        let max = ScriptNumber::from(u64::MAX);
        let bytes = max.encode();
        assert_eq!(bytes.len(), 9);
        let back = ScriptNumber::decode(&bytes, 9, true).unwrap();
        assert_eq!(back.to_u64(), Some(u64::MAX));
        assert_eq!(
            ScriptNumber::decode(&bytes, 8, true).unwrap_err().code,
            InterpreterErrorCode::NumberTooBig
        );
        assert_eq!(num(-1).to_u64(), None);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(num(-5).clamp_i32(), -5);
        assert_eq!(num(1 << 40).clamp_i32(), i32::MAX);
        assert_eq!(num(-(1 << 40)).clamp_i32(), i32::MIN);
        assert_eq!(ScriptNumber::from(u64::MAX).clamp_i64(), i64::MAX);
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(&num(i64::MAX) + &num(1), ScriptNumber::from(1u64 << 63));
        assert_eq!(&num(3) - &num(5), num(-2));
        assert_eq!(&num(-4) * &num(6), num(-24));
        assert_eq!(-num(7), num(-7));
        assert_eq!(num(-7).abs(), num(7));
        assert!(num(-1) < num(0));
        assert!(num(2) > 1i64);
    }

    #[test]
    fn test_division_truncates_toward_zero() {
        assert_eq!(num(-7).checked_div(&num(2)), Some(num(-3)));
        assert_eq!(num(-7).checked_rem(&num(2)), Some(num(-1)));
        assert_eq!(num(7).checked_rem(&num(-2)), Some(num(1)));
        assert_eq!(num(1).checked_div(&num(0)), None);
        assert_eq!(num(1).checked_rem(&num(0)), None);
    }

    #[test]
    fn test_shifts() {
        assert_eq!(num(3).shift_left(4), num(48));
        assert_eq!(num(-3).shift_left(1), num(-6));
        assert_eq!(num(48).shift_right(4), num(3));
        assert_eq!(num(-5).shift_right(1), num(-3));
        assert_eq!(num(-1).shift_right(10), num(-1));
    }

    #[test]
    fn test_from_bool() {
        assert_eq!(ScriptNumber::from(true).encode(), vec![1]);
        assert!(ScriptNumber::from(false).encode().is_empty());
    }
}
