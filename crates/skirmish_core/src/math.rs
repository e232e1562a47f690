//! Fixed-point math utilities for deterministic simulation.
//!
//! Vitals are tracked as [`Shifted`] values (integers scaled by 256) so that
//! fractional regeneration accumulates exactly over thousands of frames.
//! Movement speeds use the wider [`Fixed`] type. Positions stay plain integers.

use fixed::types::{I24F8, I32F32};

/// Fixed-point number type for speeds and movement math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Fixed-point number type for health, shields, energy, armor and damage.
///
/// One whole point is `1 << 8` raw units; per-frame regeneration rates are
/// expressed in raw units.
pub type Shifted = I24F8;

/// Builds a [`Shifted`] value from raw (already scaled) bits.
#[must_use]
pub const fn raw(bits: i32) -> Shifted {
    Shifted::from_bits(bits)
}

/// Builds a [`Shifted`] value from whole points.
#[must_use]
pub fn points(value: i32) -> Shifted {
    Shifted::from_num(value)
}

/// Serde support for [`Fixed`] numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

/// Serde support for [`Shifted`] numbers, stored as raw i32 bits.
pub mod shifted_serde {
    use super::Shifted;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a shifted value as its raw bit representation.
    pub fn serialize<S>(value: &Shifted, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a shifted value from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Shifted, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i32::deserialize(deserializer)?;
        Ok(Shifted::from_bits(bits))
    }
}

/// Squared euclidean distance between two integer positions.
#[must_use]
pub const fn distance_squared(ax: i32, ay: i32, bx: i32, by: i32) -> i32 {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy
}

/// Distance for a squared distance, as a fixed-point number.
#[must_use]
pub fn distance_from_squared(distance_squared: i32) -> Fixed {
    fixed_sqrt(Fixed::from_num(distance_squared))
}

/// Computes the square root of a fixed-point number using binary search.
///
/// Searches the raw bits, so the result is the exact floor of the root and
/// perfect squares come out exact.
fn fixed_sqrt(value: Fixed) -> Fixed {
    if value <= Fixed::ZERO {
        return Fixed::ZERO;
    }

    // sqrt(bits / 2^32) * 2^32 == sqrt(bits * 2^32)
    let target = u128::from(value.to_bits().unsigned_abs()) << Fixed::FRAC_NBITS;
    let mut low: u128 = 0;
    let mut high: u128 = 1 << 48;

    while high - low > 1 {
        let mid = low + (high - low) / 2;
        if mid * mid <= target {
            low = mid;
        } else {
            high = mid;
        }
    }

    Fixed::from_bits(low as i64)
}
