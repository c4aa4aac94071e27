//! Bit-exact identifiers for parameter sets.
//!
//! Every value is narrowed to IEEE-754 single precision and its four bytes
//! are written as eight lowercase hex digits. Tokens are joined with `_`
//! and the result file extension is appended, e.g. `[1.0, 2.0]` becomes
//! `3f800000_40000000.csv`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DesignParameters;

/// Extension appended to every fingerprint.
pub const EXTENSION: &str = "csv";

/// Byte order used when rendering a value's bytes as hex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HexOrder {
    /// Most significant byte first: the bit pattern as a hex number.
    #[default]
    BigEndian,
    /// Least significant byte first, matching artifacts written by
    /// little-endian hosts that dumped the raw in-memory bytes.
    LittleEndian,
}

/// A deterministic identifier for an ordered list of values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    stem: String,
}

impl Fingerprint {
    /// Encodes `values` in the given byte order.
    #[must_use]
    pub fn encode(values: &[f64], order: HexOrder) -> Self {
        let stem = values
            .iter()
            .map(|&v| token(v, order))
            .collect::<Vec<_>>()
            .join("_");
        Self { stem }
    }

    /// Encodes a parameter set in canonical field order.
    #[must_use]
    pub fn of(params: &DesignParameters, order: HexOrder) -> Self {
        Self::encode(&params.as_array(), order)
    }

    /// The joined hex tokens without extension.
    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// The file name: stem plus [`EXTENSION`].
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.{EXTENSION}", self.stem)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

#[allow(clippy::cast_possible_truncation)]
fn token(value: f64, order: HexOrder) -> String {
    let single = value as f32;
    let bytes = match order {
        HexOrder::BigEndian => single.to_be_bytes(),
        HexOrder::LittleEndian => single.to_le_bytes(),
    };
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_and_two() {
        let fp = Fingerprint::encode(&[1.0, 2.0], HexOrder::BigEndian);
        assert_eq!(fp.stem(), "3f800000_40000000");
        assert_eq!(fp.file_name(), "3f800000_40000000.csv");
        assert_eq!(fp.to_string(), "3f800000_40000000.csv");
    }

    #[test]
    fn little_endian_swaps_bytes() {
        let fp = Fingerprint::encode(&[1.0, 2.0], HexOrder::LittleEndian);
        assert_eq!(fp.stem(), "0000803f_00000040");
    }

    #[test]
    fn deterministic_for_reference_set() {
        let p = DesignParameters::default();
        let a = Fingerprint::of(&p, HexOrder::default());
        let b = Fingerprint::of(&p, HexOrder::default());
        assert_eq!(a, b);
        assert_eq!(a.stem().split('_').count(), DesignParameters::COUNT);
        assert!(a.stem().starts_with("3d4ccccd_3f000000_"));
    }

    #[test]
    fn one_ulp_changes_only_that_token() {
        let base = [0.25_f64, 0.5, 0.75];
        let bumped_single = f32::from_bits(0.5_f32.to_bits() + 1);
        let bumped = [0.25, f64::from(bumped_single), 0.75];
        let a = Fingerprint::encode(&base, HexOrder::BigEndian);
        let b = Fingerprint::encode(&bumped, HexOrder::BigEndian);
        let ta: Vec<_> = a.stem().split('_').collect();
        let tb: Vec<_> = b.stem().split('_').collect();
        assert_eq!(ta[0], tb[0]);
        assert_ne!(ta[1], tb[1]);
        assert_eq!(tb[1], "3f000001");
        assert_eq!(ta[2], tb[2]);
    }

    #[test]
    fn signed_zero_is_distinguished() {
        let pos = Fingerprint::encode(&[0.0], HexOrder::BigEndian);
        let neg = Fingerprint::encode(&[-0.0], HexOrder::BigEndian);
        assert_eq!(pos.stem(), "00000000");
        assert_eq!(neg.stem(), "80000000");
    }

    #[test]
    fn tokens_are_lowercase_and_fixed_width() {
        let fp = Fingerprint::encode(&[-1.5e-7, 123_456.78, f64::INFINITY], HexOrder::BigEndian);
        for t in fp.stem().split('_') {
            assert_eq!(t.len(), 8);
            assert!(t.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }
}
