//! The closed set of groups a photo can be assigned to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Width of the hash range owned by each group.
const GROUP_WIDTH: f64 = 0.04;

/// Distance between the starts of two neighbouring group ranges.
const GROUP_STRIDE: f64 = 0.05;

/// A photo group.
///
/// Each group owns a half-open slice of the unit interval. Group `i`
/// (declaration order, 0-based) covers `[i * 0.05, i * 0.05 + 0.04)`, so the
/// gaps between ranges are left to "others".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoGroup {
    /// Group `a`.
    A,
    /// Group `b`.
    B,
    /// Group `c`.
    C,
    /// Group `d`.
    D,
    /// Group `e`.
    E,
    /// Group `f`.
    F,
    /// Group `g`.
    G,
    /// Group `h`.
    H,
    /// Group `i`.
    I,
    /// Group `j`.
    J,
    /// Group `k`.
    K,
    /// Group `l`.
    L,
    /// Group `m`.
    M,
    /// Group `n`.
    N,
    /// Group `o`.
    O,
    /// Group `p`.
    P,
    /// Group `q`.
    Q,
    /// Group `r`.
    R,
    /// Group `s`.
    S,
    /// Group `t`.
    T,
}

impl PhotoGroup {
    /// All groups in declaration order.
    pub const ALL: [Self; 20] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
        Self::I,
        Self::J,
        Self::K,
        Self::L,
        Self::M,
        Self::N,
        Self::O,
        Self::P,
        Self::Q,
        Self::R,
        Self::S,
        Self::T,
    ];

    /// Returns the record key for this group.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
            Self::D => "d",
            Self::E => "e",
            Self::F => "f",
            Self::G => "g",
            Self::H => "h",
            Self::I => "i",
            Self::J => "j",
            Self::K => "k",
            Self::L => "l",
            Self::M => "m",
            Self::N => "n",
            Self::O => "o",
            Self::P => "p",
            Self::Q => "q",
            Self::R => "r",
            Self::S => "s",
            Self::T => "t",
        }
    }

    /// Returns the half-open hash range `[start, end)` owned by this group.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn range(self) -> (f64, f64) {
        let start = self.index() as f64 * GROUP_STRIDE;
        (start, start + GROUP_WIDTH)
    }

    /// Finds the group whose range contains `hash`.
    ///
    /// Values outside `[0.0, 1.0)`, NaN, and values falling in the gaps
    /// between ranges map to `None`.
    #[must_use]
    pub fn for_hash(hash: f64) -> Option<Self> {
        if !(0.0..1.0).contains(&hash) {
            return None;
        }
        Self::ALL.into_iter().find(|group| {
            let (start, end) = group.range();
            hash >= start && hash < end
        })
    }

    fn index(self) -> usize {
        // Discriminants follow declaration order.
        self as usize
    }
}

impl fmt::Display for PhotoGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown group key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGroup(pub String);

impl fmt::Display for UnknownGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown photo group '{}'", self.0)
    }
}

impl std::error::Error for UnknownGroup {}

impl FromStr for PhotoGroup {
    type Err = UnknownGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownGroup(s.to_string()))
    }
}
