//! Camelot wheel codes and harmonic compatibility scoring.
//!
//! A wheel code is a position on the 12-slot Camelot wheel plus a mode ring:
//! `A` for minor keys, `B` for major keys, giving 24 valid codes (`1A`..`12B`).
//! Position 12 wraps around to position 1, so `12A` and `1A` are neighbours.
//!
//! [`harmonic_score`] implements the mixing heuristic used by the sequencer:
//! a discrete 0-3 score where 0 means "do not play these back to back".

pub mod normalize;

pub use normalize::{UnresolvedKey, normalize};

use std::fmt;
use std::str::FromStr;

/// Number of positions on the wheel.
pub const WHEEL_SIZE: u8 = 12;

/// The two rings of the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Inner ring, rendered `A`.
    Minor,
    /// Outer ring, rendered `B`.
    Major,
}

impl Mode {
    /// Single-letter ring code.
    pub fn letter(self) -> char {
        match self {
            Mode::Minor => 'A',
            Mode::Major => 'B',
        }
    }
}

/// A position/mode pair on the Camelot wheel, e.g. `8A` (A minor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WheelCode {
    position: u8,
    mode: Mode,
}

/// Error parsing a `"<1-12><A|B>"` wheel code string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid wheel code {0:?}: expected a position 1-12 followed by A or B")]
pub struct InvalidWheelCode(pub String);

impl WheelCode {
    /// Create a code, validating the position range.
    pub fn new(position: u8, mode: Mode) -> Option<Self> {
        (1..=WHEEL_SIZE)
            .contains(&position)
            .then_some(Self { position, mode })
    }

    /// Wheel position in `1..=12`.
    pub fn position(self) -> u8 {
        self.position
    }

    /// Ring of the wheel.
    pub fn mode(self) -> Mode {
        self.mode
    }

    /// Whether two codes sit on neighbouring positions, treating the wheel
    /// as cyclic: 12 and 1 are adjacent.
    pub fn is_adjacent(self, other: WheelCode) -> bool {
        let diff = self.position.abs_diff(other.position);
        diff == 1 || diff == WHEEL_SIZE - 1
    }
}

impl fmt::Display for WheelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.position, self.mode.letter())
    }
}

impl FromStr for WheelCode {
    type Err = InvalidWheelCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mode = match s.chars().last() {
            Some('A') | Some('a') => Mode::Minor,
            Some('B') | Some('b') => Mode::Major,
            _ => return Err(InvalidWheelCode(s.to_string())),
        };
        let position = s[..s.len() - 1]
            .parse::<u8>()
            .map_err(|_| InvalidWheelCode(s.to_string()))?;
        WheelCode::new(position, mode).ok_or_else(|| InvalidWheelCode(s.to_string()))
    }
}

/// Harmonic compatibility of two wheel codes, as a discrete score:
///
/// | Relation                              | Score |
/// |---------------------------------------|-------|
/// | same mode, adjacent position          | 3     |
/// | same position, different mode         | 2     |
/// | different mode, adjacent position     | 1     |
/// | anything else                         | 0     |
///
/// Adjacency is cyclic (12 borders 1). The relation is symmetric:
/// `harmonic_score(x, y) == harmonic_score(y, x)` for every valid pair.
pub fn harmonic_score(current: WheelCode, candidate: WheelCode) -> u8 {
    let same_mode = current.mode() == candidate.mode();
    let adjacent = current.is_adjacent(candidate);

    if same_mode && adjacent {
        3
    } else if !same_mode && current.position() == candidate.position() {
        2
    } else if !same_mode && adjacent {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> WheelCode {
        s.parse().expect("valid wheel code")
    }

    #[test]
    fn test_parse_and_display_round_trip() {
        for s in ["1A", "8A", "12B", "3B"] {
            assert_eq!(code(s).to_string(), s);
        }
    }

    #[test]
    fn test_parse_accepts_lowercase_and_whitespace() {
        assert_eq!(code(" 8a "), code("8A"));
        assert_eq!(code("12b"), code("12B"));
    }

    #[test]
    fn test_parse_rejects_out_of_range_and_garbage() {
        assert!("0A".parse::<WheelCode>().is_err());
        assert!("13A".parse::<WheelCode>().is_err());
        assert!("8C".parse::<WheelCode>().is_err());
        assert!("A8".parse::<WheelCode>().is_err());
        assert!("".parse::<WheelCode>().is_err());
    }

    #[test]
    fn test_new_validates_position() {
        assert!(WheelCode::new(0, Mode::Minor).is_none());
        assert!(WheelCode::new(13, Mode::Major).is_none());
        assert!(WheelCode::new(12, Mode::Major).is_some());
    }

    #[test]
    fn test_same_mode_adjacent_scores_three() {
        assert_eq!(harmonic_score(code("8A"), code("9A")), 3);
        assert_eq!(harmonic_score(code("8B"), code("7B")), 3);
    }

    #[test]
    fn test_relative_swap_scores_two() {
        assert_eq!(harmonic_score(code("8A"), code("8B")), 2);
        assert_eq!(harmonic_score(code("12B"), code("12A")), 2);
    }

    #[test]
    fn test_diagonal_step_scores_one() {
        assert_eq!(harmonic_score(code("8A"), code("9B")), 1);
        assert_eq!(harmonic_score(code("8A"), code("7B")), 1);
    }

    #[test]
    fn test_incompatible_scores_zero() {
        assert_eq!(harmonic_score(code("8A"), code("8A")), 0);
        assert_eq!(harmonic_score(code("8A"), code("10A")), 0);
        assert_eq!(harmonic_score(code("1A"), code("7B")), 0);
    }

    #[test]
    fn test_wheel_wraps_between_twelve_and_one() {
        assert_eq!(harmonic_score(code("12A"), code("1A")), 3);
        assert_eq!(
            harmonic_score(code("12A"), code("1A")),
            harmonic_score(code("1A"), code("2A"))
        );
        assert_eq!(harmonic_score(code("12A"), code("1B")), 1);
        assert_eq!(
            harmonic_score(code("12A"), code("1B")),
            harmonic_score(code("1A"), code("2B"))
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_code() -> impl Strategy<Value = WheelCode> {
        (1u8..=12, prop::bool::ANY).prop_map(|(pos, minor)| {
            let mode = if minor { Mode::Minor } else { Mode::Major };
            WheelCode::new(pos, mode).unwrap()
        })
    }

    proptest! {
        /// The compatibility relation is symmetric for every valid pair.
        #[test]
        fn score_is_symmetric(a in any_code(), b in any_code()) {
            prop_assert_eq!(harmonic_score(a, b), harmonic_score(b, a));
        }

        /// Scores never leave the documented range.
        #[test]
        fn score_is_bounded(a in any_code(), b in any_code()) {
            prop_assert!(harmonic_score(a, b) <= 3);
        }

        /// A code is never compatible with itself (no score for staying put).
        #[test]
        fn identical_codes_score_zero(a in any_code()) {
            prop_assert_eq!(harmonic_score(a, a), 0);
        }

        /// Display then parse returns the original code.
        #[test]
        fn display_parse_round_trip(a in any_code()) {
            let parsed: WheelCode = a.to_string().parse().unwrap();
            prop_assert_eq!(parsed, a);
        }
    }
}
