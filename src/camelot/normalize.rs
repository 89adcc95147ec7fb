//! Raw key string normalization.
//!
//! Acoustic analysis reports keys as free-text musicological strings such as
//! `"C# minor"` or `"Ab major"`. This module maps them onto [`WheelCode`]s
//! through a fixed table covering the 12 canonical major and 12 canonical
//! minor spellings plus the common flat-side enharmonic synonyms (G#/Ab and
//! friends). Lookup is an exact match after case and whitespace
//! normalization; there is no fuzzy matching and no mode inference, so a
//! bare tonic like `"D"` is rejected because A-or-B cannot be decided
//! without knowing major vs minor.

use super::{Mode, WheelCode};

/// A raw key string that could not be mapped to a wheel code.
///
/// Non-fatal at the batch level: callers drop the track and warn.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnresolvedKey {
    /// The string carries no `major`/`minor` mode, so the ring is undecidable.
    #[error("key {0:?} has no major/minor mode")]
    MissingMode(String),

    /// Tonic + mode present but not a spelling the table knows.
    #[error("key {0:?} matches no known spelling")]
    Unknown(String),
}

/// Map a raw estimated key (tonic + mode) to its Camelot wheel code.
///
/// Enharmonic synonyms resolve to the same code as their canonical
/// spelling: `normalize("G# major")` and `normalize("Ab major")` both
/// yield `4B`. Pure: no side effects, same output for the same input.
pub fn normalize(raw: &str) -> Result<WheelCode, UnresolvedKey> {
    let folded = raw.trim().to_lowercase();
    let mut parts = folded.split_whitespace();

    let tonic = parts
        .next()
        .ok_or_else(|| UnresolvedKey::MissingMode(raw.to_string()))?;
    let mode = match parts.next() {
        Some("major") => Mode::Major,
        Some("minor") => Mode::Minor,
        Some(_) => return Err(UnresolvedKey::Unknown(raw.to_string())),
        None => return Err(UnresolvedKey::MissingMode(raw.to_string())),
    };
    if parts.next().is_some() {
        return Err(UnresolvedKey::Unknown(raw.to_string()));
    }

    let position = match mode {
        Mode::Major => major_position(tonic),
        Mode::Minor => minor_position(tonic),
    }
    .ok_or_else(|| UnresolvedKey::Unknown(raw.to_string()))?;

    // Position is table-controlled, always in range.
    Ok(WheelCode::new(position, mode).expect("table positions are 1-12"))
}

/// Canonical major spellings plus flat synonyms, lowercased tonic → position.
fn major_position(tonic: &str) -> Option<u8> {
    Some(match tonic {
        "b" => 1,
        "f#" | "gb" => 2,
        "c#" | "db" => 3,
        "g#" | "ab" => 4,
        "d#" | "eb" => 5,
        "a#" | "bb" => 6,
        "f" => 7,
        "c" => 8,
        "g" => 9,
        "d" => 10,
        "a" => 11,
        "e" => 12,
        _ => return None,
    })
}

/// Canonical minor spellings plus flat synonyms, lowercased tonic → position.
fn minor_position(tonic: &str) -> Option<u8> {
    Some(match tonic {
        "g#" | "ab" => 1,
        "d#" | "eb" => 2,
        "a#" | "bb" => 3,
        "f" => 4,
        "c" => 5,
        "g" => 6,
        "d" => 7,
        "a" => 8,
        "e" => 9,
        "b" => 10,
        "f#" => 11,
        "c#" => 12,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> WheelCode {
        s.parse().expect("valid wheel code")
    }

    #[test]
    fn test_canonical_majors() {
        assert_eq!(normalize("C major"), Ok(code("8B")));
        assert_eq!(normalize("B major"), Ok(code("1B")));
        assert_eq!(normalize("E major"), Ok(code("12B")));
    }

    #[test]
    fn test_canonical_minors() {
        assert_eq!(normalize("A minor"), Ok(code("8A")));
        assert_eq!(normalize("G# minor"), Ok(code("1A")));
        assert_eq!(normalize("C# minor"), Ok(code("12A")));
    }

    #[test]
    fn test_enharmonic_synonyms_share_a_code() {
        assert_eq!(normalize("G# major"), normalize("Ab major"));
        assert_eq!(normalize("D# major"), normalize("Eb major"));
        assert_eq!(normalize("A# major"), normalize("Bb major"));
        assert_eq!(normalize("C# major"), normalize("Db major"));
        assert_eq!(normalize("F# major"), normalize("Gb major"));
        assert_eq!(normalize("G# minor"), normalize("Ab minor"));
        assert_eq!(normalize("D# minor"), normalize("Eb minor"));
        assert_eq!(normalize("A# minor"), normalize("Bb minor"));
    }

    #[test]
    fn test_case_and_spacing_are_normalized() {
        assert_eq!(normalize("  c#   MINOR "), Ok(code("12A")));
        assert_eq!(normalize("eb MAJOR"), Ok(code("5B")));
    }

    #[test]
    fn test_bare_tonic_is_missing_mode() {
        assert_eq!(
            normalize("D"),
            Err(UnresolvedKey::MissingMode("D".to_string()))
        );
        assert_eq!(
            normalize(""),
            Err(UnresolvedKey::MissingMode("".to_string()))
        );
    }

    #[test]
    fn test_unknown_spellings_are_rejected() {
        assert_eq!(
            normalize("H major"),
            Err(UnresolvedKey::Unknown("H major".to_string()))
        );
        assert_eq!(
            normalize("C dorian"),
            Err(UnresolvedKey::Unknown("C dorian".to_string()))
        );
        assert_eq!(
            normalize("C major seventh"),
            Err(UnresolvedKey::Unknown("C major seventh".to_string()))
        );
    }

    #[test]
    fn test_all_twenty_four_canonical_spellings_resolve() {
        let majors = [
            "B", "F#", "C#", "G#", "D#", "A#", "F", "C", "G", "D", "A", "E",
        ];
        let minors = [
            "G#", "D#", "A#", "F", "C", "G", "D", "A", "E", "B", "F#", "C#",
        ];
        for (i, tonic) in majors.iter().enumerate() {
            let got = normalize(&format!("{tonic} major")).unwrap();
            assert_eq!(got.position(), i as u8 + 1);
            assert_eq!(got.mode(), Mode::Major);
        }
        for (i, tonic) in minors.iter().enumerate() {
            let got = normalize(&format!("{tonic} minor")).unwrap();
            assert_eq!(got.position(), i as u8 + 1);
            assert_eq!(got.mode(), Mode::Minor);
        }
    }
}
