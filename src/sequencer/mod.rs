//! Greedy harmonic set ordering.
//!
//! Given a batch of tracks annotated with tempo and wheel code, produce one
//! total ordering suitable for continuous mixing: start from the slowest
//! track, then repeatedly pick the most harmonically compatible track whose
//! tempo sits inside a narrow upward window. When nothing qualifies, the run
//! breaks with a *reset*: jump to the slowest remaining track and carry on
//! rather than stalling. The output is always a permutation of the input.
//!
//! The remaining pool is an index-backed set (a parallel `consumed` marker
//! per entry) so candidate scans stay in original input order and removal
//! never disturbs iteration. That input order is also the tie-break: when two
//! candidates end up with exactly equal final scores, the one seen first
//! wins, which keeps runs reproducible across invocations.

use crate::camelot::{WheelCode, harmonic_score};
use crate::model::SetTrack;

/// Maximum tempo growth per step: the admission window for the next track
/// is `[current_bpm, current_bpm * BPM_WINDOW_RATIO]`. No decrease allowed
/// inside a run.
pub const BPM_WINDOW_RATIO: f64 = 1.075;

/// Guard against a zero-width window when every candidate sits exactly on
/// the current tempo.
const TIE_BREAK_EPSILON: f64 = 0.01;

/// A fully annotated track, ready for sequencing.
///
/// Unlike [`SetTrack`], tempo and wheel code are guaranteed present.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Working-store row id.
    pub id: i64,
    /// File path, the stable identity token.
    pub path: String,
    /// `"Artist - Title"` display label.
    pub label: String,
    /// Tempo in beats per minute, positive.
    pub bpm: f64,
    /// Normalized Camelot wheel code.
    pub key: WheelCode,
}

impl Entry {
    /// Project a store row into a sequencer entry.
    ///
    /// Fails with [`SequenceError::MissingAnnotation`] when tempo or wheel
    /// code is absent; callers usually pre-filter and warn per track instead
    /// of aborting the batch.
    pub fn from_track(track: &SetTrack) -> Result<Self, SequenceError> {
        let missing = || SequenceError::MissingAnnotation {
            path: track.path.clone(),
        };
        let bpm = track.bpm.ok_or_else(missing)?;
        let key = track
            .wheel_code
            .as_deref()
            .and_then(|s| s.parse::<WheelCode>().ok())
            .ok_or_else(missing)?;
        Ok(Entry {
            id: track.id,
            path: track.path.clone(),
            label: format!("{} - {}", track.artist, track.title),
            bpm,
            key,
        })
    }
}

/// A forced discontinuity: no remaining track was both in-window and
/// harmonically compatible, so the run restarted from the slowest
/// remaining track. Expected control flow, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Reset {
    /// Zero-based index in the output where the discontinuity lands.
    pub output_index: usize,
    /// Tempo of the track the run broke away from.
    pub from_bpm: f64,
    /// Tempo of the track the run restarted on.
    pub to_bpm: f64,
}

/// The ordered set plus the resets that occurred while building it.
#[derive(Debug, Clone)]
pub struct Mix {
    /// Every input entry exactly once, in play order.
    pub entries: Vec<Entry>,
    /// Discontinuities, in output order.
    pub resets: Vec<Reset>,
}

/// Errors from the sequencing step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    /// No eligible tracks to order.
    #[error("no eligible tracks to sequence")]
    EmptyInput,

    /// A track reached the sequencer without tempo or wheel code.
    #[error("track {path:?} is missing bpm or wheel code")]
    MissingAnnotation { path: String },
}

/// Order a batch of annotated tracks into a single mixable sequence.
///
/// Seeds on the globally slowest track (first seen wins a bpm tie), then
/// greedily advances: candidates must fall in the tempo admission window
/// and score above zero harmonically; among survivors the final score is
/// the harmonic score plus a bonus favouring the smallest tempo increase.
/// When no candidate survives, a [`Reset`] is recorded and the scan
/// restarts from the slowest remaining track. Terminates when the pool is
/// empty; the result is a permutation of the input.
pub fn sequence(entries: Vec<Entry>) -> Result<Mix, SequenceError> {
    if entries.is_empty() {
        return Err(SequenceError::EmptyInput);
    }

    let mut consumed = vec![false; entries.len()];
    let mut order = Vec::with_capacity(entries.len());
    let mut resets = Vec::new();

    let seed = min_bpm_index(&entries, &consumed).expect("pool is non-empty");
    consumed[seed] = true;
    order.push(seed);
    tracing::info!(
        label = %entries[seed].label,
        bpm = entries[seed].bpm,
        key = %entries[seed].key,
        "seeded set on slowest track"
    );

    while order.len() < entries.len() {
        let current = &entries[*order.last().expect("order is non-empty")];

        let next = match best_candidate(&entries, &consumed, current) {
            Some(idx) => idx,
            None => {
                // Run broke: restart from the slowest remaining track,
                // ignoring harmony and the window.
                let idx = min_bpm_index(&entries, &consumed).expect("pool is non-empty");
                tracing::warn!(
                    from = %current.label,
                    to = %entries[idx].label,
                    from_bpm = current.bpm,
                    to_bpm = entries[idx].bpm,
                    "no compatible candidate in window, resetting"
                );
                resets.push(Reset {
                    output_index: order.len(),
                    from_bpm: current.bpm,
                    to_bpm: entries[idx].bpm,
                });
                idx
            }
        };

        consumed[next] = true;
        order.push(next);
    }

    Ok(Mix {
        entries: order.into_iter().map(|i| entries[i].clone()).collect(),
        resets,
    })
}

/// Index of the unconsumed entry with the lowest bpm; the first entry in
/// input order wins ties. `None` when the pool is exhausted.
fn min_bpm_index(entries: &[Entry], consumed: &[bool]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, entry) in entries.iter().enumerate() {
        if consumed[i] {
            continue;
        }
        match best {
            Some(b) if entries[b].bpm <= entry.bpm => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Pick the best next track for `current`, or `None` if nothing is both
/// inside the tempo window and harmonically compatible.
///
/// The final score is the harmonic score plus a bonus in `(0, 1]` that
/// rewards the smallest tempo increase, so harmony dominates and tempo
/// only breaks ties between equal harmonic scores. Exactly tied final
/// scores resolve to the candidate seen first in input order (strict `>`
/// while scanning).
fn best_candidate(entries: &[Entry], consumed: &[bool], current: &Entry) -> Option<usize> {
    let bpm_max = current.bpm * BPM_WINDOW_RATIO;
    let mut best: Option<(usize, f64)> = None;

    for (i, candidate) in entries.iter().enumerate() {
        if consumed[i] || candidate.bpm < current.bpm || candidate.bpm > bpm_max {
            continue;
        }
        let harmonic = harmonic_score(current.key, candidate.key);
        if harmonic == 0 {
            continue;
        }
        let bonus = 1.0 - (candidate.bpm - current.bpm) / (bpm_max - current.bpm + TIE_BREAK_EPSILON);
        let score = f64::from(harmonic) + bonus;
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((i, score));
        }
    }

    best.map(|(i, _)| i)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_entries() -> impl Strategy<Value = Vec<Entry>> {
        prop::collection::vec((60.0f64..200.0, 1u8..=12, prop::bool::ANY), 1..40).prop_map(
            |raw| {
                raw
                    .into_iter()
                    .enumerate()
                    .map(|(i, (bpm, pos, minor))| {
                        let mode = if minor {
                            crate::camelot::Mode::Minor
                        } else {
                            crate::camelot::Mode::Major
                        };
                        Entry {
                            id: i as i64,
                            path: format!("t{i}.flac"),
                            label: format!("t{i}"),
                            bpm,
                            key: WheelCode::new(pos, mode).unwrap(),
                        }
                    })
                    .collect()
            },
        )
    }

    proptest! {
        /// The output is a permutation of the input: same ids, same length.
        #[test]
        fn output_is_a_permutation(entries in any_entries()) {
            let n = entries.len();
            let mix = sequence(entries).unwrap();
            let mut ids: Vec<i64> = mix.entries.iter().map(|e| e.id).collect();
            ids.sort_unstable();
            let expected: Vec<i64> = (0..n as i64).collect();
            prop_assert_eq!(ids, expected);
        }

        /// The first output track carries the global minimum bpm.
        #[test]
        fn seed_is_minimal(entries in any_entries()) {
            let min = entries.iter().map(|e| e.bpm).fold(f64::INFINITY, f64::min);
            let mix = sequence(entries).unwrap();
            prop_assert_eq!(mix.entries[0].bpm, min);
        }

        /// Between resets, bpm never decreases and never grows past the
        /// admission window.
        #[test]
        fn window_bound_holds_outside_resets(entries in any_entries()) {
            let mix = sequence(entries).unwrap();
            for i in 1..mix.entries.len() {
                if mix.resets.iter().any(|r| r.output_index == i) {
                    continue;
                }
                let prev = mix.entries[i - 1].bpm;
                let next = mix.entries[i].bpm;
                prop_assert!(next >= prev);
                prop_assert!(next <= prev * BPM_WINDOW_RATIO + 1e-9);
            }
        }

        /// Sequencing is deterministic: the same input yields the same output.
        #[test]
        fn sequencing_is_reproducible(entries in any_entries()) {
            let a = sequence(entries.clone()).unwrap();
            let b = sequence(entries).unwrap();
            let ids = |m: &Mix| m.entries.iter().map(|e| e.id).collect::<Vec<_>>();
            prop_assert_eq!(ids(&a), ids(&b));
            prop_assert_eq!(a.resets, b.resets);
        }
    }
}
