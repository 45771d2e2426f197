//! Multi-step chord matching
//!
//! Tracks the steps pressed so far and decides, for each new step, whether
//! a live chord completed, more steps are expected, or the sequence is dead.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use super::chord::{Chord, ChordStep};

/// How long the next step of a sequence stays armed
pub const SEQUENCE_TIMEOUT: Duration = Duration::from_secs(1);

/// Result of feeding one step to the matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// A live chord was completed
    Matched(Chord),
    /// The prefix is still open; these steps may follow
    Pending(Vec<ChordStep>),
    /// The step does not continue or start any chord
    Idle,
}

/// Prefix matcher over the set of live chords
#[derive(Debug)]
pub struct SequenceMatcher {
    chords: HashSet<Chord>,
    prefix: Vec<ChordStep>,
    deadline: Option<Instant>,
    timeout: Duration,
}

impl SequenceMatcher {
    /// Create an empty matcher using `timeout` between steps
    pub fn new(timeout: Duration) -> Self {
        Self {
            chords: HashSet::new(),
            prefix: Vec::new(),
            deadline: None,
            timeout,
        }
    }

    /// Track a chord; returns false if it was already live
    pub fn insert(&mut self, chord: Chord) -> bool {
        self.chords.insert(chord)
    }

    /// Stop tracking a chord; any open prefix is dropped
    pub fn remove(&mut self, chord: &Chord) -> bool {
        self.reset();
        self.chords.remove(chord)
    }

    /// Check if a chord is live
    pub fn contains(&self, chord: &Chord) -> bool {
        self.chords.contains(chord)
    }

    /// Number of live chords
    pub fn len(&self) -> usize {
        self.chords.len()
    }

    /// Check if no chords are live
    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    /// Forget every chord and any open prefix
    pub fn clear(&mut self) {
        self.reset();
        self.chords.clear();
    }

    /// When the open prefix expires, if there is one
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Drop the open prefix if its deadline has passed
    ///
    /// Returns true if a prefix was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    /// Feed a pressed step
    pub fn press(&mut self, step: ChordStep, now: Instant) -> Progress {
        self.expire(now);

        let mut candidate = self.prefix.clone();
        candidate.push(step);

        // A step that does not continue the open prefix may start a new one
        if !self.prefix.is_empty() && !self.is_viable(&candidate) {
            candidate = vec![step];
        }

        if let Some(chord) = self.chords.iter().find(|c| c.steps() == candidate.as_slice()) {
            let chord = chord.clone();
            self.reset();
            return Progress::Matched(chord);
        }

        let next = self.next_steps(&candidate);
        if next.is_empty() {
            self.reset();
            return Progress::Idle;
        }

        self.prefix = candidate;
        self.deadline = Some(now + self.timeout);
        Progress::Pending(next)
    }

    fn is_viable(&self, candidate: &[ChordStep]) -> bool {
        self.chords
            .iter()
            .any(|c| c.steps() == candidate || c.starts_with(candidate))
    }

    fn next_steps(&self, prefix: &[ChordStep]) -> Vec<ChordStep> {
        let mut next: Vec<ChordStep> = Vec::new();
        for chord in self.chords.iter().filter(|c| c.starts_with(prefix)) {
            let step = chord.steps()[prefix.len()];
            if !next.contains(&step) {
                next.push(step);
            }
        }
        next
    }

    fn reset(&mut self) {
        self.prefix.clear();
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(s: &str) -> Chord {
        Chord::parse(s).unwrap()
    }

    fn step(s: &str) -> ChordStep {
        *chord(s).first()
    }

    fn matcher(chords: &[&str]) -> SequenceMatcher {
        let mut m = SequenceMatcher::new(SEQUENCE_TIMEOUT);
        for c in chords {
            m.insert(chord(c));
        }
        m
    }

    #[test]
    fn test_single_step_matches_immediately() {
        let mut m = matcher(&["ctrl+shift+k"]);
        let now = Instant::now();
        assert_eq!(
            m.press(step("ctrl+shift+k"), now),
            Progress::Matched(chord("ctrl+shift+k"))
        );
        assert!(m.deadline().is_none());
    }

    #[test]
    fn test_two_step_sequence() {
        let mut m = matcher(&["ctrl+g, g"]);
        let now = Instant::now();

        assert_eq!(m.press(step("ctrl+g"), now), Progress::Pending(vec![step("g")]));
        assert!(m.deadline().is_some());
        assert_eq!(
            m.press(step("g"), now + Duration::from_millis(200)),
            Progress::Matched(chord("ctrl+g, g"))
        );
    }

    #[test]
    fn test_sequence_times_out() {
        let mut m = matcher(&["ctrl+g, g"]);
        let now = Instant::now();

        m.press(step("ctrl+g"), now);
        assert_eq!(m.press(step("g"), now + SEQUENCE_TIMEOUT), Progress::Idle);
    }

    #[test]
    fn test_expire_drops_prefix() {
        let mut m = matcher(&["ctrl+g, g"]);
        let now = Instant::now();

        m.press(step("ctrl+g"), now);
        assert!(!m.expire(now));
        assert!(m.expire(now + SEQUENCE_TIMEOUT));
        assert!(m.deadline().is_none());
    }

    #[test]
    fn test_wrong_second_step_resets() {
        let mut m = matcher(&["ctrl+g, g"]);
        let now = Instant::now();

        m.press(step("ctrl+g"), now);
        assert_eq!(m.press(step("h"), now), Progress::Idle);
        assert!(m.deadline().is_none());
    }

    #[test]
    fn test_restart_from_first_step() {
        let mut m = matcher(&["ctrl+g, g"]);
        let now = Instant::now();

        m.press(step("ctrl+g"), now);
        // Pressing the first step again reopens the sequence
        assert_eq!(m.press(step("ctrl+g"), now), Progress::Pending(vec![step("g")]));
        assert_eq!(m.press(step("g"), now), Progress::Matched(chord("ctrl+g, g")));
    }

    #[test]
    fn test_shared_prefix_offers_all_next_steps() {
        let mut m = matcher(&["ctrl+g, g", "ctrl+g, h"]);
        match m.press(step("ctrl+g"), Instant::now()) {
            Progress::Pending(next) => {
                assert_eq!(next.len(), 2);
                assert!(next.contains(&step("g")));
                assert!(next.contains(&step("h")));
            }
            other => panic!("unexpected progress: {:?}", other),
        }
    }

    #[test]
    fn test_removed_chord_no_longer_matches() {
        let mut m = matcher(&["ctrl+g, g"]);
        let now = Instant::now();

        m.press(step("ctrl+g"), now);
        assert!(m.remove(&chord("ctrl+g, g")));
        assert_eq!(m.press(step("g"), now), Progress::Idle);
        assert!(m.is_empty());
    }
}
