//! In-memory hook and key backend used by tests

use std::collections::HashSet;

use super::backend::{BackendError, KeyBackend};
use super::chord::{Chord, ChordStep};
use super::facility::{HookFacility, HotkeyError};

/// A hook operation, recorded in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOp {
    Add(String),
    Remove(String),
    RemoveAll,
}

/// Hook that records calls and fires chords on demand
#[derive(Debug, Default)]
pub struct FakeHook {
    live: HashSet<Chord>,
    refused: HashSet<String>,
    pub ops: Vec<HookOp>,
}

impl FakeHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `add` fail for this chord, as an OS conflict would
    pub fn refuse(&mut self, chord: &str) {
        self.refused.insert(Chord::parse(chord).unwrap().to_string());
    }

    pub fn is_live(&self, chord: &str) -> bool {
        self.live.contains(&Chord::parse(chord).unwrap())
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl HookFacility for FakeHook {
    /// Tests press whole chords at once
    type Event = Chord;

    fn add(&mut self, chord: &Chord) -> Result<(), HotkeyError> {
        let name = chord.to_string();
        if self.refused.contains(&name) {
            return Err(HotkeyError::InvalidChord {
                input: name,
                reason: "already registered by another application".to_string(),
            });
        }
        self.ops.push(HookOp::Add(name));
        self.live.insert(chord.clone());
        Ok(())
    }

    fn remove(&mut self, chord: &Chord) {
        self.ops.push(HookOp::Remove(chord.to_string()));
        self.live.remove(chord);
    }

    fn remove_all(&mut self) {
        self.ops.push(HookOp::RemoveAll);
        self.live.clear();
    }

    fn translate(&mut self, event: &Chord) -> Option<Chord> {
        self.live.contains(event).then(|| event.clone())
    }
}

/// A key backend operation, recorded in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOp {
    Register(String),
    Unregister(String),
    Replay(String),
}

/// Backend that tracks which steps the OS would currently grab
#[derive(Debug, Default)]
pub struct RecordingKeys {
    grabbed: HashSet<String>,
    refused: HashSet<String>,
    pub ops: Vec<KeyOp>,
}

impl RecordingKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `register` fail for this step
    pub fn refuse(&mut self, step: &str) {
        self.refused.insert(step_name(step));
    }

    pub fn is_grabbed(&self, step: &str) -> bool {
        self.grabbed.contains(&step_name(step))
    }

    pub fn grabbed_count(&self) -> usize {
        self.grabbed.len()
    }

    pub fn count(&self, op: &KeyOp) -> usize {
        self.ops.iter().filter(|o| *o == op).count()
    }
}

fn step_name(step: &str) -> String {
    Chord::parse(step).unwrap().first().to_string()
}

impl KeyBackend for RecordingKeys {
    fn register(&mut self, step: &ChordStep) -> Result<(), BackendError> {
        let name = step.to_string();
        if self.refused.contains(&name) {
            return Err(BackendError("already registered by another application".to_string()));
        }
        if !self.grabbed.insert(name.clone()) {
            return Err(BackendError(format!("{} registered twice", name)));
        }
        self.ops.push(KeyOp::Register(name));
        Ok(())
    }

    fn unregister(&mut self, step: &ChordStep) -> Result<(), BackendError> {
        let name = step.to_string();
        if !self.grabbed.remove(&name) {
            return Err(BackendError(format!("{} is not registered", name)));
        }
        self.ops.push(KeyOp::Unregister(name));
        Ok(())
    }

    fn replay(&mut self, step: &ChordStep) -> Result<(), BackendError> {
        self.ops.push(KeyOp::Replay(step.to_string()));
        Ok(())
    }
}
