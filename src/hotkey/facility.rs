//! System-wide hotkey hook
//!
//! Wraps a [`KeyBackend`] behind [`HookFacility`]. The OS only knows single
//! key combinations, so the first step of every live chord is registered
//! permanently and later steps are armed for a short window after the
//! previous step fires.
//!
//! Every step the OS grabs is typed back into the focused application, so
//! `ctrl+c` still copies while it starts a chord.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use tracing::{debug, info, warn};

use super::backend::{KeyBackend, SystemKeys};
use super::chord::{Chord, ChordStep};
use super::sequence::{Progress, SequenceMatcher, SEQUENCE_TIMEOUT};

/// How long a replayed step stays released before it is grabbed again
pub const REPLAY_GRACE: Duration = Duration::from_millis(100);

/// Errors that can occur while managing hotkeys
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HotkeyError {
    /// The chord text is malformed or the OS refused to register it
    #[error("invalid hotkey '{input}': {reason}")]
    InvalidChord { input: String, reason: String },

    /// The chord is already bound to a different action
    #[error("hotkey '{chord}' is already used for {action}")]
    Conflict { chord: String, action: String },

    /// The OS hotkey hook could not be created
    #[error("global hotkeys unavailable: {0}")]
    Unavailable(String),
}

/// The process-wide hook that turns key presses into chord events
pub trait HookFacility {
    /// Raw event type delivered by the hook
    type Event;

    /// Install a chord; fails without side effects if it cannot be installed
    fn add(&mut self, chord: &Chord) -> Result<(), HotkeyError>;

    /// Remove a chord; unknown chords are ignored
    fn remove(&mut self, chord: &Chord);

    /// Remove every installed chord
    fn remove_all(&mut self);

    /// Translate a raw event, returning the chord it completed
    fn translate(&mut self, event: &Self::Event) -> Option<Chord>;

    /// Drop any partially entered sequence whose time is up
    fn expire(&mut self, _now: Instant) {}

    /// When [`HookFacility::expire`] next has work to do
    fn next_deadline(&self) -> Option<Instant> {
        None
    }
}

/// A first step registered with the OS
struct Registered {
    step: ChordStep,
    /// Number of live chords starting with this step
    users: usize,
}

/// [`HookFacility`] backed by OS hotkey registration
pub struct GlobalHook<B = SystemKeys> {
    backend: B,
    matcher: SequenceMatcher,
    /// First steps of live chords, by hotkey id
    first: HashMap<u32, Registered>,
    /// Follow-up steps registered only while a sequence is open
    armed: HashMap<u32, ChordStep>,
    /// Steps released for a replay, and when to grab them again
    released: HashMap<u32, (ChordStep, Instant)>,
}

impl GlobalHook {
    /// Create the OS hook
    pub fn new() -> Result<Self, HotkeyError> {
        let backend = SystemKeys::new().map_err(|e| HotkeyError::Unavailable(e.to_string()))?;
        Ok(Self::with_backend(backend))
    }
}

impl<B: KeyBackend> GlobalHook<B> {
    /// Create a hook over `backend`
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            matcher: SequenceMatcher::new(SEQUENCE_TIMEOUT),
            first: HashMap::new(),
            armed: HashMap::new(),
            released: HashMap::new(),
        }
    }

    fn is_grabbed(&self, id: u32) -> bool {
        self.first.contains_key(&id) || self.armed.contains_key(&id)
    }

    /// Register the follow-up steps of an open sequence
    fn arm(&mut self, steps: Vec<ChordStep>) {
        for step in steps {
            let id = step.hotkey().id();
            if self.is_grabbed(id) {
                continue;
            }
            if self.released.contains_key(&id) {
                // Grabbed by `restore` once its replay has gone through
                self.armed.insert(id, step);
                continue;
            }
            match self.backend.register(&step) {
                Ok(()) => {
                    debug!(step = %step, "armed sequence step");
                    self.armed.insert(id, step);
                }
                Err(e) => warn!(step = %step, error = %e, "failed to arm sequence step"),
            }
        }
    }

    /// Unregister every armed follow-up step
    fn disarm(&mut self) {
        for (id, step) in self.armed.drain() {
            if self.released.contains_key(&id) {
                continue;
            }
            if let Err(e) = self.backend.unregister(&step) {
                warn!(step = %step, error = %e, "failed to disarm sequence step");
            }
        }
    }

    /// Release a grabbed step and type it into the focused application
    fn pass_through(&mut self, id: u32, step: ChordStep, now: Instant) {
        if let Err(e) = self.backend.unregister(&step) {
            warn!(step = %step, error = %e, "failed to release step for replay");
            return;
        }
        if let Err(e) = self.backend.replay(&step) {
            warn!(step = %step, error = %e, "failed to replay step");
        }
        self.released.insert(id, (step, now + REPLAY_GRACE));
    }

    /// Grab released steps again once their grace period is over
    fn restore(&mut self, now: Instant) {
        let due: Vec<u32> = self
            .released
            .iter()
            .filter(|(_, (_, at))| *at <= now)
            .map(|(id, _)| *id)
            .collect();

        for id in due {
            let Some((step, _)) = self.released.remove(&id) else {
                continue;
            };
            if !self.is_grabbed(id) {
                continue;
            }
            if let Err(e) = self.backend.register(&step) {
                warn!(step = %step, error = %e, "failed to grab step after replay");
                self.armed.remove(&id);
            }
        }
    }
}

impl<B: KeyBackend> HookFacility for GlobalHook<B> {
    type Event = GlobalHotKeyEvent;

    fn add(&mut self, chord: &Chord) -> Result<(), HotkeyError> {
        if self.matcher.contains(chord) {
            return Ok(());
        }

        let step = *chord.first();
        let id = step.hotkey().id();

        if let Some(registered) = self.first.get_mut(&id) {
            registered.users += 1;
        } else if let Some(step) = self.armed.remove(&id) {
            // An armed step is already registered; it just becomes permanent
            self.first.insert(id, Registered { step, users: 1 });
        } else {
            self.released.remove(&id);
            self.backend
                .register(&step)
                .map_err(|e| HotkeyError::InvalidChord {
                    input: chord.to_string(),
                    reason: e.to_string(),
                })?;
            self.first.insert(id, Registered { step, users: 1 });
        }

        self.matcher.insert(chord.clone());
        info!(chord = %chord, live = self.matcher.len(), "hotkey installed");
        Ok(())
    }

    fn remove(&mut self, chord: &Chord) {
        self.disarm();
        if !self.matcher.remove(chord) {
            return;
        }

        let id = chord.first().hotkey().id();
        let unused = match self.first.get_mut(&id) {
            Some(registered) => {
                registered.users -= 1;
                registered.users == 0
            }
            None => false,
        };
        if unused {
            // A released step is already off the OS; `restore` drops it
            let registered = self.first.remove(&id);
            if let Some(registered) = registered.filter(|_| !self.released.contains_key(&id)) {
                if let Err(e) = self.backend.unregister(&registered.step) {
                    warn!(chord = %chord, error = %e, "failed to unregister hotkey");
                }
            }
        }

        info!(chord = %chord, live = self.matcher.len(), "hotkey removed");
    }

    fn remove_all(&mut self) {
        self.disarm();
        let count = self.first.len();
        for (id, registered) in self.first.drain() {
            if self.released.contains_key(&id) {
                continue;
            }
            if let Err(e) = self.backend.unregister(&registered.step) {
                warn!(step = %registered.step, error = %e, "failed to unregister hotkey");
            }
        }
        self.released.clear();
        self.matcher.clear();
        debug!(count, "all hotkeys removed");
    }

    fn translate(&mut self, event: &GlobalHotKeyEvent) -> Option<Chord> {
        if event.state != HotKeyState::Pressed {
            return None;
        }

        let step = self
            .armed
            .get(&event.id)
            .copied()
            .or_else(|| self.first.get(&event.id).map(|r| r.step))?;

        let now = Instant::now();
        self.pass_through(event.id, step, now);
        self.disarm();
        match self.matcher.press(step, now) {
            Progress::Matched(chord) => Some(chord),
            Progress::Pending(next) => {
                self.arm(next);
                None
            }
            Progress::Idle => None,
        }
    }

    fn expire(&mut self, now: Instant) {
        if self.matcher.expire(now) {
            debug!("sequence timed out");
            self.disarm();
        }
        self.restore(now);
    }

    fn next_deadline(&self) -> Option<Instant> {
        let restore = self.released.values().map(|(_, at)| *at).min();
        [self.matcher.deadline(), restore].into_iter().flatten().min()
    }
}
