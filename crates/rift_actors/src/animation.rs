//! Animation collaborator
//!
//! States fire clips and forget them. The only thing read back is a clip's
//! length, used to time state exits.

use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Clip length used when a clip is unknown
pub const DEFAULT_CLIP_DURATION: f32 = 0.6;

const HISTORY_LEN: usize = 32;

/// Presentation side of an actor
pub trait Animator: fmt::Debug {
    /// Start a clip, replacing whatever is playing
    fn play(&mut self, clip: &str, looping: bool);

    /// Length of a clip in seconds, if known
    fn duration(&self, clip: &str) -> Option<f32>;

    /// Clip started last and whether it loops
    fn current(&self) -> Option<(&str, bool)>;

    /// Length of `clip`, or `fallback` when unknown or shorter than `min`
    fn duration_or(&self, clip: &str, fallback: f32, min: f32) -> f32 {
        match self.duration(clip) {
            Some(d) if d >= min => d,
            _ => fallback,
        }
    }
}

/// Headless animator: a table of clip lengths plus a record of what was played
#[derive(Debug, Clone, Default)]
pub struct ClipLibrary {
    durations: HashMap<String, f32>,
    current: Option<(String, bool)>,
    history: VecDeque<String>,
}

impl ClipLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a clip length (builder pattern)
    pub fn with_clip(mut self, clip: impl Into<String>, duration: f32) -> Self {
        self.durations.insert(clip.into(), duration);
        self
    }

    /// Most recent clips, oldest first
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    /// Whether `clip` was started within the recorded history
    pub fn played(&self, clip: &str) -> bool {
        self.history.iter().any(|c| c == clip)
    }
}

impl Animator for ClipLibrary {
    fn play(&mut self, clip: &str, looping: bool) {
        // A loop that is already running keeps going
        if looping && self.current() == Some((clip, true)) {
            return;
        }
        log::trace!("Play clip '{}' (loop: {})", clip, looping);
        self.current = Some((clip.to_string(), looping));
        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(clip.to_string());
    }

    fn duration(&self, clip: &str) -> Option<f32> {
        self.durations.get(clip).copied()
    }

    fn current(&self) -> Option<(&str, bool)> {
        self.current.as_ref().map(|(c, l)| (c.as_str(), *l))
    }
}
