//! Named-state finite state machine
//!
//! States are registered once and owned by the machine. Each state sees the
//! owner and a per-frame context through `&mut` borrows, so the owner keeps
//! its machine in a separate field from the data the states act on.

use std::collections::HashMap;

/// What a state asks for at the end of its update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Keep running the current state
    Stay,
    /// Change to the named state (no-op if unknown or already current)
    To(&'static str),
    /// Go back to the previous state
    Revert,
}

/// A state in the state machine.
///
/// Per-activation data (timers, flags) lives on the state and must be reset
/// in `on_enter`.
pub trait State<T, C> {
    /// Unique name used for lookups and logging
    fn name(&self) -> &'static str;

    /// Called when entering this state
    fn on_enter(&mut self, _owner: &mut T, _ctx: &mut C) {}

    /// Called every update while in this state
    fn on_update(&mut self, owner: &mut T, ctx: &mut C, dt: f32) -> Transition;

    /// Called when exiting this state
    fn on_exit(&mut self, _owner: &mut T, _ctx: &mut C) {}
}

/// Finite State Machine
pub struct StateMachine<T, C> {
    states: Vec<Box<dyn State<T, C>>>,
    by_name: HashMap<&'static str, usize>,
    current: Option<usize>,
    previous: Option<usize>,
}

impl<T, C> StateMachine<T, C> {
    /// Create an empty state machine
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            by_name: HashMap::new(),
            current: None,
            previous: None,
        }
    }

    /// Register a state. A state with the same name is replaced.
    pub fn register<S>(&mut self, state: S)
    where
        S: State<T, C> + 'static,
    {
        let name = state.name();
        match self.by_name.get(name) {
            Some(&index) => self.states[index] = Box::new(state),
            None => {
                self.by_name.insert(name, self.states.len());
                self.states.push(Box::new(state));
            }
        }
    }

    /// Register a state (builder pattern)
    pub fn with_state<S>(mut self, state: S) -> Self
    where
        S: State<T, C> + 'static,
    {
        self.register(state);
        self
    }

    /// Enter the initial state without exiting anything.
    ///
    /// Returns false if the name is not registered.
    pub fn init(&mut self, owner: &mut T, ctx: &mut C, name: &str) -> bool {
        let Some(&index) = self.by_name.get(name) else {
            log::warn!("Initial state '{}' is not registered", name);
            return false;
        };
        self.current = Some(index);
        self.states[index].on_enter(owner, ctx);
        true
    }

    /// Run the current state's update and apply the transition it returns
    pub fn update(&mut self, owner: &mut T, ctx: &mut C, dt: f32) {
        let Some(index) = self.current else {
            return;
        };
        match self.states[index].on_update(owner, ctx, dt) {
            Transition::Stay => {}
            Transition::To(name) => {
                self.change_state(owner, ctx, name);
            }
            Transition::Revert => {
                self.revert_to_previous_state(owner, ctx);
            }
        }
    }

    /// Change to a named state.
    ///
    /// Unknown names and the current state are silent no-ops. Otherwise the
    /// current state exits and becomes the previous state, then the new one
    /// enters. Returns whether a transition happened.
    pub fn change_state(&mut self, owner: &mut T, ctx: &mut C, name: &str) -> bool {
        match self.by_name.get(name) {
            Some(&index) => self.change_to_index(owner, ctx, index),
            None => {
                log::trace!("Ignoring change to unregistered state '{}'", name);
                false
            }
        }
    }

    /// Change back to the previous state, if any
    pub fn revert_to_previous_state(&mut self, owner: &mut T, ctx: &mut C) -> bool {
        match self.previous {
            Some(index) => self.change_to_index(owner, ctx, index),
            None => false,
        }
    }

    fn change_to_index(&mut self, owner: &mut T, ctx: &mut C, index: usize) -> bool {
        if self.current == Some(index) {
            return false;
        }

        if let Some(current) = self.current {
            self.states[current].on_exit(owner, ctx);
            self.previous = Some(current);
        }

        log::trace!(
            "State {} -> {}",
            self.current_state_name().unwrap_or("<none>"),
            self.states[index].name()
        );
        self.current = Some(index);
        self.states[index].on_enter(owner, ctx);
        true
    }

    pub fn current_state_name(&self) -> Option<&'static str> {
        self.current.map(|i| self.states[i].name())
    }

    pub fn previous_state_name(&self) -> Option<&'static str> {
        self.previous.map(|i| self.states[i].name())
    }

    /// Check if in a specific state
    pub fn is_in_state(&self, name: &str) -> bool {
        self.current_state_name() == Some(name)
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

impl<T, C> Default for StateMachine<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> std::fmt::Debug for StateMachine<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current_state_name())
            .field("previous", &self.previous_state_name())
            .field("states", &self.states.len())
            .finish()
    }
}
