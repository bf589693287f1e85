//! Contextual scoring signals supplied by the caller
//!
//! The engine never interprets these values; it only weighs them. A caller
//! installs either a full [`ContextSignals`] implementation or a partial set
//! of closures through [`ContextFunctions`]. Either way the cache keeps one
//! slot per signal and overwrites slots in place.

use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// A point in the caller's 2D location space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    /// Location used when the caller supplies none
    pub const ORIGIN: Location = Location { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Location {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Optional time hint and location attached to a single call
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringContext {
    /// Hour of day or caller-defined time value; the local hour is used when absent
    pub hint: Option<f64>,

    /// Caller location; [`Location::ORIGIN`] is used when absent
    pub location: Option<Location>,
}

impl ScoringContext {
    /// Context with neither hint nor location
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a time hint
    pub fn at(mut self, hint: f64) -> Self {
        self.hint = Some(hint);
        self
    }

    /// Attach a location
    pub fn located(mut self, x: f64, y: f64) -> Self {
        self.location = Some(Location::new(x, y));
        self
    }
}

/// Capability interface for the three contextual score terms
pub trait ContextSignals {
    /// Ambient context value, e.g. system load
    fn context_value(&self) -> f64;

    /// Weight for a time hint
    fn time_weight(&self, hint: f64) -> f64;

    /// Weight for a location
    fn location_weight(&self, x: f64, y: f64) -> f64;
}

/// Returns 1.0 for every signal
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantSignals;

impl ContextSignals for ConstantSignals {
    fn context_value(&self) -> f64 {
        1.0
    }

    fn time_weight(&self, _hint: f64) -> f64 {
        1.0
    }

    fn location_weight(&self, _x: f64, _y: f64) -> f64 {
        1.0
    }
}

type ContextFn = Box<dyn Fn() -> f64>;
type TimeFn = Box<dyn Fn(f64) -> f64>;
type LocationFn = Box<dyn Fn(f64, f64) -> f64>;

/// A partial set of signal closures
///
/// Any closure left unset keeps the signal that is currently installed.
#[derive(Default)]
pub struct ContextFunctions {
    context_fn: Option<ContextFn>,
    time_fn: Option<TimeFn>,
    loc_fn: Option<LocationFn>,
}

impl ContextFunctions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the ambient context signal
    pub fn context<F>(mut self, f: F) -> Self
    where
        F: Fn() -> f64 + 'static,
    {
        self.context_fn = Some(Box::new(f));
        self
    }

    /// Replace the time signal
    pub fn time<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) -> f64 + 'static,
    {
        self.time_fn = Some(Box::new(f));
        self
    }

    /// Replace the location signal
    pub fn location<F>(mut self, f: F) -> Self
    where
        F: Fn(f64, f64) -> f64 + 'static,
    {
        self.loc_fn = Some(Box::new(f));
        self
    }

    /// True when no closure has been supplied
    pub fn is_empty(&self) -> bool {
        self.context_fn.is_none() && self.time_fn.is_none() && self.loc_fn.is_none()
    }
}

impl std::fmt::Debug for ContextFunctions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextFunctions")
            .field("context_fn", &self.context_fn.is_some())
            .field("time_fn", &self.time_fn.is_some())
            .field("loc_fn", &self.loc_fn.is_some())
            .finish()
    }
}

/// The installed signals, one slot each
///
/// Replacing a slot drops the closure it held, so the set stays the same
/// size no matter how often signals are swapped.
pub(crate) struct SignalSlots {
    context_fn: ContextFn,
    time_fn: TimeFn,
    loc_fn: LocationFn,
}

impl SignalSlots {
    /// Fill all three slots from one implementation
    pub(crate) fn from_signals<S>(signals: S) -> Self
    where
        S: ContextSignals + 'static,
    {
        let shared = Rc::new(signals);
        let context = Rc::clone(&shared);
        let time = Rc::clone(&shared);

        Self {
            context_fn: Box::new(move || context.context_value()),
            time_fn: Box::new(move |hint| time.time_weight(hint)),
            loc_fn: Box::new(move |x, y| shared.location_weight(x, y)),
        }
    }

    /// Overwrite the slots `functions` supplies closures for
    pub(crate) fn apply(&mut self, functions: ContextFunctions) {
        if let Some(f) = functions.context_fn {
            self.context_fn = f;
        }
        if let Some(f) = functions.time_fn {
            self.time_fn = f;
        }
        if let Some(f) = functions.loc_fn {
            self.loc_fn = f;
        }
    }
}

impl Default for SignalSlots {
    fn default() -> Self {
        Self::from_signals(ConstantSignals)
    }
}

impl ContextSignals for SignalSlots {
    fn context_value(&self) -> f64 {
        (self.context_fn)()
    }

    fn time_weight(&self, hint: f64) -> f64 {
        (self.time_fn)(hint)
    }

    fn location_weight(&self, x: f64, y: f64) -> f64 {
        (self.loc_fn)(x, y)
    }
}
