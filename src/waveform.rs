//! Timing-diagram recorder.
//!
//! Keeps one boolean history per named signal, in the order the signals were
//! declared. Every call to [`Waveform::record`] adds one time step to every
//! signal, so all histories always have the same length.

use serde::{Serialize, Deserialize};

/// One named trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub name: String,
    pub history: Vec<bool>,
}

/// A set of signal traces sampled at common time steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waveform {
    signals: Vec<Signal>,
    steps: usize,
}

impl Waveform {
    /// Declare the traced signals. Duplicate names are kept once.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        let mut signals: Vec<Signal> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if signals.iter().all(|s| s.name != name) {
                signals.push(Signal { name: name.to_string(), history: Vec::new() });
            }
        }
        Self { signals, steps: 0 }
    }

    /// Record one time step.
    ///
    /// Names that were not declared are ignored. A declared signal missing
    /// from `states` holds its previous level (low before the first sample).
    pub fn record(&mut self, states: &[(&str, bool)]) {
        for signal in &mut self.signals {
            let level = states
                .iter()
                .rev()
                .find(|(name, _)| *name == signal.name)
                .map(|&(_, level)| level)
                .unwrap_or_else(|| signal.history.last().copied().unwrap_or(false));
            signal.history.push(level);
        }
        self.steps += 1;
    }

    /// History of one signal, oldest first.
    pub fn history(&self, name: &str) -> Option<&[bool]> {
        self.signals
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.history.as_slice())
    }

    /// Declared signal names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.signals.iter().map(|s| s.name.as_str())
    }

    /// Number of recorded time steps.
    pub fn len(&self) -> usize {
        self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps == 0
    }

    /// Drop all samples but keep the declared signals.
    pub fn clear(&mut self) {
        for signal in &mut self.signals {
            signal.history.clear();
        }
        self.steps = 0;
    }

    /// Serialize the signals as a JSON array of `{name, history}` objects.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.signals)
    }
}
