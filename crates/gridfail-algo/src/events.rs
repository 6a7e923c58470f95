//! Structured cascade events and the observer seam that receives them.
//!
//! The engine never formats text. Everything a caller might want to show or
//! log is emitted as a [`CascadeEvent`], and presentation lives in observers.

use crate::cascade::{CascadeReport, FailureRecord};
use gridfail_core::{ElementRef, LineId, NodeId, OverloadSet};
use serde::Serialize;

/// Phases of a single simulation run, in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadePhase {
    Surging,
    Propagating,
    Quiescent,
    Reported,
    RolledBack,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CascadeEvent {
    PhaseChanged {
        phase: CascadePhase,
    },
    SurgeStarted {
        percent: f64,
        random: bool,
    },
    /// Load of one element scaled by the surge
    LoadAdjusted {
        element: ElementRef,
        before: f64,
        after: f64,
        factor: f64,
    },
    /// Result of a full overload scan. Step 0 is the scan right after the surge.
    OverloadScan {
        step: usize,
        overloads: OverloadSet,
    },
    ElementFailed(FailureRecord),
    LoadRedistributed {
        failed_line: LineId,
        endpoint: NodeId,
        line: LineId,
        amount: f64,
    },
    /// An endpoint of a failed line had no line able to take load.
    /// `dropped_load` is what was lost for the whole failure (zero when the
    /// other endpoint absorbed it).
    CapacityExhausted {
        failed_line: LineId,
        endpoint: NodeId,
        dropped_load: f64,
    },
    Finished(CascadeReport),
}

/// Receives events as a simulation runs.
pub trait CascadeObserver {
    fn on_event(&mut self, event: &CascadeEvent);
}

impl<T: CascadeObserver + ?Sized> CascadeObserver for &mut T {
    fn on_event(&mut self, event: &CascadeEvent) {
        (**self).on_event(event)
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl CascadeObserver for NoopObserver {
    fn on_event(&mut self, _event: &CascadeEvent) {}
}

/// Keeps every event in order; handy for tests and JSON output.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<CascadeEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phases(&self) -> Vec<CascadePhase> {
        self.events
            .iter()
            .filter_map(|event| match event {
                CascadeEvent::PhaseChanged { phase } => Some(*phase),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FailureRecord> {
        self.events.iter().filter_map(|event| match event {
            CascadeEvent::ElementFailed(record) => Some(record),
            _ => None,
        })
    }
}

impl CascadeObserver for EventLog {
    fn on_event(&mut self, event: &CascadeEvent) {
        self.events.push(event.clone());
    }
}
