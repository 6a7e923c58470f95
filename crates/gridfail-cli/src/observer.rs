use gridfail_algo::{CascadeEvent, CascadeObserver};
use gridfail_core::{ElementRef, Grid};
use tracing::{debug, info, warn};

/// Forwards cascade events to `tracing`, naming elements the way the
/// reports do.
pub struct TracingObserver {
    names: Vec<String>,
    lines: Vec<(usize, usize)>,
}

impl TracingObserver {
    pub fn new(grid: &Grid) -> Self {
        Self {
            names: grid.nodes().map(|node| node.name.clone()).collect(),
            lines: grid
                .lines()
                .map(|line| (line.from.value(), line.to.value()))
                .collect(),
        }
    }

    fn node(&self, index: usize) -> &str {
        self.names.get(index).map(String::as_str).unwrap_or("?")
    }

    fn describe(&self, element: ElementRef) -> String {
        match element {
            ElementRef::Node(id) => format!("node {}", self.node(id.value())),
            ElementRef::Line(id) => match self.lines.get(id.value()) {
                Some(&(a, b)) => format!("line {}-{}", self.node(a), self.node(b)),
                None => format!("line {id}"),
            },
        }
    }
}

impl CascadeObserver for TracingObserver {
    fn on_event(&mut self, event: &CascadeEvent) {
        match event {
            CascadeEvent::PhaseChanged { phase } => debug!(?phase, "cascade phase"),
            CascadeEvent::SurgeStarted { percent, random } => {
                info!(percent, random, "applying load surge")
            }
            CascadeEvent::LoadAdjusted {
                element,
                before,
                after,
                factor,
            } => debug!(
                "{}: {before:.2} -> {after:.2} MW (factor {factor:.3})",
                self.describe(*element)
            ),
            CascadeEvent::OverloadScan { step, overloads } => {
                debug!(step, overloaded = overloads.len(), "overload scan")
            }
            CascadeEvent::ElementFailed(record) => info!(
                step = record.step,
                "{} failed at {:.2}/{:.2} MW (severity {:.3})",
                self.describe(record.element),
                record.load,
                record.capacity,
                record.severity
            ),
            CascadeEvent::LoadRedistributed {
                failed_line,
                line,
                amount,
                ..
            } => debug!(
                "{} -> {}: +{amount:.2} MW",
                self.describe(ElementRef::Line(*failed_line)),
                self.describe(ElementRef::Line(*line))
            ),
            CascadeEvent::CapacityExhausted {
                failed_line,
                endpoint,
                dropped_load,
            } => warn!(
                "no spare capacity at {} for {}; {dropped_load:.2} MW dropped",
                self.node(endpoint.value()),
                self.describe(ElementRef::Line(*failed_line))
            ),
            CascadeEvent::Finished(report) => info!(
                failures = report.failures.len(),
                active_nodes = report.active_nodes,
                active_lines = report.active_lines,
                connected = report.connected,
                "cascade finished"
            ),
        }
    }
}
