//! Cascade propagation after a load surge.
//!
//! A run moves through `Surging → Propagating → Quiescent → Reported →
//! RolledBack`:
//!
//! 1. Every active node, then every active line, has its load scaled by
//!    `1 + pct/100 * factor`.
//! 2. All overloaded elements seed a worklist ordered by ascending severity
//!    (`load / capacity`). Ties go to the element with the lowest node index
//!    (a line counts by its lower endpoint), and a node beats a line starting
//!    at the same index.
//! 3. The least severe candidate is failed. A failed line hands its flow to
//!    the [`RedistributionPolicy`]; a failed node just drops out. After each
//!    failure the whole grid is rescanned and every overloaded element is
//!    pushed again. Entries for elements that are already inactive are
//!    discarded when popped.
//! 4. When the worklist drains, the outcome is summarised in a
//!    [`CascadeReport`] and the grid is restored to its pre-surge state.
//!
//! The grid is exclusively borrowed for the whole run, and restored on every
//! exit path, so a simulation is a pure what-if query.

use crate::error::{CascadeError, CascadeResult};
use crate::events::{CascadeEvent, CascadeObserver, CascadePhase};
use crate::redistribution::{ProportionalSlack, RedistributionPolicy};
use crate::surge::{surge_multiplier, validate_percent, SurgeFactors};
use gridfail_core::{ElementRef, Grid, GridResult, GridSnapshot, LineId, NodeId, OverloadSet};
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Engine settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeConfig {
    /// Upper bound on failures per run. `None` runs until quiescent.
    #[serde(default)]
    pub max_steps: Option<usize>,
}

/// One element failure, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureRecord {
    /// 1-based position in the failure sequence
    pub step: usize,
    pub element: ElementRef,
    /// `(from, to)` for lines
    pub endpoints: Option<(NodeId, NodeId)>,
    /// Load at the moment of failure
    pub load: f64,
    pub capacity: f64,
    pub severity: f64,
}

/// Outcome of a simulation run. The grid itself has already been restored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CascadeReport {
    pub load_increase_percent: f64,
    pub random: bool,
    pub failures: Vec<FailureRecord>,
    pub active_nodes: usize,
    pub total_nodes: usize,
    pub active_lines: usize,
    pub total_lines: usize,
    pub connected: bool,
    /// Component partition of the surviving grid; empty when it is connected
    pub components: Vec<Vec<NodeId>>,
    /// Total flow moved onto surviving lines
    pub redistributed_load: f64,
    /// Total flow that had nowhere to go
    pub dropped_load: f64,
    /// Operational state at quiescence, before rollback
    pub final_state: GridSnapshot,
}

impl CascadeReport {
    pub fn failed_nodes(&self) -> Vec<NodeId> {
        self.failures
            .iter()
            .filter_map(|record| match record.element {
                ElementRef::Node(id) => Some(id),
                ElementRef::Line(_) => None,
            })
            .collect()
    }

    pub fn failed_lines(&self) -> Vec<LineId> {
        self.failures
            .iter()
            .filter_map(|record| match record.element {
                ElementRef::Line(id) => Some(id),
                ElementRef::Node(_) => None,
            })
            .collect()
    }

    /// True when the surge caused no failures at all.
    pub fn is_stable(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Tie key for equal severities: `(node, None)` for a node, `(low, Some(high))`
/// for a line. A node sorts before any line whose lower endpoint it is.
type TieKey = (usize, Option<usize>);

/// Worklist entry. Ordered by severity, then by [`TieKey`].
#[derive(Debug, Clone, Copy)]
struct Candidate {
    severity: f64,
    key: TieKey,
    element: ElementRef,
}

impl Candidate {
    fn new(grid: &Grid, severity: f64, element: ElementRef) -> GridResult<Self> {
        let key = match element {
            ElementRef::Node(id) => (id.value(), None),
            ElementRef::Line(id) => {
                let line = grid.line(id)?;
                let (a, b) = (line.from.value(), line.to.value());
                (a.min(b), Some(a.max(b)))
            }
        };
        Ok(Self {
            severity,
            key,
            element,
        })
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.severity
            .total_cmp(&other.severity)
            .then_with(|| self.key.cmp(&other.key))
            .then_with(|| self.element.cmp(&other.element))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Min-heap keyed on [`Candidate`] ordering.
type Worklist = BinaryHeap<Reverse<Candidate>>;

/// Surge-and-propagate simulator.
#[derive(Debug, Clone)]
pub struct CascadeEngine<P = ProportionalSlack> {
    config: CascadeConfig,
    policy: P,
}

impl CascadeEngine<ProportionalSlack> {
    pub fn new(config: CascadeConfig) -> Self {
        Self {
            config,
            policy: ProportionalSlack,
        }
    }
}

impl Default for CascadeEngine<ProportionalSlack> {
    fn default() -> Self {
        Self::new(CascadeConfig::default())
    }
}

impl<P: RedistributionPolicy> CascadeEngine<P> {
    pub fn with_policy(config: CascadeConfig, policy: P) -> Self {
        Self { config, policy }
    }

    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }

    /// Apply a `percent` surge and propagate failures until quiescent.
    ///
    /// `factors` supplies one factor per active node and then per active
    /// line. `observer` sees every step as a [`CascadeEvent`].
    ///
    /// The grid is unchanged when this returns, whether it succeeds or not.
    /// A negative or non-finite `percent` is rejected before anything runs.
    pub fn simulate<F, O>(
        &self,
        grid: &mut Grid,
        percent: f64,
        mut factors: F,
        mut observer: O,
    ) -> CascadeResult<CascadeReport>
    where
        F: SurgeFactors,
        O: CascadeObserver,
    {
        validate_percent(percent)?;
        let outcome =
            grid.with_rollback(|grid| self.run(grid, percent, &mut factors, &mut observer));
        observer.on_event(&CascadeEvent::PhaseChanged {
            phase: CascadePhase::RolledBack,
        });
        outcome
    }

    fn run<F, O>(
        &self,
        grid: &mut Grid,
        percent: f64,
        factors: &mut F,
        observer: &mut O,
    ) -> CascadeResult<CascadeReport>
    where
        F: SurgeFactors,
        O: CascadeObserver,
    {
        observer.on_event(&CascadeEvent::PhaseChanged {
            phase: CascadePhase::Surging,
        });
        let random = factors.is_random();
        observer.on_event(&CascadeEvent::SurgeStarted { percent, random });
        apply_surge(grid, percent, factors, observer)?;

        observer.on_event(&CascadeEvent::PhaseChanged {
            phase: CascadePhase::Propagating,
        });
        let mut worklist = Worklist::new();
        scan(grid, 0, &mut worklist, observer)?;

        let mut failures: Vec<FailureRecord> = Vec::new();
        let mut redistributed_load = 0.0;
        let mut dropped_load = 0.0;

        while let Some(Reverse(candidate)) = worklist.pop() {
            let element = candidate.element;
            if !grid.is_active(element)? {
                continue;
            }
            if let Some(limit) = self.config.max_steps {
                if failures.len() >= limit {
                    return Err(CascadeError::DidNotConverge { limit });
                }
            }

            let load = grid.load(element)?;
            let capacity = grid.capacity(element)?;
            let endpoints = match element {
                ElementRef::Line(id) => {
                    let line = grid.line(id)?;
                    Some((line.from, line.to))
                }
                ElementRef::Node(_) => None,
            };
            grid.set_active(element, false)?;

            let record = FailureRecord {
                step: failures.len() + 1,
                element,
                endpoints,
                load,
                capacity,
                severity: load / capacity,
            };
            observer.on_event(&CascadeEvent::ElementFailed(record.clone()));
            failures.push(record);

            if let (ElementRef::Line(failed_line), Some(ends)) = (element, endpoints) {
                let outcome = self.policy.redistribute(grid, load, ends)?;
                for share in &outcome.shares {
                    observer.on_event(&CascadeEvent::LoadRedistributed {
                        failed_line,
                        endpoint: share.endpoint,
                        line: share.line,
                        amount: share.amount,
                    });
                }
                for &endpoint in &outcome.exhausted_endpoints {
                    observer.on_event(&CascadeEvent::CapacityExhausted {
                        failed_line,
                        endpoint,
                        dropped_load: outcome.dropped_load,
                    });
                }
                redistributed_load += outcome.total_assigned();
                dropped_load += outcome.dropped_load;
            }

            scan(grid, failures.len(), &mut worklist, observer)?;
        }

        observer.on_event(&CascadeEvent::PhaseChanged {
            phase: CascadePhase::Quiescent,
        });
        let connected = grid.is_connected();
        let report = CascadeReport {
            load_increase_percent: percent,
            random,
            failures,
            active_nodes: grid.active_node_count(),
            total_nodes: grid.node_count(),
            active_lines: grid.active_line_count(),
            total_lines: grid.line_count(),
            connected,
            components: if connected {
                Vec::new()
            } else {
                grid.find_components()
            },
            redistributed_load,
            dropped_load,
            final_state: grid.snapshot(),
        };

        observer.on_event(&CascadeEvent::PhaseChanged {
            phase: CascadePhase::Reported,
        });
        observer.on_event(&CascadeEvent::Finished(report.clone()));
        Ok(report)
    }
}

fn apply_surge<F, O>(
    grid: &mut Grid,
    percent: f64,
    factors: &mut F,
    observer: &mut O,
) -> CascadeResult<()>
where
    F: SurgeFactors,
    O: CascadeObserver,
{
    let targets: Vec<ElementRef> = grid
        .nodes()
        .filter(|node| node.active)
        .map(|node| ElementRef::Node(node.id))
        .chain(
            grid.lines()
                .filter(|line| line.active)
                .map(|line| ElementRef::Line(line.id)),
        )
        .collect();

    for element in targets {
        let factor = factors.next_factor();
        let before = grid.load(element)?;
        let after = before * surge_multiplier(percent, factor);
        grid.set_load(element, after)?;
        observer.on_event(&CascadeEvent::LoadAdjusted {
            element,
            before,
            after,
            factor,
        });
    }
    Ok(())
}

/// Rescan the grid and push every overloaded element.
fn scan<O: CascadeObserver>(
    grid: &Grid,
    step: usize,
    worklist: &mut Worklist,
    observer: &mut O,
) -> CascadeResult<()> {
    let overloads: OverloadSet = grid.check_overloads();
    for element in overloads.elements() {
        let severity = grid.load(element)? / grid.capacity(element)?;
        worklist.push(Reverse(Candidate::new(grid, severity, element)?));
    }
    observer.on_event(&CascadeEvent::OverloadScan { step, overloads });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventLog, NoopObserver};
    use crate::surge::{ScriptedFactors, UniformSurge};
    use gridfail_core::GridBuilder;

    #[test]
    fn test_ties_follow_endpoint_order() {
        // line 0 is 2-3, line 1 is 0-1, line 2 is 1-2
        let mut b = GridBuilder::new(4).unwrap();
        for i in 0..4 {
            b.add_node(i, format!("S{i}"), 1.0, 10.0).unwrap();
        }
        b.add_edge(2, 3, 10.0, 1.0).unwrap();
        b.add_edge(1, 0, 10.0, 1.0).unwrap();
        b.add_edge(1, 2, 10.0, 1.0).unwrap();
        let grid = b.build().unwrap();

        let mut worklist = Worklist::new();
        let mut push = |severity: f64, element: ElementRef| {
            worklist.push(Reverse(Candidate::new(&grid, severity, element).unwrap()));
        };
        push(1.4, ElementRef::Node(NodeId::new(0)));
        push(1.1, ElementRef::Line(LineId::new(0)));
        push(1.1, ElementRef::Node(NodeId::new(2)));
        push(1.1, ElementRef::Line(LineId::new(2)));
        push(1.1, ElementRef::Line(LineId::new(1)));
        push(1.1, ElementRef::Node(NodeId::new(1)));

        let order: Vec<ElementRef> = std::iter::from_fn(|| worklist.pop())
            .map(|Reverse(c)| c.element)
            .collect();
        assert_eq!(
            order,
            vec![
                ElementRef::Line(LineId::new(1)),
                ElementRef::Node(NodeId::new(1)),
                ElementRef::Line(LineId::new(2)),
                ElementRef::Node(NodeId::new(2)),
                ElementRef::Line(LineId::new(0)),
                ElementRef::Node(NodeId::new(0)),
            ]
        );
    }

    fn pair() -> Grid {
        let mut b = GridBuilder::new(2).unwrap();
        b.add_node(0, "A", 5.0, 10.0).unwrap();
        b.add_node(1, "B", 9.0, 10.0).unwrap();
        b.add_edge(0, 1, 10.0, 4.0).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn test_zero_surge_is_stable() {
        let mut grid = pair();
        let report = CascadeEngine::default()
            .simulate(&mut grid, 0.0, UniformSurge, NoopObserver)
            .unwrap();
        assert!(report.is_stable());
        assert!(report.connected);
        assert!(report.components.is_empty());
        assert_eq!(report.active_nodes, 2);
    }

    #[test]
    fn test_node_failure_does_not_redistribute() {
        let mut grid = pair();
        let mut log = EventLog::new();
        let report = CascadeEngine::default()
            .simulate(&mut grid, 20.0, UniformSurge, &mut log)
            .unwrap();

        // B reaches 10.8 and fails; the line is untouched at 4.8
        assert_eq!(report.failed_nodes(), vec![NodeId::new(1)]);
        assert!(report.failed_lines().is_empty());
        assert!(!log
            .events
            .iter()
            .any(|e| matches!(e, CascadeEvent::LoadRedistributed { .. })));
        let line = report.final_state.lines()[0];
        assert!(line.active);
        assert!((line.current_load - 4.8).abs() < 1e-12);
        // Only one active node left, so the survivor is trivially connected
        assert!(report.connected);
    }

    #[test]
    fn test_phases_in_order() {
        let mut grid = pair();
        let mut log = EventLog::new();
        CascadeEngine::default()
            .simulate(&mut grid, 20.0, UniformSurge, &mut log)
            .unwrap();
        assert_eq!(
            log.phases(),
            vec![
                CascadePhase::Surging,
                CascadePhase::Propagating,
                CascadePhase::Quiescent,
                CascadePhase::Reported,
                CascadePhase::RolledBack,
            ]
        );
        assert!(matches!(
            log.events.last(),
            Some(CascadeEvent::PhaseChanged {
                phase: CascadePhase::RolledBack
            })
        ));
    }

    #[test]
    fn test_scripted_factors_applied_in_element_order() {
        let mut grid = pair();
        let mut log = EventLog::new();
        CascadeEngine::default()
            .simulate(
                &mut grid,
                10.0,
                ScriptedFactors::new(vec![0.5, 1.0, 1.5]),
                &mut log,
            )
            .unwrap();
        let adjusted: Vec<(ElementRef, f64)> = log
            .events
            .iter()
            .filter_map(|e| match e {
                CascadeEvent::LoadAdjusted {
                    element, factor, ..
                } => Some((*element, *factor)),
                _ => None,
            })
            .collect();
        assert_eq!(
            adjusted,
            vec![
                (ElementRef::Node(NodeId::new(0)), 0.5),
                (ElementRef::Node(NodeId::new(1)), 1.0),
                (ElementRef::Line(LineId::new(0)), 1.5),
            ]
        );
    }

    #[test]
    fn test_inactive_elements_are_not_surged() {
        let mut grid = pair();
        grid.set_active(ElementRef::Node(NodeId::new(1)), false)
            .unwrap();
        let report = CascadeEngine::default()
            .simulate(&mut grid, 50.0, UniformSurge, NoopObserver)
            .unwrap();
        assert_eq!(report.final_state.nodes()[1].load, 9.0);
        assert_eq!(report.final_state.nodes()[0].load, 7.5);
    }
}
