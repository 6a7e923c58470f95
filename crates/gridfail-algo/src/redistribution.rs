//! Load redistribution after a line failure.
//!
//! When a line trips, its flow has to go somewhere. The default policy,
//! [`ProportionalSlack`], pools the spare capacity of every line still
//! serving either endpoint and hands out the failed flow in proportion to
//! each line's share of that pool:
//!
//! ```text
//! slack(e)      = capacity(e) - current_load(e)
//! additional(e) = L * slack(e) / Σ slack
//! ```
//!
//! Only lines that are active, whose far endpoint is active, and which have
//! positive slack take part. An endpoint with no such line raises a
//! capacity-exhaustion warning; if neither endpoint has one the flow is
//! dropped. This is a topological heuristic, not a power-flow solution.

use gridfail_core::{ElementRef, Grid, GridResult, LineId, NodeId};
use serde::Serialize;

/// One line's portion of a redistributed flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    /// Endpoint of the failed line this share was reached through
    pub endpoint: NodeId,
    pub line: LineId,
    /// Slack before the share was added
    pub slack: f64,
    pub amount: f64,
}

/// What happened to a failed line's flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Redistribution {
    pub failed_load: f64,
    pub total_slack: f64,
    pub shares: Vec<Share>,
    /// Endpoints that had no line able to take load
    pub exhausted_endpoints: Vec<NodeId>,
    /// Flow that could not be placed anywhere
    pub dropped_load: f64,
}

impl Redistribution {
    /// Sum of all shares. Equals `failed_load` whenever `total_slack > 0`.
    pub fn total_assigned(&self) -> f64 {
        self.shares.iter().map(|share| share.amount).sum()
    }
}

/// Strategy for moving a failed line's flow onto the rest of the grid.
pub trait RedistributionPolicy {
    /// Place `failed_load` from a line between `endpoints` that has just been
    /// deactivated. Mutates line loads in `grid`.
    fn redistribute(
        &self,
        grid: &mut Grid,
        failed_load: f64,
        endpoints: (NodeId, NodeId),
    ) -> GridResult<Redistribution>;
}

/// Proportional-to-slack sharing across both endpoints' surviving lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalSlack;

impl RedistributionPolicy for ProportionalSlack {
    fn redistribute(
        &self,
        grid: &mut Grid,
        failed_load: f64,
        endpoints: (NodeId, NodeId),
    ) -> GridResult<Redistribution> {
        let mut candidates: Vec<(NodeId, LineId, f64)> = Vec::new();
        let mut exhausted_endpoints = Vec::new();
        for endpoint in [endpoints.0, endpoints.1] {
            let before = candidates.len();
            for line in grid.lines_at(endpoint)? {
                if !line.active || line.slack() <= 0.0 {
                    continue;
                }
                let Some(far) = line.other_end(endpoint) else {
                    continue;
                };
                if grid.node(far)?.active {
                    candidates.push((endpoint, line.id, line.slack()));
                }
            }
            if candidates.len() == before {
                exhausted_endpoints.push(endpoint);
            }
        }

        let total_slack: f64 = candidates.iter().map(|(_, _, slack)| slack).sum();
        if candidates.is_empty() || total_slack <= 0.0 {
            return Ok(Redistribution {
                failed_load,
                total_slack: 0.0,
                shares: Vec::new(),
                exhausted_endpoints,
                dropped_load: failed_load,
            });
        }

        let mut shares = Vec::with_capacity(candidates.len());
        for (endpoint, line, slack) in candidates {
            let amount = failed_load * slack / total_slack;
            let element = ElementRef::Line(line);
            let current = grid.load(element)?;
            grid.set_load(element, current + amount)?;
            shares.push(Share {
                endpoint,
                line,
                slack,
                amount,
            });
        }
        Ok(Redistribution {
            failed_load,
            total_slack,
            shares,
            exhausted_endpoints,
            dropped_load: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfail_core::GridBuilder;

    /// Star around node 0 plus a line 1-2 that will be failed.
    fn grid() -> Grid {
        let mut b = GridBuilder::new(5).unwrap();
        for i in 0..5 {
            b.add_node(i, format!("N{i}"), 1.0, 100.0).unwrap();
        }
        b.add_edge(1, 2, 10.0, 6.0).unwrap(); // 0: failing line
        b.add_edge(1, 0, 10.0, 2.0).unwrap(); // 1: slack 8
        b.add_edge(1, 3, 10.0, 8.0).unwrap(); // 2: slack 2
        b.add_edge(2, 4, 10.0, 10.0).unwrap(); // 3: no slack
        b.add_edge(2, 0, 10.0, 5.0).unwrap(); // 4: slack 5
        b.build().unwrap()
    }

    fn fail_first_line(grid: &mut Grid) -> f64 {
        let load = grid.line(LineId::new(0)).unwrap().current_load;
        grid.set_active(ElementRef::Line(LineId::new(0)), false)
            .unwrap();
        load
    }

    #[test]
    fn test_shares_are_proportional_to_slack() {
        let mut grid = grid();
        let load = fail_first_line(&mut grid);
        let out = ProportionalSlack
            .redistribute(&mut grid, load, (NodeId::new(1), NodeId::new(2)))
            .unwrap();

        assert_eq!(out.total_slack, 15.0);
        let lines: Vec<usize> = out.shares.iter().map(|s| s.line.value()).collect();
        assert_eq!(lines, vec![1, 2, 4]);
        for share in &out.shares {
            assert_eq!(share.amount, load * share.slack / out.total_slack);
        }
        assert!((out.total_assigned() - load).abs() < 1e-9);
        assert!(out.exhausted_endpoints.is_empty());
        assert_eq!(out.dropped_load, 0.0);

        let line1 = grid.line(LineId::new(1)).unwrap();
        assert!((line1.current_load - (2.0 + 6.0 * 8.0 / 15.0)).abs() < 1e-12);
        // Saturated line is untouched
        assert_eq!(grid.line(LineId::new(3)).unwrap().current_load, 10.0);
    }

    #[test]
    fn test_inactive_far_end_is_skipped() {
        let mut grid = grid();
        grid.set_active(ElementRef::Node(NodeId::new(0)), false)
            .unwrap();
        let load = fail_first_line(&mut grid);
        let out = ProportionalSlack
            .redistribute(&mut grid, load, (NodeId::new(1), NodeId::new(2)))
            .unwrap();
        // Only 1-3 qualifies; endpoint 2 has nothing left
        assert_eq!(out.shares.len(), 1);
        assert_eq!(out.shares[0].line, LineId::new(2));
        assert_eq!(out.exhausted_endpoints, vec![NodeId::new(2)]);
        assert!((out.total_assigned() - load).abs() < 1e-12);
    }

    #[test]
    fn test_no_slack_anywhere_drops_load() {
        let mut b = GridBuilder::new(3).unwrap();
        for i in 0..3 {
            b.add_node(i, format!("N{i}"), 1.0, 10.0).unwrap();
        }
        b.add_edge(0, 1, 5.0, 5.0).unwrap();
        b.add_edge(1, 2, 5.0, 5.0).unwrap();
        let mut grid = b.build().unwrap();
        let before = grid.line(LineId::new(1)).unwrap().current_load;
        let load = fail_first_line(&mut grid);

        let out = ProportionalSlack
            .redistribute(&mut grid, load, (NodeId::new(0), NodeId::new(1)))
            .unwrap();
        assert!(out.shares.is_empty());
        assert_eq!(out.dropped_load, 5.0);
        assert_eq!(
            out.exhausted_endpoints,
            vec![NodeId::new(0), NodeId::new(1)]
        );
        assert_eq!(grid.line(LineId::new(1)).unwrap().current_load, before);
    }

    #[test]
    fn test_policy_is_deterministic() {
        let mut a = grid();
        let mut b = grid();
        let la = fail_first_line(&mut a);
        let lb = fail_first_line(&mut b);
        let ends = (NodeId::new(1), NodeId::new(2));
        assert_eq!(
            ProportionalSlack.redistribute(&mut a, la, ends).unwrap(),
            ProportionalSlack.redistribute(&mut b, lb, ends).unwrap()
        );
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
