//! # gridfail-algo: Cascade Simulation and Criticality Screening
//!
//! Algorithms that run against a [`gridfail_core::Grid`]:
//!
//! - [`cascade`] - surge a grid and propagate overload failures to quiescence
//! - [`redistribution`] - where a failed line's flow goes
//! - [`critical`] - single-element removal screening
//! - [`surge`] - per-element surge factor sources (uniform, seeded random, scripted)
//! - [`events`] - structured events and the observer seam
//!
//! Every operation here borrows the grid mutably and hands it back in the
//! state it was given.
//!
//! ```rust
//! use gridfail_algo::{CascadeEngine, NoopObserver, UniformSurge};
//! use gridfail_core::GridBuilder;
//!
//! let mut b = GridBuilder::new(2).unwrap();
//! b.add_node(0, "A", 5.0, 10.0).unwrap();
//! b.add_node(1, "B", 5.0, 10.0).unwrap();
//! b.add_edge(0, 1, 10.0, 9.0).unwrap();
//! let mut grid = b.build().unwrap();
//!
//! let report = CascadeEngine::default()
//!     .simulate(&mut grid, 20.0, UniformSurge, NoopObserver)
//!     .unwrap();
//! assert_eq!(report.failed_lines().len(), 1);
//! assert!(grid.line(gridfail_core::LineId::new(0)).unwrap().active);
//! ```

pub mod cascade;
pub mod critical;
pub mod error;
pub mod events;
pub mod redistribution;
pub mod surge;

pub use cascade::{CascadeConfig, CascadeEngine, CascadeReport, FailureRecord};
pub use critical::{CriticalAnalyzer, CriticalElement, CriticalReport, Criticality};
pub use error::{CascadeError, CascadeResult};
pub use events::{CascadeEvent, CascadeObserver, CascadePhase, EventLog, NoopObserver};
pub use redistribution::{ProportionalSlack, Redistribution, RedistributionPolicy, Share};
pub use surge::{
    surge_multiplier, validate_factor_range, validate_percent, RandomSurge, ScriptedFactors,
    SurgeFactors, UniformSurge, RANDOM_FACTOR_RANGE,
};
