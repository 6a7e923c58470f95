//! Built-in demonstration grids.
//!
//! Each preset comes with the surge percentage it was designed around:
//! `stable` rides out its surge, `overload` tips a few elements over, and
//! `cascade` fails across most of the hub.

use crate::error::{FormatError, FormatResult};
use gridfail_core::{Grid, GridBuilder, GridResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    /// Surge (percent) that demonstrates the preset's behaviour
    pub suggested_percent: f64,
    nodes: &'static [(&'static str, f64, f64)],
    /// `(from, to, current_load, capacity)`
    lines: &'static [(usize, usize, f64, f64)],
}

impl Preset {
    pub fn build(&self) -> GridResult<Grid> {
        let mut builder = GridBuilder::new(self.nodes.len())?;
        for (index, &(name, load, max_capacity)) in self.nodes.iter().enumerate() {
            builder.add_node(index, name, load, max_capacity)?;
        }
        for &(from, to, current_load, capacity) in self.lines {
            builder.add_edge(from, to, capacity, current_load)?;
        }
        builder.build()
    }
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "stable",
        description: "Well-balanced grid with safe margins",
        suggested_percent: 15.0,
        nodes: &[
            ("Main", 80.0, 150.0),
            ("North", 60.0, 120.0),
            ("South", 70.0, 130.0),
            ("East", 50.0, 100.0),
            ("West", 65.0, 110.0),
        ],
        lines: &[
            (0, 1, 30.0, 80.0),
            (0, 2, 35.0, 90.0),
            (0, 3, 25.0, 75.0),
            (0, 4, 40.0, 85.0),
            (1, 4, 20.0, 60.0),
            (2, 3, 15.0, 50.0),
        ],
    },
    Preset {
        name: "overload",
        description: "Grid on the edge of overload",
        suggested_percent: 8.0,
        nodes: &[
            ("A", 95.0, 100.0),
            ("B", 90.0, 100.0),
            ("C", 85.0, 100.0),
            ("D", 80.0, 100.0),
        ],
        lines: &[
            (0, 1, 45.0, 50.0),
            (1, 2, 42.0, 50.0),
            (2, 3, 38.0, 50.0),
            (3, 0, 35.0, 50.0),
            (0, 2, 40.0, 50.0),
        ],
    },
    Preset {
        name: "cascade",
        description: "Heavily loaded hub that fails in a chain",
        suggested_percent: 12.0,
        nodes: &[
            ("Hub", 180.0, 200.0),
            ("N1", 85.0, 100.0),
            ("N2", 90.0, 100.0),
            ("N3", 88.0, 100.0),
            ("N4", 92.0, 100.0),
            ("Remote", 70.0, 100.0),
        ],
        lines: &[
            (0, 1, 65.0, 70.0),
            (0, 2, 68.0, 70.0),
            (0, 3, 60.0, 70.0),
            (0, 4, 72.0, 75.0),
            (2, 5, 45.0, 50.0),
            (4, 5, 40.0, 50.0),
            (1, 3, 30.0, 40.0),
        ],
    },
];

pub fn find_preset(name: &str) -> FormatResult<&'static Preset> {
    PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| FormatError::UnknownPreset(name.to_string()))
}

/// Build a preset grid by name.
pub fn preset_grid(name: &str) -> FormatResult<Grid> {
    Ok(find_preset(name)?.build()?)
}
