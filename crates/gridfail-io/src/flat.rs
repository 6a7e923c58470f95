//! The whitespace-separated flat grid file.
//!
//! ```text
//! N
//! name load max_capacity        (N times, node index = position)
//! M
//! from to current_load capacity (M times)
//! ```
//!
//! The reader works on a token stream, so line breaks are not significant,
//! but every token remembers its line for error messages. Names cannot
//! contain whitespace.

use crate::error::{FormatError, FormatResult};
use gridfail_core::{Grid, GridBuilder};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;

struct Tokens<'a> {
    inner: Vec<(usize, &'a str)>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        let inner = text
            .lines()
            .enumerate()
            .flat_map(|(idx, line)| line.split_whitespace().map(move |tok| (idx + 1, tok)))
            .collect();
        Self { inner, pos: 0 }
    }

    /// Line of the next token, or of the last one when exhausted.
    fn line(&self) -> usize {
        self.inner
            .get(self.pos)
            .or_else(|| self.inner.last())
            .map(|(line, _)| *line)
            .unwrap_or(0)
    }

    fn remaining(&self) -> usize {
        self.inner.len().saturating_sub(self.pos)
    }

    fn next(&mut self, what: &str) -> FormatResult<(usize, &'a str)> {
        let token = self.inner.get(self.pos).copied().ok_or_else(|| {
            FormatError::parse(self.line(), format!("unexpected end of input, expected {what}"))
        })?;
        self.pos += 1;
        Ok(token)
    }

    fn parse<T: FromStr>(&mut self, what: &str) -> FormatResult<(usize, T)> {
        let (line, token) = self.next(what)?;
        token
            .parse()
            .map(|value| (line, value))
            .map_err(|_| FormatError::parse(line, format!("expected {what}, found '{token}'")))
    }
}

/// Parse a flat grid description.
pub fn parse_flat(text: &str) -> FormatResult<Grid> {
    let mut tokens = Tokens::new(text);

    let (line, node_count) = tokens.parse::<usize>("node count")?;
    // each node needs three tokens
    if node_count > tokens.remaining() / 3 {
        return Err(FormatError::parse(
            line,
            format!(
                "node count {node_count} exceeds the {} tokens that follow",
                tokens.remaining()
            ),
        ));
    }
    let mut builder =
        GridBuilder::new(node_count).map_err(|err| FormatError::parse(line, err.to_string()))?;
    for index in 0..node_count {
        let (line, name) = tokens.next("node name")?;
        let (_, load) = tokens.parse::<f64>("node load")?;
        let (_, max_capacity) = tokens.parse::<f64>("node capacity")?;
        builder
            .add_node(index, name, load, max_capacity)
            .map_err(|err| FormatError::parse(line, err.to_string()))?;
    }

    let (_, line_count) = tokens.parse::<usize>("line count")?;
    for _ in 0..line_count {
        let (line, from) = tokens.parse::<usize>("from index")?;
        let (_, to) = tokens.parse::<usize>("to index")?;
        let (_, current_load) = tokens.parse::<f64>("line load")?;
        let (_, capacity) = tokens.parse::<f64>("line capacity")?;
        builder
            .add_edge(from, to, capacity, current_load)
            .map_err(|err| FormatError::parse(line, err.to_string()))?;
    }

    if let Some(&(line, token)) = tokens.inner.get(tokens.pos) {
        return Err(FormatError::parse(
            line,
            format!("unexpected trailing token '{token}'"),
        ));
    }
    Ok(builder.build()?)
}

/// Render a grid as a flat file. Only topology and loads are written; active
/// flags are not part of the format.
pub fn write_flat(grid: &Grid) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", grid.node_count());
    for node in grid.nodes() {
        let _ = writeln!(out, "{} {} {}", node.name, node.load, node.max_capacity);
    }
    let _ = writeln!(out, "{}", grid.line_count());
    for line in grid.lines() {
        let _ = writeln!(
            out,
            "{} {} {} {}",
            line.from, line.to, line.current_load, line.capacity
        );
    }
    out
}

pub fn read_flat(path: &Path) -> FormatResult<Grid> {
    let text = fs::read_to_string(path)?;
    parse_flat(&text)
}

pub fn write_flat_file(grid: &Grid, path: &Path) -> FormatResult<()> {
    fs::write(path, write_flat(grid))?;
    Ok(())
}
