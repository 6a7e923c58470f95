//! JSON grid documents.

use crate::error::FormatResult;
use gridfail_core::{Grid, GridBuilder, GridResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    pub load: f64,
    pub max_capacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    pub from: usize,
    pub to: usize,
    pub current_load: f64,
    pub capacity: f64,
}

/// Serialized grid. Node index is position in `nodes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridDocument {
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub lines: Vec<LineRecord>,
}

impl GridDocument {
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            nodes: grid
                .nodes()
                .map(|node| NodeRecord {
                    name: node.name.clone(),
                    load: node.load,
                    max_capacity: node.max_capacity,
                })
                .collect(),
            lines: grid
                .lines()
                .map(|line| LineRecord {
                    from: line.from.value(),
                    to: line.to.value(),
                    current_load: line.current_load,
                    capacity: line.capacity,
                })
                .collect(),
        }
    }

    /// Validate and build. Fails on the first rejected node or line.
    pub fn to_grid(&self) -> GridResult<Grid> {
        let mut builder = GridBuilder::new(self.nodes.len())?;
        for (index, node) in self.nodes.iter().enumerate() {
            builder.add_node(index, node.name.as_str(), node.load, node.max_capacity)?;
        }
        for line in &self.lines {
            builder.add_edge(line.from, line.to, line.capacity, line.current_load)?;
        }
        builder.build()
    }
}

pub fn parse_json(text: &str) -> FormatResult<Grid> {
    let document: GridDocument = serde_json::from_str(text)?;
    Ok(document.to_grid()?)
}

pub fn write_json(grid: &Grid) -> FormatResult<String> {
    Ok(serde_json::to_string_pretty(&GridDocument::from_grid(grid))?)
}

pub fn read_json(path: &Path) -> FormatResult<Grid> {
    let text = fs::read_to_string(path)?;
    parse_json(&text)
}

pub fn write_json_file(grid: &Grid, path: &Path) -> FormatResult<()> {
    fs::write(path, write_json(grid)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;
    use gridfail_core::{GridError, LineId};

    const DOC: &str = r#"{
        "nodes": [
            {"name": "A", "load": 8, "max_capacity": 10},
            {"name": "B", "load": 5, "max_capacity": 10}
        ],
        "lines": [
            {"from": 0, "to": 1, "current_load": 9, "capacity": 10}
        ]
    }"#;

    #[test]
    fn test_parse_document() {
        let grid = parse_json(DOC).unwrap();
        assert_eq!(grid.node_count(), 2);
        let line = grid.line(LineId::new(0)).unwrap();
        assert_eq!(line.current_load, 9.0);
        assert_eq!(line.capacity, 10.0);
    }

    #[test]
    fn test_lines_are_optional() {
        let grid = parse_json(r#"{"nodes":[{"name":"Solo","load":1,"max_capacity":2}]}"#)
            .unwrap();
        assert_eq!(grid.line_count(), 0);
    }

    #[test]
    fn test_invalid_grid_is_a_grid_error() {
        let bad = DOC.replace(r#""load": 8"#, r#""load": 80"#);
        match parse_json(&bad).unwrap_err() {
            FormatError::Grid(GridError::Validation { field, .. }) => assert_eq!(field, "load"),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(matches!(
            parse_json("{\"nodes\": 3}").unwrap_err(),
            FormatError::Json(_)
        ));
    }

    #[test]
    fn test_document_mirrors_grid() {
        let grid = parse_json(DOC).unwrap();
        let document = GridDocument::from_grid(&grid);
        assert_eq!(document.nodes[1].name, "B");
        assert_eq!(document.lines[0].from, 0);
        assert_eq!(document.to_grid().unwrap().snapshot(), grid.snapshot());
    }
}
