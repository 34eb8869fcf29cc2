//! Dashboard collaborator: business data loading and layout.
//!
//! Dashboards read rows from `<data root>/dashboard/business_data/<file>.json`
//! and turn them into a small fixed layout the presentation layer can draw:
//! a text grid of at most [`GRID_ROWS`] rows, or a bar graph of at most
//! [`GRAPH_BARS`] bars. Unreadable data is logged and drawn as zero rows.

use arrayvec::ArrayVec;
use bevy_ecs::prelude::Resource;
use log::warn;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::PathBuf;

use crate::components::appearance::Color;
use crate::components::behavior::DashboardKind;
use crate::resources::recipes::DataLoadError;

pub const GRID_ROWS: usize = 5;
pub const GRAPH_BARS: usize = 6;
pub const BAR_SPACING: f32 = 0.4;
const DEFAULT_QUANTITY: f64 = 10.0;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct DataRow {
    #[serde(rename = "Unit ID", default)]
    pub unit_id: serde_json::Value,
    #[serde(rename = "Unit Name", default)]
    pub unit_name: serde_json::Value,
    #[serde(rename = "Quantity", default)]
    pub quantity: Option<f64>,
}

fn display(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "undefined".to_string(),
        other => other.to_string(),
    }
}

impl DataRow {
    pub fn label(&self) -> String {
        let qty = match self.quantity {
            Some(q) => q.to_string(),
            None => "undefined".to_string(),
        };
        format!("{} | {} [{}]", display(&self.unit_id), display(&self.unit_name), qty)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub x: f32,
    pub height: f32,
    pub color: Color,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DashboardLayout {
    Grid {
        labels: ArrayVec<String, GRID_ROWS>,
    },
    Graph {
        bars: ArrayVec<Bar, GRAPH_BARS>,
    },
}

impl DashboardLayout {
    pub fn build(kind: DashboardKind, rows: &[DataRow]) -> Self {
        match kind {
            DashboardKind::Grid => DashboardLayout::Grid {
                labels: rows.iter().take(GRID_ROWS).map(DataRow::label).collect(),
            },
            DashboardKind::Graph => {
                let shown = &rows[..rows.len().min(GRAPH_BARS)];
                let count = if shown.is_empty() { 5 } else { shown.len() };
                let start_x = -((count - 1) as f32 * BAR_SPACING) / 2.0;
                let bars = shown
                    .iter()
                    .enumerate()
                    .map(|(i, row)| {
                        let qty = row.quantity.filter(|q| *q != 0.0).unwrap_or(DEFAULT_QUANTITY);
                        Bar {
                            x: start_x + i as f32 * BAR_SPACING,
                            height: (qty / 10.0) as f32 + 0.5,
                            color: Color::from_hsv(i as f32 / count as f32, 0.8, 1.0),
                            label: qty.to_string(),
                        }
                    })
                    .collect();
                DashboardLayout::Graph { bars }
            }
        }
    }
}

/// Where dashboard rows come from.
#[derive(Resource, Debug, Default)]
pub struct DashboardData {
    dir: Option<PathBuf>,
    overrides: FxHashMap<String, Vec<DataRow>>,
}

impl DashboardData {
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            overrides: FxHashMap::default(),
        }
    }

    /// Serve `data_file` from memory instead of disk.
    pub fn insert(&mut self, data_file: impl Into<String>, rows: Vec<DataRow>) {
        self.overrides.insert(data_file.into(), rows);
    }

    pub fn load(&self, data_file: &str) -> Result<Vec<DataRow>, DataLoadError> {
        if data_file.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(rows) = self.overrides.get(data_file) {
            return Ok(rows.clone());
        }
        let Some(dir) = &self.dir else {
            return Ok(Vec::new());
        };
        let path = dir.join(format!("{data_file}.json"));
        let text = std::fs::read_to_string(&path).map_err(|source| DataLoadError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| DataLoadError::Parse { path, source })
    }

    /// Rows for `data_file`; failures are logged and yield no rows.
    pub fn rows(&self, data_file: &str) -> Vec<DataRow> {
        self.load(data_file).unwrap_or_else(|e| {
            warn!("Failed to load dashboard data '{}': {}", data_file, e);
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, name: &str, qty: Option<f64>) -> DataRow {
        DataRow {
            unit_id: serde_json::Value::String(id.into()),
            unit_name: serde_json::Value::String(name.into()),
            quantity: qty,
        }
    }

    #[test]
    fn grid_shows_at_most_five_rows() {
        let rows: Vec<_> = (0..8).map(|i| row(&format!("U{i}"), "Sword", Some(3.0))).collect();
        match DashboardLayout::build(DashboardKind::Grid, &rows) {
            DashboardLayout::Grid { labels } => {
                assert_eq!(labels.len(), 5);
                assert_eq!(labels[0], "U0 | Sword [3]");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn graph_bars_are_centred_and_scaled() {
        let rows = vec![row("a", "A", Some(20.0)), row("b", "B", None), row("c", "C", Some(5.0))];
        let DashboardLayout::Graph { bars } = DashboardLayout::build(DashboardKind::Graph, &rows)
        else {
            panic!("expected graph");
        };
        assert_eq!(bars.len(), 3);
        assert!((bars[0].x + 0.4).abs() < 1e-6);
        assert!(bars[1].x.abs() < 1e-6);
        assert!((bars[0].height - 2.5).abs() < 1e-6);
        // Missing quantity draws as 10.
        assert!((bars[1].height - 1.5).abs() < 1e-6);
        assert!((bars[2].height - 1.0).abs() < 1e-6);
    }

    #[test]
    fn graph_caps_at_six_bars() {
        let rows: Vec<_> = (0..9).map(|i| row("x", "y", Some(i as f64 + 1.0))).collect();
        let DashboardLayout::Graph { bars } = DashboardLayout::build(DashboardKind::Graph, &rows)
        else {
            panic!("expected graph");
        };
        assert_eq!(bars.len(), GRAPH_BARS);
    }

    #[test]
    fn unreadable_data_is_empty() {
        let data = DashboardData::from_dir("/no/such/dir");
        assert!(data.load("sales").is_err());
        assert!(data.rows("sales").is_empty());
        assert!(data.rows("").is_empty());
    }

    #[test]
    fn rows_parse_from_business_json() {
        let rows: Vec<DataRow> = serde_json::from_str(
            r#"[{"Unit ID": 101, "Unit Name": "Iron Helm", "Quantity": 12}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].label(), "101 | Iron Helm [12]");
    }
}
