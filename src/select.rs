use std::collections::{BTreeSet, HashMap};

use crate::model::RawGrid;

/// Rows with fewer cells than this carry no data beyond the label.
pub const MIN_ROW_CELLS: usize = 2;

/// A selection policy resolved against the caller's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSelection<'a> {
    /// Keep rows whose trimmed label is one of these.
    Whitelist(&'a BTreeSet<String>),
    /// Keep every row with a non-empty label.
    AcceptAll,
}

impl RowSelection<'_> {
    fn accepts(&self, label: &str) -> bool {
        match self {
            Self::Whitelist(labels) => labels.contains(label),
            Self::AcceptAll => !label.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedRow<'a> {
    pub label: String,
    pub cells: &'a [Option<String>],
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedRows<'a> {
    /// Kept rows in grid order, one per label.
    pub rows: Vec<SelectedRow<'a>>,
    /// Labels whose earlier row was replaced by a later one.
    pub duplicates: Vec<String>,
}

impl SelectedRows<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Header cells of the grid's first row, label column excluded.
#[must_use]
pub fn header_columns(grid: &RawGrid) -> Vec<String> {
    grid.rows
        .first()
        .map(|header| {
            header
                .iter()
                .skip(1)
                .map(|cell| cell.as_deref().map(str::trim).unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Picks the labeled data rows of `grid`. The first row is the header and is
/// never selected. A repeated label keeps its first position but takes the
/// cells of its last row.
#[must_use]
pub fn select_rows<'a>(grid: &'a RawGrid, selection: &RowSelection<'_>) -> SelectedRows<'a> {
    let mut selected = SelectedRows::default();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in grid.rows.iter().skip(1) {
        if row.len() < MIN_ROW_CELLS {
            continue;
        }

        let label = row[0].as_deref().map(str::trim).unwrap_or_default();
        if !selection.accepts(label) {
            continue;
        }

        if let Some(&index) = positions.get(label) {
            selected.rows[index] = SelectedRow {
                label: label.to_string(),
                cells: &row[1..],
            };
            selected.duplicates.push(label.to_string());
            continue;
        }

        positions.insert(label.to_string(), selected.rows.len());
        selected.rows.push(SelectedRow {
            label: label.to_string(),
            cells: &row[1..],
        });
    }

    selected
}
