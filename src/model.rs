use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::ExtractError;

/// One row of a [`RawGrid`]; a cell is `None` when the reader found nothing there.
pub type RawRow = Vec<Option<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGrid {
    pub rows: Vec<RawRow>,
}

impl RawGrid {
    #[must_use]
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }

    /// Builds a grid where every cell is present, mostly useful in tests.
    #[must_use]
    pub fn from_strings<R, C, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|cell| Some(cell.into())).collect())
                .collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What the extraction core needs from a rendered page.
pub trait PageSource {
    fn text(&self) -> &str;
    fn tables(&self) -> &[RawGrid];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub page_number: u32,
    pub text: String,
    pub tables: Vec<RawGrid>,
}

impl PageSource for Page {
    fn text(&self) -> &str {
        &self.text
    }

    fn tables(&self) -> &[RawGrid] {
        &self.tables
    }
}

impl<T: PageSource + ?Sized> PageSource for &T {
    fn text(&self) -> &str {
        (**self).text()
    }

    fn tables(&self) -> &[RawGrid] {
        (**self).tables()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TableId {
    #[serde(rename = "2a")]
    ConsumerPrices,
    #[serde(rename = "2b")]
    HousePrices,
    #[serde(rename = "2c")]
    Unemployment,
    #[serde(rename = "2d")]
    MainlandGdp,
    #[serde(rename = "3")]
    KeyProjections,
}

impl TableId {
    pub const ALL: [TableId; 5] = [
        Self::ConsumerPrices,
        Self::HousePrices,
        Self::Unemployment,
        Self::MainlandGdp,
        Self::KeyProjections,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConsumerPrices => "2a",
            Self::HousePrices => "2b",
            Self::Unemployment => "2c",
            Self::MainlandGdp => "2d",
            Self::KeyProjections => "3",
        }
    }
}

impl Display for TableId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableId {
    type Err = ExtractError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let trimmed = trimmed
            .strip_prefix("Tabell")
            .map_or(trimmed, str::trim_start);
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ExtractError::InvalidTableId(value.to_string()))
    }
}

/// Rows of one table keyed by label, in the order the grid lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedTable {
    /// Header cells of the source grid, label column excluded.
    pub columns: Vec<String>,
    #[serde(serialize_with = "serialize_rows")]
    rows: Vec<(String, Vec<String>)>,
}

fn serialize_rows<S: Serializer>(
    rows: &[(String, Vec<String>)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(rows.iter().map(|(label, values)| (label, values)))
}

impl ParsedTable {
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Sets the values of `label`. A label already present keeps its
    /// position and gets the new values; the old ones are returned.
    pub fn insert(&mut self, label: impl Into<String>, values: Vec<String>) -> Option<Vec<String>> {
        let label = label.into();
        match self.rows.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, current)) => Some(std::mem::replace(current, values)),
            None => {
                self.rows.push((label, values));
                None
            }
        }
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.rows
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, values)| values.as_slice())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(label, _)| label.as_str())
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.rows
            .iter()
            .map(|(label, values)| (label.as_str(), values.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParsedDocument {
    pub tables: BTreeMap<TableId, ParsedTable>,
}

impl ParsedDocument {
    #[must_use]
    pub fn get(&self, table_id: TableId) -> Option<&ParsedTable> {
        self.tables.get(&table_id)
    }

    #[must_use]
    pub fn contains(&self, table_id: TableId) -> bool {
        self.tables.contains_key(&table_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
