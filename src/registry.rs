use std::collections::{BTreeMap, BTreeSet};

use crate::error::ExtractError;
use crate::locate::MarkerSet;
use crate::model::TableId;
use crate::schedule::ReportId;
use crate::select::RowSelection;

/// Row label of the outcome row in the monthly and quarterly tables.
pub const ACTUAL_ROW_LABEL: &str = "Faktisk";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPolicy {
    /// Only rows named in the caller's [`RowWhitelists`].
    KnownLabels,
    /// Every labeled row; the annual table has one row per variable.
    AcceptAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub table_id: TableId,
    pub title: String,
    pub markers: MarkerSet,
    pub row_policy: RowPolicy,
}

impl TableSpec {
    pub fn new(
        table_id: TableId,
        title: impl Into<String>,
        markers: MarkerSet,
        row_policy: RowPolicy,
    ) -> Self {
        Self {
            table_id,
            title: title.into(),
            markers,
            row_policy,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ExtractError> {
        let invalid = |reason: &str| ExtractError::InvalidTableSpec {
            table_id: self.table_id.to_string(),
            reason: reason.to_string(),
        };

        let groups = self.markers.groups();
        if groups.is_empty() || groups.iter().any(Vec::is_empty) {
            return Err(invalid("has no marker phrases"));
        }
        if groups.iter().flatten().any(|phrase| phrase.trim().is_empty()) {
            return Err(invalid("has an empty marker phrase"));
        }
        Ok(())
    }

    /// Resolves the spec's policy against the caller's labels.
    pub(crate) fn row_selection<'a>(
        &self,
        whitelists: &'a RowWhitelists,
    ) -> Result<RowSelection<'a>, ExtractError> {
        match self.row_policy {
            RowPolicy::AcceptAll => Ok(RowSelection::AcceptAll),
            RowPolicy::KnownLabels => {
                let labels = whitelists.for_table(self.table_id);
                if labels.is_empty() {
                    return Err(ExtractError::InvalidTableSpec {
                        table_id: self.table_id.to_string(),
                        reason: "selects known row labels but none were supplied".to_string(),
                    });
                }
                Ok(RowSelection::Whitelist(labels))
            }
        }
    }
}

/// The five tables read from each report.
#[must_use]
pub fn default_registry() -> Vec<TableSpec> {
    vec![
        TableSpec::new(
            TableId::ConsumerPrices,
            "Konsumpriser",
            MarkerSet::all_of(["Tabell 2a", "Konsumpriser"]),
            RowPolicy::KnownLabels,
        ),
        TableSpec::new(
            TableId::HousePrices,
            "Boligpriser",
            MarkerSet::all_of(["Tabell 2b", "Boligpriser"]),
            RowPolicy::KnownLabels,
        ),
        TableSpec::new(
            TableId::Unemployment,
            "Registrert ledighet",
            MarkerSet::all_of(["Tabell 2c", "ledighet"]),
            RowPolicy::KnownLabels,
        ),
        TableSpec::new(
            TableId::MainlandGdp,
            "BNP Fastlands-Norge, kvartalsvekst",
            MarkerSet::all_of(["Tabell 2d", "BNP"]),
            RowPolicy::KnownLabels,
        ),
        TableSpec::new(
            TableId::KeyProjections,
            "Anslag på sentrale størrelser",
            MarkerSet::all_of(["Tabell 3"])
                .or_all_of(["sentrale størrelser", "BNP Fastlands-Norge"]),
            RowPolicy::AcceptAll,
        ),
    ]
}

/// Row labels valid for the current report cycle.
///
/// Projection rows name the report they were made in, so the set changes
/// with every edition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowWhitelists {
    default: BTreeSet<String>,
    per_table: BTreeMap<TableId, BTreeSet<String>>,
}

impl RowWhitelists {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default: labels.into_iter().map(Into::into).collect(),
            per_table: BTreeMap::new(),
        }
    }

    /// `Faktisk` plus the projection rows of `report` and the report before it.
    #[must_use]
    pub fn for_report(report: ReportId) -> Self {
        Self::new([
            ACTUAL_ROW_LABEL.to_string(),
            report.previous().projection_label(),
            report.projection_label(),
        ])
    }

    /// Replaces the labels used for one table.
    #[must_use]
    pub fn with_table<I, S>(mut self, table_id: TableId, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.per_table
            .insert(table_id, labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn insert(&mut self, label: impl Into<String>) {
        self.default.insert(label.into());
    }

    #[must_use]
    pub fn for_table(&self, table_id: TableId) -> &BTreeSet<String> {
        self.per_table.get(&table_id).unwrap_or(&self.default)
    }
}
