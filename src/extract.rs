use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::error::ExtractError;
use crate::locate::locate_with_markers;
use crate::model::{PageSource, ParsedDocument, ParsedTable, RawGrid, TableId};
use crate::normalize::normalize_cells;
use crate::options::GridChoice;
use crate::registry::{RowWhitelists, TableSpec};
use crate::select::{RowSelection, SelectedRows, header_columns, select_rows};
use crate::warning::{ExtractWarning, WarningCode};

/// Where a table was found and how much of it was kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLocation {
    pub table_id: TableId,
    pub page_index: usize,
    pub grid_index: usize,
    pub row_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    pub located: Vec<TableLocation>,
    pub warnings: Vec<ExtractWarning>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub document: ParsedDocument,
    pub report: ExtractionReport,
}

/// Extracts every table in `specs` that can be located in `pages`.
///
/// Tables that are not found are absent from the result. Only caller
/// mistakes fail: an empty page slice or an unusable spec.
pub fn extract<P: PageSource>(
    pages: &[P],
    specs: &[TableSpec],
    whitelists: &RowWhitelists,
) -> Result<ParsedDocument, ExtractError> {
    extract_with_report(pages, specs, whitelists, GridChoice::First)
        .map(|extraction| extraction.document)
}

/// Like [`extract`], also reporting locations and what was skipped.
pub fn extract_with_report<P: PageSource>(
    pages: &[P],
    specs: &[TableSpec],
    whitelists: &RowWhitelists,
    grid_choice: GridChoice,
) -> Result<Extraction, ExtractError> {
    if pages.is_empty() {
        return Err(ExtractError::EmptyDocument);
    }
    let selections = resolve_specs(specs, whitelists)?;

    let mut extraction = Extraction::default();
    for (spec, selection) in specs.iter().zip(&selections) {
        let Some((table, location)) = extract_table(
            pages,
            spec,
            selection,
            grid_choice,
            &mut extraction.report.warnings,
        ) else {
            continue;
        };

        extraction.report.located.push(location);
        extraction.document.tables.insert(spec.table_id, table);
    }

    Ok(extraction)
}

fn resolve_specs<'a>(
    specs: &[TableSpec],
    whitelists: &'a RowWhitelists,
) -> Result<Vec<RowSelection<'a>>, ExtractError> {
    let mut seen = BTreeSet::new();
    specs
        .iter()
        .map(|spec| {
            spec.validate()?;
            if !seen.insert(spec.table_id) {
                return Err(ExtractError::InvalidTableSpec {
                    table_id: spec.table_id.to_string(),
                    reason: "is listed more than once".to_string(),
                });
            }
            spec.row_selection(whitelists)
        })
        .collect()
}

fn extract_table<P: PageSource>(
    pages: &[P],
    spec: &TableSpec,
    selection: &RowSelection<'_>,
    grid_choice: GridChoice,
    warnings: &mut Vec<ExtractWarning>,
) -> Option<(ParsedTable, TableLocation)> {
    let table_id = spec.table_id;
    let Some(page_index) = locate_with_markers(pages, &spec.markers) else {
        debug!(table = %table_id, "markers not found on any page");
        warnings.push(
            ExtractWarning::new(
                WarningCode::TableNotLocated,
                format!("no page mentions table {table_id} ({})", spec.title),
            )
            .with_table_id(table_id),
        );
        return None;
    };

    let grids = pages[page_index].tables();
    if grids.len() > 1 && grid_choice == GridChoice::First {
        warnings.push(
            ExtractWarning::new(
                WarningCode::MultipleGridsOnPage,
                format!(
                    "page holds {} grids; reading the first one for table {table_id}",
                    grids.len()
                ),
            )
            .with_table_id(table_id)
            .with_page_index(page_index),
        );
    }

    let Some((grid_index, grid, selected)) = pick_grid(grids, selection, grid_choice) else {
        warnings.push(
            ExtractWarning::new(
                WarningCode::NoGridOnPage,
                format!("table {table_id} was located but its page has no grid"),
            )
            .with_table_id(table_id)
            .with_page_index(page_index),
        );
        return None;
    };

    for label in &selected.duplicates {
        warnings.push(
            ExtractWarning::new(
                WarningCode::DuplicateRowLabel,
                format!("row '{label}' appears more than once; keeping the last"),
            )
            .with_table_id(table_id)
            .with_page_index(page_index),
        );
    }
    if selected.is_empty() {
        warnings.push(
            ExtractWarning::new(
                WarningCode::NoRowsSelected,
                format!("no row of table {table_id} matched the row selection"),
            )
            .with_table_id(table_id)
            .with_page_index(page_index),
        );
    }

    let mut table = ParsedTable::new(header_columns(grid));
    for row in selected.rows {
        table.insert(row.label, normalize_cells(row.cells));
    }

    info!(
        table = %table_id,
        page_index,
        grid_index,
        rows = table.len(),
        "table extracted"
    );

    let location = TableLocation {
        table_id,
        page_index,
        grid_index,
        row_count: table.len(),
    };
    Some((table, location))
}

fn pick_grid<'a>(
    grids: &'a [RawGrid],
    selection: &RowSelection<'_>,
    grid_choice: GridChoice,
) -> Option<(usize, &'a RawGrid, SelectedRows<'a>)> {
    match grid_choice {
        GridChoice::First => grids
            .first()
            .map(|grid| (0, grid, select_rows(grid, selection))),
        GridChoice::MostRows => {
            let mut best: Option<(usize, &'a RawGrid, SelectedRows<'a>)> = None;
            for (index, grid) in grids.iter().enumerate() {
                let selected = select_rows(grid, selection);
                if best
                    .as_ref()
                    .is_none_or(|(_, _, current)| selected.len() > current.len())
                {
                    best = Some((index, grid, selected));
                }
            }
            best
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{extract, extract_with_report};
    use crate::locate::MarkerSet;
    use crate::model::{Page, RawGrid, TableId};
    use crate::options::GridChoice;
    use crate::registry::{RowPolicy, RowWhitelists, TableSpec, default_registry};
    use crate::warning::WarningCode;

    fn page(text: &str, tables: Vec<RawGrid>) -> Page {
        Page {
            page_number: 1,
            text: text.to_string(),
            tables,
        }
    }

    fn cpi_grid() -> RawGrid {
        RawGrid::from_strings([
            vec!["", "jan", "feb"],
            vec!["Faktisk", "2,1", "-"],
            vec!["Ukjent rad", "9,9", "9,9"],
        ])
    }

    fn cpi_spec() -> TableSpec {
        TableSpec::new(
            TableId::ConsumerPrices,
            "Konsumpriser",
            MarkerSet::all_of(["Tabell 2a", "Konsumpriser"]),
            RowPolicy::KnownLabels,
        )
    }

    #[test]
    fn empty_page_slice_is_invalid_input() {
        let pages: Vec<Page> = Vec::new();
        let err = extract(&pages, &default_registry(), &RowWhitelists::new(["Faktisk"]))
            .expect_err("empty document should fail");
        assert!(err.is_invalid_input());
    }

    #[test]
    fn unmatched_markers_give_empty_document() {
        let pages = vec![page("Innledning", vec![cpi_grid()])];
        let document = extract(&pages, &default_registry(), &RowWhitelists::new(["Faktisk"]))
            .expect("extraction should succeed");
        assert!(document.is_empty());
    }

    #[test]
    fn extracts_whitelisted_rows_with_normalized_values() {
        let pages = vec![
            page("Tabell 2a", Vec::new()),
            page("Tabell 2a Konsumpriser", vec![cpi_grid()]),
        ];
        let document = extract(&pages, &[cpi_spec()], &RowWhitelists::new(["Faktisk"]))
            .expect("extraction should succeed");

        let table = document
            .get(TableId::ConsumerPrices)
            .expect("table should be located");
        assert_eq!(table.columns, vec!["jan", "feb"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("Faktisk"), Some(&["2.1".to_string(), "-".to_string()][..]));
    }

    #[test]
    fn located_page_without_grid_is_reported_and_skipped() {
        let pages = vec![page("Tabell 2a Konsumpriser", Vec::new())];
        let extraction = extract_with_report(
            &pages,
            &[cpi_spec()],
            &RowWhitelists::new(["Faktisk"]),
            GridChoice::First,
        )
        .expect("extraction should succeed");

        assert!(extraction.document.is_empty());
        assert_eq!(extraction.report.warnings.len(), 1);
        assert_eq!(extraction.report.warnings[0].code, WarningCode::NoGridOnPage);
        assert_eq!(extraction.report.warnings[0].page_index, Some(0));
    }

    #[test]
    fn located_table_with_no_matching_rows_is_kept_empty() {
        let pages = vec![page("Tabell 2a Konsumpriser", vec![cpi_grid()])];
        let extraction = extract_with_report(
            &pages,
            &[cpi_spec()],
            &RowWhitelists::new(["Anslag PPR 9/99"]),
            GridChoice::First,
        )
        .expect("extraction should succeed");

        let table = extraction
            .document
            .get(TableId::ConsumerPrices)
            .expect("table should be present");
        assert!(table.is_empty());
        assert_eq!(extraction.report.warnings[0].code, WarningCode::NoRowsSelected);
    }

    #[test]
    fn first_grid_wins_by_default_and_most_rows_can_override() {
        let chart_notes = RawGrid::from_strings([vec!["Kilde", "SSB"], vec!["Note", "1"]]);
        let pages = vec![page(
            "Tabell 2a Konsumpriser",
            vec![chart_notes, cpi_grid()],
        )];
        let whitelists = RowWhitelists::new(["Faktisk"]);

        let first = extract_with_report(&pages, &[cpi_spec()], &whitelists, GridChoice::First)
            .expect("extraction should succeed");
        assert!(
            first
                .document
                .get(TableId::ConsumerPrices)
                .is_some_and(|table| table.is_empty())
        );
        assert!(
            first
                .report
                .warnings
                .iter()
                .any(|warning| warning.code == WarningCode::MultipleGridsOnPage)
        );

        let best = extract_with_report(&pages, &[cpi_spec()], &whitelists, GridChoice::MostRows)
            .expect("extraction should succeed");
        assert_eq!(best.report.located[0].grid_index, 1);
        assert_eq!(best.report.located[0].row_count, 1);
        assert!(best.report.warnings.is_empty());
    }

    #[test]
    fn annual_rows_keep_document_order_and_last_duplicate() {
        let annual = RawGrid::from_strings([
            vec!["Variabel", "2025"],
            vec!["KPI", "3,5"],
            vec!["BNP Fastlands-Norge", "1,4"],
            vec!["Arbeidsledighet", "2,1"],
            vec!["KPI", "9,9"],
        ]);
        let pages = vec![page("Tabell 3 Anslag", vec![annual])];

        let extraction = extract_with_report(
            &pages,
            &default_registry(),
            &RowWhitelists::new(["Faktisk"]),
            GridChoice::First,
        )
        .expect("extraction should succeed");

        let table = extraction
            .document
            .get(TableId::KeyProjections)
            .expect("table 3 should be located");
        assert_eq!(
            table.labels().collect::<Vec<_>>(),
            vec!["KPI", "BNP Fastlands-Norge", "Arbeidsledighet"]
        );
        assert_eq!(table.get("KPI"), Some(&["9.9".to_string()][..]));
        assert!(
            extraction
                .report
                .warnings
                .iter()
                .any(|warning| warning.code == WarningCode::DuplicateRowLabel)
        );
    }

    #[test]
    fn duplicate_spec_ids_are_rejected() {
        let pages = vec![page("Tabell 2a Konsumpriser", vec![cpi_grid()])];
        let err = extract(
            &pages,
            &[cpi_spec(), cpi_spec()],
            &RowWhitelists::new(["Faktisk"]),
        )
        .expect_err("duplicate ids should fail");
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn spec_order_does_not_change_the_result() {
        let annual = RawGrid::from_strings([
            vec!["Variabel", "2024", "2025"],
            vec!["KPI", "3,5", "2,8"],
        ]);
        let pages = vec![
            page("Tabell 2a Konsumpriser", vec![cpi_grid()]),
            page("Tabell 3 Anslag", vec![annual]),
        ];
        let whitelists = RowWhitelists::new(["Faktisk"]);
        let mut reversed = default_registry();
        reversed.reverse();

        let forward = extract(&pages, &default_registry(), &whitelists)
            .expect("extraction should succeed");
        let backward =
            extract(&pages, &reversed, &whitelists).expect("extraction should succeed");
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 2);
    }
}
