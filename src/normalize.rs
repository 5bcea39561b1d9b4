/// Token emitted for cells that carry no value.
pub const MISSING_VALUE: &str = "-";

const NO_DATA_MARKERS: [&str; 4] = ["none", "nan", "null", "n/a"];

fn is_no_data(value: &str) -> bool {
    value.is_empty()
        || value == MISSING_VALUE
        || NO_DATA_MARKERS
            .iter()
            .any(|marker| value.eq_ignore_ascii_case(marker))
}

/// Maps a raw cell to its canonical token. Never fails: anything unexpected
/// comes out as either the cell text with decimal points or [`MISSING_VALUE`].
#[must_use]
pub fn normalize_cell(cell: Option<&str>) -> String {
    let Some(raw) = cell else {
        return MISSING_VALUE.to_string();
    };

    let value = raw.trim().replace(',', ".");
    if is_no_data(&value) {
        return MISSING_VALUE.to_string();
    }

    value
}

pub(crate) fn normalize_cells(cells: &[Option<String>]) -> Vec<String> {
    cells
        .iter()
        .map(|cell| normalize_cell(cell.as_deref()))
        .collect()
}
