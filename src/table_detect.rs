use crate::model::{RawGrid, RawRow};
use crate::table_parse::{
    modal_width, soft_split_line_into_cells, split_label_and_values, split_line_into_cells,
};

const MIN_GRID_CELLS: usize = 2;

fn looks_like_sentence(line: &str) -> bool {
    ['.', '!', '?', ':']
        .iter()
        .any(|punctuation| line.trim_end().ends_with(*punctuation))
}

fn split_row(line: &str) -> Vec<String> {
    let cells = split_line_into_cells(line);
    if cells.len() >= MIN_GRID_CELLS {
        return cells;
    }
    split_label_and_values(line)
}

/// A header line such as `jan feb mar` printed above the first data row.
fn header_from_line(line: &str, width: usize) -> Option<Vec<String>> {
    if line.trim().is_empty() || looks_like_sentence(line) {
        return None;
    }
    let cells = split_line_into_cells(line);
    if cells.len() + 1 == width {
        return Some(cells);
    }
    let tokens = soft_split_line_into_cells(line);
    (tokens.len() + 1 == width).then_some(tokens)
}

fn into_grid(rows: Vec<Vec<String>>) -> RawGrid {
    let data_width = modal_width(&rows[1..]);
    let mut grid = rows
        .into_iter()
        .map(|row| row.into_iter().map(Some).collect::<RawRow>())
        .collect::<Vec<_>>();

    // Header rows usually leave the label column blank.
    if grid[0].len() + 1 == data_width {
        grid[0].insert(0, None);
    }

    RawGrid::new(grid)
}

/// Groups consecutive multi-cell lines of `text` into grids.
pub(crate) fn detect_grids(text: &str) -> Vec<RawGrid> {
    let mut grids = Vec::new();
    let mut current_rows: Vec<Vec<String>> = Vec::new();
    let mut previous_line: Option<&str> = None;

    let flush_current = |rows: &mut Vec<Vec<String>>, grids: &mut Vec<RawGrid>| {
        if rows.len() >= 2 {
            grids.push(into_grid(std::mem::take(rows)));
        } else {
            rows.clear();
        }
    };

    for line in text.lines() {
        let cells = split_row(line);
        if cells.len() < MIN_GRID_CELLS {
            flush_current(&mut current_rows, &mut grids);
            previous_line = Some(line);
            continue;
        }

        if current_rows.is_empty()
            && let Some(header) =
                previous_line.and_then(|previous| header_from_line(previous, cells.len()))
        {
            current_rows.push(header);
        }
        current_rows.push(cells);
        previous_line = None;
    }

    flush_current(&mut current_rows, &mut grids);
    grids
}

#[cfg(test)]
mod tests {
    use super::detect_grids;
    use crate::model::RawGrid;

    #[test]
    fn detects_grid_below_title() {
        let text = "Tabell 2a Konsumpriser\n  jan  feb  mar\nFaktisk  2,1  2,3  2,2\nAnslag PPR 4/25  2,0  2,2  2,4\n";
        let grids = detect_grids(text);
        assert_eq!(grids.len(), 1);
        assert_eq!(
            grids[0].rows[0],
            vec![None, Some("jan".to_string()), Some("feb".to_string()), Some("mar".to_string())]
        );
        assert_eq!(grids[0].rows[2][0].as_deref(), Some("Anslag PPR 4/25"));
    }

    #[test]
    fn single_spaced_header_above_grid_is_adopted() {
        let text = "jan feb\nFaktisk 1,0 1,1\nAnslag PPR 3/25 0,9 1,2";
        let grids = detect_grids(text);
        assert_eq!(
            grids,
            vec![RawGrid::new(vec![
                vec![None, Some("jan".to_string()), Some("feb".to_string())],
                vec![Some("Faktisk".to_string()), Some("1,0".to_string()), Some("1,1".to_string())],
                vec![
                    Some("Anslag PPR 3/25".to_string()),
                    Some("0,9".to_string()),
                    Some("1,2".to_string())
                ],
            ])]
        );
    }

    #[test]
    fn blank_lines_separate_grids() {
        let text = "A  1  2\nB  3  4\n\nC  5\nD  6\n";
        let grids = detect_grids(text);
        assert_eq!(grids.len(), 2);
        assert_eq!(grids[1].rows.len(), 2);
    }

    #[test]
    fn lone_rows_and_prose_are_not_grids() {
        let text = "Dette er en setning.\nFaktisk  2,1\nMer tekst her.";
        assert!(detect_grids(text).is_empty());
    }
}
