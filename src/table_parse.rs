use std::collections::HashMap;

/// Splits on tabs and on runs of two or more spaces.
pub(crate) fn split_line_into_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut whitespace_run = 0_usize;

    for ch in trimmed.chars() {
        if ch == '\t' {
            if !current.trim().is_empty() {
                cells.push(current.trim().to_string());
                current.clear();
            }
            whitespace_run = 0;
            continue;
        }

        if ch.is_whitespace() {
            whitespace_run += 1;
            if whitespace_run >= 2 {
                if !current.trim().is_empty() {
                    cells.push(current.trim().to_string());
                    current.clear();
                }
                continue;
            }
            current.push(' ');
            continue;
        }

        whitespace_run = 0;
        current.push(ch);
    }

    if !current.trim().is_empty() {
        cells.push(current.trim().to_string());
    }

    cells
}

pub(crate) fn soft_split_line_into_cells(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Numbers such as `2,1`, `-0,4` or `2024`, and lone dashes.
pub(crate) fn is_value_token(token: &str) -> bool {
    if matches!(token, "-" | "–" | "—") {
        return true;
    }

    token.chars().any(|ch| ch.is_ascii_digit())
        && token
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, ',' | '.' | '-' | '−' | '+' | '%'))
}

/// Splits `Anslag PPR 4/25 2,1 2,3` into a label and its trailing values.
///
/// The label keeps its inner single spaces. A line of values only yields no
/// label cell. Lines without trailing values yield nothing.
pub(crate) fn split_label_and_values(line: &str) -> Vec<String> {
    let tokens = soft_split_line_into_cells(line);
    let value_count = tokens
        .iter()
        .rev()
        .take_while(|token| is_value_token(token))
        .count();
    if value_count == 0 {
        return Vec::new();
    }

    let label_len = tokens.len() - value_count;
    let mut cells = Vec::with_capacity(value_count + 1);
    if label_len > 0 {
        cells.push(tokens[..label_len].join(" "));
    }
    cells.extend(tokens.into_iter().skip(label_len));
    cells
}

/// Pads every row to `width` cells with `fill`.
pub(crate) fn pad_rows(rows: &[&[String]], width: usize, fill: &str) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| {
            let mut out = row.to_vec();
            out.resize(width, fill.to_string());
            out
        })
        .collect()
}

pub(crate) fn modal_width<T>(rows: &[Vec<T>]) -> usize {
    let mut freq = HashMap::new();
    for width in rows.iter().map(Vec::len) {
        *freq.entry(width).or_insert(0_usize) += 1;
    }

    freq.into_iter()
        .max_by_key(|(width, count)| (*count, *width))
        .map_or(0, |(width, _)| width)
}
