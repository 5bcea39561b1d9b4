use crate::model::ParsedDocument;
use crate::normalize::MISSING_VALUE;
use crate::table_parse::pad_rows;

/// A document laid out as one flat record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MergedOutput {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Rows narrower than the widest table are padded with [`MISSING_VALUE`].
pub(crate) fn merge_document(document: &ParsedDocument) -> MergedOutput {
    let width = document
        .tables
        .values()
        .flat_map(|table| table.rows().map(|(_, values)| values.len()))
        .max()
        .unwrap_or(0);

    let mut headers = vec!["table_id".to_string(), "row_label".to_string()];
    headers.extend((1..=width).map(|index| format!("col_{index}")));

    let mut rows = Vec::new();
    for (table_id, table) in &document.tables {
        let values = table.rows().map(|(_, values)| values).collect::<Vec<_>>();
        for (label, padded) in table.labels().zip(pad_rows(&values, width, MISSING_VALUE)) {
            let mut row = Vec::with_capacity(width + 2);
            row.push(table_id.to_string());
            row.push(label.to_string());
            row.extend(padded);
            rows.push(row);
        }
    }

    MergedOutput { headers, rows }
}

#[cfg(test)]
mod tests {
    use crate::merge::merge_document;
    use crate::model::{ParsedDocument, ParsedTable, TableId};

    #[test]
    fn merges_and_pads_rows_to_widest_table() {
        let mut monthly = ParsedTable::default();
        monthly.insert("Faktisk", vec!["2.1".to_string()]);
        let mut annual = ParsedTable::default();
        annual.insert("KPI", vec!["3.5".to_string(), "2.8".to_string()]);
        annual.insert("BNP", vec!["1.4".to_string(), "-".to_string()]);

        let mut document = ParsedDocument::default();
        document.tables.insert(TableId::KeyProjections, annual);
        document.tables.insert(TableId::ConsumerPrices, monthly);

        let merged = merge_document(&document);
        assert_eq!(merged.headers, vec!["table_id", "row_label", "col_1", "col_2"]);
        assert_eq!(merged.rows[0], vec!["2a", "Faktisk", "2.1", "-"]);
        assert_eq!(merged.rows[1], vec!["3", "KPI", "3.5", "2.8"]);
        assert_eq!(merged.rows[2], vec!["3", "BNP", "1.4", "-"]);
    }
}
