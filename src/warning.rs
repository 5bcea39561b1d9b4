use crate::model::TableId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCode {
    TableNotLocated,
    NoGridOnPage,
    MultipleGridsOnPage,
    NoRowsSelected,
    DuplicateRowLabel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractWarning {
    pub code: WarningCode,
    pub message: String,
    pub table_id: Option<TableId>,
    /// Zero-based index into the page slice given to the extractor.
    pub page_index: Option<usize>,
}

impl ExtractWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            table_id: None,
            page_index: None,
        }
    }

    #[must_use]
    pub fn with_table_id(mut self, table_id: TableId) -> Self {
        self.table_id = Some(table_id);
        self
    }

    #[must_use]
    pub fn with_page_index(mut self, page_index: usize) -> Self {
        self.page_index = Some(page_index);
        self
    }
}
