use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::ExtractError;

/// 1-based pages to read, parsed from lists like `1-3,5`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    pages: BTreeSet<u32>,
}

impl PageSelection {
    #[must_use]
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

fn parse_page_number(token: &str) -> Result<u32, ExtractError> {
    let page = token
        .trim()
        .parse::<u32>()
        .map_err(|_| ExtractError::InvalidPageSelection(format!("invalid page number '{token}'")))?;
    if page == 0 {
        return Err(ExtractError::InvalidPageSelection(
            "pages are 1-based".to_string(),
        ));
    }
    Ok(page)
}

impl FromStr for PageSelection {
    type Err = ExtractError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let mut pages = BTreeSet::new();
        for token in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match token.split_once('-') {
                Some((start, end)) => {
                    let start = parse_page_number(start)?;
                    let end = parse_page_number(end)?;
                    if end < start {
                        return Err(ExtractError::InvalidPageSelection(format!(
                            "range '{token}' ends before it starts"
                        )));
                    }
                    pages.extend(start..=end);
                }
                None => {
                    pages.insert(parse_page_number(token)?);
                }
            }
        }

        if pages.is_empty() {
            return Err(ExtractError::InvalidPageSelection(
                "page selection cannot be empty".to_string(),
            ));
        }

        Ok(Self { pages })
    }
}

/// Which grid of a matched page a table is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GridChoice {
    /// The page's first grid.
    #[default]
    First,
    /// The grid where row selection keeps the most rows; earlier grids win ties.
    MostRows,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub pages: Option<PageSelection>,
    pub grid_choice: GridChoice,
}
