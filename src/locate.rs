use crate::model::PageSource;

/// Marker phrases identifying the page of one table.
///
/// A set is a list of all-of groups: a page matches when its text contains
/// every phrase of at least one group. Most tables use a single group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSet {
    groups: Vec<Vec<String>>,
}

impl MarkerSet {
    pub fn all_of<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            groups: vec![phrases.into_iter().map(Into::into).collect()],
        }
    }

    /// Adds an alternative group that identifies the same page.
    #[must_use]
    pub fn or_all_of<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups
            .push(phrases.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }

    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.groups
            .iter()
            .any(|group| contains_all(text, group))
    }
}

fn contains_all<S: AsRef<str>>(text: &str, phrases: &[S]) -> bool {
    phrases
        .iter()
        .all(|phrase| text.contains(phrase.as_ref()))
}

/// Index of the first page whose text contains every phrase in `markers`.
///
/// Matching is literal and case-sensitive.
pub fn locate_table<P, S>(pages: &[P], markers: &[S]) -> Option<usize>
where
    P: PageSource,
    S: AsRef<str>,
{
    pages
        .iter()
        .position(|page| contains_all(page.text(), markers))
}

/// Index of the first page matched by any group of `markers`.
pub fn locate_with_markers<P: PageSource>(pages: &[P], markers: &MarkerSet) -> Option<usize> {
    pages
        .iter()
        .position(|page| markers.matches(page.text()))
}
