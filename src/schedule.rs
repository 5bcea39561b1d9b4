//! Publication cycle of the monetary policy report.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::ExtractError;

pub const REPORT_PAGE_BASE_URL: &str = "https://www.norges-bank.no/aktuelt/nyheter-og-hendelser/Publikasjoner/Pengepolitisk-rapport-med-vurdering-av-finansiell-stabilitet";

/// Month and day each report number is expected to be published.
const PUBLICATION_PLAN: [(u32, u32); 4] = [(3, 20), (6, 20), (9, 20), (12, 20)];

static REPORT_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:PPR)?\s*([1-4])\s*/\s*(\d{2}|\d{4})$")
        .expect("hardcoded report id regex is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportId {
    year: i32,
    number: u8,
}

impl ReportId {
    pub fn new(number: u8, year: i32) -> Result<Self, ExtractError> {
        if !(1..=4).contains(&number) {
            return Err(ExtractError::InvalidReportId(format!(
                "report number must be 1-4, got {number}"
            )));
        }
        if !(2000..=2099).contains(&year) {
            return Err(ExtractError::InvalidReportId(format!(
                "report year out of range: {year}"
            )));
        }
        Ok(Self { year, number })
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        self.number
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn previous(self) -> Self {
        if self.number == 1 {
            Self {
                year: self.year - 1,
                number: 4,
            }
        } else {
            Self {
                year: self.year,
                number: self.number - 1,
            }
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        if self.number == 4 {
            Self {
                year: self.year + 1,
                number: 1,
            }
        } else {
            Self {
                year: self.year,
                number: self.number + 1,
            }
        }
    }

    /// Expected publication date.
    #[must_use]
    pub fn publication_date(self) -> Option<NaiveDate> {
        let (month, day) = PUBLICATION_PLAN[usize::from(self.number - 1)];
        NaiveDate::from_ymd_opt(self.year, month, day)
    }

    /// Label of the projection row made in this report, e.g. `Anslag PPR 4/25`.
    #[must_use]
    pub fn projection_label(self) -> String {
        format!("Anslag {self}")
    }
}

impl Display for ReportId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "PPR {}/{:02}", self.number, self.year % 100)
    }
}

impl FromStr for ReportId {
    type Err = ExtractError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let captures = REPORT_ID_RE.captures(value.trim()).ok_or_else(|| {
            ExtractError::InvalidReportId(format!(
                "'{value}' does not look like N/YY or PPR N/YY"
            ))
        })?;

        let number = captures[1]
            .parse::<u8>()
            .map_err(|error| ExtractError::InvalidReportId(error.to_string()))?;
        let year_digits = &captures[2];
        let year = year_digits
            .parse::<i32>()
            .map_err(|error| ExtractError::InvalidReportId(error.to_string()))?;
        let year = if year_digits.len() == 2 { 2000 + year } else { year };

        Self::new(number, year)
    }
}

/// The first report expected on or after `today`.
#[must_use]
pub fn next_report(today: NaiveDate) -> (ReportId, NaiveDate) {
    let mut report = ReportId {
        year: today.year(),
        number: 1,
    };
    loop {
        match report.publication_date() {
            Some(date) if date >= today => return (report, date),
            _ => report = report.next(),
        }
    }
}

/// Publication page of `report` on the central bank's site.
#[must_use]
pub fn report_page_url(report: ReportId) -> String {
    format!(
        "{REPORT_PAGE_BASE_URL}/{year}/ppr-{number}{year}/",
        year = report.year,
        number = report.number
    )
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;

    use super::{ReportId, next_report, report_page_url};

    fn date(value: &str) -> NaiveDate {
        value.parse().expect("valid date")
    }

    fn report(number: u8, year: i32) -> ReportId {
        ReportId::new(number, year).expect("valid report")
    }

    #[test]
    fn parses_short_long_and_prefixed_forms() {
        assert_eq!(ReportId::from_str("4/25").expect("parse"), report(4, 2025));
        assert_eq!(ReportId::from_str("PPR 1/26").expect("parse"), report(1, 2026));
        assert_eq!(ReportId::from_str("ppr 2 / 2027").expect("parse"), report(2, 2027));
    }

    #[test]
    fn rejects_unknown_report_forms() {
        for value in ["5/25", "PPR", "1-25", "Anslag PPR 1/26"] {
            assert!(ReportId::from_str(value).is_err(), "{value}");
        }
    }

    #[test]
    fn displays_two_digit_year() {
        assert_eq!(report(3, 2025).to_string(), "PPR 3/25");
        assert_eq!(report(1, 2026).projection_label(), "Anslag PPR 1/26");
    }

    #[test]
    fn previous_and_next_wrap_across_years() {
        assert_eq!(report(1, 2026).previous(), report(4, 2025));
        assert_eq!(report(4, 2025).next(), report(1, 2026));
        assert_eq!(report(3, 2025).previous(), report(2, 2025));
    }

    #[test]
    fn next_report_includes_publication_day() {
        assert_eq!(
            next_report(date("2025-09-20")),
            (report(3, 2025), date("2025-09-20"))
        );
        assert_eq!(
            next_report(date("2025-09-21")),
            (report(4, 2025), date("2025-12-20"))
        );
        assert_eq!(
            next_report(date("2025-01-05")),
            (report(1, 2025), date("2025-03-20"))
        );
    }

    #[test]
    fn next_report_rolls_over_after_december() {
        assert_eq!(
            next_report(date("2025-12-21")),
            (report(1, 2026), date("2026-03-20"))
        );
    }

    #[test]
    fn builds_publication_page_url() {
        assert!(report_page_url(report(4, 2025)).ends_with("/2025/ppr-42025/"));
    }
}
