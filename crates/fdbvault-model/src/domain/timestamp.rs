use std::fmt;

use time::{OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description};

/// `MM-DD-YYYY-HH-MM`, zero padded, 24-hour clock.
const LABEL_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month]-[day]-[year]-[hour]-[minute]");

/// Timestamp label identifying one backup run.
///
/// Computed once at run start and reused verbatim for the archive file name and the
/// interval object key, so both always agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimestampLabel(String);

impl TimestampLabel {
    /// Label for the current wall-clock time shifted to `offset`.
    pub fn now(offset: UtcOffset) -> Self {
        Self::from_datetime(OffsetDateTime::now_utc().to_offset(offset))
    }

    /// Label for an explicit instant, rendered in that instant's own offset.
    pub fn from_datetime(at: OffsetDateTime) -> Self {
        let rendered = at.format(LABEL_FORMAT).unwrap_or_else(|_| {
            format!(
                "{:02}-{:02}-{:04}-{:02}-{:02}",
                u8::from(at.month()),
                at.day(),
                at.year(),
                at.hour(),
                at.minute()
            )
        });
        Self(rendered)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Archive file name for this run (`<label>.tar`).
    pub fn archive_name(&self) -> String {
        format!("{}.tar", self.0)
    }
}

impl fmt::Display for TimestampLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn is_label_shaped(s: &str) -> bool {
        let parts: Vec<&str> = s.split('-').collect();
        let widths = [2, 2, 4, 2, 2];
        parts.len() == widths.len()
            && parts
                .iter()
                .zip(widths)
                .all(|(p, w)| p.len() == w && p.chars().all(|c| c.is_ascii_digit()))
    }

    #[test]
    fn formats_month_day_year_hour_minute() {
        let label = TimestampLabel::from_datetime(datetime!(2016-01-21 04:07:59 UTC));
        assert_eq!(label.as_str(), "01-21-2016-04-07");
    }

    #[test]
    fn uses_24_hour_clock_and_given_offset() {
        let label = TimestampLabel::from_datetime(datetime!(2015-12-04 23:30 -08:00));
        assert_eq!(label.as_str(), "12-04-2015-23-30");
    }

    #[test]
    fn now_is_always_label_shaped() {
        let label = TimestampLabel::now(UtcOffset::UTC);
        assert!(is_label_shaped(label.as_str()), "bad label {label}");
    }

    #[test]
    fn archive_name_reuses_label() {
        let label = TimestampLabel::from_datetime(datetime!(2020-02-29 12:00 UTC));
        assert_eq!(label.archive_name(), "02-29-2020-12-00.tar");
    }
}
