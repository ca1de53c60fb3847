use chrono::NaiveDate;

/// Parse a revision date written day first (`DD/MM/YYYY`, one-digit day or month allowed).
/// Returns `None` for anything that is not a real calendar day.
pub fn parse_revision_date(date: &str) -> Option<NaiveDate> {
    let mut parts = date.trim().split('/');
    let day: u32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let year_part = parts.next()?;
    if parts.next().is_some() || year_part.len() != 4 {
        return None;
    }
    let year: i32 = year_part.parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}
