//! Link selection over plain link texts, independent of any browser.

use exn::{OptionExt, ResultExt};
use time::{Date, Month};

use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::models::DocumentId;

/// Index of the link naming the most recent year.
///
/// Text that is not purely numeric ranks below every year. Ties go to the
/// first link encountered, and when nothing is numeric the first link wins.
pub fn latest_year<S: AsRef<str>>(links: &[S]) -> Option<usize> {
    first_max_by_key(links, year)
}

/// Index of the link naming the most recent `day-month-year` date.
///
/// Text that does not parse as a calendar date ranks below every date. Ties
/// go to the first link encountered.
pub fn latest_date<S: AsRef<str>>(links: &[S]) -> Option<usize> {
    first_max_by_key(links, date)
}

/// Extracts the first `doc_id=<digits>` value from a page URL.
pub fn document_id(url: &str) -> Result<DocumentId> {
    let captures = consts::DOC_ID_REGEX
        .captures(url)
        .ok_or_raise(|| ErrorKind::DocumentIdNotFound(url.to_string()))?;
    let digits = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let id = digits.parse::<u64>().or_raise(|| ErrorKind::InvalidDocumentId(digits.to_string()))?;
    Ok(DocumentId::new(id))
}

fn first_max_by_key<S, K, F>(links: &[S], key: F) -> Option<usize>
where
    S: AsRef<str>,
    K: Ord,
    F: Fn(&str) -> Option<K>,
{
    let mut best: Option<(usize, Option<K>)> = None;
    for (index, link) in links.iter().enumerate() {
        let rank = key(link.as_ref().trim());
        match &best {
            // `None` sorts below any `Some`, which puts unparsable text last.
            Some((_, current)) if rank <= *current => {},
            _ => best = Some((index, rank)),
        }
    }
    best.map(|(index, _)| index)
}

fn year(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u64>().ok()
}

fn date(text: &str) -> Option<Date> {
    let captures = consts::DATE_REGEX.captures(text)?;
    let day: u8 = captures.get(1)?.as_str().parse().ok()?;
    let month: u8 = captures.get(2)?.as_str().parse().ok()?;
    let year: i32 = captures.get(3)?.as_str().parse().ok()?;
    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}
