use std::time::Duration;

use exn::OptionExt;
use tracing::instrument;

use crate::consts::{DATES_BLOCK_ID, LOADING_INDICATOR_ID, YEARS_BLOCK_ID};
use crate::error::{ErrorKind, Result};
use crate::models::DocumentId;
use crate::page::Page;
use crate::select::{document_id, latest_date, latest_year};

/// Discovers the most recent document id published for the document open at
/// `page_url`.
///
/// Opens the page, picks the most recent year from the years block, then the
/// most recent date from the dates block, and reads `doc_id` from the
/// resulting URL. Every step waits at most `wait` for the loading indicator
/// to clear. Nothing is retried: the first failure aborts discovery.
///
/// The session is left open; closing it is the caller's responsibility.
#[instrument(skip(page), fields(doc_id))]
pub fn discover(page: &mut dyn Page, page_url: &str, wait: Duration) -> Result<DocumentId> {
    page.open(page_url)?;
    page.wait_until_hidden(LOADING_INDICATOR_ID, wait)?;

    let years = links(page, YEARS_BLOCK_ID)?;
    let year = latest_year(&years).ok_or_raise(|| ErrorKind::EmptyBlock(YEARS_BLOCK_ID.to_string()))?;
    tracing::info!(year = %years[year], "Clicking on max year link");
    page.activate(YEARS_BLOCK_ID, year)?;
    page.wait_until_hidden(LOADING_INDICATOR_ID, wait)?;

    let dates = links(page, DATES_BLOCK_ID)?;
    let date = latest_date(&dates).ok_or_raise(|| ErrorKind::EmptyBlock(DATES_BLOCK_ID.to_string()))?;
    tracing::info!(date = %dates[date], "Clicking on latest change");
    page.activate(DATES_BLOCK_ID, date)?;
    page.wait_until_hidden(LOADING_INDICATOR_ID, wait)?;

    let url = page.current_url()?;
    let id = document_id(&url)?;
    tracing::Span::current().record("doc_id", id.get());
    Ok(id)
}

/// Link texts of a block that must exist and must not be empty.
fn links(page: &mut dyn Page, block_id: &str) -> Result<Vec<String>> {
    let links = page.block_links(block_id)?.ok_or_raise(|| ErrorKind::MissingBlock(block_id.to_string()))?;
    if links.is_empty() {
        exn::bail!(ErrorKind::EmptyBlock(block_id.to_string()));
    }
    tracing::debug!(block = block_id, count = links.len(), "Block links found");
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Event, FixturePage};

    const START: &str = "https://www.legis.md/cautare/getResults?lang=ro&doc_id=108459";
    const YEAR_2024: &str = "https://www.legis.md/cautare/getResults?lang=ro&doc_id=108459&year=2024";
    const LATEST: &str = "https://www.legis.md/cautare/getResults?doc_id=141527&lang=ro";
    const WAIT: Duration = Duration::from_secs(10);

    fn years_page(dates_inline: &str) -> String {
        format!(
            r#"<html><body>
                <div id="response2" style="display: none">Loading...</div>
                <div id="block-years"><ul>
                    <li><a href="{START}&year=2022">2022</a></li>
                    <li><a href="{YEAR_2024}">2024</a></li>
                    <li><a href="{START}&year=2023">2023</a></li>
                    <li><a href="{START}&year=all">Toate</a></li>
                </ul></div>
                {dates_inline}
            </body></html>"#
        )
    }

    fn dates_block() -> String {
        format!(
            r#"<div id="block-dates"><ul>
                <li><a href="?doc_id=120001">03-01-2024</a></li>
                <li><a href="{LATEST}">15-06-2024</a></li>
                <li><a href="?doc_id=120002">modificat</a></li>
                <li><a href="?doc_id=120003">7-2-2024</a></li>
            </ul></div>"#
        )
    }

    fn fixture() -> FixturePage {
        FixturePage::default()
            .with_page(START, years_page(""))
            .with_page(YEAR_2024, years_page(&dates_block()))
            .with_page(LATEST, "<html><body><h1>Lege</h1></body></html>")
    }

    #[test]
    fn discovers_latest_document() {
        let mut page = fixture();
        let id = discover(&mut page, START, WAIT).unwrap();
        assert_eq!(id, DocumentId::new(141527));
        assert_eq!(
            page.events(),
            vec![
                Event::Opened(START.to_string()),
                Event::Activated {
                    block: YEARS_BLOCK_ID.to_string(),
                    text: "2024".to_string()
                },
                Event::Activated {
                    block: DATES_BLOCK_ID.to_string(),
                    text: "15-06-2024".to_string()
                },
            ]
        );
    }

    #[test]
    fn missing_years_block() {
        let mut page = FixturePage::default().with_page(START, "<html><body><p>Nimic</p></body></html>");
        let err = discover(&mut page, START, WAIT).unwrap_err();
        assert_eq!(*err, ErrorKind::MissingBlock(YEARS_BLOCK_ID.to_string()));
    }

    #[test]
    fn empty_years_block() {
        let mut page = FixturePage::default().with_page(START, r#"<div id="block-years"><ul></ul></div>"#);
        let err = discover(&mut page, START, WAIT).unwrap_err();
        assert_eq!(*err, ErrorKind::EmptyBlock(YEARS_BLOCK_ID.to_string()));
    }

    #[test]
    fn missing_dates_block() {
        let mut page = fixture().with_page(YEAR_2024, years_page(""));
        let err = discover(&mut page, START, WAIT).unwrap_err();
        assert_eq!(*err, ErrorKind::MissingBlock(DATES_BLOCK_ID.to_string()));
    }

    #[test]
    fn loading_indicator_never_clears() {
        let html = years_page("").replace(r#" style="display: none""#, "");
        let mut page = FixturePage::default().with_page(START, html);
        let err = discover(&mut page, START, WAIT).unwrap_err();
        assert_eq!(*err, ErrorKind::Timeout(LOADING_INDICATOR_ID.to_string()));
        assert_eq!(page.events(), vec![Event::Opened(START.to_string())]);
    }

    #[test]
    fn final_url_without_document_id() {
        let dates = r#"<div id="block-dates"><ul><li><a href="https://www.legis.md/">01-01-2024</a></li></ul></div>"#;
        let mut page = fixture()
            .with_page(YEAR_2024, years_page(dates))
            .with_page("https://www.legis.md/", "<html></html>");
        let err = discover(&mut page, START, WAIT).unwrap_err();
        assert_eq!(*err, ErrorKind::DocumentIdNotFound("https://www.legis.md/".to_string()));
    }
}
