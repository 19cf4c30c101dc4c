use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

/// Element shown while the site is fetching results.
pub const LOADING_INDICATOR_ID: &str = "response2";
/// Block listing the years a document has versions in.
pub const YEARS_BLOCK_ID: &str = "block-years";
/// Block listing the dates of changes within the selected year.
pub const DATES_BLOCK_ID: &str = "block-dates";
/// Upper bound on each loading-indicator wait.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(10);

/// Links inside a block, relative to the block element.
pub(crate) const BLOCK_LINKS: &str = "ul > li > a";

regex!(DOC_ID_REGEX, r"doc_id=(\d+)");
regex!(DATE_REGEX, r"^(\d{1,2})-(\d{1,2})-(\d{4})$");
