//! Dated log file selection
//!
//! Log files are named `YYYY-MM-DD_<label>.log`. Anything else in a honeypot
//! folder (READMEs, archives, stray uploads) is not a log file and is skipped.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error_handling::HoneypotResult;
use crate::store::LogStore;
use crate::window::DateRange;

static LOG_FILE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})_.*\.log$").expect("valid log file name regex")
});

/// Date embedded in a log file name, `None` for non-log files
pub fn log_file_date(name: &str) -> Option<NaiveDate> {
    let prefix = LOG_FILE_NAME.captures(name)?.get(1)?.as_str();
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// Log files dated inside `range`, sorted by name (and therefore by date)
pub fn select_log_files<I, S>(names: I, range: &DateRange) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut selected: Vec<String> = names
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref();
            match log_file_date(name) {
                Some(date) if range.contains(date) => Some(name.to_string()),
                Some(_) => None,
                None => {
                    debug!("Skipping non-log entry '{}'", name);
                    None
                }
            }
        })
        .collect();
    selected.sort();
    selected
}

/// List `folder` on the store and keep the files inside `range`
pub async fn select_files(
    store: &dyn LogStore,
    folder: &str,
    range: &DateRange,
) -> HoneypotResult<Vec<String>> {
    let names = store.list_files(folder).await?;
    Ok(select_log_files(&names, range))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_log_file_date() {
        assert_eq!(log_file_date("2026-02-18_fortipot.log"), Some(day(2026, 2, 18)));
        assert_eq!(log_file_date("2026-02-18_.log"), Some(day(2026, 2, 18)));
        assert_eq!(log_file_date("not-a-date.log"), None);
        assert_eq!(log_file_date("2026-02-18_fortipot.log.gz"), None);
        assert_eq!(log_file_date("2026-02-18.log"), None);
        assert_eq!(log_file_date("2026-02-30_fortipot.log"), None);
    }

    #[test]
    fn test_selects_only_files_in_range_sorted() {
        let names = vec![
            "2026-02-18_b.log",
            "README.md",
            "2026-02-10_a.log",
            "2026-02-17_a.log",
            "2026-02-18_a.log",
            "not-a-date.log",
            "2026-02-19_a.log",
        ];
        let range = DateRange::new(day(2026, 2, 11), day(2026, 2, 18));

        assert_eq!(
            select_log_files(names, &range),
            vec!["2026-02-17_a.log", "2026-02-18_a.log", "2026-02-18_b.log"]
        );
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let names = ["2026-01-01_x.log", "2026-01-31_x.log"];
        let range = DateRange::new(day(2026, 1, 1), day(2026, 1, 31));
        assert_eq!(select_log_files(names, &range).len(), 2);
    }

    #[test]
    fn test_not_a_date_excluded_from_wide_window() {
        let range = DateRange::new(day(1970, 1, 1), day(2100, 1, 1));
        assert!(select_log_files(["not-a-date.log"], &range).is_empty());
    }
}
