use chrono::NaiveDate;

/// List every date between `start` and `stop` (inclusive) as `"YYYY-MM-DD"`,
/// grouped into consecutive chunks of at most `n` dates.
///
/// Chunks are cut by position only, so one may span a month or year
/// boundary. Panics if `n` is zero.
pub fn date_ranges(start: NaiveDate, stop: NaiveDate, n: usize) -> Vec<Vec<String>> {
    let dates: Vec<String> = start
        .iter_days()
        .take_while(|d| *d <= stop)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();

    dates.chunks(n).map(|c| c.to_vec()).collect()
}
