use chrono::{DateTime, Days, TimeZone};

use crate::storage::Article;

/// Sort newest first. Undated articles go last; ties keep input order.
pub fn sort_by_recency(mut articles: Vec<Article>) -> Vec<Article> {
    // `None < Some(_)`, so comparing b to a puts undated items at the end
    articles.sort_by(|a, b| b.published.cmp(&a.published));
    articles
}

/// Keep articles whose calendar date lies within `days` days before `now`.
///
/// Dates are taken in the timezone of `now`. `days == 0` keeps today only.
/// Undated articles are always dropped; future-dated ones are kept. Order is
/// preserved.
pub fn apply_window<Tz: TimeZone>(
    articles: Vec<Article>,
    days: u32,
    now: &DateTime<Tz>,
) -> Vec<Article> {
    let today = now.date_naive();
    let earliest = today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(chrono::NaiveDate::MIN);
    let tz = now.timezone();

    articles
        .into_iter()
        .filter(|article| match article.published {
            Some(ts) => ts.with_timezone(&tz).date_naive() >= earliest,
            None => false,
        })
        .collect()
}

/// [`sort_by_recency`] followed by [`apply_window`].
pub fn sort_and_window<Tz: TimeZone>(
    articles: Vec<Article>,
    days: u32,
    now: &DateTime<Tz>,
) -> Vec<Article> {
    apply_window(sort_by_recency(articles), days, now)
}
