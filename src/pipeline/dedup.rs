use std::collections::HashSet;

use crate::storage::Article;

/// Drop every article whose url was already seen, keeping first occurrences
/// in their original order.
pub fn dedupe(articles: impl IntoIterator<Item = Article>) -> Vec<Article> {
    let mut seen: HashSet<String> = HashSet::new();
    articles
        .into_iter()
        .filter(|article| seen.insert(article.url.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn article(title: &str, url: &str) -> Article {
        Article::new(title, url, None, "Feed", "", "Codex")
    }

    #[test]
    fn test_first_seen_wins() {
        let a = article("A", "https://1");
        let b = article("B", "https://2");
        let a2 = article("A prime", "https://1");

        let out = dedupe(vec![a.clone(), b.clone(), a2]);
        assert_eq!(out, vec![a, b]);
    }

    #[test]
    fn test_empty_input() {
        assert!(dedupe(Vec::new()).is_empty());
    }

    #[test]
    fn test_empty_urls_collapse_to_one() {
        let out = dedupe(vec![article("x", ""), article("y", "")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "x");
    }

    fn arb_articles() -> impl Strategy<Value = Vec<Article>> {
        prop::collection::vec((0u8..8, "[a-z]{1,6}"), 0..40).prop_map(|items| {
            items
                .into_iter()
                .map(|(id, title)| article(&title, &format!("https://example.com/{id}")))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_idempotent(articles in arb_articles()) {
            let once = dedupe(articles);
            let twice = dedupe(once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_unique_and_order_preserving(articles in arb_articles()) {
            let out = dedupe(articles.clone());

            let urls: HashSet<&str> = out.iter().map(|a| a.url.as_str()).collect();
            prop_assert_eq!(urls.len(), out.len());

            // Output is the subsequence of first occurrences
            let mut seen = HashSet::new();
            let expected: Vec<Article> = articles
                .into_iter()
                .filter(|a| seen.insert(a.url.clone()))
                .collect();
            prop_assert_eq!(out, expected);
        }
    }
}
