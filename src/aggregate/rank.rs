use std::cmp::{Ordering, Reverse};

use crate::feed::Entry;

/// Orders entries newest first.
///
/// Entries without a publication time sort as the Unix epoch. Ties keep
/// their input order: the comparator works on `(published, input index)`
/// pairs, which makes the ordering total without relying on sort stability.
pub fn rank(entries: &[Entry]) -> Vec<Entry> {
    let mut order: Vec<(usize, &Entry)> = entries.iter().enumerate().collect();
    order.sort_unstable_by(|(ia, a), (ib, b)| compare(a, *ia, b, *ib));
    order.into_iter().map(|(_, entry)| entry.clone()).collect()
}

fn compare(a: &Entry, a_index: usize, b: &Entry, b_index: usize) -> Ordering {
    (Reverse(a.effective_published()), a_index).cmp(&(Reverse(b.effective_published()), b_index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn at(secs: i64) -> Option<DateTime<Utc>> {
        Some(Utc.timestamp_opt(secs, 0).unwrap())
    }

    fn entry(title: &str, published: Option<DateTime<Utc>>) -> Entry {
        Entry {
            title: title.to_string(),
            link: format!("https://example.com/{title}"),
            description_html: String::new(),
            published,
            source_name: "S".to_string(),
        }
    }

    fn titles(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_newest_first() {
        let input = vec![entry("old", at(100)), entry("new", at(300)), entry("mid", at(200))];
        assert_eq!(titles(&rank(&input)), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_missing_timestamps_sort_last_in_input_order() {
        let input = vec![
            entry("none-1", None),
            entry("dated", at(1_700_000_000)),
            entry("none-2", None),
        ];
        assert_eq!(titles(&rank(&input)), vec!["dated", "none-1", "none-2"]);
    }

    #[test]
    fn test_missing_timestamp_ties_with_epoch() {
        let input = vec![entry("epoch", at(0)), entry("none", None)];
        assert_eq!(titles(&rank(&input)), vec!["epoch", "none"]);

        let input = vec![entry("none", None), entry("epoch", at(0))];
        assert_eq!(titles(&rank(&input)), vec!["none", "epoch"]);
    }

    #[test]
    fn test_pre_epoch_sorts_below_missing() {
        let input = vec![entry("1969", at(-86_400)), entry("none", None)];
        assert_eq!(titles(&rank(&input)), vec!["none", "1969"]);
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let input = vec![
            entry("a", at(50)),
            entry("b", at(50)),
            entry("newer", at(60)),
            entry("c", at(50)),
        ];
        assert_eq!(titles(&rank(&input)), vec!["newer", "a", "b", "c"]);
    }

    #[test]
    fn test_input_untouched() {
        let input = vec![entry("old", at(1)), entry("new", at(2))];
        let ranked = rank(&input);
        assert_eq!(titles(&input), vec!["old", "new"]);
        assert_eq!(titles(&ranked), vec!["new", "old"]);
    }

    proptest! {
        #[test]
        fn prop_descending_and_stable(stamps in prop::collection::vec(prop::option::of(-5i64..5), 0..50)) {
            let input: Vec<Entry> = stamps
                .iter()
                .enumerate()
                .map(|(i, s)| entry(&i.to_string(), s.and_then(at)))
                .collect();
            let ranked = rank(&input);
            prop_assert_eq!(ranked.len(), input.len());

            for pair in ranked.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.effective_published() >= b.effective_published());
                if a.effective_published() == b.effective_published() {
                    let ia: usize = a.title.parse().unwrap();
                    let ib: usize = b.title.parse().unwrap();
                    prop_assert!(ia < ib);
                }
            }
        }
    }
}
