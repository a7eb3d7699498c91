#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use cardnotify_core::format::make_authors_list;
use cardnotify_core::notify::contains_mention;
use cardnotify_core::{AuthorSet, BlockType};
use common::{child, english_engine, unchanged_card};
use proptest::prelude::*;

proptest! {
    #[test]
    fn authors_list_follows_first_seen_order(ids in prop::collection::vec("[a-z]{1,8}", 1..8)) {
        let authors: AuthorSet = ids.iter().cloned().collect();

        let mut expected: Vec<String> = Vec::new();
        for id in &ids {
            if !expected.contains(id) {
                expected.push(id.clone());
            }
        }
        let expected = expected
            .iter()
            .map(|id| format!("@{id}"))
            .collect::<Vec<_>>()
            .join(", ");

        prop_assert_eq!(make_authors_list(&authors, "nobody"), expected);
    }

    #[test]
    fn authors_list_trims_ids(id in "[a-z]{1,8}", pad in " {0,3}") {
        let authors: AuthorSet = [format!("{pad}{id}{pad}")].into_iter().collect();
        prop_assert_eq!(make_authors_list(&authors, "nobody"), format!("@{id}"));
    }

    #[test]
    fn mention_anywhere_is_detected(prefix in "[a-z ]{0,10}", name in "[A-Za-z0-9_-]{1,10}") {
        let text = format!("{prefix}@{name} rest");
        prop_assert!(contains_mention(&text));
    }

    #[test]
    fn mentioned_content_never_reaches_output(
        before in "[a-z]{1,10}",
        name in "[A-Za-z0-9_-]{1,10}",
        mention_on_new_side in any::<bool>(),
    ) {
        let mentioned = format!("{before} @{name}");
        let (old, new) = if mention_on_new_side {
            (before.clone(), mentioned)
        } else {
            (mentioned, before.clone())
        };

        let mut diff = unchanged_card("Same");
        diff.diffs = vec![child(BlockType::Text, Some(&old), Some(&new))];

        let result = english_engine().card_attachment(&diff).unwrap();
        prop_assert!(result.is_none());
    }
}
