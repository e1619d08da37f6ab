//! Property-based tests for the chapter picker
//!
//! Tests invariants:
//! - Pages partition the items and none exceeds the page size
//! - Toggling the same id twice restores the selection
//! - The selection summary follows the selection size

use proptest::prelude::*;

use crate::core::chapters::{Chapter, ChapterPicker, UNLINKED_LABEL};

// ============================================================================
// Strategies
// ============================================================================

const TITLES: [&str; 4] = ["序章", "第一章", "第二章", "尾声"];

/// `n` chapters with ids `1..=n`.
fn items(n: usize) -> Vec<Chapter> {
    (1..=n as u32)
        .map(|id| Chapter {
            id,
            title: TITLES[id as usize % TITLES.len()],
            word_count: id * 100,
        })
        .collect()
}

fn arb_picker() -> impl Strategy<Value = ChapterPicker> {
    (0usize..40, 0usize..10).prop_map(|(n, page_size)| ChapterPicker::new(items(n), page_size))
}

// ============================================================================
// Pagination
// ============================================================================

proptest! {
    #[test]
    fn prop_pages_partition_items(picker in arb_picker()) {
        let n = picker.items().len();
        let size = picker.page_size();
        prop_assert!(size >= 1);
        prop_assert_eq!(picker.total_pages(), n.div_ceil(size));

        let mut seen = Vec::new();
        for index in 0..picker.total_pages() {
            let page = picker.page(index);
            prop_assert!(!page.is_empty());
            prop_assert!(page.len() <= size);
            seen.extend(page.iter().map(|c| c.id));
        }
        let all: Vec<u32> = picker.items().iter().map(|c| c.id).collect();
        prop_assert_eq!(seen, all);
        prop_assert!(picker.page(picker.total_pages()).is_empty());
    }

    #[test]
    fn prop_set_page_stays_in_range(mut picker in arb_picker(), target in 0usize..100) {
        picker.set_page(target);
        let last = picker.total_pages().saturating_sub(1);
        prop_assert_eq!(picker.page_index(), target.min(last));
        picker.next_page();
        prop_assert!(picker.page_index() <= last);
    }
}

// ============================================================================
// Selection
// ============================================================================

proptest! {
    #[test]
    fn prop_toggle_twice_is_identity(
        n in 1usize..20,
        picks in prop::collection::vec(1u32..25, 0..10),
        id in 0u32..30,
    ) {
        let mut picker = ChapterPicker::new(items(n), 4);
        for p in &picks {
            picker.toggle(*p);
        }
        let before = picker.selected().to_vec();
        picker.toggle(id);
        picker.toggle(id);
        let mut after = picker.selected().to_vec();
        let mut expected = before.clone();
        after.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(after, expected);
    }

    #[test]
    fn prop_describe_follows_selection_size(
        n in 1usize..20,
        picks in prop::collection::vec(1u32..20, 0..10),
    ) {
        let mut picker = ChapterPicker::new(items(n), 4);
        picker.set_selected(&picks);
        let summary = picker.describe_selection();
        match picker.selected() {
            [] => prop_assert_eq!(summary, UNLINKED_LABEL),
            [only] => {
                let title = picker.items().iter().find(|c| c.id == *only).map(|c| c.title);
                prop_assert_eq!(Some(summary.as_str()), title);
            }
            several => {
                let suffix = format!(" 等 {} 章", several.len());
                prop_assert!(summary.ends_with(&suffix));
            }
        }
    }
}
