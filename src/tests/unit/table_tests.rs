//! Table-driven cases.

use rstest::rstest;

use crate::core::chapters::ChapterPicker;
use crate::core::pipeline::revision_style_name;

#[rstest]
#[case(None, "通用优化")]
#[case(Some(""), "通用优化")]
#[case(Some("author-tangjia"), "强化冲突模式")]
#[case(Some("author-chendong"), "宏大叙事模式")]
#[case(Some("author-feiwo"), "情感深化模式")]
#[case(Some("tangjia-v2"), "强化冲突模式")]
#[case(Some("author-unknown"), "通用优化模式")]
fn test_revision_style_name(#[case] style_id: Option<&str>, #[case] expected: &str) {
    assert_eq!(revision_style_name(style_id), expected);
}

#[rstest]
#[case(4, 0, 0)]
#[case(4, 1, 1)]
#[case(4, 9, 1)]
#[case(2, 2, 2)]
#[case(2, 7, 2)]
#[case(6, 3, 0)]
#[case(0, 10, 5)]
fn test_set_page_clamps(#[case] page_size: usize, #[case] target: usize, #[case] expected: usize) {
    let mut picker = ChapterPicker::with_catalog(page_size);
    picker.set_page(target);
    assert_eq!(picker.page_index(), expected);
}

#[rstest]
#[case(4, 2)]
#[case(1, 6)]
#[case(6, 1)]
#[case(10, 1)]
fn test_total_pages(#[case] page_size: usize, #[case] expected: usize) {
    assert_eq!(ChapterPicker::with_catalog(page_size).total_pages(), expected);
}
