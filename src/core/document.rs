//! Chapter drafts edited in the main pane.
//!
//! Every catalog chapter has a draft. Only the last chapter starts with
//! text; the rest start blank. Accepting a revision replaces the active
//! draft wholesale.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::chapters::{self, Chapter, INITIAL_ACTIVE_CHAPTER};
use super::error::{EditorError, Result};

/// Starting text of the chapter open at launch.
pub const INITIAL_TEXT: &str = "周屿接过书，翻开第一页。他站在那里读了很久，最后把书买下了。

苏瑶在书店工作三个月后，生活逐渐有了规律。每天早上九点开门，晚上七点关门，中间的时间她负责整理书架、接待顾客、偶尔推荐几本书。书店老板很少过问她的私事，只是偶尔提醒她多休息。

周屿成了书店的常客。他每周来两次，总在文字区停留很久。有时候他会拿起一本书翻几页，有时候只是站在书架前发呆。苏瑶注意到他总是选择靠窗的位置，阳光洒在他身上的时候，他会微微眯起眼睛。

“这本书怎么样？”周屿有一次拿着一本书集问她。

苏瑶看了看封面：“我没读过，但作者的另一本散文集不错。”

周屿点点头，把书放回书架：“你推荐什么？”

苏瑶想了想，从旁边抽出一本薄薄的小说：“这本。讲一个人在城市里寻找失去的记忆。”

周屿接过书，翻开第一页。他站在那里读了很久，最后把书买下了。

“谢谢推荐。”他说，“下次来告诉你读后感。”";

/// Characters that count towards the word total (whitespace excluded).
pub fn word_count(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// In-memory drafts for every chapter, plus which one is open.
#[derive(Debug, Clone)]
pub struct Document {
    drafts: BTreeMap<u32, String>,
    active: u32,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let drafts = chapters::catalog()
            .iter()
            .map(|c| {
                let text = if c.id == INITIAL_ACTIVE_CHAPTER {
                    INITIAL_TEXT.to_string()
                } else {
                    String::new()
                };
                (c.id, text)
            })
            .collect();
        Self {
            drafts,
            active: INITIAL_ACTIVE_CHAPTER,
        }
    }

    pub fn active_id(&self) -> u32 {
        self.active
    }

    pub fn active_chapter(&self) -> Option<&'static Chapter> {
        chapters::find(self.active)
    }

    /// Text of the open draft.
    pub fn text(&self) -> &str {
        self.drafts.get(&self.active).map(String::as_str).unwrap_or_default()
    }

    pub fn draft(&self, id: u32) -> Result<&str> {
        self.drafts
            .get(&id)
            .map(String::as_str)
            .ok_or(EditorError::UnknownChapter(id))
    }

    /// Open another chapter.
    pub fn switch_to(&mut self, id: u32) -> Result<()> {
        if !self.drafts.contains_key(&id) {
            return Err(EditorError::UnknownChapter(id));
        }
        if id != self.active {
            log::info!("Switched to chapter {id}");
            self.active = id;
        }
        Ok(())
    }

    /// Overwrite the open draft, e.g. after an edit or an accepted revision.
    pub fn replace_text(&mut self, text: impl Into<String>) {
        self.drafts.insert(self.active, text.into());
    }

    pub fn active_word_count(&self) -> usize {
        word_count(self.text())
    }

    /// Write the open draft to `<dir>/<chapter title>.txt`, creating `dir`.
    pub fn export_active(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let text = self.text();
        if text.trim().is_empty() {
            return Err(EditorError::EmptyDocument);
        }
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let title = self
            .active_chapter()
            .map(|c| c.title)
            .ok_or(EditorError::UnknownChapter(self.active))?;
        let path = dir.join(format!("{}.txt", file_stem(title)));
        std::fs::write(&path, text)?;
        log::info!("Exported chapter {} to {}", self.active, path.display());
        Ok(path)
    }
}

/// Title with path separators and reserved characters replaced.
fn file_stem(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_document() {
        let doc = Document::new();
        assert_eq!(doc.active_id(), 6);
        assert!(doc.text().starts_with("周屿接过书"));
        assert_eq!(doc.draft(1).unwrap(), "");
    }

    #[test]
    fn test_word_count_skips_whitespace() {
        assert_eq!(word_count("苏瑶 看了看\n封面"), 7);
        assert_eq!(word_count("  \n"), 0);
    }

    #[test]
    fn test_switch_and_replace() {
        let mut doc = Document::new();
        doc.switch_to(2).unwrap();
        doc.replace_text("新的草稿");
        assert_eq!(doc.text(), "新的草稿");
        doc.switch_to(6).unwrap();
        assert!(doc.text().starts_with("周屿接过书"));
        assert_eq!(doc.draft(2).unwrap(), "新的草稿");
    }

    #[test]
    fn test_switch_unknown_chapter() {
        let mut doc = Document::new();
        let err = doc.switch_to(99).unwrap_err();
        assert!(matches!(err, EditorError::UnknownChapter(99)));
        assert_eq!(doc.active_id(), 6);
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let doc = Document::new();
        let path = doc.export_active(dir.path().join("exports")).unwrap();
        assert_eq!(path.file_name().unwrap(), "第六章 书店来客.txt");
        assert_eq!(std::fs::read_to_string(path).unwrap(), INITIAL_TEXT);
    }

    #[test]
    fn test_export_empty_draft_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = Document::new();
        doc.switch_to(1).unwrap();
        let err = doc.export_active(dir.path()).unwrap_err();
        assert!(matches!(err, EditorError::EmptyDocument));
    }

    #[test]
    fn test_file_stem_replaces_separators() {
        assert_eq!(file_stem("a/b:c"), "a_b_c");
    }
}
