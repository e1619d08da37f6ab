//! Chapter catalog and the paginated multi-select chapter picker.
//!
//! The catalog is fixed for the lifetime of the app: six chapters of the
//! first volume. The picker pages over it and tracks which chapters are
//! linked to an audit, preserving the order in which they were picked.

/// Label shown when no chapters are linked to the audit.
pub const UNLINKED_LABEL: &str = "未关联 (仅诊断当前章节)";

/// Default number of chapters shown per picker page.
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// A chapter of the novel. Immutable after load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chapter {
    pub id: u32,
    pub title: &'static str,
    /// Word count recorded in the chapter directory.
    pub word_count: u32,
}

/// The volume shown in the sidebar.
pub const VOLUME_TITLE: &str = "第一卷";

/// Book title shown above the chapter list.
pub const BOOK_TITLE: &str = "我的 AI 男友？";

const CATALOG: [Chapter; 6] = [
    Chapter { id: 1, title: "第一章 云端初遇", word_count: 1292 },
    Chapter { id: 2, title: "第二章 甜蜜陷阱", word_count: 1899 },
    Chapter { id: 3, title: "第三章 病院惊魂", word_count: 3040 },
    Chapter { id: 4, title: "第四章 反攻计划", word_count: 2358 },
    Chapter { id: 5, title: "第五章 真实之芯", word_count: 1872 },
    Chapter { id: 6, title: "第六章 书店来客", word_count: 1796 },
];

/// Id of the chapter open in the editor at startup.
pub const INITIAL_ACTIVE_CHAPTER: u32 = 6;

/// The full chapter catalog, in reading order.
pub fn catalog() -> &'static [Chapter] {
    &CATALOG
}

/// Look up a chapter by id.
pub fn find(id: u32) -> Option<&'static Chapter> {
    CATALOG.iter().find(|c| c.id == id)
}

/// Sum of the recorded word counts across the catalog.
pub fn total_word_count() -> u32 {
    CATALOG.iter().map(|c| c.word_count).sum()
}

/// Paginated multi-select over a fixed list of chapters.
#[derive(Debug, Clone)]
pub struct ChapterPicker {
    items: Vec<Chapter>,
    page_size: usize,
    page: usize,
    /// Selected ids in the order they were picked.
    selected: Vec<u32>,
}

impl ChapterPicker {
    /// Build a picker. A `page_size` of 0 is treated as 1.
    pub fn new(items: Vec<Chapter>, page_size: usize) -> Self {
        Self {
            items,
            page_size: page_size.max(1),
            page: 0,
            selected: Vec::new(),
        }
    }

    /// Picker over the built-in catalog.
    pub fn with_catalog(page_size: usize) -> Self {
        Self::new(catalog().to_vec(), page_size)
    }

    pub fn items(&self) -> &[Chapter] {
        &self.items
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `ceil(items / page_size)`.
    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.page_size)
    }

    /// Items on page `index`, clamped to the item range. Out-of-range pages are empty.
    pub fn page(&self, index: usize) -> &[Chapter] {
        let start = index.saturating_mul(self.page_size).min(self.items.len());
        let end = start.saturating_add(self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    /// Index of the page currently shown.
    pub fn page_index(&self) -> usize {
        self.page
    }

    /// Items on the page currently shown.
    pub fn current_page(&self) -> &[Chapter] {
        self.page(self.page)
    }

    pub fn has_prev_page(&self) -> bool {
        self.page > 0
    }

    pub fn has_next_page(&self) -> bool {
        self.page + 1 < self.total_pages()
    }

    /// Move to the previous page, stopping at the first.
    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// Move to the next page, stopping at the last.
    pub fn next_page(&mut self) {
        let last = self.total_pages().saturating_sub(1);
        self.page = (self.page + 1).min(last);
    }

    /// Jump to `index`, clamped to `[0, total_pages - 1]`.
    pub fn set_page(&mut self, index: usize) {
        self.page = index.min(self.total_pages().saturating_sub(1));
    }

    /// Add `id` to the selection if absent, otherwise remove it.
    ///
    /// Ids outside the item list are ignored. Returns whether the selection changed.
    pub fn toggle(&mut self, id: u32) -> bool {
        if !self.items.iter().any(|c| c.id == id) {
            log::debug!("Ignoring toggle of unknown chapter id {id}");
            return false;
        }
        if let Some(pos) = self.selected.iter().position(|&s| s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
        true
    }

    pub fn is_selected(&self, id: u32) -> bool {
        self.selected.contains(&id)
    }

    /// Selected ids in pick order.
    pub fn selected(&self) -> &[u32] {
        &self.selected
    }

    /// Replace the selection, dropping ids outside the item list and duplicates.
    pub fn set_selected(&mut self, ids: &[u32]) {
        self.selected.clear();
        for &id in ids {
            if !self.is_selected(id) && self.items.iter().any(|c| c.id == id) {
                self.selected.push(id);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Human-readable summary of the selection.
    ///
    /// Empty → [`UNLINKED_LABEL`]; one → that chapter's title;
    /// several → `"<first picked title> 等 N 章"` where `N` is the selection size.
    pub fn describe_selection(&self) -> String {
        let Some(&first) = self.selected.first() else {
            return UNLINKED_LABEL.to_string();
        };
        let first_title = self
            .items
            .iter()
            .find(|c| c.id == first)
            .map(|c| c.title)
            .unwrap_or_default();
        match self.selected.len() {
            1 => first_title.to_string(),
            n => format!("{first_title} 等 {n} 章"),
        }
    }
}
