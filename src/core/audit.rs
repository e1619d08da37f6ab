//! Audit configuration collected by the first wizard step.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::chapters::ChapterPicker;
use super::error::{EditorError, Result};

// ============================================================================
// Audit focus
// ============================================================================

/// Which direction the audit should emphasise (the "editor" choice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AuditFocus {
    #[default]
    #[serde(rename = "focus-commercial")]
    Commercial,
    #[serde(rename = "focus-plot")]
    Plot,
    #[serde(rename = "focus-worldview")]
    Worldview,
    #[serde(rename = "focus-emotion")]
    Emotion,
}

impl AuditFocus {
    pub const ALL: [AuditFocus; 4] = [
        AuditFocus::Commercial,
        AuditFocus::Plot,
        AuditFocus::Worldview,
        AuditFocus::Emotion,
    ];

    pub fn id(self) -> &'static str {
        match self {
            AuditFocus::Commercial => "focus-commercial",
            AuditFocus::Plot => "focus-plot",
            AuditFocus::Worldview => "focus-worldview",
            AuditFocus::Emotion => "focus-emotion",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AuditFocus::Commercial => "商业化优化",
            AuditFocus::Plot => "剧情结构",
            AuditFocus::Worldview => "世界观构建",
            AuditFocus::Emotion => "情感深度",
        }
    }

    pub fn emphasis(self) -> &'static str {
        match self {
            AuditFocus::Commercial => "黄金三章 / 留存率提升 / 付费卡点",
            AuditFocus::Plot => "节奏把控 / 冲突设计 / 悬念铺设",
            AuditFocus::Worldview => "创新设定 / 逻辑自洽 / 反套路",
            AuditFocus::Emotion => "人物弧光 / 情感细腻度 / CP感营造",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ============================================================================
// Book settings
// ============================================================================

/// Tags offered by the book settings section.
pub const TAG_CATALOG: &[&str] = &[
    "甜宠", "悬疑", "都市", "科幻", "系统", "先婚后爱", "破镜重圆", "治愈",
];

/// Readership channel the book is published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Male,
    #[default]
    Female,
    Publishing,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Male, Channel::Female, Channel::Publishing];

    pub fn label(self) -> &'static str {
        match self {
            Channel::Male => "男频",
            Channel::Female => "女频",
            Channel::Publishing => "出版",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Channel::Male => Channel::Female,
            Channel::Female => Channel::Publishing,
            Channel::Publishing => Channel::Male,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Channel::Male => Channel::Publishing,
            Channel::Female => Channel::Male,
            Channel::Publishing => Channel::Female,
        }
    }
}

/// Book-level context that sharpens the deviation analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSettings {
    /// Picked tags, in pick order.
    pub tags: Vec<String>,
    pub channel: Channel,
    pub core_plot: String,
    pub core_plot_confirmed: bool,
}

impl BookSettings {
    /// Toggle a tag from [`TAG_CATALOG`]. Unknown tags are ignored.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if !TAG_CATALOG.contains(&tag) {
            return false;
        }
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
        } else {
            self.tags.push(tag.to_string());
        }
        true
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Replace the core plot. Any earlier confirmation no longer applies.
    pub fn set_core_plot(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.core_plot {
            self.core_plot = text;
            self.core_plot_confirmed = false;
        }
    }

    /// Mark the core plot as confirmed. Refused while the plot is blank.
    pub fn confirm_core_plot(&mut self) -> bool {
        if self.core_plot.trim().is_empty() {
            return false;
        }
        self.core_plot_confirmed = true;
        true
    }
}

// ============================================================================
// Uploaded files
// ============================================================================

/// A platform-data screenshot attached to the audit.
///
/// Held as an opaque handle: the file is never read or transmitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl UploadedFile {
    /// Validate that `path` names an existing regular file and capture its metadata.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let meta = match std::fs::metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EditorError::FileNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        if !meta.is_file() {
            return Err(EditorError::NotAFile(path.to_path_buf()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            path: path.to_path_buf(),
            size_bytes: meta.len(),
        })
    }
}

// ============================================================================
// Audit config
// ============================================================================

/// Everything the user sets up before starting the diagnosis.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub editor: AuditFocus,
    /// Linked chapters, held by the picker that edits them.
    pub link_chapters: ChapterPicker,
    pub uploaded_files: Vec<UploadedFile>,
    pub book_settings: BookSettings,
}

impl AuditConfig {
    pub fn new(page_size: usize) -> Self {
        Self {
            editor: AuditFocus::default(),
            link_chapters: ChapterPicker::with_catalog(page_size),
            uploaded_files: Vec::new(),
            book_settings: BookSettings::default(),
        }
    }

    /// Ids of the linked chapters, in pick order.
    pub fn linked_chapter_ids(&self) -> &[u32] {
        self.link_chapters.selected()
    }

    /// Attach a data file. The same file may be attached more than once.
    pub fn attach_file(&mut self, path: impl AsRef<Path>) -> Result<&UploadedFile> {
        let file = UploadedFile::open(path)?;
        log::info!("Attached data file {} ({} bytes)", file.name, file.size_bytes);
        self.uploaded_files.push(file);
        Ok(&self.uploaded_files[self.uploaded_files.len() - 1])
    }

    /// Remove the attachment at `index`, if any.
    pub fn remove_file(&mut self, index: usize) -> Option<UploadedFile> {
        if index < self.uploaded_files.len() {
            let file = self.uploaded_files.remove(index);
            log::info!("Removed data file {}", file.name);
            Some(file)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AuditConfig::new(4);
        assert_eq!(config.editor, AuditFocus::Commercial);
        assert!(config.linked_chapter_ids().is_empty());
        assert!(config.uploaded_files.is_empty());
        assert_eq!(config.book_settings, BookSettings::default());
    }

    #[test]
    fn test_focus_cycles() {
        let mut f = AuditFocus::Commercial;
        for _ in 0..AuditFocus::ALL.len() {
            f = f.next();
        }
        assert_eq!(f, AuditFocus::Commercial);
        assert_eq!(AuditFocus::Commercial.prev(), AuditFocus::Emotion);
    }

    #[test]
    fn test_focus_serde_uses_ids() {
        let json = serde_json::to_string(&AuditFocus::Worldview).unwrap();
        assert_eq!(json, "\"focus-worldview\"");
        for f in AuditFocus::ALL {
            assert_eq!(serde_json::to_string(&f).unwrap(), format!("\"{}\"", f.id()));
        }
    }

    #[test]
    fn test_tag_toggle() {
        let mut settings = BookSettings::default();
        assert!(settings.toggle_tag("悬疑"));
        assert!(settings.has_tag("悬疑"));
        assert!(settings.toggle_tag("悬疑"));
        assert!(!settings.has_tag("悬疑"));
        assert!(!settings.toggle_tag("not-a-tag"));
    }

    #[test]
    fn test_core_plot_confirmation_cleared_on_edit() {
        let mut settings = BookSettings::default();
        assert!(!settings.confirm_core_plot());
        settings.set_core_plot("神秘常客与书店店员");
        assert!(settings.confirm_core_plot());
        settings.set_core_plot("神秘常客与书店店员");
        assert!(settings.core_plot_confirmed);
        settings.set_core_plot("另一个故事");
        assert!(!settings.core_plot_confirmed);
    }

    #[test]
    fn test_channel_cycles() {
        assert_eq!(Channel::Publishing.next(), Channel::Male);
        for c in Channel::ALL {
            assert_eq!(c.next().prev(), c);
        }
        assert_eq!(Channel::default(), Channel::Female);
    }

    #[test]
    fn test_attach_and_remove_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("retention.png");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"png").unwrap();

        let mut config = AuditConfig::new(4);
        let attached = config.attach_file(&path).unwrap();
        assert_eq!(attached.name, "retention.png");
        assert_eq!(attached.size_bytes, 3);

        config.attach_file(&path).unwrap();
        assert_eq!(config.uploaded_files.len(), 2);

        assert!(config.remove_file(0).is_some());
        assert_eq!(config.uploaded_files.len(), 1);
        assert!(config.remove_file(5).is_none());
    }

    #[test]
    fn test_attach_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AuditConfig::new(4);
        let err = config.attach_file(dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, EditorError::FileNotFound(_)));
    }

    #[test]
    fn test_attach_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AuditConfig::new(4);
        let err = config.attach_file(dir.path()).unwrap_err();
        assert!(matches!(err, EditorError::NotAFile(_)));
    }
}
