//! Revision setup and the revised-text result.
//!
//! The result is always the same literal value; nothing is computed from
//! the draft. Accepting it replaces the draft with the concatenation of
//! every segment, in order.

use serde::{Deserialize, Serialize};

// ============================================================================
// Setup
// ============================================================================

/// Rewrite style picked after reading the diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RevisionStyle {
    #[default]
    #[serde(rename = "author-tangjia")]
    Tangjia,
    #[serde(rename = "author-chendong")]
    Chendong,
    #[serde(rename = "author-feiwo")]
    Feiwo,
}

impl RevisionStyle {
    pub const ALL: [RevisionStyle; 3] = [
        RevisionStyle::Tangjia,
        RevisionStyle::Chendong,
        RevisionStyle::Feiwo,
    ];

    pub fn id(self) -> &'static str {
        match self {
            RevisionStyle::Tangjia => "author-tangjia",
            RevisionStyle::Chendong => "author-chendong",
            RevisionStyle::Feiwo => "author-feiwo",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RevisionStyle::Tangjia => "强化冲突型（适合节奏偏慢的章节）",
            RevisionStyle::Chendong => "宏大叙事型（适合世界观构建）",
            RevisionStyle::Feiwo => "情感深化型（适合情感线薄弱的章节）",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Inputs of the second wizard form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionSetup {
    pub style: RevisionStyle,
    pub custom_request: String,
}

// ============================================================================
// Result
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Original,
    Revised,
}

/// A run of text in the revised chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionSegment {
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RevisionSegment {
    fn original(content: &str) -> Self {
        Self {
            kind: SegmentKind::Original,
            content: content.to_string(),
            reason: None,
        }
    }

    fn revised(content: &str, reason: &str) -> Self {
        Self {
            kind: SegmentKind::Revised,
            content: content.to_string(),
            reason: Some(reason.to_string()),
        }
    }
}

/// A before/after score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatPair {
    pub before: u8,
    pub after: u8,
}

impl StatPair {
    pub fn gain(self) -> i16 {
        i16::from(self.after) - i16::from(self.before)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionStats {
    pub logic: StatPair,
    pub pacing: StatPair,
    pub expectation: StatPair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Logic,
    Character,
    Pacing,
}

/// Summary card for one key change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCard {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub before: String,
    pub after: String,
    pub description: String,
}

/// The revised chapter shown in the final wizard step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalRevision {
    pub revised_text: Vec<RevisionSegment>,
    pub stats: RevisionStats,
    pub changes: Vec<ChangeCard>,
}

impl FinalRevision {
    /// Chapter text after accepting: every segment's content, in order,
    /// with no separator added between segments.
    pub fn accepted_text(&self) -> String {
        self.revised_text.iter().map(|s| s.content.as_str()).collect()
    }

    /// Segments that were rewritten.
    pub fn revised_segments(&self) -> impl Iterator<Item = &RevisionSegment> {
        self.revised_text
            .iter()
            .filter(|s| s.kind == SegmentKind::Revised)
    }

    /// The fixed revision returned for every run.
    pub fn mock() -> Self {
        Self {
            revised_text: vec![
                RevisionSegment::original(
                    "苏瑶在书店工作三个月后，生活逐渐有了规律。每天早上九点开门，晚上七点关门，中间的时间她负责整理书架、接待顾客、偶尔推荐几本书。\n\n",
                ),
                RevisionSegment::revised(
                    "周屿成了书店最奇怪的常客。无论刮风下雨，他每周二和周五下午两点准时出现，雷打不动。",
                    "具体化了“常客”的概念，增加了“刮风下雨”和“准时出现”的细节，瞬间建立起人物的偏执感和神秘感。",
                ),
                RevisionSegment::original(
                    "他总在文字区停留很久，有时候只是站在书架前发呆。苏瑶注意到他总是选择靠窗的位置，午后的阳光镀在他身上，会让他平日里略显冷峻的轮廓柔和下来。\n\n“这本书怎么样？”周屿有一次拿着一本诗集问她。\n\n",
                ),
                RevisionSegment::revised(
                    "苏瑶这次没忍住，在他再次拿起那本《失落的信号》时走了过去：“先生，这本书你已经看了十二次了，还没决定买吗？”\n\n周屿的手指顿了一下，转头看向她，眼神里没有被拆穿的尴尬，反而多了一丝玩味：“我在等它即使被翻烂了，也没人买走的那一刻。”",
                    "彻底重写了对话。原版是无聊的推销，改版让苏瑶主动出击（打破摄像头人设），周屿的回答则充满了戏剧张力和潜台词，瞬间拉满了两人之间的推拉感。",
                ),
                RevisionSegment::revised(
                    "\n\n苏瑶愣住了。周屿笑了笑，第一次没有把书放回去，而是拿着它走向柜台：“不过今天不用等了。结账吧。”\n\n他付完款，将书推回给苏瑶，压低声音说道：“帮我保管好。这本书里，少了一页代码，只有你能找得到。”\n\n说完，他转身推门而去，留下苏瑶对着那本塑封完好的新书，后背发凉。",
                    "【黄金三秒钩子】这是最关键的改动！删除了平淡的“下次告诉你读后感”，改为“书里少页代码”+“只有你能找到”的悬疑钩子。这不仅制造了巨大的悬念（完好的书为什么少页？为什么只有她能找到？），直接锁死了读者的追读欲望，符合番茄/起点的留存逻辑。",
                ),
            ],
            stats: RevisionStats {
                logic: StatPair { before: 55, after: 98 },
                pacing: StatPair { before: 60, after: 95 },
                expectation: StatPair { before: 65, after: 99 },
            },
            changes: vec![
                ChangeCard {
                    title: "主角去NPC化".to_string(),
                    kind: ChangeKind::Character,
                    before: "被动问答 (这本书怎么样?)".to_string(),
                    after: "主动博弈 (看了12次还不买?)".to_string(),
                    description: "女主不再是背景板，主动挑起话头，瞬间立住“观察敏锐、性格直率”的人设。".to_string(),
                },
                ChangeCard {
                    title: "植入黄金钩子".to_string(),
                    kind: ChangeKind::Logic,
                    before: "平淡道别 (下次聊)".to_string(),
                    after: "惊悚悬疑 (少了一页代码)".to_string(),
                    description: "在结尾处植入强悬念，直接拉高读者的期待值，有效提升完读率和次日留存。".to_string(),
                },
            ],
        }
    }
}
