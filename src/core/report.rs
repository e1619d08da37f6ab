//! Static diagnostic report and reader-retention curve.
//!
//! Both are fixed mock values shown after the diagnosis pipeline finishes.
//! The figures are display copy, not measurements.

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Severe,
    Moderate,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Severe => "严重",
            Severity::Moderate => "中等",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkBook {
    pub title: &'static str,
    pub similarity: &'static str,
    pub similar_points: &'static str,
    pub success_key: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub title: &'static str,
    pub severity: Option<Severity>,
    pub current: &'static str,
    pub suggestion: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterNote {
    pub icon: &'static str,
    pub headline: &'static str,
    pub detail: &'static str,
    pub action: &'static str,
}

/// The diagnosis shown in the report step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticReport {
    pub title: &'static str,
    /// Stars out of five.
    pub rating: u8,
    pub summary: &'static str,
    pub core_trope: &'static str,
    pub trope_tags: &'static [&'static str],
    pub selling_point: &'static str,
    pub benchmarks: Vec<BenchmarkBook>,
    pub benchmark_advice: &'static str,
    pub issues: Vec<Issue>,
    pub characters: Vec<CharacterNote>,
    pub conclusion: &'static str,
}

impl DiagnosticReport {
    pub fn mock() -> Self {
        Self {
            title: "深度诊断报告",
            rating: 4,
            summary: "本章《书店来客》整体框架完整，文笔流畅。经分析发现：文字细腻度较高，但开篇300字留存风险较大，结尾悬念钩子不足。",
            core_trope: "神秘常客固定时间造访书店，与店员产生微妙联系，身份成谜",
            trope_tags: &["日常悬疑", "身份反差", "暗线推进"],
            selling_point: "这类\"熟悉的陌生人\"设定在晋江/番茄有稳定受众，关键是要在前三章揭示身份线索制造追读欲。",
            benchmarks: vec![
                BenchmarkBook {
                    title: "《他来了，请闭眼》",
                    similarity: "高度相似",
                    similar_points: "神秘男主+日常场景+身份悬疑",
                    success_key: "开篇即抛出\"犯罪侧写师\"身份钩子",
                },
                BenchmarkBook {
                    title: "《余生，请多指教》",
                    similarity: "部分相似",
                    similar_points: "治愈系日常+细水长流",
                    success_key: "女主职业特殊性带来持续看点",
                },
            ],
            benchmark_advice: "借鉴前者的悬念铺设节奏",
            issues: vec![
                Issue {
                    title: "结构问题：段落重复",
                    severity: Some(Severity::Severe),
                    current: "开篇第一段与倒数第二段完全相同（周屿接过书...），读者易误认为排版错误而流失。",
                    suggestion: "删除开篇重复段落，或改写为不同视角。",
                },
                Issue {
                    title: "结尾钩子不足",
                    severity: Some(Severity::Moderate),
                    current: "\"下次来告诉你读后感\" —— 缺乏悬念，无追读动力",
                    suggestion: "增加悬念元素，如暗示男主身份、留下谜题等",
                },
            ],
            characters: vec![
                CharacterNote {
                    icon: "👩",
                    headline: "女主 苏瑶：主动性不足",
                    detail: "当前表现过于被动，缺乏内心戏和主观判断。",
                    action: "增加心理描写",
                },
                CharacterNote {
                    icon: "👨",
                    headline: "男主 周屿：神秘感缺乏支撑",
                    detail: "行为怪异但缺乏细节铺垫，显得刻意。",
                    action: "增加具体怪癖",
                },
            ],
            conclusion: "本章基础扎实，主要问题在于开篇节奏和结尾钩子。修复重复段落、强化悬念后，留存率预计可提升30%以上。",
        }
    }
}

/// A labelled point on the reader curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveMarker {
    pub x: f64,
    pub y: f64,
    pub label: &'static str,
}

/// Simulated reader emotion against the platform retention baseline.
///
/// `x` is position through the chapter (0–100), `y` is a percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderCurve {
    pub emotion: Vec<(f64, f64)>,
    pub baseline: Vec<(f64, f64)>,
    pub drop_off: CurveMarker,
    pub peak: CurveMarker,
    pub pain_point: &'static str,
    pub hook_score: &'static str,
}

impl ReaderCurve {
    pub fn mock() -> Self {
        Self {
            emotion: vec![
                (0.0, 20.0),
                (10.0, 20.0),
                (15.0, 13.3),
                (25.0, 13.3),
                (35.0, 13.3),
                (40.0, 46.7),
                (50.0, 60.0),
                (60.0, 73.3),
                (70.0, 33.3),
                (80.0, 80.0),
                (90.0, 100.0),
                (100.0, 66.7),
            ],
            baseline: vec![
                (0.0, 66.7),
                (25.0, 64.0),
                (50.0, 60.0),
                (75.0, 53.5),
                (100.0, 46.7),
            ],
            drop_off: CurveMarker {
                x: 25.0,
                y: 13.3,
                label: "⚠ 跳出点: 黄金三秒未达标",
            },
            peak: CurveMarker {
                x: 80.0,
                y: 80.0,
                label: "★ 完读率提升点",
            },
            pain_point: "开篇前300字留存率预估低于平均值15%，建议加强冲突。",
            hook_score: "85/100。结尾悬念设置符合“番茄”追读算法逻辑。",
        }
    }
}
