//! VIP human-editor connection request.
//!
//! Picking an editor and confirming only produces a confirmation message;
//! no request leaves the process.

/// Message shown after a connection request is submitted.
pub const CONFIRMATION: &str = "已为您提交VIP连线申请！专业编辑将在5分钟内联系您。";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformEditor {
    Qidian,
    #[default]
    Fanqie,
    Zhihu,
    Qimao,
    Jinjiang,
}

impl PlatformEditor {
    pub const ALL: [PlatformEditor; 5] = [
        PlatformEditor::Qidian,
        PlatformEditor::Fanqie,
        PlatformEditor::Zhihu,
        PlatformEditor::Qimao,
        PlatformEditor::Jinjiang,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PlatformEditor::Qidian => "qidian",
            PlatformEditor::Fanqie => "fanqie",
            PlatformEditor::Zhihu => "zhihu",
            PlatformEditor::Qimao => "qimao",
            PlatformEditor::Jinjiang => "jinjiang",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlatformEditor::Qidian => "起点专业编辑-慧慧",
            PlatformEditor::Fanqie => "番茄金牌主编-蓝心",
            PlatformEditor::Zhihu => "知乎短文主编-eric",
            PlatformEditor::Qimao => "七猫黄金编辑-可轩",
            PlatformEditor::Jinjiang => "晋江王牌编辑-方方",
        }
    }

    pub fn specialty(self) -> &'static str {
        match self {
            PlatformEditor::Qidian => "深耕玄幻/仙侠，节奏把控一流",
            PlatformEditor::Fanqie => "脑洞文/爽文专家，专治黄金三章",
            PlatformEditor::Zhihu => "反转/脑洞/现实主义，文笔犀利",
            PlatformEditor::Qimao => "女频/言情/甜宠，情感细腻",
            PlatformEditor::Jinjiang => "纯爱/无限流/剧情向，人设塑造",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|&e| e == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Editor preference held by the audit form. Survives closing the modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VipRequest {
    pub preference: PlatformEditor,
}

impl VipRequest {
    /// Submit the request and return the message to show the user.
    pub fn confirm(&self) -> &'static str {
        log::info!("VIP editor connection requested: {}", self.preference.id());
        CONFIRMATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_fanqie() {
        assert_eq!(VipRequest::default().preference, PlatformEditor::Fanqie);
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(PlatformEditor::Jinjiang.next(), PlatformEditor::Qidian);
        assert_eq!(PlatformEditor::Qidian.prev(), PlatformEditor::Jinjiang);
    }

    #[test]
    fn test_confirm_message() {
        let request = VipRequest {
            preference: PlatformEditor::Zhihu,
        };
        assert_eq!(request.confirm(), CONFIRMATION);
    }
}
