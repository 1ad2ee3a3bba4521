pub use weapon::{TargetCatalog, TargetDefinition};

mod weapon;

/// 基础属性
pub const ALL_ATTRIBUTE_STATS: [&str; 5] = ["敏捷提升", "力量提升", "意志提升", "智识提升", "主能力提升"];

/// 附加属性
pub const ALL_SECONDARY_STATS: [&str; 12] = [
    "攻击提升",
    "生命提升",
    "物理伤害提升",
    "灼热伤害提升",
    "电磁伤害提升",
    "寒冷伤害提升",
    "自然伤害提升",
    "暴击率提升",
    "源石技艺提升",
    "终结技效率提升",
    "法术伤害提升",
    "治疗效率提升",
];

/// 技能属性
pub const ALL_SKILL_STATS: [&str; 14] = [
    "强攻", "压制", "追袭", "粉碎", "昂扬", "巧技", "残暴", "附术", "医疗", "切骨", "迸发", "夜幕", "流转", "效益",
];

pub const LABEL_DEPRECATED: &str = "deprecated";
pub const LABEL_NOT_DEPRECATED: &str = "not_deprecated";
pub const LABEL_LOCKED: &str = "locked";
pub const LABEL_NOT_LOCKED: &str = "not_locked";

pub const ICON_LABELS: [&str; 4] = [LABEL_DEPRECATED, LABEL_NOT_DEPRECATED, LABEL_LOCKED, LABEL_NOT_LOCKED];

/// Every stat label in recognition order: attribute, secondary, skill.
pub fn all_stat_labels() -> Vec<&'static str> {
    ALL_ATTRIBUTE_STATS
        .iter()
        .chain(ALL_SECONDARY_STATS.iter())
        .chain(ALL_SKILL_STATS.iter())
        .copied()
        .collect()
}
