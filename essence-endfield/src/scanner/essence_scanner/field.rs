use essence::positioning::Rect;
use essence::recognition::{Label, MatchResult};
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Logical field read from the item detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Attribute,
    Secondary,
    Skill,
    Deprecate,
    Lock,
}

impl Field {
    pub fn zh_cn(&self) -> &'static str {
        match self {
            Field::Attribute => "基础属性",
            Field::Secondary => "附加属性",
            Field::Skill => "技能属性",
            Field::Deprecate => "弃用按钮",
            Field::Lock => "锁定按钮",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Text,
    /// Icon templates matched inside the deprecate button region.
    DeprecateIcon,
    /// Icon templates matched inside the lock button region.
    LockIcon,
}

/// Where a field lives and which catalog classifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    pub rect: Rect<i32>,
    pub catalog: CatalogKind,
}

impl FieldSpec {
    pub fn new(field: Field, rect: Rect<i32>, catalog: CatalogKind) -> Self {
        FieldSpec { field, rect, catalog }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldReading {
    pub field: Field,
    pub result: MatchResult,
}

/// All field readings of one item, in field order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemReading(pub Vec<FieldReading>);

impl ItemReading {
    pub fn get(&self, field: Field) -> Option<&MatchResult> {
        self.0.iter().find(|r| r.field == field).map(|r| &r.result)
    }

    fn label(&self, field: Field) -> Option<&Label> {
        self.get(field).and_then(|r| r.label.as_ref())
    }

    pub fn attribute(&self) -> Option<&Label> {
        self.label(Field::Attribute)
    }

    pub fn secondary(&self) -> Option<&Label> {
        self.label(Field::Secondary)
    }

    pub fn skill(&self) -> Option<&Label> {
        self.label(Field::Skill)
    }

    pub fn stats_display(&self) -> String {
        let show = |l: Option<&Label>| l.map_or("None".to_string(), |l| l.to_string());
        format!("[{}, {}, {}]", show(self.attribute()), show(self.secondary()), show(self.skill()))
    }
}
