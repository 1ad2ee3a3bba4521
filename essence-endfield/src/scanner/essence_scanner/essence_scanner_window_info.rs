use std::fmt;

use essence::positioning::{Pos, Rect, Size};
use essence::utils::linspace_i32;

use super::field::{CatalogKind, Field, FieldSpec};

pub const GRID_ROWS: usize = 5;
pub const GRID_COLS: usize = 9;

/// One icon slot of the essence grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

impl GridCell {
    /// Row-major index.
    pub fn index(&self) -> usize {
        self.row * GRID_COLS + self.col
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "第 {} 行第 {} 列", self.row + 1, self.col + 1)
    }
}

/// Calibration constants of the weapon essence page, in client pixels of a
/// 1920x1080 window.
#[derive(Debug, Clone, PartialEq)]
pub struct EssenceScannerWindowInfo {
    pub resolution: Size<i32>,

    pub grid_x: Vec<i32>,
    pub grid_y: Vec<i32>,

    pub attribute_rect: Rect<i32>,
    pub secondary_rect: Rect<i32>,
    pub skill_rect: Rect<i32>,
    pub deprecate_button_rect: Rect<i32>,
    pub lock_button_rect: Rect<i32>,

    pub deprecate_button_pos: Pos<i32>,
    pub lock_button_pos: Pos<i32>,
}

impl Default for EssenceScannerWindowInfo {
    fn default() -> Self {
        EssenceScannerWindowInfo {
            resolution: Size::new(1920, 1080),
            grid_x: linspace_i32(128, 1374, GRID_COLS),
            grid_y: linspace_i32(196, 819, GRID_ROWS),
            attribute_rect: Rect::from_ltrb(1508, 358, 1700, 390),
            secondary_rect: Rect::from_ltrb(1508, 416, 1700, 448),
            skill_rect: Rect::from_ltrb(1508, 468, 1700, 500),
            deprecate_button_rect: Rect::from_ltrb(1790, 270, 1823, 302),
            lock_button_rect: Rect::from_ltrb(1825, 270, 1857, 302),
            deprecate_button_pos: Pos::new(1807, 284),
            lock_button_pos: Pos::new(1839, 286),
        }
    }
}

impl EssenceScannerWindowInfo {
    pub fn text_field_size(&self) -> Size<u32> {
        rect_size(self.attribute_rect)
    }

    pub fn deprecate_field_size(&self) -> Size<u32> {
        rect_size(self.deprecate_button_rect)
    }

    pub fn lock_field_size(&self) -> Size<u32> {
        rect_size(self.lock_button_rect)
    }

    /// Largest icon template that fits both icon fields.
    pub fn icon_field_size(&self) -> Size<u32> {
        let (d, l) = (self.deprecate_field_size(), self.lock_field_size());
        Size::new(d.width.min(l.width), d.height.min(l.height))
    }

    pub fn cell_count(&self) -> usize {
        self.grid_x.len() * self.grid_y.len()
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> Vec<GridCell> {
        let cols = self.grid_x.len();
        (0..self.cell_count())
            .map(|i| GridCell {
                row: i / cols,
                col: i % cols,
            })
            .collect()
    }

    /// Client-relative click target of a cell.
    pub fn cell_pos(&self, cell: GridCell) -> Pos<i32> {
        Pos::new(self.grid_x[cell.col], self.grid_y[cell.row])
    }

    /// The regions read for every item, in processing order.
    pub fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new(Field::Attribute, self.attribute_rect, CatalogKind::Text),
            FieldSpec::new(Field::Secondary, self.secondary_rect, CatalogKind::Text),
            FieldSpec::new(Field::Skill, self.skill_rect, CatalogKind::Text),
            FieldSpec::new(Field::Deprecate, self.deprecate_button_rect, CatalogKind::DeprecateIcon),
            FieldSpec::new(Field::Lock, self.lock_button_rect, CatalogKind::LockIcon),
        ]
    }
}

fn rect_size(rect: Rect<i32>) -> Size<u32> {
    Size::new(rect.width as u32, rect.height as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_45_cells_in_row_major_order() {
        let info = EssenceScannerWindowInfo::default();
        let cells = info.cells();
        assert_eq!(cells.len(), 45);
        assert_eq!(cells[0], GridCell { row: 0, col: 0 });
        assert_eq!(cells[8], GridCell { row: 0, col: 8 });
        assert_eq!(cells[9], GridCell { row: 1, col: 0 });
        assert!(cells.iter().enumerate().all(|(i, c)| c.index() == i));
    }

    #[test]
    fn cell_positions_span_the_calibrated_bounds() {
        let info = EssenceScannerWindowInfo::default();
        assert_eq!(info.cell_pos(GridCell { row: 0, col: 0 }), Pos::new(128, 196));
        assert_eq!(info.cell_pos(GridCell { row: 4, col: 8 }), Pos::new(1374, 819));
        assert_eq!(info.cell_pos(GridCell { row: 2, col: 1 }), Pos::new(283, 507));
    }

    #[test]
    fn field_sizes_follow_the_calibration() {
        let info = EssenceScannerWindowInfo::default();
        for spec in info.fields() {
            let size = rect_size(spec.rect);
            match spec.catalog {
                CatalogKind::Text => assert_eq!(size, info.text_field_size()),
                CatalogKind::DeprecateIcon => assert_eq!(size, info.deprecate_field_size()),
                CatalogKind::LockIcon => assert_eq!(size, info.lock_field_size()),
            }
        }
        assert_eq!(info.text_field_size(), Size::new(192, 32));
        assert_eq!(info.deprecate_field_size(), Size::new(33, 32));
        assert_eq!(info.lock_field_size(), Size::new(32, 32));
        assert_eq!(info.icon_field_size(), Size::new(32, 32));
    }

    #[test]
    fn cell_display_is_one_based() {
        assert_eq!(GridCell { row: 0, col: 2 }.to_string(), "第 1 行第 3 列");
    }
}
