//! Layout engine: template + dpi → pixel geometry
//!
//! Every distance is a fraction of the converted canvas width or height,
//! never an absolute pixel count, so a label keeps its proportions at every
//! print density. The output is a pure function of `(template, dpi)`.

use crate::{
    error::{LayoutError, Result},
    template::{LabelTemplate, TemplateFamily, REFERENCE_SLOTS},
    units::{cm_to_px, frac_px},
};

/// Outer padding on every side, as a fraction of canvas height.
pub const OUTER_PAD_FRAC: f64 = 0.07;

/// Bar height for the single-bar family, fraction of canvas height.
pub const BAR_HEIGHT_FRAC: f64 = 0.22;
/// Horizontal inset of the bar from each edge, fraction of canvas width.
pub const BAR_INSET_FRAC: f64 = 0.12;
/// Bar corner radius, fraction of the bar's own height.
pub const BAR_RADIUS_FRAC: f64 = 0.40;
/// Gap between the code square and the bar, fraction of canvas height.
pub const BAR_GAP_FRAC: f64 = 0.03;

/// Gap between the code square and the slot panel, fraction of canvas width.
pub const PANEL_GAP_FRAC: f64 = 0.04;
/// Gap between stacked slots, fraction of canvas height.
pub const SLOT_GAP_FRAC: f64 = 0.025;
/// Stacked slot corner radius, fraction of the slot height.
pub const SLOT_RADIUS_FRAC: f64 = 0.30;

/// Text box inset inside a slot, fraction of the slot height.
pub const TEXT_INSET_FRAC: f64 = 0.15;

/// Where the code bitmap goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeRect {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

/// One slot's rounded rectangle, corners inclusive of `x0,y0`, exclusive of `x1,y1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
    pub radius: u32,
}

/// Box available to a slot's text, in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SlotRect {
    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    /// Text box inset by [`TEXT_INSET_FRAC`] of the slot height on all sides.
    pub fn text_box(&self) -> TextBox {
        let inset = frac_px(self.height(), TEXT_INSET_FRAC);
        TextBox {
            x: self.x0 + inset,
            y: self.y0 + inset,
            width: self.width().saturating_sub(2 * inset).max(1),
            height: self.height().saturating_sub(2 * inset).max(1),
        }
    }
}

/// Canvas composition plan for one render call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub code: CodeRect,
    pub slots: Vec<SlotRect>,
}

/// Computes the geometry of `template` at `dpi`.
pub fn compute_layout(template: &LabelTemplate, dpi: u32) -> Result<LayoutPlan> {
    if dpi == 0 {
        return Err(LayoutError::InvalidDpi(dpi).into());
    }
    template.check()?;

    let width = cm_to_px(template.width_cm, dpi).max(1);
    let height = cm_to_px(template.height_cm, dpi).max(1);

    let plan = match template.family {
        TemplateFamily::CodeWithBar => bar_layout(width, height),
        TemplateFamily::CodeWithStack => stack_layout(width, height, template.slot_count),
    };

    log::debug!(
        "layout: {} {}x{} @{}dpi, code {}px at ({}, {}), {} slot(s)",
        template.family.name(),
        plan.canvas_width,
        plan.canvas_height,
        dpi,
        plan.code.side,
        plan.code.x,
        plan.code.y,
        plan.slots.len()
    );

    Ok(plan)
}

fn bar_layout(width: u32, height: u32) -> LayoutPlan {
    let pad = frac_px(height, OUTER_PAD_FRAC);

    // Bar rests on the bottom padding
    let bar_h = frac_px(height, BAR_HEIGHT_FRAC);
    let bar_y1 = height.saturating_sub(pad);
    let bar_y0 = bar_y1.saturating_sub(bar_h);
    let inset = frac_px(width, BAR_INSET_FRAC);
    let bar = SlotRect {
        x0: inset,
        y0: bar_y0,
        x1: width.saturating_sub(inset).max(inset),
        y1: bar_y1,
        radius: frac_px(bar_y1 - bar_y0, BAR_RADIUS_FRAC),
    };

    // Code fills the upper zone's width, centered in what is left above the bar
    let gap = frac_px(height, BAR_GAP_FRAC);
    let zone_h = bar_y0.saturating_sub(gap).saturating_sub(pad);
    let side = width.saturating_sub(2 * pad).min(zone_h);
    let code = CodeRect {
        x: (width - side) / 2,
        y: pad + (zone_h - side) / 2,
        side,
    };

    LayoutPlan {
        canvas_width: width,
        canvas_height: height,
        code,
        slots: vec![bar],
    }
}

fn stack_layout(width: u32, height: u32, slot_count: usize) -> LayoutPlan {
    let pad = frac_px(height, OUTER_PAD_FRAC);
    let usable_h = height.saturating_sub(2 * pad);

    // Code square spans the full usable height, flush left
    let code = CodeRect {
        x: pad,
        y: pad,
        side: usable_h,
    };

    let panel_x0 = pad + usable_h + frac_px(width, PANEL_GAP_FRAC);
    let panel_x1 = width.saturating_sub(pad).max(panel_x0);

    // Rows are always sized against the reference grid; fewer slots only
    // shorten the stack, which is then centered
    let grid = REFERENCE_SLOTS as u32;
    let gap = frac_px(height, SLOT_GAP_FRAC);
    let slot_h = usable_h.saturating_sub(gap * (grid - 1)) / grid;
    let count = slot_count as u32;
    let stack_h = count * slot_h + count.saturating_sub(1) * gap;
    let top = pad + usable_h.saturating_sub(stack_h) / 2;
    let radius = frac_px(slot_h, SLOT_RADIUS_FRAC);

    let slots = (0..count)
        .map(|i| {
            let y0 = top + i * (slot_h + gap);
            SlotRect {
                x0: panel_x0,
                y0,
                x1: panel_x1,
                y1: y0 + slot_h,
                radius,
            }
        })
        .collect();

    LayoutPlan {
        canvas_width: width,
        canvas_height: height,
        code,
        slots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(n: usize) -> LabelTemplate {
        LabelTemplate::code_with_stack(n).unwrap()
    }

    #[test]
    fn test_bar_canvas_matches_physical_size() {
        let plan = compute_layout(&LabelTemplate::code_with_bar(), 300).unwrap();
        assert_eq!((plan.canvas_width, plan.canvas_height), (295, 413));
        assert_eq!(plan.slots.len(), 1);
    }

    #[test]
    fn test_bar_occupies_lower_fifth() {
        let plan = compute_layout(&LabelTemplate::code_with_bar(), 300).unwrap();
        let bar = plan.slots[0];
        let share = bar.height() as f64 / plan.canvas_height as f64;
        assert!((0.20..=0.23).contains(&share), "bar share {share}");
        // bar sits in the bottom part, under the code
        assert!(bar.y0 > plan.code.y + plan.code.side);
        assert!(bar.y1 <= plan.canvas_height);
        // ~12% inset on both sides
        assert_eq!(bar.x0, plan.canvas_width - bar.x1);
        assert_eq!(bar.x0, 35);
        // near-pill rounding
        assert!(bar.radius * 100 >= bar.height() * 30 && bar.radius * 100 <= bar.height() * 48);
    }

    #[test]
    fn test_bar_code_is_centered_square_in_upper_zone() {
        let plan = compute_layout(&LabelTemplate::code_with_bar(), 300).unwrap();
        let pad = frac_px(plan.canvas_height, OUTER_PAD_FRAC);
        assert_eq!(plan.code.side, plan.canvas_width - 2 * pad);
        assert_eq!(plan.code.x, pad);
        assert!(plan.code.y >= pad);
    }

    #[test]
    fn test_stack_code_flush_left_full_height() {
        let plan = compute_layout(&stack(6), 300).unwrap();
        assert_eq!((plan.canvas_width, plan.canvas_height), (591, 413));
        let pad = frac_px(413, OUTER_PAD_FRAC);
        assert_eq!(plan.code, CodeRect { x: pad, y: pad, side: 413 - 2 * pad });
        for slot in &plan.slots {
            assert!(slot.x0 > plan.code.x + plan.code.side);
            assert!(slot.x1 <= plan.canvas_width - pad);
        }
    }

    #[test]
    fn test_reference_grid_slot_height_is_shared() {
        for dpi in [150, 200, 300, 600] {
            let three = compute_layout(&stack(3), dpi).unwrap();
            let six = compute_layout(&stack(6), dpi).unwrap();
            let h3 = three.slots[0].height() as i64;
            let h6 = six.slots[0].height() as i64;
            assert!((h3 - h6).abs() <= 1, "{dpi}dpi: {h3} vs {h6}");
            for slot in &three.slots {
                assert_eq!(slot.height(), three.slots[0].height());
            }
        }
    }

    #[test]
    fn test_short_stack_is_vertically_centered() {
        for n in 1..=REFERENCE_SLOTS {
            let plan = compute_layout(&stack(n), 300).unwrap();
            let pad = frac_px(plan.canvas_height, OUTER_PAD_FRAC) as i64;
            let first = plan.slots.first().unwrap();
            let last = plan.slots.last().unwrap();
            let above = first.y0 as i64 - pad;
            let below = (plan.canvas_height as i64 - pad) - last.y1 as i64;
            assert!((above - below).abs() <= 1, "{n} slots: {above} above, {below} below");
        }
    }

    #[test]
    fn test_stacked_slots_do_not_overlap() {
        let plan = compute_layout(&stack(6), 600).unwrap();
        for pair in plan.slots.windows(2) {
            assert!(pair[0].y1 < pair[1].y0);
        }
    }

    #[test]
    fn test_proportions_hold_across_dpi() {
        let low = compute_layout(&stack(6), 150).unwrap();
        let high = compute_layout(&stack(6), 600).unwrap();
        let ratio = |plan: &LayoutPlan| plan.code.side as f64 / plan.canvas_height as f64;
        assert!((ratio(&low) - ratio(&high)).abs() < 0.02);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let a = compute_layout(&stack(3), 300).unwrap();
        let b = compute_layout(&stack(3), 300).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_dpi_rejected() {
        assert!(compute_layout(&LabelTemplate::code_with_bar(), 0).is_err());
    }

    #[test]
    fn test_tiny_dpi_stays_total() {
        for dpi in 1..20 {
            assert!(compute_layout(&stack(6), dpi).is_ok());
            assert!(compute_layout(&LabelTemplate::code_with_bar(), dpi).is_ok());
        }
    }

    #[test]
    fn test_text_box_is_inset() {
        let plan = compute_layout(&stack(6), 300).unwrap();
        let slot = plan.slots[0];
        let text = slot.text_box();
        assert!(text.x > slot.x0 && text.y > slot.y0);
        assert!(text.x + text.width < slot.x1);
        assert!(text.y + text.height < slot.y1);
    }
}
