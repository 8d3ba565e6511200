//! Layout helpers shared by the guide's components.

use ratatui::layout::Rect;

/// Places a `width` x `height` panel just below `anchor`, flipping above it
/// when there is no room below and clamping into `bounds`.
pub fn anchored_rect(anchor: Rect, width: u16, height: u16, bounds: Rect) -> Rect {
    let width = width.min(bounds.width);
    let height = height.min(bounds.height);

    let below = anchor.bottom();
    let y = if below.saturating_add(height) <= bounds.bottom() {
        below
    } else if anchor.y.saturating_sub(height) >= bounds.y {
        anchor.y - height
    } else {
        bounds.bottom().saturating_sub(height)
    };
    let x = anchor.x.min(bounds.right().saturating_sub(width)).max(bounds.x);
    Rect::new(x, y, width, height)
}

/// Truncates `text` to `width` display columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchored_rect_prefers_below_and_flips_above() {
        let bounds = Rect::new(0, 0, 80, 20);
        assert_eq!(anchored_rect(Rect::new(10, 2, 12, 1), 30, 6, bounds), Rect::new(10, 3, 30, 6));
        assert_eq!(anchored_rect(Rect::new(70, 17, 8, 1), 30, 6, bounds), Rect::new(50, 11, 30, 6));
    }

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate_to_width("Katherine Johnson", 8), "Katheri…");
        assert_eq!(truncate_to_width("短い名前です", 5), "短い…");
        assert_eq!(truncate_to_width("ok", 8), "ok");
    }
}
