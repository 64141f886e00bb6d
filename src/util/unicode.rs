use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` down to `max_cells`, ending in `…` when anything was dropped.
pub fn fit_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for g in s.graphemes(true) {
        let w = display_width(g);
        if used + w > max_cells - 1 {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Right-pad with spaces to exactly `cells` (truncating first if needed)
pub fn pad_to_width(s: &str, cells: usize) -> String {
    let mut out = fit_to_width(s, cells);
    let w = display_width(&out);
    out.push_str(&" ".repeat(cells.saturating_sub(w)));
    out
}

/// Byte offset of the grapheme boundary after `offset`, if any
pub fn next_boundary(s: &str, offset: usize) -> Option<usize> {
    s.get(offset..)?
        .graphemes(true)
        .next()
        .map(|g| offset + g.len())
}

/// Byte offset of the grapheme boundary before `offset`, if any
pub fn prev_boundary(s: &str, offset: usize) -> Option<usize> {
    s.get(..offset)?
        .graphemes(true)
        .next_back()
        .map(|g| offset - g.len())
}

/// Start of the word left of `offset`, skipping whitespace first
pub fn word_start_before(s: &str, offset: usize) -> usize {
    let Some(prefix) = s.get(..offset) else {
        return 0;
    };
    let trimmed = prefix.trim_end();
    match trimmed.rfind(char::is_whitespace) {
        Some(i) => i + trimmed[i..].chars().next().map_or(1, char::len_utf8),
        None => 0,
    }
}
