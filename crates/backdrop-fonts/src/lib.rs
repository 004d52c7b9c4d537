//! Block glyph font used to turn text into particle targets.

/// Rows in every glyph.
pub const GLYPH_HEIGHT: usize = 7;

/// Columns in every glyph.
pub const GLYPH_WIDTH: usize = 5;

/// Blank columns between adjacent glyphs.
pub const GLYPH_SPACING: usize = 1;

/// Character marking a filled cell.
pub const FILLED: char = '█';

type Glyph = [&'static str; GLYPH_HEIGHT];

const UNKNOWN: Glyph = [
    " ███ ",
    "█   █",
    "    █",
    "   █ ",
    "  █  ",
    "     ",
    "  █  ",
];

/// Look up the glyph for a character. Letters are case-insensitive.
pub fn glyph(ch: char) -> Option<&'static Glyph> {
    let glyph: &'static Glyph = match ch.to_ascii_uppercase() {
        'A' => &[" ███ ", "█   █", "█   █", "█████", "█   █", "█   █", "█   █"],
        'B' => &["████ ", "█   █", "█   █", "████ ", "█   █", "█   █", "████ "],
        'C' => &[" ███ ", "█   █", "█    ", "█    ", "█    ", "█   █", " ███ "],
        'D' => &["████ ", "█   █", "█   █", "█   █", "█   █", "█   █", "████ "],
        'E' => &["█████", "█    ", "█    ", "████ ", "█    ", "█    ", "█████"],
        'F' => &["█████", "█    ", "█    ", "████ ", "█    ", "█    ", "█    "],
        'G' => &[" ███ ", "█   █", "█    ", "█ ███", "█   █", "█   █", " ████"],
        'H' => &["█   █", "█   █", "█   █", "█████", "█   █", "█   █", "█   █"],
        'I' => &["█████", "  █  ", "  █  ", "  █  ", "  █  ", "  █  ", "█████"],
        'J' => &["  ███", "   █ ", "   █ ", "   █ ", "   █ ", "█  █ ", " ██  "],
        'K' => &["█   █", "█  █ ", "█ █  ", "██   ", "█ █  ", "█  █ ", "█   █"],
        'L' => &["█    ", "█    ", "█    ", "█    ", "█    ", "█    ", "█████"],
        'M' => &["█   █", "██ ██", "█ █ █", "█ █ █", "█   █", "█   █", "█   █"],
        'N' => &["█   █", "██  █", "█ █ █", "█  ██", "█   █", "█   █", "█   █"],
        'O' => &[" ███ ", "█   █", "█   █", "█   █", "█   █", "█   █", " ███ "],
        'P' => &["████ ", "█   █", "█   █", "████ ", "█    ", "█    ", "█    "],
        'Q' => &[" ███ ", "█   █", "█   █", "█   █", "█ █ █", "█  █ ", " ██ █"],
        'R' => &["████ ", "█   █", "█   █", "████ ", "█ █  ", "█  █ ", "█   █"],
        'S' => &[" ████", "█    ", "█    ", " ███ ", "    █", "    █", "████ "],
        'T' => &["█████", "  █  ", "  █  ", "  █  ", "  █  ", "  █  ", "  █  "],
        'U' => &["█   █", "█   █", "█   █", "█   █", "█   █", "█   █", " ███ "],
        'V' => &["█   █", "█   █", "█   █", "█   █", "█   █", " █ █ ", "  █  "],
        'W' => &["█   █", "█   █", "█   █", "█ █ █", "█ █ █", "██ ██", "█   █"],
        'X' => &["█   █", "█   █", " █ █ ", "  █  ", " █ █ ", "█   █", "█   █"],
        'Y' => &["█   █", "█   █", " █ █ ", "  █  ", "  █  ", "  █  ", "  █  "],
        'Z' => &["█████", "    █", "   █ ", "  █  ", " █   ", "█    ", "█████"],
        '0' => &[" ███ ", "█   █", "█  ██", "█ █ █", "██  █", "█   █", " ███ "],
        '1' => &["  █  ", " ██  ", "  █  ", "  █  ", "  █  ", "  █  ", " ███ "],
        '2' => &[" ███ ", "█   █", "    █", "   █ ", "  █  ", " █   ", "█████"],
        '3' => &["████ ", "    █", "    █", " ███ ", "    █", "    █", "████ "],
        '4' => &["   █ ", "  ██ ", " █ █ ", "█  █ ", "█████", "   █ ", "   █ "],
        '5' => &["█████", "█    ", "████ ", "    █", "    █", "█   █", " ███ "],
        '6' => &[" ███ ", "█    ", "█    ", "████ ", "█   █", "█   █", " ███ "],
        '7' => &["█████", "    █", "   █ ", "  █  ", "  █  ", "  █  ", "  █  "],
        '8' => &[" ███ ", "█   █", "█   █", " ███ ", "█   █", "█   █", " ███ "],
        '9' => &[" ███ ", "█   █", "█   █", " ████", "    █", "    █", " ███ "],
        ' ' => &["     ", "     ", "     ", "     ", "     ", "     ", "     "],
        '!' => &["  █  ", "  █  ", "  █  ", "  █  ", "  █  ", "     ", "  █  "],
        '.' => &["     ", "     ", "     ", "     ", "     ", "     ", "  █  "],
        '-' => &["     ", "     ", "     ", " ███ ", "     ", "     ", "     "],
        '?' => &UNKNOWN,
        _ => return None,
    };
    Some(glyph)
}

/// Build block art for a string.
///
/// Returns [`GLYPH_HEIGHT`] lines. Characters without a glyph render as `?`.
pub fn build_text_art(text: &str) -> Vec<String> {
    let mut lines = vec![String::new(); GLYPH_HEIGHT];
    for (i, ch) in text.chars().enumerate() {
        let glyph = glyph(ch).unwrap_or(&UNKNOWN);
        for (line, row) in lines.iter_mut().zip(glyph.iter()) {
            if i > 0 {
                line.extend(std::iter::repeat_n(' ', GLYPH_SPACING));
            }
            line.push_str(row);
        }
    }
    lines
}

/// Filled/empty cell grid of rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl TextMask {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the cell at column `x`, row `y` is filled. Out of range is empty.
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }
}

/// Rasterize text into a cell mask.
pub fn text_mask(text: &str) -> TextMask {
    let art = build_text_art(text);
    let width = art.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let mut cells = vec![false; width * GLYPH_HEIGHT];
    for (y, line) in art.iter().enumerate() {
        for (x, ch) in line.chars().enumerate() {
            cells[y * width + x] = ch == FILLED;
        }
    }
    TextMask {
        width,
        height: GLYPH_HEIGHT,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyphs_are_uniform() {
        let chars = ('A'..='Z').chain('0'..='9').chain([' ', '!', '.', '-', '?']);
        for ch in chars {
            let g = glyph(ch).unwrap();
            for row in g {
                assert_eq!(row.chars().count(), GLYPH_WIDTH, "glyph {ch:?}");
            }
        }
    }

    #[test]
    fn test_lowercase_maps_to_uppercase() {
        assert_eq!(glyph('q'), glyph('Q'));
        assert!(glyph('~').is_none());
    }

    #[test]
    fn test_build_text_art_width() {
        let art = build_text_art("HI");
        assert_eq!(art.len(), GLYPH_HEIGHT);
        for line in &art {
            assert_eq!(line.chars().count(), 2 * GLYPH_WIDTH + GLYPH_SPACING);
        }
        assert!(build_text_art("").iter().all(String::is_empty));
    }

    #[test]
    fn test_unknown_renders_as_question_mark() {
        assert_eq!(build_text_art("~"), build_text_art("?"));
    }

    #[test]
    fn test_text_mask() {
        let mask = text_mask("I");
        assert_eq!((mask.width(), mask.height()), (5, 7));
        assert!(mask.is_set(0, 0));
        assert!(!mask.is_set(0, 1));
        assert!(mask.is_set(2, 3));
        assert!(!mask.is_set(5, 0));
        assert_eq!(mask.filled_count(), 15);
    }
}
