//! Static glyph-width tables for the two built-in PDF fonts the exporter uses.
//!
//! Widths are the standard Helvetica AFM advances in 1/1000 em, covering
//! ASCII 0x20..=0x7E. Index = (char as usize) - 32. A handful of typographic
//! characters that show up in generated text have explicit widths; anything
//! else falls back to the average digit width.

/// Millimetres per typographic point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

pub struct FontMetricTable {
    widths: [u16; 95],
    fallback: u16,
}

impl FontMetricTable {
    fn char_width(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        match c {
            '•' => 350,
            '—' | '…' => 1000,
            '–' => 556,
            '‘' | '’' => 222,
            '“' | '”' => 333,
            '\u{a0}' => self.widths[0],
            _ => self.fallback,
        }
    }

    /// Width of `s` in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c) as f32).sum::<f32>() / 1000.0
    }
}

impl Font {
    pub fn table(&self) -> &'static FontMetricTable {
        match self {
            Font::Helvetica => &HELVETICA_TABLE,
            Font::HelveticaBold => &HELVETICA_BOLD_TABLE,
        }
    }

    /// Rendered width of `s` in millimetres at `size_pt`.
    pub fn width_mm(&self, s: &str, size_pt: f32) -> f32 {
        self.table().measure_str(s) * size_pt * MM_PER_PT
    }
}

/// Greedy word wrap to `max_mm`. Explicit newlines always break; a single
/// word wider than the line is split between characters. Never returns an
/// empty vector.
pub fn wrap_to_width(text: &str, font: Font, size_pt: f32, max_mm: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if font.width_mm(&candidate, size_pt) <= max_mm {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if font.width_mm(word, size_pt) <= max_mm {
                current = word.to_string();
            } else {
                // Hard-break an overlong word
                for c in word.chars() {
                    current.push(c);
                    if font.width_mm(&current, size_pt) > max_mm && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(c);
                    }
                }
            }
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    fallback: 556,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    fallback: 556,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_known_widths() {
        let table = Font::Helvetica.table();
        assert!((table.measure_str("a") - 0.556).abs() < 1e-6);
        assert!((table.measure_str("il") - 0.444).abs() < 1e-6);
        assert!(Font::HelveticaBold.width_mm("Rust", 11.0) > Font::Helvetica.width_mm("Rust", 11.0));
    }

    #[test]
    fn test_short_text_single_line() {
        let lines = wrap_to_width("Hello world", Font::Helvetica, 11.0, 182.0);
        assert_eq!(lines, vec!["Hello world"]);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "lorem ipsum dolor sit amet ".repeat(20);
        let lines = wrap_to_width(&text, Font::Helvetica, 11.0, 60.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(Font::Helvetica.width_mm(line, 11.0) <= 60.0);
        }
        let rejoined = lines.join(" ");
        assert_eq!(rejoined.split_whitespace().count(), text.split_whitespace().count());
    }

    #[test]
    fn test_newlines_force_breaks() {
        let lines = wrap_to_width("one\ntwo\n\nthree", Font::Helvetica, 11.0, 182.0);
        assert_eq!(lines, vec!["one", "two", "", "three"]);
    }

    #[test]
    fn test_overlong_word_is_split() {
        let word = "x".repeat(200);
        let lines = wrap_to_width(&word, Font::Helvetica, 11.0, 30.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for line in &lines {
            assert!(Font::Helvetica.width_mm(line, 11.0) <= 30.0);
        }
    }

    #[test]
    fn test_empty_text_yields_one_line() {
        assert_eq!(wrap_to_width("", Font::Helvetica, 11.0, 182.0), vec![String::new()]);
    }
}
