//! Cursor-based page layout.
//!
//! [`DocumentCursor`] turns a sequence of [`Block`]s into positioned text and
//! rules on pages. It knows nothing about PDF; the result is a plain
//! [`Layout`] value that a backend draws.

use super::metrics::{wrap_to_width, Font};

/// Page geometry in millimetres. `y` grows downward from the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    /// Cursor position at the top of every page.
    pub top: f32,
    /// Nothing may extend below this line.
    pub bottom_limit: f32,
    pub line_height: f32,
}

impl PageGeometry {
    pub const A4: PageGeometry = PageGeometry {
        width: 210.0,
        height: 297.0,
        margin: 14.0,
        top: 18.0,
        bottom_limit: 285.0,
        line_height: 6.0,
    };

    pub fn content_width(&self) -> f32 {
        self.width - self.margin * 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Subtitle,
    SectionHeader,
    Body,
    Emphasis,
    Footer,
}

impl TextStyle {
    pub fn font(&self) -> Font {
        match self {
            TextStyle::Title | TextStyle::SectionHeader | TextStyle::Emphasis => Font::HelveticaBold,
            TextStyle::Subtitle | TextStyle::Body | TextStyle::Footer => Font::Helvetica,
        }
    }

    pub fn size_pt(&self) -> f32 {
        match self {
            TextStyle::Title => 18.0,
            TextStyle::SectionHeader => 14.0,
            TextStyle::Emphasis => 12.0,
            TextStyle::Subtitle | TextStyle::Body => 11.0,
            TextStyle::Footer => 10.0,
        }
    }

    /// Fill grey level, 0.0 = black.
    pub fn grey(&self) -> f32 {
        match self {
            TextStyle::Subtitle => 90.0 / 255.0,
            TextStyle::Footer => 120.0 / 255.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    /// `y` is the text baseline.
    Text { x: f32, y: f32, text: String, style: TextStyle },
    Rule { x1: f32, x2: f32, y: f32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub marks: Vec<Mark>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl Layout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every text line in emission order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|p| p.marks.iter()).filter_map(|m| match m {
            Mark::Text { text, .. } => Some(text.as_str()),
            Mark::Rule { .. } => None,
        })
    }

    /// Every text line with the given style, in emission order.
    pub fn texts_styled(&self, style: TextStyle) -> Vec<&str> {
        self.pages
            .iter()
            .flat_map(|p| p.marks.iter())
            .filter_map(|m| match m {
                Mark::Text { text, style: s, .. } if *s == style => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// A unit of content the cursor knows how to place.
#[derive(Debug, Clone, Copy)]
pub enum Block<'a> {
    Title(&'a str),
    Subtitle(&'a str),
    SectionHeader(&'a str),
    Paragraph(&'a str),
    Bullets(&'a [String]),
    Numbered(&'a [String]),
    Question { n: usize, question: &'a str, outline: &'a str },
    Day { n: usize, text: &'a str },
    Spacer(f32),
    Footer(&'a str),
}

impl Block<'_> {
    /// Vertical space that must be free before the block starts.
    pub fn min_height(&self, geometry: &PageGeometry) -> f32 {
        match self {
            Block::SectionHeader(_) => 13.0,
            // Room for the question line plus the start of its outline
            Block::Question { .. } => 16.0,
            Block::Footer(_) => 20.0,
            Block::Spacer(_) => 0.0,
            _ => geometry.line_height,
        }
    }
}

pub struct DocumentCursor {
    geometry: PageGeometry,
    y: f32,
    pages: Vec<Page>,
}

impl DocumentCursor {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            y: geometry.top,
            pages: vec![Page::default()],
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Start a new page when `height` no longer fits above the bottom limit.
    /// Returns whether a page break happened.
    pub fn ensure(&mut self, height: f32) -> bool {
        if self.y + height > self.geometry.bottom_limit {
            self.pages.push(Page::default());
            self.y = self.geometry.top;
            true
        } else {
            false
        }
    }

    fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    fn push(&mut self, mark: Mark) {
        if let Some(page) = self.pages.last_mut() {
            page.marks.push(mark);
        }
    }

    fn text(&mut self, text: &str, style: TextStyle) {
        self.push(Mark::Text {
            x: self.geometry.margin,
            y: self.y,
            text: text.to_string(),
            style,
        });
    }

    fn rule(&mut self) {
        self.push(Mark::Rule {
            x1: self.geometry.margin,
            x2: self.geometry.width - self.geometry.margin,
            y: self.y,
        });
    }

    /// Wrap `text` to the content width and place it line by line.
    fn wrapped(&mut self, text: &str, style: TextStyle) {
        let lines = wrap_to_width(
            text,
            style.font(),
            style.size_pt(),
            self.geometry.content_width(),
        );
        for line in lines {
            self.ensure(self.geometry.line_height);
            self.text(&line, style);
            self.advance(self.geometry.line_height);
        }
    }

    pub fn emit(&mut self, block: &Block) {
        self.ensure(block.min_height(&self.geometry));

        match *block {
            Block::Title(text) => {
                self.text(text, TextStyle::Title);
                self.advance(10.0);
            }
            Block::Subtitle(text) => {
                self.text(text, TextStyle::Subtitle);
                self.advance(8.0);
            }
            Block::SectionHeader(text) => {
                self.text(text, TextStyle::SectionHeader);
                self.advance(7.0);
                self.rule();
                self.advance(6.0);
            }
            Block::Paragraph(text) => {
                self.wrapped(text, TextStyle::Body);
                self.advance(2.0);
            }
            Block::Bullets(items) => {
                for item in items {
                    self.wrapped(&format!("• {}", item), TextStyle::Body);
                }
                self.advance(2.0);
            }
            Block::Numbered(items) => {
                for (idx, item) in items.iter().enumerate() {
                    self.wrapped(&format!("{}. {}", idx + 1, item), TextStyle::Body);
                    self.advance(1.0);
                }
                self.advance(2.0);
            }
            Block::Question { n, question, outline } => {
                self.wrapped(&format!("{}. {}", n, question), TextStyle::Emphasis);
                self.wrapped(&format!("Answer outline: {}", outline), TextStyle::Body);
                self.advance(3.0);
            }
            Block::Day { n, text } => {
                self.text(&format!("Day {}", n), TextStyle::Emphasis);
                self.advance(self.geometry.line_height);
                self.wrapped(text, TextStyle::Body);
                self.advance(3.0);
            }
            Block::Spacer(dy) => self.advance(dy),
            Block::Footer(text) => {
                self.advance(6.0);
                self.rule();
                self.advance(8.0);
                self.text(text, TextStyle::Footer);
            }
        }
    }

    pub fn finish(self) -> Layout {
        Layout {
            geometry: self.geometry,
            pages: self.pages,
        }
    }
}
