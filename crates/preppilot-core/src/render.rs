//! UI-agnostic projection of a prep pack into its six display sections
//!
//! Front ends draw the [`RenderedSection`]s however they like; the section
//! order, titles, placeholders and copy text are decided here.

use std::collections::HashSet;

use crate::pack::{or_placeholder, PrepPack};

/// The six result sections, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    Summary,
    Skills,
    Technical,
    Hr,
    Resume,
    Plan,
}

impl SectionId {
    pub const ALL: [SectionId; 6] = [
        SectionId::Summary,
        SectionId::Skills,
        SectionId::Technical,
        SectionId::Hr,
        SectionId::Resume,
        SectionId::Plan,
    ];

    /// Short label for navigation.
    pub fn label(&self) -> &'static str {
        match self {
            SectionId::Summary => "Summary",
            SectionId::Skills => "Skills",
            SectionId::Technical => "Technical",
            SectionId::Hr => "HR",
            SectionId::Resume => "Resume",
            SectionId::Plan => "7-Day Plan",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SectionId::Summary => "Role Summary",
            SectionId::Skills => "Required Skills",
            SectionId::Technical => "Technical Questions",
            SectionId::Hr => "HR Questions",
            SectionId::Resume => "Resume Improvements",
            SectionId::Plan => "7-Day Study Plan",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            SectionId::Summary => "A short snapshot of what the company expects.",
            SectionId::Skills => "Core skills extracted from the JD.",
            SectionId::Technical => "Questions + answer outlines tailored to the JD.",
            SectionId::Hr => "Behavioral prompts you should prepare.",
            SectionId::Resume => "Fixes to increase shortlisting probability.",
            SectionId::Plan => "A clear day-wise execution plan.",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }
}

/// One displayable item inside a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Text(String),
    Chip(String),
    Bullet(String),
    Numbered { n: usize, text: String },
    /// `outline` is `Some` only while the question is expanded.
    Question { n: usize, question: String, outline: Option<String>, selected: bool },
    Day { n: usize, text: String },
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSection {
    pub id: SectionId,
    pub collapsed: bool,
    pub entries: Vec<Entry>,
}

/// Display state for the result screen.
#[derive(Debug, Clone)]
pub struct ResultView {
    selected: SectionId,
    collapsed: HashSet<SectionId>,
    expanded_questions: HashSet<usize>,
    pub question_cursor: usize,
}

impl Default for ResultView {
    fn default() -> Self {
        Self {
            selected: SectionId::Summary,
            collapsed: HashSet::new(),
            expanded_questions: HashSet::new(),
            question_cursor: 0,
        }
    }
}

impl ResultView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> SectionId {
        self.selected
    }

    pub fn select(&mut self, id: SectionId) {
        self.selected = id;
    }

    pub fn is_collapsed(&self, id: SectionId) -> bool {
        self.collapsed.contains(&id)
    }

    pub fn toggle_section(&mut self, id: SectionId) {
        if !self.collapsed.remove(&id) {
            self.collapsed.insert(id);
        }
    }

    pub fn is_question_expanded(&self, idx: usize) -> bool {
        self.expanded_questions.contains(&idx)
    }

    pub fn toggle_question(&mut self, idx: usize) {
        if !self.expanded_questions.remove(&idx) {
            self.expanded_questions.insert(idx);
        }
    }

    pub fn next_question(&mut self, total: usize) {
        if total > 0 {
            self.question_cursor = (self.question_cursor + 1).min(total - 1);
        }
    }

    pub fn prev_question(&mut self) {
        self.question_cursor = self.question_cursor.saturating_sub(1);
    }
}

fn list_entries(items: &[String], make: impl Fn(usize, &str) -> Entry) -> Vec<Entry> {
    if items.is_empty() {
        return vec![Entry::Placeholder];
    }
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| make(idx + 1, item))
        .collect()
}

/// Project the pack into its sections, honoring the view's collapsed and
/// expanded state.
pub fn project(pack: &PrepPack, view: &ResultView) -> Vec<RenderedSection> {
    SectionId::ALL
        .iter()
        .map(|&id| {
            let entries = match id {
                SectionId::Summary => vec![Entry::Text(pack.summary_or_placeholder().to_string())],
                SectionId::Skills => {
                    list_entries(&pack.required_skills, |_, s| Entry::Chip(s.to_string()))
                }
                SectionId::Technical => {
                    if pack.tech_questions.is_empty() {
                        vec![Entry::Placeholder]
                    } else {
                        pack.tech_questions
                            .iter()
                            .enumerate()
                            .map(|(idx, q)| Entry::Question {
                                n: idx + 1,
                                question: or_placeholder(&q.question).to_string(),
                                outline: view
                                    .is_question_expanded(idx)
                                    .then(|| q.answer_outline.clone()),
                                selected: view.selected() == SectionId::Technical
                                    && view.question_cursor == idx,
                            })
                            .collect()
                    }
                }
                SectionId::Hr => list_entries(&pack.hr_questions, |n, s| Entry::Numbered {
                    n,
                    text: s.to_string(),
                }),
                SectionId::Resume => {
                    list_entries(&pack.resume_improvements, |_, s| Entry::Bullet(s.to_string()))
                }
                SectionId::Plan => list_entries(&pack.study_plan, |n, s| Entry::Day {
                    n,
                    text: s.to_string(),
                }),
            };

            RenderedSection {
                id,
                collapsed: view.is_collapsed(id),
                entries,
            }
        })
        .collect()
}

/// Collapse whitespace so an item occupies exactly one line. Blank items
/// become the placeholder so they still count as a line.
fn flatten(text: &str) -> String {
    or_placeholder(text).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Flat text for one section, one line per list item.
pub fn copy_text(pack: &PrepPack, id: SectionId) -> String {
    match id {
        SectionId::Summary => pack.role_summary.clone(),
        SectionId::Skills => join_lines(&pack.required_skills),
        SectionId::Technical => pack
            .tech_questions
            .iter()
            .enumerate()
            .map(|(idx, q)| format!("{}. {} — {}", idx + 1, flatten(&q.question), flatten(&q.answer_outline)))
            .collect::<Vec<_>>()
            .join("\n"),
        SectionId::Hr => pack
            .hr_questions
            .iter()
            .enumerate()
            .map(|(idx, q)| format!("{}. {}", idx + 1, flatten(q)))
            .collect::<Vec<_>>()
            .join("\n"),
        SectionId::Resume => join_lines(&pack.resume_improvements),
        SectionId::Plan => join_lines(&pack.study_plan),
    }
}

fn join_lines(items: &[String]) -> String {
    items.iter().map(|s| flatten(s)).collect::<Vec<_>>().join("\n")
}

/// The whole pack as pretty JSON.
pub fn copy_json(pack: &PrepPack) -> String {
    pack.to_json().unwrap_or_default()
}
