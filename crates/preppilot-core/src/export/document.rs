use crate::pack::{or_placeholder, PrepPack, PLACEHOLDER};

use super::cursor::{Block, DocumentCursor, Layout, PageGeometry};

pub const TITLE: &str = "PrepPilot — Interview Prep Pack";
pub const SUBTITLE: &str = "Generated using PydanticAI + OpenRouter | Full Stack AI Agent";
pub const FOOTER: &str = "Generated by PrepPilot • Full Stack AI Agent";

pub const SECTION_HEADERS: [&str; 6] = [
    "1) Role Summary",
    "2) Required Skills",
    "3) Technical Interview Questions (with Answer Outlines)",
    "4) HR Questions",
    "5) Resume Improvements",
    "6) 7-Day Study Plan",
];

fn list_or_placeholder(items: &[String]) -> Vec<String> {
    if items.is_empty() {
        vec![PLACEHOLDER.to_string()]
    } else {
        items.to_vec()
    }
}

/// Lay out the full prep pack on A4 pages.
pub fn layout_pack(pack: &PrepPack, generated_on: &str) -> Layout {
    let mut cursor = DocumentCursor::new(PageGeometry::A4);
    let stamp = format!("Generated on: {}", generated_on);

    cursor.emit(&Block::Title(TITLE));
    cursor.emit(&Block::Subtitle(SUBTITLE));
    cursor.emit(&Block::Subtitle(&stamp));
    cursor.emit(&Block::Spacer(6.0));

    cursor.emit(&Block::SectionHeader(SECTION_HEADERS[0]));
    cursor.emit(&Block::Paragraph(pack.summary_or_placeholder()));

    cursor.emit(&Block::SectionHeader(SECTION_HEADERS[1]));
    cursor.emit(&Block::Bullets(&list_or_placeholder(&pack.required_skills)));

    cursor.emit(&Block::SectionHeader(SECTION_HEADERS[2]));
    if pack.tech_questions.is_empty() {
        cursor.emit(&Block::Paragraph(PLACEHOLDER));
    }
    for (idx, q) in pack.tech_questions.iter().enumerate() {
        cursor.emit(&Block::Question {
            n: idx + 1,
            question: or_placeholder(&q.question),
            outline: or_placeholder(&q.answer_outline),
        });
    }

    cursor.emit(&Block::SectionHeader(SECTION_HEADERS[3]));
    cursor.emit(&Block::Numbered(&list_or_placeholder(&pack.hr_questions)));

    cursor.emit(&Block::SectionHeader(SECTION_HEADERS[4]));
    cursor.emit(&Block::Bullets(&list_or_placeholder(&pack.resume_improvements)));

    cursor.emit(&Block::SectionHeader(SECTION_HEADERS[5]));
    if pack.study_plan.is_empty() {
        cursor.emit(&Block::Paragraph(PLACEHOLDER));
    }
    for (idx, step) in pack.study_plan.iter().enumerate() {
        cursor.emit(&Block::Day { n: idx + 1, text: step });
    }

    cursor.emit(&Block::Footer(FOOTER));
    cursor.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::cursor::TextStyle;
    use crate::pack::TechQuestion;

    fn scenario() -> PrepPack {
        PrepPack {
            role_summary: "X".to_string(),
            required_skills: vec!["A".to_string(), "B".to_string()],
            tech_questions: vec![TechQuestion {
                question: "Q1".to_string(),
                answer_outline: "O1".to_string(),
            }],
            hr_questions: vec!["H1".to_string()],
            resume_improvements: vec!["R1".to_string()],
            study_plan: vec!["Day1 plan".to_string()],
        }
    }

    #[test]
    fn test_scenario_strings_present() {
        let layout = layout_pack(&scenario(), "01/01/2026, 09:00:00");
        let all: String = layout.texts().collect::<Vec<_>>().join("\n");
        for needle in ["X", "A", "B", "Q1", "O1", "H1", "R1", "Day1 plan"] {
            assert!(all.contains(needle), "missing {needle}");
        }
        assert!(all.contains("Generated on: 01/01/2026, 09:00:00"));
        assert_eq!(layout.page_count(), 1);
    }

    #[test]
    fn test_empty_pack_keeps_headers_and_placeholders() {
        let layout = layout_pack(&PrepPack::default(), "now");
        assert!(layout.page_count() >= 1);
        assert_eq!(layout.texts_styled(TextStyle::SectionHeader), SECTION_HEADERS.to_vec());

        let body = layout.texts_styled(TextStyle::Body);
        assert_eq!(body, vec!["—", "• —", "—", "1. —", "• —", "—"]);
    }

    #[test]
    fn test_question_blocks_in_order() {
        let pack = PrepPack {
            tech_questions: (1..=12)
                .map(|i| TechQuestion {
                    question: format!("Question {i}"),
                    answer_outline: format!("Outline {i}"),
                })
                .collect(),
            ..PrepPack::default()
        };
        let layout = layout_pack(&pack, "now");
        let questions: Vec<&str> = layout
            .texts_styled(TextStyle::Emphasis)
            .into_iter()
            .filter(|t| t.contains("Question"))
            .collect();
        let expected: Vec<String> = (1..=12).map(|i| format!("{i}. Question {i}")).collect();
        assert_eq!(questions, expected);

        let outlines = layout.texts().filter(|t| t.starts_with("Answer outline:")).count();
        assert_eq!(outlines, 12);
    }

    #[test]
    fn test_blank_question_uses_placeholder() {
        let pack = PrepPack {
            tech_questions: vec![TechQuestion {
                question: String::new(),
                answer_outline: "O1".to_string(),
            }],
            ..PrepPack::default()
        };
        let layout = layout_pack(&pack, "now");
        let questions: Vec<&str> = layout
            .texts_styled(TextStyle::Emphasis)
            .into_iter()
            .filter(|t| t.starts_with("1. "))
            .collect();
        assert_eq!(questions, vec!["1. —"]);
        assert!(layout.texts().any(|t| t == "Answer outline: O1"));
    }

    #[test]
    fn test_day_labels() {
        let pack = PrepPack {
            study_plan: (1..=7).map(|i| format!("step {i}")).collect(),
            ..PrepPack::default()
        };
        let layout = layout_pack(&pack, "now");
        let days: Vec<&str> = layout
            .texts_styled(TextStyle::Emphasis)
            .into_iter()
            .filter(|t| t.starts_with("Day "))
            .collect();
        assert_eq!(days, vec!["Day 1", "Day 2", "Day 3", "Day 4", "Day 5", "Day 6", "Day 7"]);
    }

    #[test]
    fn test_large_pack_spans_pages_and_ends_with_footer() {
        let long = "Explain trade-offs, give a concrete example and mention testing. ".repeat(6);
        let pack = PrepPack {
            role_summary: long.clone(),
            required_skills: (0..30).map(|i| format!("skill {i}")).collect(),
            tech_questions: (0..10)
                .map(|i| TechQuestion { question: format!("Q{i}: {long}"), answer_outline: long.clone() })
                .collect(),
            hr_questions: (0..5).map(|i| format!("hr {i}")).collect(),
            resume_improvements: (0..8).map(|i| format!("fix {i}")).collect(),
            study_plan: (0..7).map(|_| long.clone()).collect(),
        };
        let layout = layout_pack(&pack, "now");
        assert!(layout.page_count() > 2);
        assert_eq!(layout.texts().last(), Some(FOOTER));
    }
}
