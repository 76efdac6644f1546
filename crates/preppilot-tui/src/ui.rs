use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Scrollbar,
        ScrollbarOrientation, ScrollbarState, Wrap,
    },
};
use preppilot_core::{project, Entry, Level, RenderedSection, SectionId, MIN_JOB_DESCRIPTION_CHARS};

use crate::app::{App, FormField, InputMode, Screen, TextField, EXPORT_FAILED};

const SPINNER: [&str; 3] = ["◐", "◓", "◑"];

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen {
        Screen::Input => render_input_screen(app, frame, body_area),
        Screen::Result => render_result_screen(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);

    if app.export_failed {
        render_export_failed(frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let subtitle = match app.screen {
        Screen::Input => " Interview prep pack generator ",
        Screen::Result => " Your interview prep pack ",
    };

    let title = Line::from(vec![
        Span::styled(" PrepPilot ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(subtitle, Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match (app.screen, app.input_mode) {
        (Screen::Input, InputMode::Normal) => " FORM ",
        (Screen::Input, InputMode::Editing) => " EDIT ",
        (Screen::Result, _) => " RESULT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let keys: &[(&str, &str)] = match (app.screen, app.input_mode) {
        (Screen::Input, InputMode::Normal) => &[
            (" i ", " edit "),
            (" Tab ", " field "),
            (" s ", " sample JD "),
            (" l ", " level "),
            (" g ", " generate "),
            (" b ", " last result "),
            (" q ", " quit "),
        ],
        (Screen::Input, InputMode::Editing) => &[
            (" Esc ", " done "),
            (" Tab ", " field "),
            (" Ctrl+g ", " generate "),
        ],
        (Screen::Result, _) => &[
            (" j/k ", " section "),
            (" Space ", " collapse "),
            (" n/p ", " question "),
            (" o ", " answer "),
            (" c ", " copy "),
            (" y ", " JSON "),
            (" d ", " PDF "),
            (" N ", " new "),
            (" q ", " quit "),
        ],
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    for (key, label) in keys {
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::styled(*label, label_style));
    }

    if app.exporting {
        spans.push(Span::styled(
            format!(" {} Exporting PDF ", SPINNER[app.animation_frame as usize % SPINNER.len()]),
            Style::default().fg(Color::Yellow),
        ));
    } else if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!(" ✓ {} ", status),
            Style::default().fg(Color::Green).bold(),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let error_height = if app.error.is_some() { 3 } else { 0 };

    let [jd_area, resume_area, level_area, error_area, action_area] = Layout::vertical([
        Constraint::Percentage(60),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(error_height),
        Constraint::Length(1),
    ])
    .areas(area);

    let editing = app.input_mode == InputMode::Editing;
    let jd_count = app.job_description.char_count();
    let jd_title = format!(
        " Job Description ({} chars{}) ",
        jd_count,
        if jd_count < MIN_JOB_DESCRIPTION_CHARS {
            format!(", min {}", MIN_JOB_DESCRIPTION_CHARS)
        } else {
            String::new()
        }
    );
    render_text_field(
        frame,
        jd_area,
        &app.job_description,
        &jd_title,
        "Paste the job description here, or press s for a sample...",
        app.focus == FormField::JobDescription,
        editing,
    );

    let resume_title = format!(" Resume (optional, {} chars) ", app.resume_text.char_count());
    render_text_field(
        frame,
        resume_area,
        &app.resume_text,
        &resume_title,
        "Paste your resume text to get tailored improvement tips...",
        app.focus == FormField::Resume,
        editing,
    );

    render_level(app.level, frame, level_area);

    if let Some(error) = &app.error {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));
        let paragraph = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(paragraph, error_area);
    }

    let action = if app.generating {
        Line::from(vec![
            Span::styled(
                format!(" {} ", SPINNER[app.animation_frame as usize % SPINNER.len()]),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                app.phase().message(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
            ),
        ])
    } else if app.can_generate() {
        Line::from(vec![
            Span::styled(" g ", Style::default().bg(Color::Cyan).fg(Color::Black).bold()),
            Span::styled(" Generate Interview Prep Pack ", Style::default().fg(Color::Cyan).bold()),
        ])
    } else {
        Line::from(Span::styled(
            format!(
                " Generate Interview Prep Pack (needs {}+ characters of job description) ",
                MIN_JOB_DESCRIPTION_CHARS
            ),
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(action), action_area);
}

fn render_text_field(
    frame: &mut Frame,
    area: Rect,
    field: &TextField,
    title: &str,
    placeholder: &str,
    focused: bool,
    editing: bool,
) {
    let border_color = match (focused, editing) {
        (true, true) => Color::Yellow,
        (true, false) => Color::Cyan,
        _ => Color::DarkGray,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title.to_string());

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    if field.text.is_empty() {
        let hint = Paragraph::new(placeholder)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        frame.render_widget(hint, inner);
        if focused && editing {
            frame.set_cursor_position((inner.x, inner.y));
        }
        return;
    }

    let (rows, (cursor_row, cursor_col)) =
        wrap_with_cursor(&field.text, field.cursor, inner.width as usize);

    // Keep the cursor row on screen
    let height = inner.height as usize;
    let offset = if cursor_row >= height { cursor_row + 1 - height } else { 0 };

    let lines: Vec<Line> = rows
        .into_iter()
        .skip(offset)
        .take(height)
        .map(Line::from)
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);

    if focused && editing {
        frame.set_cursor_position((
            inner.x + cursor_col as u16,
            inner.y + (cursor_row - offset) as u16,
        ));
    }
}

fn render_level(level: Level, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::styled(" Level: ", Style::default().fg(Color::Gray))];
    for option in Level::all() {
        let style = if option == level {
            Style::default().bg(Color::Blue).fg(Color::White).bold()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", option.as_str()), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled("(l to change)", Style::default().fg(Color::DarkGray)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_result_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [nav_area, content_area] = Layout::horizontal([
        Constraint::Length(26),
        Constraint::Min(0),
    ])
    .areas(area);

    render_section_nav(app, frame, nav_area);
    render_sections(app, frame, content_area);
}

fn render_section_nav(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Sections ");

    let items: Vec<ListItem> = SectionId::ALL
        .iter()
        .map(|id| {
            let marker = if app.result_view.is_collapsed(*id) { "▸" } else { "▾" };
            ListItem::new(format!(" {} {} ", marker, id.label()))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.result_view.selected().index()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_sections(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", app.result_view.selected().title()));

    let inner = block.inner(area);
    app.result_height = inner.height;

    let Some(pack) = app.session.current() else {
        let placeholder = Paragraph::new("No prep pack loaded")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    // Leave a column for the scrollbar
    let width = (inner.width as usize).saturating_sub(1).max(10);
    let sections = project(pack, &app.result_view);
    let selected = app.result_view.selected();

    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut offsets = Vec::with_capacity(sections.len());
    for section in &sections {
        offsets.push((section.id, lines.len() as u16));
        push_section(&mut lines, section, section.id == selected, width);
    }

    app.total_result_lines = lines.len() as u16;
    app.section_offsets = offsets;

    if app.scroll_to_selected {
        app.scroll_to_selected = false;
        if let Some((_, offset)) = app.section_offsets.iter().find(|(id, _)| *id == selected) {
            app.result_scroll = *offset;
        }
    }
    let max_scroll = app.total_result_lines.saturating_sub(app.result_height);
    app.result_scroll = app.result_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((app.result_scroll, 0));
    frame.render_widget(paragraph, area);

    if app.total_result_lines > app.result_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        let mut scrollbar_state = ScrollbarState::new(max_scroll as usize)
            .position(app.result_scroll as usize);

        frame.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

fn push_section(lines: &mut Vec<Line<'static>>, section: &RenderedSection, selected: bool, width: usize) {
    let marker = if section.collapsed { "▸" } else { "▾" };
    let title_style = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    lines.push(Line::from(vec![
        Span::styled(format!("{} ", marker), Style::default().fg(Color::DarkGray)),
        Span::styled(section.id.title().to_string(), title_style),
    ]));
    lines.push(Line::from(Span::styled(
        format!("  {}", section.id.subtitle()),
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    if section.collapsed {
        lines.push(Line::default());
        return;
    }
    lines.push(Line::default());

    let chips: Vec<&str> = section
        .entries
        .iter()
        .filter_map(|entry| match entry {
            Entry::Chip(text) => Some(text.as_str()),
            _ => None,
        })
        .collect();
    if !chips.is_empty() {
        push_chips(lines, &chips, width);
    }

    let plain = Style::default();
    for entry in &section.entries {
        match entry {
            Entry::Chip(_) => {}
            Entry::Text(text) => push_wrapped(lines, "  ", "  ", text, width, plain, plain),
            Entry::Bullet(text) => push_wrapped(
                lines,
                "  • ",
                "    ",
                text,
                width,
                plain,
                Style::default().fg(Color::Cyan),
            ),
            Entry::Numbered { n, text } => {
                let prefix = format!("  {}. ", n);
                let indent = " ".repeat(prefix.chars().count());
                push_wrapped(lines, &prefix, &indent, text, width, plain, Style::default().fg(Color::Yellow));
            }
            Entry::Question { n, question, outline, selected } => {
                let cursor = if *selected { "> " } else { "  " };
                let prefix = format!("{}{:02}. ", cursor, n);
                let indent = " ".repeat(prefix.chars().count());
                let style = if *selected {
                    Style::default().fg(Color::Black).bg(Color::Yellow).bold()
                } else {
                    Style::default().bold()
                };
                push_wrapped(lines, &prefix, &indent, question, width, style, style);
                match outline {
                    Some(outline) => {
                        lines.push(Line::from(Span::styled(
                            format!("{}Answer outline:", indent),
                            Style::default().fg(Color::Green).add_modifier(Modifier::ITALIC),
                        )));
                        push_wrapped(lines, &indent, &indent, outline, width, plain, plain);
                    }
                    None if *selected => lines.push(Line::from(Span::styled(
                        format!("{}(o to show answer outline)", indent),
                        Style::default().fg(Color::DarkGray),
                    ))),
                    None => {}
                }
                lines.push(Line::default());
            }
            Entry::Day { n, text } => {
                lines.push(Line::from(Span::styled(
                    format!("  Day {}", n),
                    Style::default().fg(Color::Magenta).bold(),
                )));
                push_wrapped(lines, "    ", "    ", text, width, plain, plain);
            }
            Entry::Placeholder => lines.push(Line::from(Span::styled(
                "  —",
                Style::default().fg(Color::DarkGray),
            ))),
        }
    }
    lines.push(Line::default());
}

/// Lay skill chips out left to right, starting a new row when one would overflow.
fn push_chips(lines: &mut Vec<Line<'static>>, chips: &[&str], width: usize) {
    let chip_style = Style::default().bg(Color::Blue).fg(Color::White);
    let mut row: Vec<Span<'static>> = vec![Span::raw("  ")];
    let mut used = 2;

    for chip in chips {
        let label = format!(" {} ", chip.split_whitespace().collect::<Vec<_>>().join(" "));
        let len = label.chars().count() + 1;
        if used + len > width && row.len() > 1 {
            lines.push(Line::from(std::mem::take(&mut row)));
            row.push(Span::raw("  "));
            used = 2;
        }
        row.push(Span::styled(label, chip_style));
        row.push(Span::raw(" "));
        used += len;
    }
    lines.push(Line::from(row));
}

/// Word-wrap `text` with a first-line prefix and a hanging indent for the rest.
fn push_wrapped(
    lines: &mut Vec<Line<'static>>,
    prefix: &str,
    indent: &str,
    text: &str,
    width: usize,
    text_style: Style,
    prefix_style: Style,
) {
    let avail = width.saturating_sub(indent.chars().count()).max(1);
    for (idx, row) in wrap_words(text, avail).into_iter().enumerate() {
        let lead = if idx == 0 { prefix } else { indent };
        lines.push(Line::from(vec![
            Span::styled(lead.to_string(), prefix_style),
            Span::styled(row, text_style),
        ]));
    }
}

/// Greedy word wrap by character count. Blank input yields a single empty row.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            // Hard-break words longer than a whole row
            while word.len() > width {
                if current_len > 0 {
                    rows.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                rows.push(word[..width].iter().collect());
                word.drain(..width);
            }
            if word.is_empty() {
                continue;
            }
            let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
            if needed > width {
                rows.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }
        if current_len > 0 {
            rows.push(current);
        }
    }

    if rows.is_empty() {
        rows.push(String::new());
    }
    rows
}

/// Hard-wrap an edit buffer at `width` characters, keeping newlines, and
/// locate the cursor (a character index) as a (row, column) pair.
fn wrap_with_cursor(text: &str, cursor: usize, width: usize) -> (Vec<String>, (usize, usize)) {
    let width = width.max(1);
    let mut rows = vec![String::new()];
    let mut col = 0;
    let mut cursor_pos = (0, 0);

    for (idx, c) in text.chars().enumerate() {
        if idx == cursor {
            cursor_pos = (rows.len() - 1, col);
        }
        if c == '\n' {
            rows.push(String::new());
            col = 0;
            continue;
        }
        if col == width {
            rows.push(String::new());
            col = 0;
            if idx == cursor {
                cursor_pos = (rows.len() - 1, 0);
            }
        }
        if let Some(row) = rows.last_mut() {
            row.push(c);
        }
        col += 1;
    }

    if cursor >= text.chars().count() {
        cursor_pos = if col == width {
            (rows.len(), 0)
        } else {
            (rows.len() - 1, col)
        };
    }
    (rows, cursor_pos)
}

fn render_export_failed(frame: &mut Frame, area: Rect) {
    let popup_width = 48.min(area.width.saturating_sub(4));
    let popup_height = 5;

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Export ");

    let text = vec![
        Line::from(Span::styled(EXPORT_FAILED, Style::default().fg(Color::Red).bold())),
        Line::default(),
        Line::from(Span::styled("Press any key to dismiss", Style::default().fg(Color::DarkGray))),
    ];
    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}
