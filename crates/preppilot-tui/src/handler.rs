use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use preppilot_core::{copy_json, copy_text, SectionId};

use crate::app::{App, InputMode, Screen};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Paste(text) => handle_paste(app, &text),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
            app.poll_tasks().await;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // The export failure popup swallows the next key
    if app.export_failed {
        app.export_failed = false;
        return;
    }

    match app.screen {
        Screen::Input => match app.input_mode {
            InputMode::Normal => handle_input_normal(app, key),
            InputMode::Editing => handle_input_editing(app, key),
        },
        Screen::Result => handle_result(app, key),
    }
}

fn handle_paste(app: &mut App, text: &str) {
    if app.screen != Screen::Input || app.generating {
        return;
    }
    app.input_mode = InputMode::Editing;
    app.focused_field().insert_str(text);
}

fn handle_input_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.toggle_focus(),

        // Fields are locked while a request is in flight
        KeyCode::Char('i') | KeyCode::Enter if !app.generating => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char('s') if !app.generating => app.use_sample_jd(),
        KeyCode::Char('l') if !app.generating => app.cycle_level(),
        KeyCode::Char('g') => {
            if app.can_generate() {
                app.start_generation();
            }
        }

        // Back to the last result, if any
        KeyCode::Char('b') => {
            if !app.session.is_empty() {
                app.open_result();
            }
        }
        _ => {}
    }
}

fn handle_input_editing(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Char('g') if ctrl => {
            if app.can_generate() {
                app.start_generation();
            }
        }
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Enter => app.focused_field().insert('\n'),
        KeyCode::Char(c) if !ctrl => app.focused_field().insert(c),
        KeyCode::Backspace => app.focused_field().backspace(),
        KeyCode::Delete => app.focused_field().delete(),
        KeyCode::Left => app.focused_field().left(),
        KeyCode::Right => app.focused_field().right(),
        KeyCode::Home => app.focused_field().home(),
        KeyCode::End => app.focused_field().end(),
        _ => {}
    }
}

fn handle_result(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let half_page = (app.result_height / 2).max(1);
    let selected = app.result_view.selected();

    match key.code {
        // Scrolling
        KeyCode::Char('d') if ctrl => app.scroll_down(half_page),
        KeyCode::Char('u') if ctrl => app.scroll_up(half_page),

        KeyCode::Char('q') => app.should_quit = true,

        // Section navigation
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => app.select_section(selected.next()),
        KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => app.select_section(selected.prev()),
        KeyCode::Char(c @ '1'..='6') => {
            let idx = c as usize - '1' as usize;
            app.select_section(SectionId::ALL[idx]);
        }
        KeyCode::Char(' ') | KeyCode::Enter => app.result_view.toggle_section(selected),

        // Technical question cursor
        KeyCode::Char('n') => {
            let total = app.question_count();
            app.select_section(SectionId::Technical);
            app.result_view.next_question(total);
        }
        KeyCode::Char('p') => {
            app.select_section(SectionId::Technical);
            app.result_view.prev_question();
        }
        KeyCode::Char('o') => {
            if app.question_count() > 0 {
                let idx = app.result_view.question_cursor;
                app.result_view.toggle_question(idx);
            }
        }

        // Copy
        KeyCode::Char('c') => {
            if let Some(pack) = app.session.current() {
                let text = copy_text(pack, selected);
                copy_to_clipboard(&text);
                app.set_status("Copied");
            }
        }
        KeyCode::Char('y') => {
            if let Some(pack) = app.session.current() {
                let text = copy_json(pack);
                copy_to_clipboard(&text);
                app.set_status("Copied JSON");
            }
        }

        // Export
        KeyCode::Char('d') => app.start_export(),

        // New pack
        KeyCode::Char('N') | KeyCode::Esc => app.new_pack(),

        KeyCode::PageDown => app.scroll_down(half_page * 2),
        KeyCode::PageUp => app.scroll_up(half_page * 2),
        KeyCode::Home => app.result_scroll = 0,
        _ => {}
    }
}

/// Hand `text` to the first clipboard tool that starts. Failures are logged
/// and otherwise ignored.
fn copy_to_clipboard(text: &str) {
    use std::io::Write;
    use std::process::{Command, Stdio};

    const TOOLS: &[(&str, &[&str])] = &[
        ("pbcopy", &[]),
        ("wl-copy", &[]),
        ("xclip", &["-selection", "clipboard"]),
        ("xsel", &["--clipboard", "--input"]),
        ("clip", &[]),
    ];

    for (program, args) in TOOLS {
        if let Ok(mut child) = Command::new(program)
            .args(*args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            if let Some(mut stdin) = child.stdin.take() {
                let _ = stdin.write_all(text.as_bytes());
            }
            let _ = child.wait();
            tracing::debug!(tool = %program, bytes = text.len(), "copied to clipboard");
            return;
        }
    }
    tracing::warn!("no clipboard tool available");
}
