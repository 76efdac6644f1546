use std::path::PathBuf;

use preppilot_core::{
    can_generate, Config, ExportError, Exporter, FileStore, GenerateRequest, GenerationClient,
    GenerationError, Level, Phase, PrepPack, ResultStore, ResultView, SectionId, SessionStore,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const SAMPLE_JD: &str = "We are hiring a Product Engineer Intern to build features across frontend and backend.
Skills: JavaScript/TypeScript, React/Next.js, REST APIs, SQL, Git, basic DSA.
Nice to have: Docker, CI/CD, cloud deployment experience.";

pub const EXPORT_FAILED: &str = "PDF export failed. Please try again.";

/// Ticks a transient status line stays visible (about 900ms).
const STATUS_TICKS: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Input,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    JobDescription,
    Resume,
}

/// Editable multi-line text with a cursor counted in characters.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    pub text: String,
    pub cursor: usize,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

impl TextField {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.char_count();
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        let normalized = s.replace("\r\n", "\n").replace('\r', "\n");
        self.text.insert_str(byte_pos, &normalized);
        self.cursor += normalized.chars().count();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.char_count();
    }
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub focus: FormField,

    // Input form
    pub job_description: TextField,
    pub resume_text: TextField,
    pub level: Level,
    pub error: Option<String>,

    // Generation (one at a time)
    pub generating: bool,
    pub phase_rx: Option<watch::Receiver<Phase>>,
    pub generate_task: Option<JoinHandle<Result<PrepPack, GenerationError>>>,

    // Result hand-off
    pub session: SessionStore,
    pub file_store: FileStore,

    // Result screen
    pub result_view: ResultView,
    pub result_scroll: u16,
    pub result_height: u16,
    pub total_result_lines: u16,
    pub scroll_to_selected: bool,
    /// First content line of each section, filled in during render
    pub section_offsets: Vec<(SectionId, u16)>,

    // Export (one at a time)
    pub exporting: bool,
    pub export_task: Option<JoinHandle<Result<PathBuf, ExportError>>>,
    pub export_failed: bool,
    pub exporter: Exporter,

    // Transient status line ("Copied", "Saved to ...")
    pub status: Option<String>,
    pub status_ticks: u8,

    // Animation state
    pub animation_frame: u8,

    pub config: Config,
}

impl App {
    pub fn new(config: Config, file_store: FileStore) -> Self {
        let exporter = Exporter::new(&config.export_dir());
        let level = config.level();

        Self {
            should_quit: false,
            screen: Screen::Input,
            input_mode: InputMode::Normal,
            focus: FormField::JobDescription,

            job_description: TextField::default(),
            resume_text: TextField::default(),
            level,
            error: None,

            generating: false,
            phase_rx: None,
            generate_task: None,

            session: SessionStore::new(),
            file_store,

            result_view: ResultView::new(),
            result_scroll: 0,
            result_height: 0,
            total_result_lines: 0,
            scroll_to_selected: false,
            section_offsets: Vec::new(),

            exporting: false,
            export_task: None,
            export_failed: false,
            exporter,

            status: None,
            status_ticks: 0,

            animation_frame: 0,

            config,
        }
    }

    pub fn focused_field(&mut self) -> &mut TextField {
        match self.focus {
            FormField::JobDescription => &mut self.job_description,
            FormField::Resume => &mut self.resume_text,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FormField::JobDescription => FormField::Resume,
            FormField::Resume => FormField::JobDescription,
        };
    }

    pub fn use_sample_jd(&mut self) {
        self.job_description.set(SAMPLE_JD);
        self.focus = FormField::JobDescription;
    }

    pub fn cycle_level(&mut self) {
        self.level = self.level.next();
    }

    /// Generate is offered only for a long enough description and while no
    /// other generation is running.
    pub fn can_generate(&self) -> bool {
        !self.generating && can_generate(&self.job_description.text)
    }

    pub fn phase(&self) -> Phase {
        self.phase_rx
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or_default()
    }

    /// Check preconditions and spawn the generation call. Precondition
    /// failures only set the inline error; no request is made.
    pub fn start_generation(&mut self) {
        if self.generating {
            return;
        }
        self.error = None;

        let client = match GenerationClient::from_config(&self.config) {
            Ok(client) => client,
            Err(err) => {
                tracing::warn!("generation blocked: {err}");
                self.error = Some(err.to_string());
                return;
            }
        };

        let request = match GenerateRequest::new(
            &self.job_description.text,
            &self.resume_text.text,
            self.level,
        ) {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!("generation blocked: {err}");
                self.error = Some(err.to_string());
                return;
            }
        };

        let (tx, rx) = watch::channel(Phase::Analyzing);
        self.phase_rx = Some(rx);
        self.generating = true;
        self.input_mode = InputMode::Normal;
        self.generate_task = Some(tokio::spawn(async move {
            client.generate(&request, &tx).await
        }));
    }

    /// Store a fresh pack and move to the result screen.
    pub fn finish_generation(&mut self, pack: PrepPack) {
        if let Err(err) = self.session.save(&pack) {
            tracing::error!("could not keep prep pack in session: {err}");
        }
        if let Err(err) = self.file_store.save(&pack) {
            tracing::warn!("could not persist prep pack: {err}");
        }
        self.open_result();
    }

    /// Show the result screen for whatever the session holds, or fall back
    /// to the input screen when it holds nothing usable.
    pub fn open_result(&mut self) {
        match self.session.load() {
            Ok(_) => {
                self.result_view = ResultView::new();
                self.result_scroll = 0;
                self.export_failed = false;
                self.screen = Screen::Result;
            }
            Err(err) => {
                tracing::debug!("no result to show: {err}");
                self.screen = Screen::Input;
            }
        }
    }

    /// Pull the last pack from the on-disk slot into the session. Missing and
    /// malformed slots both leave the user on the input screen.
    pub fn resume_last(&mut self) {
        match self.file_store.load() {
            Ok(pack) => {
                if let Err(err) = self.session.save(&pack) {
                    tracing::error!("could not keep prep pack in session: {err}");
                }
                self.open_result();
            }
            Err(err) => {
                tracing::info!("nothing to resume: {err}");
                self.screen = Screen::Input;
            }
        }
    }

    pub fn new_pack(&mut self) {
        self.screen = Screen::Input;
        self.input_mode = InputMode::Normal;
        self.error = None;
    }

    pub fn start_export(&mut self) {
        if self.exporting {
            return;
        }
        let Some(pack) = self.session.current().cloned() else {
            return;
        };

        self.exporting = true;
        self.export_failed = false;
        let exporter = self.exporter.clone();
        self.export_task = Some(tokio::task::spawn_blocking(move || exporter.export(&pack)));
    }

    /// Collect finished background work. Called on every tick.
    pub async fn poll_tasks(&mut self) {
        if self.generate_task.as_ref().is_some_and(|t| t.is_finished()) {
            if let Some(task) = self.generate_task.take() {
                self.generating = false;
                self.phase_rx = None;
                match task.await {
                    Ok(Ok(pack)) => self.finish_generation(pack),
                    Ok(Err(err)) => {
                        tracing::warn!("generation failed: {err}");
                        self.error = Some(err.user_message().to_string());
                    }
                    Err(err) => {
                        tracing::error!("generation task aborted: {err}");
                        self.error = Some(
                            "Generation failed. Check that the backend is running, then try again."
                                .to_string(),
                        );
                    }
                }
            }
        }

        if self.export_task.as_ref().is_some_and(|t| t.is_finished()) {
            if let Some(task) = self.export_task.take() {
                self.exporting = false;
                match task.await {
                    Ok(Ok(path)) => self.set_status(format!("Saved {}", path.display())),
                    Ok(Err(err)) => {
                        tracing::error!("export failed: {err}");
                        self.export_failed = true;
                    }
                    Err(err) => {
                        tracing::error!("export task aborted: {err}");
                        self.export_failed = true;
                    }
                }
            }
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(text.into());
        self.status_ticks = STATUS_TICKS;
    }

    pub fn tick_animation(&mut self) {
        self.animation_frame = (self.animation_frame + 1) % 3;
        if self.status_ticks > 0 {
            self.status_ticks -= 1;
            if self.status_ticks == 0 {
                self.status = None;
            }
        }
    }

    pub fn select_section(&mut self, id: SectionId) {
        self.result_view.select(id);
        self.scroll_to_selected = true;
    }

    pub fn question_count(&self) -> usize {
        self.session
            .current()
            .map(|p| p.tech_questions.len())
            .unwrap_or(0)
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.total_result_lines.saturating_sub(self.result_height);
        self.result_scroll = (self.result_scroll + lines).min(max);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.result_scroll = self.result_scroll.saturating_sub(lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn app_in(dir: &std::path::Path, backend_url: Option<&str>) -> App {
        let config = Config {
            backend_url: backend_url.map(str::to_string),
            default_level: None,
            export_dir: Some(dir.to_path_buf()),
        };
        App::new(config, FileStore::new(dir))
    }

    #[test]
    fn test_text_field_editing() {
        let mut field = TextField::default();
        field.insert_str("héllo");
        field.left();
        field.left();
        field.insert('X');
        assert_eq!(field.text, "hélXlo");
        field.backspace();
        field.home();
        field.delete();
        assert_eq!(field.text, "éllo");
        field.end();
        field.insert_str("\r\nnext");
        assert_eq!(field.text, "éllo\nnext");
        assert_eq!(field.cursor, field.char_count());
    }

    #[test]
    fn test_generate_gated_on_length() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), Some("http://localhost:1"));
        app.job_description.set("short");
        assert!(!app.can_generate());

        app.use_sample_jd();
        assert!(app.can_generate());
    }

    #[test]
    fn test_missing_backend_blocks_request() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), None);
        app.use_sample_jd();
        app.start_generation();
        assert!(!app.generating);
        assert!(app.generate_task.is_none());
        assert!(app.error.as_deref().unwrap().contains("Backend URL missing"));
    }

    #[test]
    fn test_short_description_blocks_request() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), Some("http://localhost:1"));
        app.job_description.set("short");
        app.start_generation();
        assert!(app.generate_task.is_none());
        assert!(app.error.as_deref().unwrap().contains("min 30 characters"));
    }

    #[test]
    fn test_finish_generation_opens_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), None);
        let pack = PrepPack { role_summary: "X".to_string(), ..PrepPack::default() };
        app.finish_generation(pack.clone());

        assert_eq!(app.screen, Screen::Result);
        assert_eq!(app.session.current(), Some(&pack));
        assert_eq!(app.file_store.load().unwrap(), pack);
    }

    #[test]
    fn test_resume_last_without_slot_stays_on_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), None);
        std::fs::write(app.file_store.path(), "garbage").unwrap();
        app.resume_last();
        assert_eq!(app.screen, Screen::Input);
        assert!(app.error.is_none());
    }

    #[test]
    fn test_level_cycles_from_config_default() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), None);
        assert_eq!(app.level, Level::Intern);
        app.cycle_level();
        assert_eq!(app.level, Level::Fresher);
    }

    #[test]
    fn test_status_expires() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), None);
        app.set_status("Copied");
        for _ in 0..STATUS_TICKS {
            assert!(app.status.is_some());
            app.tick_animation();
        }
        assert!(app.status.is_none());
    }

    fn sample_pack() -> PrepPack {
        PrepPack { role_summary: "X".to_string(), ..PrepPack::default() }
    }

    /// Answer a single request with `status` and an empty body.
    async fn serve_status_once(status: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                received.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&received).to_string();
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let content_length = text[..head_end]
                        .lines()
                        .find_map(|l| {
                            l.to_ascii_lowercase()
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if received.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                status
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}", addr)
    }

    async fn wait_for<T>(task: &Option<JoinHandle<T>>) {
        while task.as_ref().is_some_and(|t| !t.is_finished()) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[test]
    fn test_generation_not_restarted_while_in_flight() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), Some("http://localhost:1"));
        app.use_sample_jd();
        app.generating = true;

        assert!(!app.can_generate());
        app.start_generation();
        assert!(app.generate_task.is_none());
        assert!(app.phase_rx.is_none());
        assert!(app.error.is_none());
    }

    #[test]
    fn test_export_not_restarted_while_in_flight() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), None);
        app.finish_generation(sample_pack());
        app.exporting = true;

        app.start_export();
        assert!(app.export_task.is_none());
        assert!(!app.exporter.target_path().exists());
    }

    #[tokio::test]
    async fn test_export_writes_pdf_and_reports_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path(), None);
        app.finish_generation(sample_pack());

        app.start_export();
        assert!(app.exporting);
        assert!(app.export_task.is_some());

        wait_for(&app.export_task).await;
        app.poll_tasks().await;

        assert!(!app.exporting);
        assert!(!app.export_failed);
        assert!(app.status.as_deref().unwrap().starts_with("Saved"));
        assert!(app.exporter.target_path().exists());
    }

    #[tokio::test]
    async fn test_failed_generation_only_sets_error() {
        let dir = tempfile::tempdir().unwrap();
        let url = serve_status_once("500 Internal Server Error").await;
        let mut app = app_in(dir.path(), Some(&url));
        app.session.save(&sample_pack()).unwrap();
        app.use_sample_jd();
        app.resume_text.set("my resume");

        app.start_generation();
        assert!(app.generating);
        assert!(app.generate_task.is_some());

        // A second trigger while the first is in flight is ignored
        app.start_generation();

        wait_for(&app.generate_task).await;
        app.poll_tasks().await;

        assert!(!app.generating);
        assert!(app.generate_task.is_none());
        assert_eq!(app.screen, Screen::Input);
        assert_eq!(app.job_description.text, SAMPLE_JD);
        assert_eq!(app.resume_text.text, "my resume");
        assert_eq!(app.session.current(), Some(&sample_pack()));
        assert!(matches!(app.file_store.load(), Err(preppilot_core::LoadError::NotFound)));
        assert_eq!(
            app.error.as_deref(),
            Some(GenerationError::Decode(preppilot_core::LoadError::NotFound).user_message())
        );
    }
}
