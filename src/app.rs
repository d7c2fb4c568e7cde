use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

use crate::core::{parse_command, Action, Command, Context, DataContext, Module, NotifyLevel};
use crate::infrastructure::api::{ChatMessage, ForecastRequest, ModelTraining};
use crate::infrastructure::runtime::{DatasetResult, RuntimeCommand, RuntimeEvent};
use crate::modules::dashboard::{Dashboard, DashboardPanel, Results};

/// How long a status message stays on screen
const STATUS_TTL: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
}

#[derive(Debug, Clone, Default)]
pub struct CommandBar {
    pub input: String,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: NotifyLevel,
    pub at: Instant,
}

#[derive(Debug)]
pub struct App {
    /// Shared context for modules
    pub ctx: Context,
    pub dashboard: Dashboard,
    pub results: Results,
    pub input_mode: InputMode,
    pub command: CommandBar,
    pub status: Option<StatusMessage>,
    pub help_open: bool,
    pub should_quit: bool,
    /// Requests issued but not yet answered
    pub in_flight: usize,
    sidebar_open: bool,
    pending_requests: Vec<RuntimeCommand>,
}

impl App {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            dashboard: Dashboard::new(),
            results: Results::default(),
            input_mode: InputMode::Normal,
            command: CommandBar::default(),
            status: None,
            help_open: false,
            should_quit: false,
            in_flight: 0,
            sidebar_open: true,
            pending_requests: Vec::new(),
        }
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn set_sidebar_open(&mut self, open: bool) {
        self.sidebar_open = open;
    }

    pub fn toggle_sidebar(&mut self) {
        self.set_sidebar_open(!self.sidebar_open);
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: NotifyLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            at: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, NotifyLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if self
            .status
            .as_ref()
            .is_some_and(|status| status.at.elapsed() >= STATUS_TTL)
        {
            self.status = None;
        }
    }

    /// Bind a dataset, replacing the previous one and its results
    pub fn mount_dataset(&mut self, file_id: impl Into<String>, filename: impl Into<String>) {
        let (file_id, filename) = (file_id.into(), filename.into());
        if self.ctx.data() != &DataContext::new(file_id.as_str(), filename.as_str()) {
            self.results.clear_dataset();
        }
        info!(%file_id, %filename, "dataset bound");
        self.ctx.mount_dataset(file_id, filename);
    }

    /// Requests queued since the last call, in issue order
    pub fn take_requests(&mut self) -> Vec<RuntimeCommand> {
        std::mem::take(&mut self.pending_requests)
    }

    fn dispatch(&mut self, cmd: RuntimeCommand) {
        self.in_flight += 1;
        self.pending_requests.push(cmd);
    }

    /// Queue a request that needs a bound dataset
    fn dispatch_for_dataset(&mut self, build: impl FnOnce(DataContext) -> RuntimeCommand) -> bool {
        let data = self.ctx.data();
        if !data.is_bound() {
            self.set_status("No dataset loaded. Use :upload <path>", NotifyLevel::Warn);
            return false;
        }
        let cmd = build(data.clone());
        self.set_status(format!("Requesting {}…", cmd.label()), NotifyLevel::Info);
        self.dispatch(cmd);
        true
    }

    pub fn enter_command(&mut self, prefix: Option<String>) {
        self.input_mode = InputMode::Command;
        self.command.input = prefix.unwrap_or_default();
    }

    pub fn exit_command(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.input.clear();
    }

    pub fn apply_command(&mut self) {
        let input = std::mem::take(&mut self.command.input);
        self.input_mode = InputMode::Normal;
        if input.trim().is_empty() {
            return;
        }
        let cmd = parse_command(&input);
        self.run_command(cmd);
    }

    pub fn run_command(&mut self, cmd: Command) {
        match cmd {
            Command::Upload(path) => {
                let path = expand_home(&path);
                self.set_status(format!("Uploading {}…", path.display()), NotifyLevel::Info);
                self.dashboard.select(DashboardPanel::Dataset);
                self.dispatch(RuntimeCommand::Upload { path });
            }
            Command::Use { file_id, filename } => {
                self.set_status(format!("Using {filename}"), NotifyLevel::Info);
                self.mount_dataset(file_id, filename);
            }
            Command::Summary => {
                self.dashboard.select(DashboardPanel::Dataset);
                self.dispatch_for_dataset(|data| RuntimeCommand::Summary { data });
            }
            Command::Stats => {
                self.dashboard.select(DashboardPanel::Analysis);
                self.dispatch_for_dataset(|data| RuntimeCommand::ColumnStats { data });
            }
            Command::Correlation => {
                self.dashboard.select(DashboardPanel::Analysis);
                self.dispatch_for_dataset(|data| RuntimeCommand::Correlation { data });
            }
            Command::Outliers => {
                self.dashboard.select(DashboardPanel::Analysis);
                self.dispatch_for_dataset(|data| RuntimeCommand::Outliers { data });
            }
            Command::Charts => {
                self.dashboard.select(DashboardPanel::Analysis);
                self.dispatch_for_dataset(|data| RuntimeCommand::Charts { data });
            }
            Command::Train { target, kind } => {
                self.dashboard.select(DashboardPanel::Models);
                self.dispatch_for_dataset(|data| RuntimeCommand::Train {
                    data,
                    request: ModelTraining {
                        target_column: target,
                        model_type: kind,
                        features: None,
                    },
                });
            }
            Command::Forecast {
                date_column,
                value_column,
                periods,
            } => {
                self.dashboard.select(DashboardPanel::Models);
                self.dispatch_for_dataset(|data| RuntimeCommand::Forecast {
                    data,
                    request: ForecastRequest {
                        date_column,
                        value_column,
                        periods,
                    },
                });
            }
            Command::Risk(contamination) => {
                self.dashboard.select(DashboardPanel::Insights);
                self.dispatch_for_dataset(|data| RuntimeCommand::Risk {
                    data,
                    contamination,
                });
            }
            Command::Quality => {
                self.dashboard.select(DashboardPanel::Dataset);
                self.dispatch_for_dataset(|data| RuntimeCommand::Quality { data });
            }
            Command::Ask(question) => {
                self.dashboard.select(DashboardPanel::Insights);
                let context = self.dataset_context_text();
                self.set_status("Asking…", NotifyLevel::Info);
                self.dispatch(RuntimeCommand::Ask {
                    message: ChatMessage { question, context },
                });
            }
            Command::Report(format) => {
                self.dashboard.select(DashboardPanel::Insights);
                self.dispatch_for_dataset(|data| RuntimeCommand::Report { data, format });
            }
            Command::Health => {
                self.set_status("Checking backend…", NotifyLevel::Info);
                self.dispatch(RuntimeCommand::Health);
            }
            Command::Sidebar => self.toggle_sidebar(),
            Command::Help => self.help_open = true,
            Command::Quit => self.should_quit = true,
            Command::Unknown(input) => {
                self.set_status(format!("Unknown command: {input}"), NotifyLevel::Error);
            }
        }
    }

    /// Dataset description handed to the AI endpoint along with a question
    fn dataset_context_text(&self) -> Option<String> {
        let data = self.ctx.data();
        if !data.is_bound() {
            return None;
        }
        let mut text = format!("Dataset: {}", data.filename);
        if let Some(summary) = self.results.summary.as_ref() {
            text.push_str(&format!(
                "\nRows: {}\nColumns: {}\nMissing values: {}",
                summary.row_count,
                summary.column_count,
                summary.total_missing()
            ));
            let types: Vec<String> = summary
                .data_types
                .iter()
                .map(|(column, dtype)| format!("{column} ({dtype})"))
                .collect();
            text.push_str(&format!("\nColumn types: {}", types.join(", ")));
        } else if let Some(upload) = self.results.upload.as_ref() {
            text.push_str(&format!(
                "\nRows: {}\nColumns: {}",
                upload.rows,
                upload.column_names.join(", ")
            ));
        }
        Some(text)
    }

    /// Re-issue the requests behind the active panel
    pub fn refresh(&mut self) {
        let panel = self.dashboard.active_panel();
        let commands = match panel {
            DashboardPanel::Dataset => vec![Command::Summary, Command::Quality],
            DashboardPanel::Analysis => vec![
                Command::Stats,
                Command::Correlation,
                Command::Outliers,
                Command::Charts,
            ],
            DashboardPanel::Models | DashboardPanel::Insights => {
                self.set_status("Nothing to refresh here; rerun the command", NotifyLevel::Info);
                return;
            }
        };
        for cmd in commands {
            self.run_command(cmd);
        }
        self.dashboard.select(panel);
    }

    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Notify(text, level) => self.set_status(text, level),
            Action::OpenCommand(prefix) => self.enter_command(prefix),
            Action::ToggleSidebar => self.toggle_sidebar(),
            Action::Refresh => self.refresh(),
            Action::Quit => self.should_quit = true,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.input_mode {
            InputMode::Command => match key.code {
                KeyCode::Esc => self.exit_command(),
                KeyCode::Enter => self.apply_command(),
                KeyCode::Backspace => {
                    if self.command.input.pop().is_none() {
                        self.exit_command();
                    }
                }
                KeyCode::Char(c) => self.command.input.push(c),
                _ => {}
            },
            InputMode::Normal => {
                if self.help_open {
                    if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                        self.help_open = false;
                    }
                    return;
                }
                if key.code == KeyCode::Char('?') {
                    self.help_open = true;
                    return;
                }
                let action = self.dashboard.handle_key(key, &self.ctx);
                if action != Action::None {
                    debug!(module = self.dashboard.id(), ?action, "key handled");
                }
                self.apply_action(action);
            }
        }
    }

    pub fn apply_event(&mut self, event: RuntimeEvent) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match event {
            RuntimeEvent::Health { status } => {
                self.set_status(format!("Backend: {status}"), NotifyLevel::Info);
                self.ctx.backend_status = status;
            }
            RuntimeEvent::Uploaded(upload) => {
                self.set_status(
                    format!(
                        "Uploaded {} ({} rows, {} columns)",
                        upload.filename, upload.rows, upload.columns
                    ),
                    NotifyLevel::Info,
                );
                self.mount_dataset(upload.id.clone(), upload.filename.clone());
                self.results.upload = Some(upload);
            }
            RuntimeEvent::DatasetReady { data, result } => {
                if self.ctx.data() != &data {
                    debug!(
                        file_id = %data.file_id,
                        bound = %self.ctx.data().file_id,
                        "dropping result for a dataset no longer bound"
                    );
                    return;
                }
                self.apply_dataset_result(result);
            }
            RuntimeEvent::AnswerReady { question, response } => {
                self.results.push_exchange(question, response);
            }
            RuntimeEvent::Error { label, message } => {
                if label == "health" {
                    self.ctx.backend_status = "unreachable".to_string();
                }
                self.set_status(format!("{label} failed: {message}"), NotifyLevel::Error);
            }
        }
    }

    fn apply_dataset_result(&mut self, result: DatasetResult) {
        match result {
            DatasetResult::Summary(summary) => {
                self.results.summary = Some(summary);
                self.set_status("Summary ready", NotifyLevel::Info);
            }
            DatasetResult::ColumnStats(stats) => self.results.column_stats = Some(stats),
            DatasetResult::Correlation(matrix) => self.results.correlation = Some(matrix),
            DatasetResult::Outliers(outliers) => self.results.outliers = Some(outliers),
            DatasetResult::Charts(charts) => self.results.charts = Some(charts),
            DatasetResult::Model(metrics) => {
                self.set_status(format!("Trained {} model", metrics.model_type), NotifyLevel::Info);
                self.results.model = Some(metrics);
            }
            DatasetResult::Forecast(forecast) => {
                if let Some(error) = forecast.error.as_ref() {
                    self.set_status(format!("Forecast failed: {error}"), NotifyLevel::Warn);
                }
                self.results.forecast = Some(forecast);
            }
            DatasetResult::Risk(report) => {
                self.set_status(report.summary.clone(), NotifyLevel::Info);
                self.results.risk = Some(report);
            }
            DatasetResult::Quality(score) => self.results.quality = Some(score),
            DatasetResult::Report(report) => {
                let level = if report.succeeded() {
                    NotifyLevel::Info
                } else {
                    NotifyLevel::Warn
                };
                self.set_status(format!("Report {}", report.status), level);
                self.results.report = Some(report);
            }
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}
