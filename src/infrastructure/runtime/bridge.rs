//! Runtime bridge - connects sync TUI thread with async Tokio runtime
//!
//! Each command is served by its own task on the worker runtime, so
//! results can arrive in any order.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use anyhow::Context as _;
use tokio::runtime::Builder;

use crate::core::DataContext;
use crate::infrastructure::api::{
    AiResponse, AnomalyReport, ApiClient, ChartsResponse, ChatMessage, ColumnStatsMap,
    CorrelationMatrix, EdaSummary, FileUploadResponse, ForecastRequest, ForecastResponse,
    GeneratedReport, ModelMetrics, ModelTraining, Outliers, QualityScore, ReportFormat,
};
use crate::infrastructure::runtime::worker::run_async_worker;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeCommand {
    /// Check `/health`
    Health,
    /// Read a local file and upload it as a dataset
    Upload { path: PathBuf },
    Summary { data: DataContext },
    ColumnStats { data: DataContext },
    Correlation { data: DataContext },
    Outliers { data: DataContext },
    Charts { data: DataContext },
    Train {
        data: DataContext,
        request: ModelTraining,
    },
    Forecast {
        data: DataContext,
        request: ForecastRequest,
    },
    Risk {
        data: DataContext,
        contamination: f64,
    },
    Quality { data: DataContext },
    Ask { message: ChatMessage },
    Report {
        data: DataContext,
        format: ReportFormat,
    },
    /// Shutdown the worker
    Shutdown,
}

impl RuntimeCommand {
    /// Short label used in status messages and logs
    pub fn label(&self) -> &'static str {
        match self {
            RuntimeCommand::Health => "health",
            RuntimeCommand::Upload { .. } => "upload",
            RuntimeCommand::Summary { .. } => "summary",
            RuntimeCommand::ColumnStats { .. } => "stats",
            RuntimeCommand::Correlation { .. } => "correlation",
            RuntimeCommand::Outliers { .. } => "outliers",
            RuntimeCommand::Charts { .. } => "charts",
            RuntimeCommand::Train { .. } => "train",
            RuntimeCommand::Forecast { .. } => "forecast",
            RuntimeCommand::Risk { .. } => "risk",
            RuntimeCommand::Quality { .. } => "quality",
            RuntimeCommand::Ask { .. } => "ask",
            RuntimeCommand::Report { .. } => "report",
            RuntimeCommand::Shutdown => "shutdown",
        }
    }
}

/// Result of a request made on behalf of one dataset
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetResult {
    Summary(EdaSummary),
    ColumnStats(ColumnStatsMap),
    Correlation(CorrelationMatrix),
    Outliers(Outliers),
    Charts(ChartsResponse),
    Model(ModelMetrics),
    Forecast(ForecastResponse),
    Risk(AnomalyReport),
    Quality(QualityScore),
    Report(GeneratedReport),
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEvent {
    /// Health check answered
    Health { status: String },
    Uploaded(FileUploadResponse),
    /// Dataset-scoped result, tagged with the dataset it was requested for
    DatasetReady {
        data: DataContext,
        result: DatasetResult,
    },
    AnswerReady {
        question: String,
        response: AiResponse,
    },
    /// Error occurred
    Error { label: &'static str, message: String },
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Start a worker thread with its own Tokio runtime serving `client`
    pub fn new(client: ApiClient) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        let rt = Builder::new_multi_thread()
            .enable_all()
            .thread_name("datadash-worker")
            .build()
            .context("Failed to create Tokio runtime")?;

        thread::Builder::new()
            .name("datadash-bridge".to_string())
            .spawn(move || {
                rt.block_on(run_async_worker(client, cmd_rx, evt_tx));
            })
            .context("Failed to spawn worker thread")?;

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }

    /// Wait up to `timeout` for the next event
    pub fn recv_timeout(&self, timeout: Duration) -> Option<RuntimeEvent> {
        match self.evt_rx.recv_timeout(timeout) {
            Ok(evt) => Some(evt),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
