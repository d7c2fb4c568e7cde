//! Async worker - runs in Tokio runtime and serves backend requests

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::infrastructure::api::{ApiClient, ApiResult, UploadFile};
use crate::infrastructure::runtime::bridge::{DatasetResult, RuntimeCommand, RuntimeEvent};

/// Run the async worker loop until `Shutdown` or the TUI side hangs up
pub async fn run_async_worker(
    client: ApiClient,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) {
    info!(base_url = client.base_url(), "worker started");

    loop {
        match cmd_rx.try_recv() {
            Ok(RuntimeCommand::Shutdown) | Err(TryRecvError::Disconnected) => break,
            Ok(cmd) => {
                let label = cmd.label();
                debug!(label, "dispatching request");
                let client = client.clone();
                let evt_tx = evt_tx.clone();
                tokio::spawn(async move {
                    let event = match execute(&client, cmd).await {
                        Ok(Some(event)) => event,
                        Ok(None) => return,
                        Err(err) => {
                            warn!(label, error = %err, "request failed");
                            RuntimeEvent::Error {
                                label,
                                message: err.to_string(),
                            }
                        }
                    };
                    let _ = evt_tx.send(event);
                });
            }
            // Small yield to prevent busy loop
            Err(TryRecvError::Empty) => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }

    info!("worker stopped");
}

/// Perform one request and wrap the result as an event
async fn execute(client: &ApiClient, cmd: RuntimeCommand) -> ApiResult<Option<RuntimeEvent>> {
    let (data, result) = match cmd {
        RuntimeCommand::Health => {
            let status = client.health().await?.status;
            return Ok(Some(RuntimeEvent::Health { status }));
        }
        RuntimeCommand::Upload { path } => {
            let file = UploadFile::from_path(&path).await?;
            let upload = client.upload_dataset(&file).await?;
            return Ok(Some(RuntimeEvent::Uploaded(upload)));
        }
        RuntimeCommand::Ask { message } => {
            let response = client.chat(&message).await?;
            return Ok(Some(RuntimeEvent::AnswerReady {
                question: message.question,
                response,
            }));
        }
        RuntimeCommand::Shutdown => return Ok(None),

        RuntimeCommand::Summary { data } => {
            let summary = client.eda_summary(&data).await?;
            (data, DatasetResult::Summary(summary))
        }
        RuntimeCommand::ColumnStats { data } => {
            let stats = client.column_stats(&data).await?;
            (data, DatasetResult::ColumnStats(stats))
        }
        RuntimeCommand::Correlation { data } => {
            let matrix = client.correlation(&data).await?;
            (data, DatasetResult::Correlation(matrix))
        }
        RuntimeCommand::Outliers { data } => {
            let outliers = client.outliers(&data).await?;
            (data, DatasetResult::Outliers(outliers))
        }
        RuntimeCommand::Charts { data } => {
            let charts = client.charts(&data).await?;
            (data, DatasetResult::Charts(charts))
        }
        RuntimeCommand::Train { data, request } => {
            let metrics = client.train_model(&data, &request).await?;
            (data, DatasetResult::Model(metrics))
        }
        RuntimeCommand::Forecast { data, request } => {
            let forecast = client.forecast(&data, &request).await?;
            (data, DatasetResult::Forecast(forecast))
        }
        RuntimeCommand::Risk {
            data,
            contamination,
        } => {
            let report = client.analyze_risk(&data, contamination).await?;
            (data, DatasetResult::Risk(report))
        }
        RuntimeCommand::Quality { data } => {
            let score = client.data_quality(&data).await?;
            (data, DatasetResult::Quality(score))
        }
        RuntimeCommand::Report { data, format } => {
            let report = client.generate_report(&data, format).await?;
            (data, DatasetResult::Report(report))
        }
    };
    Ok(Some(RuntimeEvent::DatasetReady { data, result }))
}
