//! Analytics backend API client
//!
//! Raw passthrough operations (`get`, `post`, `upload_file`) return the
//! response JSON untouched. Typed endpoint operations decode into the
//! schemas in [`types`] and surface non-success statuses as errors.

mod client;
mod endpoints;
mod error;
pub mod types;

pub use client::{ApiClient, UploadFile};
pub use error::{ApiError, ApiResult};
pub use types::{
    AiResponse, AnomalyReport, ChartData, ChartsResponse, ChatMessage, ColumnStats,
    ColumnStatsMap, CorrelationMatrix, EdaSummary, FileUploadResponse, ForecastPoint,
    ForecastRequest, ForecastResponse, GeneratedReport, HealthStatus, ModelKind, ModelMetrics,
    ModelTraining, Outliers, QualityScore, ReportFormat, ServiceInfo, SummaryStat,
};
