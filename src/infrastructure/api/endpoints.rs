//! Typed operations for each backend route

use super::client::{ApiClient, UploadFile};
use super::error::ApiResult;
use super::types::{
    AiResponse, AnomalyReport, ChartsResponse, ChatMessage, ColumnStatsMap, CorrelationMatrix,
    EdaSummary, FileUploadResponse, ForecastRequest, ForecastResponse, GeneratedReport,
    HealthStatus, ModelMetrics, ModelTraining, Outliers, QualityScore, ReportFormat, ServiceInfo,
};
use crate::core::DataContext;

const ROOT: &str = "/";
const HEALTH: &str = "/health";
const UPLOAD: &str = "/api/upload";
const EDA_SUMMARY: &str = "/api/eda/summary";
const EDA_STATS: &str = "/api/eda/stats";
const EDA_CORRELATION: &str = "/api/eda/correlation";
const EDA_OUTLIERS: &str = "/api/eda/outliers";
const EDA_CHARTS: &str = "/api/eda/charts";
const MODEL_TRAIN: &str = "/api/model/train";
const FORECAST: &str = "/api/forecast";
const RISK_ANALYZE: &str = "/api/risk/analyze";
const RISK_QUALITY: &str = "/api/risk/quality";
const AI_CHAT: &str = "/api/ai/chat";
const REPORT_GENERATE: &str = "/api/report/generate";

const NO_QUERY: &[(&str, &str)] = &[];

impl ApiClient {
    pub async fn service_info(&self) -> ApiResult<ServiceInfo> {
        self.get_with(ROOT, NO_QUERY).await?.into_typed(ROOT)
    }

    pub async fn health(&self) -> ApiResult<HealthStatus> {
        self.get_with(HEALTH, NO_QUERY).await?.into_typed(HEALTH)
    }

    pub async fn upload_dataset(&self, file: &UploadFile) -> ApiResult<FileUploadResponse> {
        self.send_upload(UPLOAD, file).await?.into_typed(UPLOAD)
    }

    pub async fn eda_summary(&self, data: &DataContext) -> ApiResult<EdaSummary> {
        self.get_with(EDA_SUMMARY, &data.query())
            .await?
            .into_typed(EDA_SUMMARY)
    }

    pub async fn column_stats(&self, data: &DataContext) -> ApiResult<ColumnStatsMap> {
        self.get_with(EDA_STATS, &data.query())
            .await?
            .into_typed(EDA_STATS)
    }

    pub async fn correlation(&self, data: &DataContext) -> ApiResult<CorrelationMatrix> {
        self.get_with(EDA_CORRELATION, &data.query())
            .await?
            .into_typed(EDA_CORRELATION)
    }

    pub async fn outliers(&self, data: &DataContext) -> ApiResult<Outliers> {
        self.get_with(EDA_OUTLIERS, &data.query())
            .await?
            .into_typed(EDA_OUTLIERS)
    }

    pub async fn charts(&self, data: &DataContext) -> ApiResult<ChartsResponse> {
        self.get_with(EDA_CHARTS, &data.query())
            .await?
            .into_typed(EDA_CHARTS)
    }

    pub async fn train_model(
        &self,
        data: &DataContext,
        request: &ModelTraining,
    ) -> ApiResult<ModelMetrics> {
        self.post_with(MODEL_TRAIN, &data.query(), request)
            .await?
            .into_typed(MODEL_TRAIN)
    }

    pub async fn forecast(
        &self,
        data: &DataContext,
        request: &ForecastRequest,
    ) -> ApiResult<ForecastResponse> {
        self.post_with(FORECAST, &data.query(), request)
            .await?
            .into_typed(FORECAST)
    }

    /// `contamination` is the expected anomaly fraction; the backend accepts 0.01..=0.5
    pub async fn analyze_risk(
        &self,
        data: &DataContext,
        contamination: f64,
    ) -> ApiResult<AnomalyReport> {
        let contamination = contamination.to_string();
        let [file_id, filename] = data.query();
        let query = [file_id, filename, ("contamination", contamination.as_str())];
        self.post_empty(RISK_ANALYZE, &query)
            .await?
            .into_typed(RISK_ANALYZE)
    }

    pub async fn data_quality(&self, data: &DataContext) -> ApiResult<QualityScore> {
        self.get_with(RISK_QUALITY, &data.query())
            .await?
            .into_typed(RISK_QUALITY)
    }

    pub async fn chat(&self, message: &ChatMessage) -> ApiResult<AiResponse> {
        self.post_with(AI_CHAT, NO_QUERY, message)
            .await?
            .into_typed(AI_CHAT)
    }

    pub async fn generate_report(
        &self,
        data: &DataContext,
        format: ReportFormat,
    ) -> ApiResult<GeneratedReport> {
        let [file_id, filename] = data.query();
        let query = [file_id, filename, ("format", format.as_str())];
        self.post_empty(REPORT_GENERATE, &query)
            .await?
            .into_typed(REPORT_GENERATE)
    }
}
