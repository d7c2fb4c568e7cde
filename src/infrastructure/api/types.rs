//! Request and response schemas for the analytics backend

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `GET /`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub docs: String,
    pub health: String,
}

/// `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// `POST /api/upload`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileUploadResponse {
    pub id: String,
    pub filename: String,
    pub size: u64,
    pub rows: u64,
    pub columns: u64,
    pub column_names: Vec<String>,
    /// ISO-8601 local timestamp without offset
    pub upload_time: String,
}

impl FileUploadResponse {
    pub fn uploaded_at(&self) -> Option<chrono::NaiveDateTime> {
        chrono::NaiveDateTime::parse_from_str(&self.upload_time, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }
}

/// `GET /api/eda/summary`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EdaSummary {
    pub row_count: u64,
    pub column_count: u64,
    pub memory_usage: String,
    pub missing_values: BTreeMap<String, u64>,
    pub data_types: BTreeMap<String, String>,
    /// column -> statistic -> value. Numeric frames carry count, mean, std,
    /// min, 25%, ...; frames without numeric columns carry count, unique,
    /// top, freq.
    pub numeric_summary: BTreeMap<String, BTreeMap<String, Option<SummaryStat>>>,
}

/// One cell of the describe table: a number, or a label such as `top`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SummaryStat {
    Number(f64),
    Text(String),
}

impl fmt::Display for SummaryStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryStat::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{value:.0}")
            }
            SummaryStat::Number(value) => write!(f, "{value:.2}"),
            SummaryStat::Text(text) => f.write_str(text),
        }
    }
}

impl EdaSummary {
    pub fn total_missing(&self) -> u64 {
        self.missing_values.values().sum()
    }
}

/// Per-column statistics from `GET /api/eda/stats`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnStats {
    Numeric {
        mean: f64,
        median: f64,
        std: Option<f64>,
        min: f64,
        max: f64,
        q25: f64,
        q75: f64,
    },
    Categorical {
        unique: u64,
        mode: Option<String>,
    },
}

pub type ColumnStatsMap = BTreeMap<String, ColumnStats>;

/// `GET /api/eda/correlation`: column -> column -> coefficient
pub type CorrelationMatrix = BTreeMap<String, BTreeMap<String, Option<f64>>>;

/// `GET /api/eda/outliers`: column -> row indices outside 1.5 IQR
pub type Outliers = BTreeMap<String, Vec<i64>>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartData {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// bucket label -> count
    pub data: BTreeMap<String, u64>,
}

/// `GET /api/eda/charts`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartsResponse {
    pub charts: Vec<ChartData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Regression,
    Classification,
}

impl ModelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::Regression => "regression",
            ModelKind::Classification => "classification",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "regression" | "reg" => Ok(ModelKind::Regression),
            "classification" | "class" | "clf" => Ok(ModelKind::Classification),
            other => Err(format!("unknown model type: {other}")),
        }
    }
}

/// Body of `POST /api/model/train`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelTraining {
    pub target_column: String,
    pub model_type: ModelKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}

/// Metrics returned after training. Regression models fill `r_squared`,
/// `rmse` and `mae`; classifiers fill `accuracy`, `precision` and `recall`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelMetrics {
    pub model_type: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub r_squared: Option<f64>,
    #[serde(default)]
    pub rmse: Option<f64>,
    #[serde(default)]
    pub mae: Option<f64>,
    #[serde(default)]
    pub precision: Option<f64>,
    #[serde(default)]
    pub recall: Option<f64>,
    #[serde(default)]
    pub samples_trained: Option<u64>,
}

impl ModelMetrics {
    /// Metrics present in the response, in display order
    pub fn reported(&self) -> Vec<(&'static str, f64)> {
        [
            ("accuracy", self.accuracy),
            ("precision", self.precision),
            ("recall", self.recall),
            ("r_squared", self.r_squared),
            ("rmse", self.rmse),
            ("mae", self.mae),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

fn default_periods() -> u32 {
    12
}

/// Body of `POST /api/forecast`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub date_column: String,
    pub value_column: String,
    #[serde(default = "default_periods")]
    pub periods: u32,
}

/// One forecast step. Prophet output carries `ds`/`yhat`; the smoothing
/// fallback only carries `value`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastPoint {
    #[serde(default)]
    pub ds: Option<String>,
    #[serde(alias = "yhat")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub forecast: Vec<ForecastPoint>,
    #[serde(default)]
    pub lower_bound: Vec<f64>,
    #[serde(default)]
    pub upper_bound: Vec<f64>,
    #[serde(default)]
    pub periods: Option<u32>,
    #[serde(default)]
    pub method: Option<String>,
    /// Set when the backend could not produce a forecast
    #[serde(default)]
    pub error: Option<String>,
}

impl ForecastResponse {
    pub fn has_bounds(&self) -> bool {
        !self.lower_bound.is_empty() && self.lower_bound.len() == self.upper_bound.len()
    }
}

/// `POST /api/risk/analyze`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnomalyReport {
    /// Flagged rows; columns depend on the dataset
    pub anomalies: Vec<Map<String, Value>>,
    #[serde(default)]
    pub total_anomalies: u64,
    pub risk_score: f64,
    pub summary: String,
}

/// `GET /api/risk/quality`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct QualityScore {
    pub quality_score: f64,
}

/// Body of `POST /api/ai/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AiResponse {
    pub answer: String,
    pub confidence: f64,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Html,
    Pdf,
}

impl ReportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(ReportFormat::Html),
            "pdf" => Ok(ReportFormat::Pdf),
            other => Err(format!("unknown report format: {other}")),
        }
    }
}

/// `POST /api/report/generate`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratedReport {
    #[serde(default)]
    pub report: Option<String>,
    pub format: ReportFormat,
    pub status: String,
}

impl GeneratedReport {
    pub fn succeeded(&self) -> bool {
        self.status == "success" && self.report.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_stats_tagged_by_type() {
        let stats: ColumnStatsMap = serde_json::from_value(json!({
            "price": {"type": "numeric", "mean": 2.0, "median": 2.0, "std": 1.0,
                      "min": 1.0, "max": 3.0, "q25": 1.5, "q75": 2.5},
            "region": {"type": "categorical", "unique": 4, "mode": "north"},
            "empty": {"type": "categorical", "unique": 0, "mode": null}
        }))
        .unwrap();

        assert!(matches!(stats["price"], ColumnStats::Numeric { max, .. } if max == 3.0));
        assert_eq!(
            stats["region"],
            ColumnStats::Categorical {
                unique: 4,
                mode: Some("north".to_string())
            }
        );
        assert_eq!(
            stats["empty"],
            ColumnStats::Categorical {
                unique: 0,
                mode: None
            }
        );
    }

    #[test]
    fn test_summary_accepts_categorical_describe() {
        let summary: EdaSummary = serde_json::from_value(json!({
            "row_count": 3,
            "column_count": 1,
            "memory_usage": "0.00 MB",
            "missing_values": {"region": 0},
            "data_types": {"region": "object"},
            "numeric_summary": {
                "region": {"count": 3, "unique": 2, "top": "north", "freq": 2}
            }
        }))
        .unwrap();
        let region = &summary.numeric_summary["region"];
        assert_eq!(region["top"], Some(SummaryStat::Text("north".to_string())));
        assert_eq!(region["freq"], Some(SummaryStat::Number(2.0)));
        assert_eq!(region["count"].as_ref().unwrap().to_string(), "3");
    }

    #[test]
    fn test_summary_numeric_describe_with_nan() {
        let summary: EdaSummary = serde_json::from_value(json!({
            "row_count": 1,
            "column_count": 1,
            "memory_usage": "0.00 MB",
            "missing_values": {"price": 0},
            "data_types": {"price": "float64"},
            "numeric_summary": {"price": {"count": 1, "mean": 2.5, "std": null}}
        }))
        .unwrap();
        let price = &summary.numeric_summary["price"];
        assert_eq!(price["std"], None);
        assert_eq!(price["mean"].as_ref().unwrap().to_string(), "2.50");
    }

    #[test]
    fn test_forecast_accepts_both_backend_shapes() {
        let prophet: ForecastResponse = serde_json::from_value(json!({
            "forecast": [{"ds": "2024-01-01T00:00:00", "yhat": 10.5}],
            "lower_bound": [9.0],
            "upper_bound": [12.0],
            "periods": 1
        }))
        .unwrap();
        assert_eq!(prophet.forecast[0].value, 10.5);
        assert!(prophet.has_bounds());
        assert!(prophet.method.is_none());

        let smoothing: ForecastResponse = serde_json::from_value(json!({
            "forecast": [{"value": 3.0}, {"value": 3.5}],
            "method": "exponential_smoothing",
            "periods": 2
        }))
        .unwrap();
        assert_eq!(smoothing.forecast.len(), 2);
        assert!(smoothing.forecast[0].ds.is_none());
        assert!(!smoothing.has_bounds());

        let failed: ForecastResponse =
            serde_json::from_value(json!({"error": "Insufficient data for forecasting"})).unwrap();
        assert!(failed.forecast.is_empty());
        assert_eq!(failed.error.as_deref(), Some("Insufficient data for forecasting"));
    }

    #[test]
    fn test_model_metrics_reported_skips_missing() {
        let metrics: ModelMetrics = serde_json::from_value(json!({
            "model_type": "linear",
            "target": "price",
            "r_squared": 0.8,
            "rmse": 1.2,
            "mae": 0.9,
            "samples_trained": 80
        }))
        .unwrap();
        let names: Vec<&str> = metrics.reported().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["r_squared", "rmse", "mae"]);
    }

    #[test]
    fn test_training_request_serialization() {
        let body = serde_json::to_value(ModelTraining {
            target_column: "churn".to_string(),
            model_type: ModelKind::Classification,
            features: None,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"target_column": "churn", "model_type": "classification"})
        );
    }

    #[test]
    fn test_upload_time_parses() {
        let upload = FileUploadResponse {
            id: "123".to_string(),
            filename: "data.csv".to_string(),
            size: 10,
            rows: 2,
            columns: 1,
            column_names: vec!["a".to_string()],
            upload_time: "2024-03-01T12:30:45.123456".to_string(),
        };
        let at = upload.uploaded_at().unwrap();
        assert_eq!(at.format("%H:%M").to_string(), "12:30");
    }
}
