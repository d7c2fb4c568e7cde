//! Latest backend results shown by the dashboard panels

use crate::infrastructure::api::{
    AiResponse, AnomalyReport, ChartsResponse, ColumnStatsMap, CorrelationMatrix, EdaSummary,
    FileUploadResponse, ForecastResponse, GeneratedReport, ModelMetrics, Outliers, QualityScore,
};

/// Questions kept in the insights panel
const MAX_CONVERSATION: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub question: String,
    pub response: AiResponse,
}

/// Everything the panels render. Replaced piecewise as events arrive and
/// cleared when a different dataset is bound.
#[derive(Debug, Default)]
pub struct Results {
    pub upload: Option<FileUploadResponse>,
    pub summary: Option<EdaSummary>,
    pub column_stats: Option<ColumnStatsMap>,
    pub correlation: Option<CorrelationMatrix>,
    pub outliers: Option<Outliers>,
    pub charts: Option<ChartsResponse>,
    pub model: Option<ModelMetrics>,
    pub forecast: Option<ForecastResponse>,
    pub risk: Option<AnomalyReport>,
    pub quality: Option<QualityScore>,
    pub conversation: Vec<Exchange>,
    pub report: Option<GeneratedReport>,
}

impl Results {
    /// Drop dataset-specific results; the AI conversation survives
    pub fn clear_dataset(&mut self) {
        let conversation = std::mem::take(&mut self.conversation);
        *self = Self {
            conversation,
            ..Self::default()
        };
    }

    pub fn push_exchange(&mut self, question: String, response: AiResponse) {
        self.conversation.push(Exchange { question, response });
        if self.conversation.len() > MAX_CONVERSATION {
            let excess = self.conversation.len() - MAX_CONVERSATION;
            self.conversation.drain(..excess);
        }
    }
}

/// Strongest off-diagonal correlations, each pair once, by absolute value
pub fn top_correlations(matrix: &CorrelationMatrix, limit: usize) -> Vec<(String, String, f64)> {
    let mut pairs: Vec<(String, String, f64)> = matrix
        .iter()
        .flat_map(|(left, row)| {
            row.iter().filter_map(move |(right, value)| {
                let value = (*value)?;
                (left < right && value.is_finite()).then(|| (left.clone(), right.clone(), value))
            })
        })
        .collect();
    pairs.sort_by(|a, b| b.2.abs().total_cmp(&a.2.abs()));
    pairs.truncate(limit);
    pairs
}

/// Horizontal bar scaled against `max`
pub fn bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 || width == 0 {
        return String::new();
    }
    let filled = ((value as f64 / max as f64) * width as f64).round() as usize;
    "█".repeat(filled.clamp(usize::from(value > 0), width))
}

/// Byte counts for humans
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
