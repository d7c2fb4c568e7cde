//! Command parser for the : command system

use crate::infrastructure::api::{ModelKind, ReportFormat};

/// Default row-fraction handed to the anomaly detector
pub const DEFAULT_CONTAMINATION: f64 = 0.1;

/// Default forecast horizon
pub const DEFAULT_PERIODS: u32 = 12;

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Dataset commands
    Upload(String),
    Use { file_id: String, filename: String },

    // Exploratory analysis
    Summary,
    Stats,
    Correlation,
    Outliers,
    Charts,

    // Modelling
    Train { target: String, kind: ModelKind },
    Forecast {
        date_column: String,
        value_column: String,
        periods: u32,
    },
    Risk(f64),
    Quality,

    // AI
    Ask(String),
    Report(ReportFormat),

    // Shell
    Health,
    Sidebar,
    Help,
    Quit,

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let unknown = || Command::Unknown(input.to_string());

    match cmd.to_lowercase().as_str() {
        "upload" | "up" => args.map(Command::Upload).unwrap_or_else(unknown),
        "use" => {
            let args = args.unwrap_or_default();
            let mut words = args.split_whitespace();
            match (words.next(), words.next(), words.next()) {
                (Some(id), Some(name), None) => Command::Use {
                    file_id: id.to_string(),
                    filename: name.to_string(),
                },
                _ => unknown(),
            }
        }

        "summary" | "eda" => Command::Summary,
        "stats" => Command::Stats,
        "corr" | "correlation" => Command::Correlation,
        "outliers" => Command::Outliers,
        "charts" => Command::Charts,

        "train" => {
            let args = args.unwrap_or_default();
            let mut words = args.split_whitespace();
            let Some(target) = words.next() else {
                return unknown();
            };
            let kind = match words.next() {
                None => ModelKind::Regression,
                Some(word) => match word.parse() {
                    Ok(kind) => kind,
                    Err(_) => return unknown(),
                },
            };
            Command::Train {
                target: target.to_string(),
                kind,
            }
        }
        "forecast" | "fc" => {
            let args = args.unwrap_or_default();
            let words: Vec<&str> = args.split_whitespace().collect();
            let periods = match words.get(2) {
                None => DEFAULT_PERIODS,
                Some(word) => match word.parse() {
                    Ok(n) => n,
                    Err(_) => return unknown(),
                },
            };
            match (words.first(), words.get(1)) {
                (Some(date), Some(value)) => Command::Forecast {
                    date_column: date.to_string(),
                    value_column: value.to_string(),
                    periods,
                },
                _ => unknown(),
            }
        }
        "risk" | "anomalies" => match args {
            None => Command::Risk(DEFAULT_CONTAMINATION),
            Some(value) => value
                .parse()
                .map(Command::Risk)
                .unwrap_or_else(|_| unknown()),
        },
        "quality" => Command::Quality,

        "ask" | "chat" => args.map(Command::Ask).unwrap_or_else(unknown),
        "report" => match args {
            None => Command::Report(ReportFormat::Html),
            Some(value) => value
                .parse()
                .map(Command::Report)
                .unwrap_or_else(|_| unknown()),
        },

        "health" => Command::Health,
        "sidebar" | "sb" => Command::Sidebar,
        "help" | "?" => Command::Help,
        "quit" | "q" => Command::Quit,

        _ => unknown(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dataset_commands() {
        assert_eq!(
            parse_command("upload ./data/sales.csv"),
            Command::Upload("./data/sales.csv".to_string())
        );
        assert_eq!(
            parse_command("use abc f.csv"),
            Command::Use {
                file_id: "abc".to_string(),
                filename: "f.csv".to_string()
            }
        );
        assert_eq!(parse_command("upload"), Command::Unknown("upload".to_string()));
        assert_eq!(parse_command("use abc"), Command::Unknown("use abc".to_string()));
    }

    #[test]
    fn test_parse_analysis_commands() {
        assert_eq!(parse_command("summary"), Command::Summary);
        assert_eq!(parse_command("EDA"), Command::Summary);
        assert_eq!(parse_command("corr"), Command::Correlation);
        assert_eq!(parse_command("  charts  "), Command::Charts);
    }

    #[test]
    fn test_parse_train() {
        assert_eq!(
            parse_command("train price"),
            Command::Train {
                target: "price".to_string(),
                kind: ModelKind::Regression
            }
        );
        assert_eq!(
            parse_command("train churn classification"),
            Command::Train {
                target: "churn".to_string(),
                kind: ModelKind::Classification
            }
        );
        assert!(matches!(parse_command("train churn svm"), Command::Unknown(_)));
        assert!(matches!(parse_command("train"), Command::Unknown(_)));
    }

    #[test]
    fn test_parse_forecast() {
        assert_eq!(
            parse_command("forecast date sales"),
            Command::Forecast {
                date_column: "date".to_string(),
                value_column: "sales".to_string(),
                periods: DEFAULT_PERIODS
            }
        );
        assert_eq!(
            parse_command("fc date sales 30"),
            Command::Forecast {
                date_column: "date".to_string(),
                value_column: "sales".to_string(),
                periods: 30
            }
        );
        assert!(matches!(parse_command("forecast date"), Command::Unknown(_)));
        assert!(matches!(parse_command("forecast a b soon"), Command::Unknown(_)));
    }

    #[test]
    fn test_parse_risk_and_report() {
        assert_eq!(parse_command("risk"), Command::Risk(DEFAULT_CONTAMINATION));
        assert_eq!(parse_command("risk 0.25"), Command::Risk(0.25));
        assert!(matches!(parse_command("risk lots"), Command::Unknown(_)));
        assert_eq!(parse_command("report"), Command::Report(ReportFormat::Html));
        assert_eq!(parse_command("report pdf"), Command::Report(ReportFormat::Pdf));
        assert!(matches!(parse_command("report docx"), Command::Unknown(_)));
    }

    #[test]
    fn test_parse_ask_keeps_full_question() {
        assert_eq!(
            parse_command("ask which region grew fastest?"),
            Command::Ask("which region grew fastest?".to_string())
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse_command("notacommand"),
            Command::Unknown("notacommand".to_string())
        );
    }
}
