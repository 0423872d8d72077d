//! Date-range resolution
//!
//! Turns a user-supplied date expression into a concrete `[start, end]`
//! interval. Explicit `YYYY-MM-DD` inputs are parsed directly and never
//! reach the oracle; natural language goes through the oracle, with a
//! small deterministic rule set as fallback.

use chrono::{Datelike, Days, Months, NaiveDate};
use log::warn;
use regex::Regex;
use review_oracle::{Oracle, OracleError};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

const DEFAULT_LOOKBACK_DAYS: u64 = 30;

static EXPLICIT_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static LAST_N_MONTHS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"last (\d+) months?").unwrap());

/// Errors fatal to the resolve step
#[derive(Error, Debug)]
pub enum DateParseError {
    /// The input looked like an explicit calendar date but is not one
    #[error("Invalid date format: {0}")]
    InvalidFormat(String),
}

/// Which path produced the resolved range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    ExplicitDate,
    LlmParsed,
    FallbackRegex,
    FallbackDefault,
    Default,
}

/// How much to trust the resolved range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// A resolved date interval, `start_date <= end_date`
///
/// Created once per fetch invocation and embedded into the snapshot's
/// metadata; immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub source: DateSource,
    pub confidence: Confidence,
    pub explanation: Option<String>,
}

impl DateRange {
    /// The default last-30-days window ending today
    pub fn default_window(today: NaiveDate, source: DateSource, confidence: Confidence) -> Self {
        Self {
            start_date: today
                .checked_sub_days(Days::new(DEFAULT_LOOKBACK_DAYS))
                .unwrap_or(today),
            end_date: today,
            source,
            confidence,
            explanation: None,
        }
    }
}

/// Resolve a date expression into a concrete interval.
///
/// `oracle` is `None` when no LLM provider is configured; the natural
/// language path then goes straight to the deterministic fallback rules.
/// Only a malformed explicit date is an error; every oracle failure is
/// absorbed by the fallback tiers.
pub async fn resolve_date_range(
    input: Option<&str>,
    today: NaiveDate,
    oracle: Option<&dyn Oracle>,
) -> Result<DateRange, DateParseError> {
    let Some(input) = input else {
        return Ok(DateRange::default_window(
            today,
            DateSource::Default,
            Confidence::High,
        ));
    };

    if EXPLICIT_DATE.is_match(input) {
        let start_date = input
            .parse::<NaiveDate>()
            .map_err(|_| DateParseError::InvalidFormat(input.to_string()))?;
        return Ok(DateRange {
            start_date,
            end_date: today,
            source: DateSource::ExplicitDate,
            confidence: Confidence::High,
            explanation: None,
        });
    }

    Ok(match ask_oracle(input, today, oracle).await {
        Ok(range) => range,
        Err(e) => {
            warn!("LLM date parsing failed for {input:?}: {e}");
            fallback_parse(input, today)
        }
    })
}

#[derive(Error, Debug)]
enum OracleParseError {
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error("malformed oracle response: {0}")]
    Malformed(String),
}

async fn ask_oracle(
    input: &str,
    today: NaiveDate,
    oracle: Option<&dyn Oracle>,
) -> Result<DateRange, OracleParseError> {
    let oracle = oracle.ok_or(OracleError::NotConfigured)?;
    let prompt = build_date_prompt(input, today);
    let answer = oracle.ask(&prompt).await?;
    parse_oracle_response(&answer.content).map_err(OracleParseError::Malformed)
}

fn build_date_prompt(input: &str, today: NaiveDate) -> String {
    format!(
        "You are a date parsing assistant. Parse the following natural language date \
         expression into a structured date range.\n\
         \n\
         Current date: {iso} ({pretty})\n\
         Input: \"{input}\"\n\
         \n\
         Convert this to a date range suitable for querying work items. Consider:\n\
         - The user wants to see work completed within this time period\n\
         - For phrases like \"last 3 months\", calculate from the current date backwards\n\
         - For quarters, use standard Q1 (Jan-Mar), Q2 (Apr-Jun), Q3 (Jul-Sep), Q4 (Oct-Dec)\n\
         - For \"this year\" or a bare year, use the full year\n\
         - For \"first half\" or \"second half\", split the year accordingly\n\
         \n\
         Respond with JSON in this exact format:\n\
         {{\n\
           \"start_date\": \"YYYY-MM-DD\",\n\
           \"end_date\": \"YYYY-MM-DD\",\n\
           \"confidence\": \"high|medium|low\",\n\
           \"explanation\": \"Brief explanation of how you interpreted the input\"\n\
         }}\n\
         \n\
         If the input is ambiguous or unclear, use \"low\" confidence and make a \
         reasonable assumption.\n\
         Always ensure start_date is before or equal to end_date.",
        iso = today.format("%Y-%m-%d"),
        pretty = today.format("%A, %B %d, %Y"),
    )
}

#[derive(Debug, Deserialize)]
struct OracleDateResponse {
    start_date: String,
    end_date: String,
    #[serde(default)]
    confidence: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
}

/// Strict validation of the oracle's JSON: both dates must parse and the
/// range must not be inverted. Confidence and explanation pass through.
fn parse_oracle_response(content: &str) -> Result<DateRange, String> {
    let parsed: OracleDateResponse =
        serde_json::from_str(content).map_err(|e| format!("not valid JSON: {e}"))?;

    let start_date: NaiveDate = parsed
        .start_date
        .parse()
        .map_err(|_| format!("invalid start_date {:?}", parsed.start_date))?;
    let end_date: NaiveDate = parsed
        .end_date
        .parse()
        .map_err(|_| format!("invalid end_date {:?}", parsed.end_date))?;

    if start_date > end_date {
        return Err(format!(
            "start_date {start_date} is after end_date {end_date}"
        ));
    }

    Ok(DateRange {
        start_date,
        end_date,
        source: DateSource::LlmParsed,
        confidence: parse_confidence(parsed.confidence.as_deref()),
        explanation: parsed.explanation,
    })
}

/// Unrecognized confidence labels map to low; the range itself already
/// validated.
fn parse_confidence(value: Option<&str>) -> Confidence {
    match value.map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("high") => Confidence::High,
        Some("medium") => Confidence::Medium,
        _ => Confidence::Low,
    }
}

/// Deterministic fallback rules on the lower-cased input. Pure function
/// of `(input, today)`.
fn fallback_parse(input: &str, today: NaiveDate) -> DateRange {
    let lowered = input.to_lowercase();

    if let Some(captures) = LAST_N_MONTHS.captures(&lowered) {
        let months: u32 = captures[1].parse().unwrap_or(1);
        let start_date = today
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN);
        return DateRange {
            start_date,
            end_date: today,
            source: DateSource::FallbackRegex,
            confidence: Confidence::Medium,
            explanation: None,
        };
    }

    if lowered.contains("this year") {
        return DateRange {
            start_date: NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
            end_date: today,
            source: DateSource::FallbackRegex,
            confidence: Confidence::High,
            explanation: None,
        };
    }

    DateRange {
        start_date: today
            .checked_sub_months(Months::new(1))
            .unwrap_or(NaiveDate::MIN),
        end_date: today,
        source: DateSource::FallbackDefault,
        confidence: Confidence::Low,
        explanation: None,
    }
}
