//! Google Sheets HTTP client
//!
//! Two transports are supported:
//! - CSV export (`gviz/tq?tqx=out:csv`), parsed by header name
//! - Sheets v4 values API with an API key, mapped by column position

use super::parser::{parse_revenue, parse_transactions};
use super::{RowSource, SheetError, SheetKind, SheetResult};
use crate::config::{SheetsConfig, SourceMode};
use crate::ledger::{RevenueRow, TransactionRow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Spreadsheet client for one workbook
pub struct SheetsClient {
    client: Client,
    config: SheetsConfig,
}

/// Body of a values API `GET`
#[derive(Debug, Deserialize)]
struct ValueRange {
    /// Absent when the range is empty
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl SheetsClient {
    /// Create a client for the configured workbook
    pub fn new(config: SheetsConfig) -> SheetResult<Self> {
        if config.spreadsheet_id.trim().is_empty() {
            return Err(SheetError::Config(
                "spreadsheet_id is not set (SHEETBOARD_SPREADSHEET_ID)".to_string(),
            ));
        }
        if config.mode == SourceMode::ValuesApi && config.api_key.is_none() {
            return Err(SheetError::Config(
                "values_api mode requires an api_key (SHEETBOARD_API_KEY)".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &SheetsConfig {
        &self.config
    }

    fn sheet_name(&self, kind: SheetKind) -> &str {
        match kind {
            SheetKind::Transactions => &self.config.transactions_sheet,
            SheetKind::Revenue => &self.config.revenue_sheet,
        }
    }

    fn sheet_range(&self, kind: SheetKind) -> &str {
        match kind {
            SheetKind::Transactions => &self.config.transactions_range,
            SheetKind::Revenue => &self.config.revenue_range,
        }
    }

    /// CSV export URL for a sheet
    pub fn csv_export_url(&self, kind: SheetKind) -> String {
        format!(
            "{}/spreadsheets/d/{}/gviz/tq?tqx=out:csv&sheet={}",
            self.config.export_base_url.trim_end_matches('/'),
            self.config.spreadsheet_id,
            urlencoding::encode(self.sheet_name(kind))
        )
    }

    /// Values API URL for a sheet's configured range
    pub fn values_url(&self, kind: SheetKind) -> String {
        let range = format!("{}!{}", self.sheet_name(kind), self.sheet_range(kind));
        format!(
            "{}/v4/spreadsheets/{}/values/{}?key={}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.spreadsheet_id,
            urlencoding::encode(&range),
            urlencoding::encode(self.config.api_key.as_deref().unwrap_or_default())
        )
    }

    /// Issue a GET and return the successful response
    async fn get(&self, url: &str) -> SheetResult<reqwest::Response> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SheetError::Timeout
            } else if e.is_connect() {
                SheetError::Unavailable
            } else {
                SheetError::Request(e)
            }
        })?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(SheetError::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }

    /// Download the CSV export of a sheet
    pub async fn fetch_csv(&self, kind: SheetKind) -> SheetResult<String> {
        let url = self.csv_export_url(kind);
        tracing::debug!(sheet = %kind, "Fetching CSV export");
        let response = self.get(&url).await?;
        Ok(response.text().await?)
    }

    /// Download the configured range of a sheet as positional cells
    pub async fn fetch_values(&self, kind: SheetKind) -> SheetResult<Vec<Vec<String>>> {
        let url = self.values_url(kind);
        tracing::debug!(sheet = %kind, range = %self.sheet_range(kind), "Fetching values range");
        let response = self.get(&url).await?;
        let body: ValueRange = response.json().await?;
        Ok(body.values)
    }
}

#[async_trait]
impl RowSource for SheetsClient {
    fn name(&self) -> &str {
        match self.config.mode {
            SourceMode::CsvExport => "google-sheets-csv",
            SourceMode::ValuesApi => "google-sheets-values",
        }
    }

    async fn fetch_transactions(&self) -> SheetResult<Vec<TransactionRow>> {
        match self.config.mode {
            SourceMode::CsvExport => {
                let text = self.fetch_csv(SheetKind::Transactions).await?;
                parse_transactions(&text)
            }
            SourceMode::ValuesApi => {
                let values = self.fetch_values(SheetKind::Transactions).await?;
                Ok(values.iter().map(|row| TransactionRow::from_values(row)).collect())
            }
        }
    }

    async fn fetch_revenue(&self) -> SheetResult<Vec<RevenueRow>> {
        match self.config.mode {
            SourceMode::CsvExport => {
                let text = self.fetch_csv(SheetKind::Revenue).await?;
                parse_revenue(&text)
            }
            SourceMode::ValuesApi => {
                let values = self.fetch_values(SheetKind::Revenue).await?;
                Ok(values.iter().map(|row| RevenueRow::from_values(row)).collect())
            }
        }
    }
}
