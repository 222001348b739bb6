//! Local CSV Source
//!
//! Reads sheet exports saved to disk. Useful offline and in tests.

use super::parser::{parse_revenue, parse_transactions};
use super::{RowSource, SheetResult};
use crate::ledger::{RevenueRow, TransactionRow};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Row source backed by two CSV files
#[derive(Debug, Clone)]
pub struct FileSource {
    transactions_path: PathBuf,
    /// Without a revenue file the revenue sheet reads as empty
    revenue_path: Option<PathBuf>,
}

impl FileSource {
    /// Create a source for a transaction export and an optional revenue export
    pub fn new(transactions_path: impl Into<PathBuf>, revenue_path: Option<PathBuf>) -> Self {
        Self {
            transactions_path: transactions_path.into(),
            revenue_path,
        }
    }

    pub fn transactions_path(&self) -> &Path {
        &self.transactions_path
    }
}

#[async_trait]
impl RowSource for FileSource {
    fn name(&self) -> &str {
        "csv-file"
    }

    async fn fetch_transactions(&self) -> SheetResult<Vec<TransactionRow>> {
        let text = tokio::fs::read_to_string(&self.transactions_path).await?;
        parse_transactions(&text)
    }

    async fn fetch_revenue(&self) -> SheetResult<Vec<RevenueRow>> {
        match &self.revenue_path {
            Some(path) => {
                let text = tokio::fs::read_to_string(path).await?;
                parse_revenue(&text)
            }
            None => Ok(Vec::new()),
        }
    }
}
