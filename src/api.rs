use anyhow::Result;
use async_trait::async_trait;
use google_drive3::api::Permission;
use google_drive3::DriveHub;
use google_sheets4::api::{Spreadsheet, ValueRange};
use google_sheets4::Sheets;
use serde::Serialize;
use serde_json::Value;

use crate::auth::Connector;
use crate::{drive, sheets};

/// A spreadsheet file as Drive lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpreadsheetFile {
    pub id: String,
    pub name: String,
}

/// How cell values come back from a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRender {
    /// What the sheet displays.
    Formatted,
    /// Formulas as typed, so they survive being written back.
    Formula,
}

impl ValueRender {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueRender::Formatted => "FORMATTED_VALUE",
            ValueRender::Formula => "FORMULA",
        }
    }
}

/// The remote calls the commands are built from.
#[async_trait]
pub trait BudgetApi: Send + Sync {
    /// Creates a spreadsheet and returns its ID.
    async fn create_spreadsheet(&self, body: Spreadsheet) -> Result<String>;

    async fn list_spreadsheets(&self) -> Result<Vec<SpreadsheetFile>>;

    async fn delete_file(&self, file_id: &str) -> Result<()>;

    async fn create_permission(&self, file_id: &str, permission: Permission) -> Result<()>;

    /// Rows of `range`; an empty range yields no rows.
    async fn read_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        render: ValueRender,
    ) -> Result<Vec<Vec<Value>>>;

    async fn update_values(&self, spreadsheet_id: &str, range: &str, body: ValueRange)
        -> Result<()>;
}

/// `BudgetApi` backed by the real Sheets and Drive endpoints.
pub struct GoogleApi {
    sheets: Sheets<Connector>,
    drive: DriveHub<Connector>,
}

impl GoogleApi {
    pub fn new(sheets: Sheets<Connector>, drive: DriveHub<Connector>) -> Self {
        Self { sheets, drive }
    }
}

#[async_trait]
impl BudgetApi for GoogleApi {
    async fn create_spreadsheet(&self, body: Spreadsheet) -> Result<String> {
        sheets::create_spreadsheet(&self.sheets, body).await
    }

    async fn list_spreadsheets(&self) -> Result<Vec<SpreadsheetFile>> {
        drive::list_spreadsheets(&self.drive).await
    }

    async fn delete_file(&self, file_id: &str) -> Result<()> {
        drive::delete_file(&self.drive, file_id).await
    }

    async fn create_permission(&self, file_id: &str, permission: Permission) -> Result<()> {
        drive::create_permission(&self.drive, file_id, permission).await
    }

    async fn read_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        render: ValueRender,
    ) -> Result<Vec<Vec<Value>>> {
        sheets::read_values(&self.sheets, spreadsheet_id, range, render).await
    }

    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        body: ValueRange,
    ) -> Result<()> {
        sheets::update_values(&self.sheets, spreadsheet_id, range, body).await
    }
}
