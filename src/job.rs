use anyhow::Result;
use serde_json::Value;
use std::fmt;
use tracing::{debug, info, warn};

use crate::{
    api::{BudgetApi, SpreadsheetFile, ValueRender},
    args::Args,
    cfg::Cfg,
    drive::writer_permission,
    error::BudgetError,
    sheets::{header_rows, rows_body, spreadsheet_body, spreadsheet_url},
    transform::{cell_to_string, range_capacity, BudgetRow, NewBudget},
};

/// The single thing one invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    List,
    ClearAll,
    Create(String),
    Update { id: Option<String>, row: String },
    Read { id: Option<String> },
    /// No command flag: report which spreadsheet would be used.
    Select { id: Option<String> },
}

impl Action {
    /// Picks one action; earlier flags win over later ones.
    pub fn from_args(args: &Args) -> Self {
        if args.list {
            return Action::List;
        }
        if args.clear_all {
            return Action::ClearAll;
        }
        if let Some(create) = &args.create {
            return Action::Create(create.clone());
        }

        let id = args.id.clone();
        if let Some(row) = &args.update {
            return Action::Update {
                id,
                row: row.clone(),
            };
        }
        if args.read {
            return Action::Read { id };
        }
        Action::Select { id }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Listed(Vec<SpreadsheetFile>),
    Cleared(usize),
    Created { id: String, url: String },
    Selected(Option<String>),
    Updated { id: String, rows: usize },
    Values(Vec<Vec<Value>>),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Listed(files) => {
                let json = serde_json::to_string_pretty(files).map_err(|_| fmt::Error)?;
                write!(f, "{}", json)
            }
            Outcome::Cleared(count) => write!(f, "Deleted {} spreadsheets", count),
            Outcome::Created { id, url } => {
                writeln!(f, "{}", url)?;
                write!(f, "Created spreadsheet with ID {}", id)
            }
            Outcome::Selected(Some(id)) => write!(f, "{}", id),
            Outcome::Selected(None) => write!(f, "none"),
            Outcome::Updated { id, rows } => {
                write!(f, "Spreadsheet {} updated, {} rows in use", id, rows)
            }
            Outcome::Values(rows) => {
                let lines: Vec<String> = rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(cell_to_string)
                            .collect::<Vec<_>>()
                            .join("\t")
                    })
                    .collect();
                write!(f, "{}", lines.join("\n"))
            }
        }
    }
}

pub async fn run_job(api: &dyn BudgetApi, cfg: &Cfg, action: Action) -> Result<Outcome> {
    info!("Running {:?}", action);

    let outcome = match action {
        Action::List => Outcome::Listed(api.list_spreadsheets().await?),
        Action::ClearAll => Outcome::Cleared(clear_all(api).await?),
        Action::Create(input) => create(api, cfg, &input).await?,
        Action::Select { id } => Outcome::Selected(select_spreadsheet(api, id).await?),
        Action::Update { id, row } => update(api, cfg, id, &row).await?,
        Action::Read { id } => {
            let id = select_spreadsheet(api, id)
                .await?
                .ok_or(BudgetError::NoSpreadsheet)?;
            let values = api
                .read_values(&id, &cfg.layout.tracked_range, ValueRender::Formatted)
                .await?;
            Outcome::Values(values)
        }
    };

    debug!("Outcome: {:?}", outcome);
    Ok(outcome)
}

/// Deletes every listed spreadsheet and returns how many went.
pub async fn clear_all(api: &dyn BudgetApi) -> Result<usize> {
    let spreadsheets = api.list_spreadsheets().await?;
    if spreadsheets.is_empty() {
        info!("No spreadsheets to delete");
        return Ok(0);
    }

    for spreadsheet in &spreadsheets {
        debug!("Deleting '{}' ({})", spreadsheet.name, spreadsheet.id);
        api.delete_file(&spreadsheet.id).await?;
    }

    info!("Deleted {} spreadsheets", spreadsheets.len());
    Ok(spreadsheets.len())
}

/// Creates the spreadsheet, shares it and writes the header block.
pub async fn create(api: &dyn BudgetApi, cfg: &Cfg, input: &str) -> Result<Outcome> {
    let budget = NewBudget::parse(input)?;
    let last_row = cfg.layout.last_row()?;

    let id = api
        .create_spreadsheet(spreadsheet_body(&budget.title, &cfg.layout))
        .await?;
    api.create_permission(&id, writer_permission(&cfg.email))
        .await?;
    api.update_values(
        &id,
        &cfg.layout.tracked_range,
        rows_body(header_rows(&budget.amount, last_row)),
    )
    .await?;

    let url = spreadsheet_url(&id);
    info!("Spreadsheet '{}' ready at {}", budget.title, url);
    Ok(Outcome::Created { id, url })
}

/// Explicit ID if given, otherwise the first listed spreadsheet.
pub async fn select_spreadsheet(api: &dyn BudgetApi, id: Option<String>) -> Result<Option<String>> {
    if id.is_some() {
        return Ok(id);
    }

    let first = api
        .list_spreadsheets()
        .await?
        .into_iter()
        .next()
        .map(|spreadsheet| spreadsheet.id);
    match &first {
        Some(id) => debug!("Selected first listed spreadsheet {}", id),
        None => warn!("No spreadsheets found"),
    }
    Ok(first)
}

/// Appends one expense row below whatever the tracked range already holds.
pub async fn update(
    api: &dyn BudgetApi,
    cfg: &Cfg,
    id: Option<String>,
    input: &str,
) -> Result<Outcome> {
    let row = BudgetRow::parse(input)?;
    let id = select_spreadsheet(api, id)
        .await?
        .ok_or(BudgetError::NoSpreadsheet)?;

    let range = &cfg.layout.tracked_range;
    // formulas must be read back as formulas or the write would flatten them
    let mut values = api.read_values(&id, range, ValueRender::Formula).await?;

    let capacity = range_capacity(range)?;
    if values.len() >= capacity {
        return Err(BudgetError::RangeFull {
            range: range.clone(),
            capacity,
        }
        .into());
    }

    values.push(row.to_values(values.len() + 1));
    let rows = values.len();
    api.update_values(&id, range, rows_body(values)).await?;

    Ok(Outcome::Updated { id, rows })
}
