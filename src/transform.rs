use anyhow::Result;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::BudgetError;

const A1_RANGE_PATTERN: &str = r"^(?:.+!)?\$?[A-Za-z]+\$?(\d+):\$?[A-Za-z]+\$?(\d+)$";

/// Parsed `--create` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub title: String,
    /// Kept as typed so the sheet receives exactly what the user wrote.
    pub amount: String,
}

impl NewBudget {
    pub fn parse(input: &str) -> Result<Self, BudgetError> {
        let fields = split_fields(input)?;
        let [title, amount] = <[String; 2]>::try_from(fields).map_err(|fields| {
            BudgetError::invalid_input(
                input,
                format!("expected \"title,amount\", got {} fields", fields.len()),
            )
        })?;

        if title.is_empty() {
            return Err(BudgetError::invalid_input(input, "title is empty"));
        }
        if !amount.parse::<f64>().map_or(false, f64::is_finite) {
            return Err(BudgetError::invalid_input(
                input,
                format!("amount '{}' is not a finite number", amount),
            ));
        }

        Ok(NewBudget { title, amount })
    }
}

/// One expense line of the budget table.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetRow {
    pub description: String,
    pub kind: String,
    pub quantity: String,
    pub price: String,
    /// `None` means "quantity times price", filled in as a formula.
    pub cost: Option<String>,
}

impl BudgetRow {
    pub fn parse(input: &str) -> Result<Self, BudgetError> {
        let mut fields = split_fields(input)?.into_iter();
        let count = fields.len();
        if !(4..=5).contains(&count) {
            return Err(BudgetError::invalid_input(
                input,
                format!(
                    "expected \"description,type,quantity,price[,cost]\", got {} fields",
                    count
                ),
            ));
        }

        let mut next = || fields.next().unwrap_or_default();
        let row = BudgetRow {
            description: next(),
            kind: next(),
            quantity: next(),
            price: next(),
            cost: Some(next()).filter(|cost| !cost.is_empty()),
        };
        debug!("Parsed budget row: {:?}", row);
        Ok(row)
    }

    /// Cell values for this row when it lands on 1-based sheet row `row_number`.
    pub fn to_values(&self, row_number: usize) -> Vec<Value> {
        let cost = self
            .cost
            .clone()
            .unwrap_or_else(|| format!("=C{}*D{}", row_number, row_number));

        vec![
            Value::String(self.description.clone()),
            Value::String(self.kind.clone()),
            Value::String(self.quantity.clone()),
            Value::String(self.price.clone()),
            Value::String(cost),
        ]
    }
}

/// Splits one comma-separated line. Double quotes protect embedded commas.
fn split_fields(input: &str) -> Result<Vec<String>, BudgetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    let mut records = reader.records();
    let record = match records.next() {
        Some(record) => record.map_err(|e| BudgetError::invalid_input(input, e.to_string()))?,
        None => return Err(BudgetError::invalid_input(input, "input is empty")),
    };
    if records.next().is_some() {
        return Err(BudgetError::invalid_input(input, "expected a single line"));
    }

    Ok(record.iter().map(str::to_string).collect())
}

/// First and last 1-based row of an A1 range such as `A1:E30` or `Отпуск!A1:E30`.
pub fn range_rows(range: &str) -> Result<(usize, usize)> {
    let pattern = Regex::new(A1_RANGE_PATTERN)?;
    let caps = pattern
        .captures(range)
        .ok_or_else(|| BudgetError::InvalidRange(range.to_string()))?;

    let start: usize = caps[1].parse()?;
    let end: usize = caps[2].parse()?;
    if start == 0 || end < start {
        return Err(BudgetError::InvalidRange(range.to_string()).into());
    }

    Ok((start, end))
}

/// Number of rows the range spans.
pub fn range_capacity(range: &str) -> Result<usize> {
    let (start, end) = range_rows(range)?;
    Ok(end - start + 1)
}

/// Renders a cell for terminal output; strings are printed without quotes.
pub fn cell_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
