use anyhow::{Context, Result};
use google_sheets4::api::{
    GridProperties, Sheet, SheetProperties, Spreadsheet, SpreadsheetProperties, ValueRange,
};
use google_sheets4::Sheets;
use serde_json::Value;
use tracing::{debug, info};

use crate::api::ValueRender;
use crate::auth::{Connector, SHEETS_SCOPE};
use crate::cfg::{SheetLayout, HEADER_ROWS};

const SPREADSHEET_URL: &str = "https://docs.google.com/spreadsheets/d/";

pub fn spreadsheet_url(spreadsheet_id: &str) -> String {
    format!("{}{}", SPREADSHEET_URL, spreadsheet_id)
}

/// Body for a new spreadsheet: one grid sheet with the configured dimensions.
pub fn spreadsheet_body(title: &str, layout: &SheetLayout) -> Spreadsheet {
    Spreadsheet {
        properties: Some(SpreadsheetProperties {
            title: Some(title.to_string()),
            locale: Some(layout.locale.clone()),
            ..Default::default()
        }),
        sheets: Some(vec![Sheet {
            properties: Some(SheetProperties {
                sheet_type: Some("GRID".to_string()),
                sheet_id: Some(0),
                title: Some(layout.sheet_title.clone()),
                grid_properties: Some(GridProperties {
                    row_count: Some(layout.row_count),
                    column_count: Some(layout.column_count),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]),
        ..Default::default()
    }
}

/// The block written above the expense table of a fresh spreadsheet.
///
/// Expenses start right below it and are summed down to `last_row`.
pub fn header_rows(amount: &str, last_row: usize) -> Vec<Vec<Value>> {
    let rows: Vec<Vec<String>> = vec![
        vec!["Бюджет путешествия".to_string()],
        vec!["Весь бюджет".to_string(), amount.to_string()],
        vec![
            "Все расходы".to_string(),
            format!("=SUM(E{}:E{})", HEADER_ROWS + 1, last_row),
        ],
        vec!["Остаток".to_string(), "=B2-B3".to_string()],
        vec!["Расходы".to_string()],
        vec![
            "Описание".to_string(),
            "Тип".to_string(),
            "Кол-во".to_string(),
            "Цена".to_string(),
            "Стоимость".to_string(),
        ],
    ];

    rows.into_iter()
        .map(|row| row.into_iter().map(Value::String).collect())
        .collect()
}

/// Row-major value range, the shape every write uses.
pub fn rows_body(values: Vec<Vec<Value>>) -> ValueRange {
    ValueRange {
        major_dimension: Some("ROWS".to_string()),
        values: Some(values),
        ..Default::default()
    }
}

pub async fn create_spreadsheet(hub: &Sheets<Connector>, body: Spreadsheet) -> Result<String> {
    let (_, spreadsheet) = hub
        .spreadsheets()
        .create(body)
        .add_scope(SHEETS_SCOPE)
        .doit()
        .await
        .context("Failed to create spreadsheet")?;

    let spreadsheet_id = spreadsheet
        .spreadsheet_id
        .context("Create response carries no spreadsheet ID")?;
    info!("Created spreadsheet {}", spreadsheet_id);
    Ok(spreadsheet_id)
}

pub async fn read_values(
    hub: &Sheets<Connector>,
    spreadsheet_id: &str,
    range: &str,
    render: ValueRender,
) -> Result<Vec<Vec<Value>>> {
    debug!("Reading {} from {} as {}", range, spreadsheet_id, render.as_str());

    let (_, value_range) = hub
        .spreadsheets()
        .values_get(spreadsheet_id, range)
        .value_render_option(render.as_str())
        .add_scope(SHEETS_SCOPE)
        .doit()
        .await
        .with_context(|| format!("Failed to read {} from {}", range, spreadsheet_id))?;

    let values = value_range.values.unwrap_or_default();
    debug!("Read {} rows", values.len());
    Ok(values)
}

pub async fn update_values(
    hub: &Sheets<Connector>,
    spreadsheet_id: &str,
    range: &str,
    body: ValueRange,
) -> Result<()> {
    hub.spreadsheets()
        .values_update(body, spreadsheet_id, range)
        .value_input_option("USER_ENTERED")
        .add_scope(SHEETS_SCOPE)
        .doit()
        .await
        .with_context(|| format!("Failed to write {} in {}", range, spreadsheet_id))?;

    info!("Updated {} in {}", range, spreadsheet_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_has_single_grid_sheet() {
        let body = spreadsheet_body("Trip", &SheetLayout::default());

        let properties = body.properties.unwrap();
        assert_eq!(properties.title.as_deref(), Some("Trip"));
        assert_eq!(properties.locale.as_deref(), Some("ru_RU"));

        let sheets = body.sheets.unwrap();
        assert_eq!(sheets.len(), 1);
        let sheet = sheets[0].properties.as_ref().unwrap();
        assert_eq!(sheet.sheet_type.as_deref(), Some("GRID"));
        assert_eq!(sheet.sheet_id, Some(0));
        assert_eq!(sheet.title.as_deref(), Some("Отпуск"));
        let grid = sheet.grid_properties.as_ref().unwrap();
        assert_eq!((grid.row_count, grid.column_count), (Some(100), Some(100)));
    }

    #[test]
    fn header_carries_amount_and_formulas() {
        let rows = header_rows("5000", 30);
        assert_eq!(rows.len(), HEADER_ROWS);
        assert_eq!(rows[1], vec![Value::from("Весь бюджет"), Value::from("5000")]);
        assert_eq!(rows[2][1], Value::from("=SUM(E7:E30)"));
        assert_eq!(rows[3][1], Value::from("=B2-B3"));
        assert_eq!(rows[5].len(), 5);
    }

    #[test]
    fn url_points_at_spreadsheet() {
        assert_eq!(
            spreadsheet_url("abc"),
            "https://docs.google.com/spreadsheets/d/abc"
        );
    }
}
