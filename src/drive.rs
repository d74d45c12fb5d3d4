use anyhow::{Context, Result};
use google_drive3::api::{File, FileList, Permission};
use google_drive3::DriveHub;
use std::future::Future;
use tracing::{debug, info};

use crate::api::SpreadsheetFile;
use crate::auth::{Connector, DRIVE_SCOPE};

const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

pub fn spreadsheet_query() -> String {
    format!("mimeType='{}'", SPREADSHEET_MIME_TYPE)
}

/// Writer access for a personal Google account.
pub fn writer_permission(email: &str) -> Permission {
    Permission {
        type_: Some("user".to_string()),
        role: Some("writer".to_string()),
        email_address: Some(email.to_string()),
        ..Default::default()
    }
}

/// Files without an ID cannot be addressed later, so they are dropped.
pub fn to_spreadsheet_files(files: Vec<File>) -> Vec<SpreadsheetFile> {
    files
        .into_iter()
        .filter_map(|file| {
            Some(SpreadsheetFile {
                id: file.id?,
                name: file.name.unwrap_or_default(),
            })
        })
        .collect()
}

/// Walks the listing page by page until Drive stops handing out a next-page token.
pub async fn collect_pages<F, Fut>(mut fetch_page: F) -> Result<Vec<SpreadsheetFile>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<FileList>>,
{
    let mut spreadsheets = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let list = fetch_page(page_token.take()).await?;
        let page = to_spreadsheet_files(list.files.unwrap_or_default());
        debug!("Listed {} spreadsheets", page.len());
        spreadsheets.extend(page);

        match list.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(spreadsheets)
}

pub async fn list_spreadsheets(hub: &DriveHub<Connector>) -> Result<Vec<SpreadsheetFile>> {
    let query = spreadsheet_query();
    let query = query.as_str();

    collect_pages(|page_token| async move {
        let mut call = hub.files().list().q(query).add_scope(DRIVE_SCOPE);
        if let Some(token) = page_token.as_deref() {
            call = call.page_token(token);
        }

        let (_, list) = call.doit().await.context("Failed to list spreadsheets")?;
        Ok(list)
    })
    .await
}

pub async fn delete_file(hub: &DriveHub<Connector>, file_id: &str) -> Result<()> {
    hub.files()
        .delete(file_id)
        .add_scope(DRIVE_SCOPE)
        .doit()
        .await
        .with_context(|| format!("Failed to delete {}", file_id))?;

    info!("Deleted {}", file_id);
    Ok(())
}

pub async fn create_permission(
    hub: &DriveHub<Connector>,
    file_id: &str,
    permission: Permission,
) -> Result<()> {
    let role = permission.role.clone().unwrap_or_default();
    let email = permission.email_address.clone().unwrap_or_default();

    hub.permissions()
        .create(permission, file_id)
        .param("fields", "id")
        .add_scope(DRIVE_SCOPE)
        .doit()
        .await
        .with_context(|| format!("Failed to grant {} access to {} on {}", role, email, file_id))?;

    info!("Granted {} access to {} on {}", role, email, file_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_filters_spreadsheets() {
        assert_eq!(
            spreadsheet_query(),
            "mimeType='application/vnd.google-apps.spreadsheet'"
        );
    }

    #[test]
    fn permission_grants_user_write_access() {
        let permission = writer_permission("traveller@example.com");
        assert_eq!(permission.type_.as_deref(), Some("user"));
        assert_eq!(permission.role.as_deref(), Some("writer"));
        assert_eq!(
            permission.email_address.as_deref(),
            Some("traveller@example.com")
        );
    }

    #[test]
    fn files_without_id_are_skipped() {
        let files = vec![
            File {
                id: Some("a".to_string()),
                name: Some("Trip".to_string()),
                ..Default::default()
            },
            File {
                name: Some("ghost".to_string()),
                ..Default::default()
            },
            File {
                id: Some("b".to_string()),
                ..Default::default()
            },
        ];

        assert_eq!(
            to_spreadsheet_files(files),
            vec![
                SpreadsheetFile {
                    id: "a".to_string(),
                    name: "Trip".to_string()
                },
                SpreadsheetFile {
                    id: "b".to_string(),
                    name: String::new()
                },
            ]
        );
    }

    fn file(id: Option<&str>, name: &str) -> File {
        File {
            id: id.map(str::to_string),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn pages_are_followed_until_no_token_is_left() {
        let mut pages = std::collections::VecDeque::from(vec![
            FileList {
                files: Some(vec![file(Some("a"), "Rome"), file(None, "ghost")]),
                next_page_token: Some("page-2".to_string()),
                ..Default::default()
            },
            FileList {
                files: Some(vec![file(Some("b"), "Oslo"), file(Some("c"), "Lima")]),
                next_page_token: None,
                ..Default::default()
            },
        ]);
        let mut requested = Vec::new();

        let files = collect_pages(|token| {
            requested.push(token);
            let page = pages.pop_front().unwrap();
            async move { Ok(page) }
        })
        .await
        .unwrap();

        let ids: Vec<&str> = files.iter().map(|file| file.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(files[1].name, "Oslo");
        assert_eq!(requested, vec![None, Some("page-2".to_string())]);
    }

    #[tokio::test]
    async fn page_errors_stop_the_listing() {
        let result =
            collect_pages(|_| async { Err::<FileList, _>(anyhow::anyhow!("quota")) }).await;
        assert!(result.is_err());
    }
}
