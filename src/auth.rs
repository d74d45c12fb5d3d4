use anyhow::{Context, Result};
use google_drive3::DriveHub;
use google_sheets4::{hyper, hyper_rustls, oauth2, Sheets};
use tracing::info;

use crate::cfg::ServiceAccountEnv;

pub type Connector = hyper_rustls::HttpsConnector<hyper::client::HttpConnector>;

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Turns the environment-sourced fields into the key type the authenticator expects.
pub fn service_account_key(env: &ServiceAccountEnv) -> Result<oauth2::ServiceAccountKey> {
    let json = serde_json::to_value(env)?;
    let key = serde_json::from_value(json).context("Failed to build service account key")?;
    Ok(key)
}

/// rustls-backed hyper client shared by both hubs and the authenticator.
pub fn http_client() -> Result<hyper::Client<Connector>> {
    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .context("Failed to load native TLS roots")?
        .https_or_http()
        .enable_http1()
        .build();
    Ok(hyper::Client::builder().build::<_, hyper::Body>(https))
}

pub async fn create_hubs(
    service_account: &ServiceAccountEnv,
) -> Result<(Sheets<Connector>, DriveHub<Connector>)> {
    info!(
        "Initializing Google authentication for {}",
        service_account.client_email
    );

    let client = http_client()?;

    let key = service_account_key(service_account)?;
    let auth = oauth2::ServiceAccountAuthenticator::with_client(key, client.clone())
        .build()
        .await
        .context("Failed to create service account authenticator")?;

    let sheets = Sheets::new(client.clone(), auth.clone());
    let drive = DriveHub::new(client, auth);
    Ok((sheets, drive))
}
