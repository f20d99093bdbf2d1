pub mod app;
pub mod components;
pub mod pages;

use std::path::PathBuf;

use anyhow::Result;
use iocraft::prelude::*;
use tracing::info;

use crate::core::api::ApiClient;
use crate::core::config::ViewConfig;
use crate::core::session::EchoSession;

/// Shared application context passed via ContextProvider.
#[derive(Clone)]
pub struct AppContext {
    pub session: EchoSession,
    pub base_url: String,
    pub default_text: String,
    pub log_path: PathBuf,
}

pub async fn run(config: ViewConfig, log_path: PathBuf) -> Result<()> {
    info!(base_url = %config.base_url, "starting tui");

    let ctx = AppContext {
        base_url: config.base_url.clone(),
        default_text: config.default_text.clone(),
        log_path,
        session: EchoSession::new(ApiClient::new(config)),
    };

    element! {
        ContextProvider(value: Context::owned(ctx)) {
            app::App
        }
    }
    .render_loop()
    .await?;

    Ok(())
}
