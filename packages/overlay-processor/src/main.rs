mod config;
mod handler;
mod transform;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use overlay_core::{
    load_template, validate_config, CoordinateTable, TemplateAnimation, MAX_UPLOAD_BYTES,
};

/// リクエスト間で共有する読み取り専用の状態
#[derive(Clone)]
pub struct AppState {
    pub template: Arc<TemplateAnimation>,
    pub table: Arc<CoordinateTable>,
    pub overlay_width: u32,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handler::overlay))
        .route("/health", get(handler::health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    validate_config(config.overlay_width, config.x_offset, config.y_offset)?;

    // テンプレートと座標表はハンドラ登録前に読み込み、以降は変更しない
    let template = load_template(&config.template_path).with_context(|| {
        format!("failed to load template {}", config.template_path.display())
    })?;
    let table = config
        .coordinate_table()
        .context("failed to build coordinate table")?;
    table.ensure_matches(template.frame_count())?;

    let state = AppState {
        template: Arc::new(template),
        table: Arc::new(table),
        overlay_width: config.overlay_width,
    };

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!(
        addr = %config.addr,
        overlay_width = config.overlay_width,
        x_offset = config.x_offset,
        y_offset = config.y_offset,
        "listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
