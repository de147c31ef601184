mod page;

pub use page::render_page;

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use log::info;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;

use crate::app::AppContext;

const MAX_CONCURRENT_REQUESTS: usize = 64;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// One page, nothing else.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(index))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
        .with_state(ctx)
}

async fn index(State(ctx): State<Arc<AppContext>>) -> Html<String> {
    let (frame, failure) = ctx.latest.snapshot().await;
    Html(render_page(&ctx.config, frame.as_deref(), failure.as_ref()))
}

/// Bind the listening socket. Called before anything else starts so that an
/// occupied port stops the process straight away.
pub async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })
}

pub async fn serve<F>(ctx: Arc<AppContext>, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("dashboard listening on http://{addr}");
    }
    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
