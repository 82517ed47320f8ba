use anyhow::Result;
use axum::{Router, routing::get};
use std::net::SocketAddr;
use tracing::{error, info};

pub const ALIVE_MESSAGE: &str = "I'm alive! Discord Bot is running.";

async fn alive() -> &'static str {
    ALIVE_MESSAGE
}

pub fn router() -> Router {
    Router::new().route("/", get(alive))
}

/// Serve the uptime-monitor endpoint on `0.0.0.0:port` until the process exits.
pub async fn serve(port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Liveness endpoint listening on http://{}", addr);
    axum::serve(listener, router()).await?;
    Ok(())
}

/// Run `serve` on its own task; it shares nothing with the bot.
pub fn spawn(port: u16) {
    tokio::spawn(async move {
        if let Err(e) = serve(port).await {
            error!("Liveness endpoint stopped: {}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn answers_root() {
        assert_eq!(alive().await, ALIVE_MESSAGE);
    }

    #[tokio::test]
    async fn serves_over_tcp() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router()).await.unwrap();
        });

        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with(ALIVE_MESSAGE));
    }
}
