use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::dispatcher::Dispatcher;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let addr = cfg.listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    let dispatcher = Arc::new(Dispatcher::from_config(cfg));
    serve(listener, dispatcher).await
}

/// Accepts connections forever, one task per connection.
pub async fn serve(listener: TcpListener, dispatcher: Arc<Dispatcher>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let dispatcher = Arc::clone(&dispatcher);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, dispatcher);
            if let Err(e) = conn.run().await {
                tracing::error!(%peer, error = %e, "Connection error");
            }
        });
    }
}
