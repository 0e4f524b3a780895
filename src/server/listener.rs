//! Jukebox server listener
//!
//! Binds the HTTP listener, owns the playlist prune task and serves the
//! gateway routes until shut down.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tokio::net::TcpListener;

use crate::error::Result;
use crate::hub::Hub;
use crate::library::Library;
use crate::playlist::SelectionLog;
use crate::server::config::ServerConfig;
use crate::server::routes::{self, AppState};

/// Jukebox server
pub struct JukeboxServer {
    config: ServerConfig,
    library: Arc<Library>,
    playlist: Arc<SelectionLog>,
    hub: Arc<Hub>,
    started_at: Instant,
}

impl JukeboxServer {
    /// Create a new server over an already loaded library
    pub fn new(config: ServerConfig, library: Library) -> Self {
        let library = Arc::new(library);
        let playlist = Arc::new(SelectionLog::with_config(
            Arc::clone(&library),
            config.playlist.clone(),
        ));
        let hub = Arc::new(Hub::with_config(config.hub.clone()));

        Self {
            config,
            library,
            playlist,
            hub,
            started_at: Instant::now(),
        }
    }

    /// Create a new server, loading the library from `config.library_path`
    pub fn from_config(config: ServerConfig) -> Result<Self> {
        let library = Library::load(&config.library_path)?;
        Ok(Self::new(config, library))
    }

    /// Get a reference to the selection log
    pub fn playlist(&self) -> &Arc<SelectionLog> {
        &self.playlist
    }

    /// Get a reference to the broadcast hub
    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }

    /// Get a reference to the library
    pub fn library(&self) -> &Arc<Library> {
        &self.library
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Build the gateway router
    pub fn router(&self) -> Router {
        let state = AppState {
            library: Arc::clone(&self.library),
            playlist: Arc::clone(&self.playlist),
            hub: Arc::clone(&self.hub),
            delivery: self.config.delivery,
            started_at: self.started_at,
        };

        routes::router(state, &self.config.sounds_dir)
    }

    /// Run the server
    ///
    /// This method blocks until the server fails.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            addr = %addr,
            resources = self.library.len(),
            delivery = %self.config.delivery,
            "Jukebox server listening"
        );

        // Spawn prune task for the playlist
        let prune_handle = self.playlist.spawn_prune_task();

        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await;

        // Stop prune task on shutdown
        prune_handle.abort();
        tracing::info!("Jukebox server stopped");

        result.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;
    use tokio::task::JoinHandle;
    use tokio_tungstenite::tungstenite::Message as WsMessage;
    use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

    use super::*;
    use crate::error::Error;

    type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

    fn library() -> Library {
        Library::from_iter([("56k", "/sounds/56k.mp3"), ("deeper", "/sounds/deeper.mp3")])
    }

    async fn start(
        server: &Arc<JukeboxServer>,
    ) -> (SocketAddr, oneshot::Sender<()>, JoinHandle<Result<()>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let server = Arc::clone(server);
        let task = tokio::spawn(async move {
            server
                .serve(listener, async move {
                    let _ = stop_rx.await;
                })
                .await
        });

        (addr, stop_tx, task)
    }

    async fn http(addr: SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    async fn connect(addr: SocketAddr) -> Client {
        let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
            .await
            .unwrap();
        client
    }

    async fn next_text(client: &mut Client) -> String {
        let message = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        message.to_text().unwrap().to_owned()
    }

    async fn wait_for_subscribers(hub: &Hub, expected: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while hub.subscriber_count().await != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
    }

    #[test]
    fn test_from_config_loads_library() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"56k": "/sounds/56k.mp3"}}"#).unwrap();

        let server = JukeboxServer::from_config(ServerConfig::default().library_path(file.path()))
            .unwrap();

        assert!(server.library().contains("56k"));
        assert_eq!(server.bind_addr().port(), 8080);
    }

    #[test]
    fn test_from_config_missing_library() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::default().library_path(dir.path().join("nope.json"));

        let result = JukeboxServer::from_config(config);

        assert!(matches!(result, Err(Error::Library(_))));
    }

    #[tokio::test]
    async fn test_serve_and_shutdown() {
        let server = Arc::new(JukeboxServer::new(ServerConfig::default(), library()));
        let (addr, stop_tx, task) = start(&server).await;

        let response = http(
            addr,
            "POST /play/deeper HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains(r#""resource":"deeper""#));

        assert_eq!(server.playlist().len().await, 1);

        stop_tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_websocket_relay_and_disconnect() {
        let server = Arc::new(JukeboxServer::new(ServerConfig::default(), library()));
        let (addr, stop_tx, _task) = start(&server).await;

        let mut a = connect(addr).await;
        let mut b = connect(addr).await;
        wait_for_subscribers(server.hub(), 2).await;

        // Unknown names are ignored without closing the socket
        a.send(WsMessage::Text("airhorn".into())).await.unwrap();
        a.send(WsMessage::Text("deeper".into())).await.unwrap();

        assert_eq!(next_text(&mut b).await, "deeper");
        assert_eq!(next_text(&mut a).await, "deeper");
        assert_eq!(server.hub().stats().await.published, 1);
        assert!(server.playlist().is_empty().await);

        drop(a);
        wait_for_subscribers(server.hub(), 1).await;

        b.close(None).await.unwrap();
        wait_for_subscribers(server.hub(), 0).await;

        stop_tx.send(()).unwrap();
    }

    #[tokio::test]
    async fn test_evicted_subscriber_socket_is_closed() {
        let config = ServerConfig::default().mailbox_capacity(1);
        let server = Arc::new(JukeboxServer::new(config, library()));
        let (addr, stop_tx, _task) = start(&server).await;

        let mut client = connect(addr).await;
        wait_for_subscribers(server.hub(), 1).await;

        // The socket pump cannot run between these two publishes on the
        // single-threaded test runtime, so the second one finds the mailbox full
        let hub = server.hub();
        assert_eq!(hub.publish(server.library().select("56k").unwrap()).await, 1);
        assert_eq!(hub.publish(server.library().select("deeper").unwrap()).await, 0);
        assert_eq!(hub.stats().await.evicted, 1);
        assert_eq!(hub.subscriber_count().await, 0);

        assert_eq!(next_text(&mut client).await, "56k");
        let closed = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                match client.next().await {
                    Some(Ok(WsMessage::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        })
        .await;
        assert!(closed.is_ok());

        stop_tx.send(()).unwrap();
    }
}
