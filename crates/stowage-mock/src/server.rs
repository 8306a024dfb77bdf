//! Lifecycle of the in-process endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::service::MockS3Service;
use crate::state::MockS3State;

/// Handle to a running simulated endpoint.
///
/// Binds an ephemeral localhost port and serves on a background task until
/// [`shutdown`](Self::shutdown) is called or the handle is dropped.
#[derive(Debug)]
pub struct MockS3Server {
    addr: SocketAddr,
    state: Arc<MockS3State>,
    stop: Arc<Notify>,
    task: JoinHandle<()>,
}

impl MockS3Server {
    /// Bind `127.0.0.1:0` and start serving.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the listener cannot be bound.
    pub async fn spawn() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let state = Arc::new(MockS3State::new());
        let service = MockS3Service::new(Arc::clone(&state));
        let stop = Arc::new(Notify::new());

        let task = tokio::spawn(accept_loop(listener, service, Arc::clone(&stop)));

        info!(%addr, "simulated endpoint listening");
        Ok(Self {
            addr,
            state,
            stop,
            task,
        })
    }

    /// Endpoint URL to hand to a client, e.g. `http://127.0.0.1:49152`.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// The address the endpoint is bound to.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Direct access to the stored state, for assertions in tests.
    #[must_use]
    pub fn state(&self) -> &Arc<MockS3State> {
        &self.state
    }

    /// Stop accepting connections and wait for the accept loop to exit.
    pub async fn shutdown(mut self) {
        self.stop.notify_one();
        if let Err(e) = (&mut self.task).await {
            if !e.is_cancelled() {
                warn!(error = %e, "endpoint task ended abnormally");
            }
        }
    }
}

impl Drop for MockS3Server {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Accept connections until stopped, serving each on its own task.
async fn accept_loop(listener: TcpListener, service: MockS3Service, stop: Arc<Notify>) {
    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                tokio::spawn(async move {
                    let mut http = HttpConnBuilder::new(TokioExecutor::new());
                    // Keep serving after the client closes its write half, so
                    // health probes that shut down their sender still get a
                    // response.
                    http.http1().half_close(true);
                    if let Err(e) = http.serve_connection(TokioIo::new(stream), svc).await {
                        debug!(%peer_addr, error = %e, "connection ended with error");
                    }
                });
            }

            () = stop.notified() => {
                debug!("endpoint stopping");
                break;
            }
        }
    }
}
