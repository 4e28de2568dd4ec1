//! HTTP service exposing `POST /tree/{language}`.
//!
//! Design: blocking HTTP microserver (no async runtime). One thread accepts
//! connections and hands each to a bounded rayon pool; every connection
//! carries exactly one request.

pub mod http;
pub mod routes;

use std::io::BufReader;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::config::{self, ServerConfig};

pub use http::{HttpRequest, HttpResponse, RequestError};
pub use routes::{handle, route};

/// State shared by every request handler.
pub struct ServerState {
    config: ServerConfig,
    start_time: Instant,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            start_time: Instant::now(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// A bound listener plus the pool that serves its connections.
pub struct Server {
    listener: TcpListener,
    pool: rayon::ThreadPool,
    state: Arc<ServerState>,
}

impl Server {
    /// Validate the config, bind the listener and start the worker pool.
    pub fn bind(config: ServerConfig) -> Result<Self> {
        config::validate(&config)?;

        let addr = config.bind_address();
        let listener =
            TcpListener::bind(&addr).with_context(|| format!("failed to bind {}", addr))?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|i| format!("codetree-worker-{}", i))
            .panic_handler(|_| error!("worker thread panicked outside a request"))
            .build()
            .context("failed to start worker pool")?;

        Ok(Self {
            listener,
            pool,
            state: Arc::new(ServerState::new(config)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the listener fails.
    pub fn run(self) -> Result<()> {
        info!(
            addr = %self.local_addr()?,
            workers = self.pool.current_num_threads(),
            "codetree listening"
        );

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let state = Arc::clone(&self.state);
                    self.pool.spawn(move || handle_connection(stream, &state));
                }
                Err(e) => warn!(error = %e, "accept failed"),
            }
        }
        Ok(())
    }
}

/// Read one request, answer it and close the write half.
fn handle_connection(stream: TcpStream, state: &ServerState) {
    let started = Instant::now();
    let timeout = Duration::from_secs(state.config().read_timeout_secs);
    if let Err(e) = stream.set_read_timeout(Some(timeout)) {
        warn!(error = %e, "failed to set read timeout");
    }

    let mut reader = BufReader::new(&stream);
    let read = http::read_request(&mut reader, state.config().max_body_size);
    let (method, path, response) = match read {
        Ok(Some(request)) => {
            let response = handle(&request, state);
            (request.method, request.path, response)
        }
        Ok(None) => return, // clean close, no response needed
        Err(e) => {
            debug!(error = %e, "unreadable request");
            let response = routes::with_cors(
                HttpResponse::error(e.status(), &e.to_string()),
                None,
                &state.config().cors,
            );
            ("-".to_string(), "-".to_string(), response)
        }
    };

    let mut writer = &stream;
    if let Err(e) = http::write_response(&mut writer, &response) {
        debug!(error = %e, "failed to write response");
    }
    let _ = stream.shutdown(Shutdown::Write);

    info!(
        method = %method,
        path = %path,
        status = response.status,
        latency_ms = started.elapsed().as_millis() as u64,
        "request"
    );
}
