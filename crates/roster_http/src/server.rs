//! HTTP server.
//!
//! # Responsibility
//! - Serve the student API with warp on a tokio runtime owned by [`Server`].
//! - Collect request bodies (sized or chunked) up to the configured limit and
//!   hand them to [`handle_request`] on the blocking pool.
//!
//! # Invariants
//! - The listener is bound in [`Server::bind`], so `local_addr` is known
//!   before [`Server::run`] starts serving.
//! - A failing request never takes the server down; every outcome is a JSON
//!   reply.

use crate::api::{error_response, handle_request, ApiRequest, ApiResponse, AppState, Method};
use crate::config::ServerConfig;
use bytes::Buf;
use futures::{Stream, StreamExt};
use log::{error, info, warn};
use roster_core::db::DbError;
use std::convert::Infallible;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use warp::http::StatusCode;
use warp::path::FullPath;
use warp::{Filter, Rejection, Reply};

const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(25);

#[derive(Debug)]
pub enum ServerError {
    Io(io::Error),
    Db(DbError),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "server io error: {err}"),
            Self::Db(err) => write!(f, "cannot open record store: {err}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<io::Error> for ServerError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for ServerError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Stops a running [`Server::run`] from another thread.
///
/// In-flight requests finish before `run` returns.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    notify: Arc<Notify>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        // Stores a permit when the server is not yet waiting.
        self.notify.notify_one();
    }
}

pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
    listener: TcpListener,
    shutdown: Arc<Notify>,
}

impl Server {
    /// Opens the store at `config.db_path` and binds `config.listen_addr`.
    pub fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let state = AppState::open(&config.db_path)?;
        Self::bind_with_state(config, state)
    }

    pub fn bind_with_state(config: ServerConfig, state: AppState) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(&config.listen_addr)?;
        listener.set_nonblocking(true)?;
        info!(
            "event=server_bind module=server status=ok addr={} db_path={}",
            listener.local_addr()?,
            config.db_path.display()
        );
        Ok(Self {
            config,
            state: Arc::new(state),
            listener,
            shutdown: Arc::new(Notify::new()),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            notify: Arc::clone(&self.shutdown),
        }
    }

    /// Serves until [`ShutdownHandle::shutdown`] is called.
    pub fn run(self) -> Result<(), ServerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .thread_name("roster-http")
            .enable_all()
            .build()?;

        let Self {
            config,
            state,
            listener,
            shutdown,
        } = self;

        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener)?;
            info!("event=server_run module=server status=start");

            let incoming = futures::stream::unfold(listener, |listener| async move {
                loop {
                    match listener.accept().await {
                        Ok((stream, _peer)) => return Some((Ok::<_, io::Error>(stream), listener)),
                        Err(err) => {
                            warn!("event=connection_accept module=server status=error error={err}");
                            tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                        }
                    }
                }
            });

            warp::serve(routes(state, config.max_body_bytes))
                .serve_incoming_with_graceful_shutdown(incoming, async move {
                    shutdown.notified().await;
                })
                .await;

            info!("event=server_run module=server status=ok reason=shutdown");
            Ok::<(), ServerError>(())
        })
    }
}

/// Single catch-all filter; routing happens in [`handle_request`].
pub fn routes(
    state: Arc<AppState>,
    max_body_bytes: usize,
) -> impl Filter<Extract = (warp::reply::Response,), Error = Rejection> + Clone {
    warp::method()
        .and(warp::path::full())
        .and(warp::body::stream())
        .and_then(move |method: warp::http::Method, path: FullPath, body| {
            let state = Arc::clone(&state);
            async move {
                let response = serve_request(state, method, path, body, max_body_bytes).await;
                Ok::<_, Infallible>(response)
            }
        })
}

async fn serve_request<S, B>(
    state: Arc<AppState>,
    method: warp::http::Method,
    path: FullPath,
    body: S,
    max_body_bytes: usize,
) -> warp::reply::Response
where
    S: Stream<Item = Result<B, warp::Error>>,
    B: Buf,
{
    let started = Instant::now();
    let method = map_method(&method);
    let path = path.as_str().to_string();

    let response = match collect_body(body, max_body_bytes).await {
        Ok(body) => {
            let request = ApiRequest::new(method, path.clone(), body);
            tokio::task::spawn_blocking(move || handle_request(&state, &request))
                .await
                .unwrap_or_else(|err| {
                    error!("event=http_request module=server status=error error={err}");
                    error_response(500, "request handler failed")
                })
        }
        Err(BodyError::TooLarge) => error_response(
            413,
            &format!("request body exceeds limit of {max_body_bytes} bytes"),
        ),
        Err(BodyError::Read(err)) => {
            error_response(400, &format!("cannot read request body: {err}"))
        }
    };

    info!(
        "event=http_request module=server status={} method={} path={path} code={} duration_ms={}",
        if response.is_success() { "ok" } else { "error" },
        method.as_str(),
        response.status,
        started.elapsed().as_millis()
    );
    into_reply(&response)
}

enum BodyError {
    TooLarge,
    Read(warp::Error),
}

/// Gathers the body whatever its framing. An oversized body is still drained
/// so the client sees the 413 instead of a reset.
async fn collect_body<S, B>(body: S, limit: usize) -> Result<Vec<u8>, BodyError>
where
    S: Stream<Item = Result<B, warp::Error>>,
    B: Buf,
{
    let mut body = std::pin::pin!(body);
    let mut collected = Vec::new();
    let mut too_large = false;

    while let Some(chunk) = body.next().await {
        let mut chunk = chunk.map_err(BodyError::Read)?;
        if too_large {
            continue;
        }
        if collected.len() + chunk.remaining() > limit {
            too_large = true;
            collected.clear();
            continue;
        }
        let bytes = chunk.copy_to_bytes(chunk.remaining());
        collected.extend_from_slice(&bytes);
    }

    if too_large {
        Err(BodyError::TooLarge)
    } else {
        Ok(collected)
    }
}

fn map_method(method: &warp::http::Method) -> Method {
    match method.as_str() {
        "GET" => Method::Get,
        "POST" => Method::Post,
        "PUT" => Method::Put,
        "DELETE" => Method::Delete,
        _ => Method::Other,
    }
}

fn into_reply(response: &ApiResponse) -> warp::reply::Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    warp::reply::with_status(warp::reply::json(&response.body), status).into_response()
}
