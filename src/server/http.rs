//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo, one task per accepted connection.

use bytes::Bytes;
use hyper::body::Body;
use hyper::header::HeaderMap;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::auth::JwtValidator;
use crate::config::Args;
use crate::db::DocumentStore;
use crate::render::RenderConfig;
use crate::routes::{self, documents, memorials, wills, BoxBody};
use crate::types::{Result, VaultError};

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Owner-scoped storage for wills and memorials
    pub store: Arc<dyn DocumentStore>,
    pub jwt: JwtValidator,
    /// Page geometry for generated documents
    pub render_config: RenderConfig,
}

impl AppState {
    /// Build state from validated arguments and a connected store.
    ///
    /// Dev mode without a secret falls back to the built-in development key.
    pub fn new(args: Args, store: Arc<dyn DocumentStore>) -> Result<Self> {
        let jwt = match (&args.jwt_secret, args.dev_mode) {
            (Some(secret), _) => JwtValidator::new(secret.clone(), args.jwt_expiry_seconds)?,
            (None, true) => {
                warn!("Development mode: using built-in JWT secret");
                JwtValidator::new_dev()
            }
            (None, false) => {
                return Err(VaultError::Config(
                    "JWT_SECRET is required in production mode".into(),
                ))
            }
        };

        let render_config = args.render_config();
        render_config.validate()?;

        Ok(Self {
            args,
            store,
            jwt,
            render_config,
        })
    }
}

/// Bind the configured address and serve until the process exits
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;
    serve(listener, state).await
}

/// Accept connections on an already bound listener
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    info!(
        "Legacy Vault listening on {} (storage: {})",
        listener.local_addr()?,
        state.store.backend()
    );

    if state.args.dev_mode {
        warn!("Development mode enabled - not for production use");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        // Includes clients that hang up while a document is in flight
                        debug!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests
///
/// Generic over the request body so tests can drive the router in-process.
pub async fn handle_request<B>(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<B>,
) -> std::result::Result<Response<BoxBody>, hyper::Error>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let response = match (&method, segments.as_slice()) {
        // CORS preflight
        (&Method::OPTIONS, _) => routes::cors_preflight(),

        (&Method::GET, ["health"]) => routes::health_check(&state),
        (&Method::GET, ["ready"]) => routes::readiness_check(&state).await,

        (_, ["wills", ..]) | (_, ["memorials", ..]) => {
            let (parts, body) = req.into_parts();
            match handle_api(&state, &method, &segments, &parts.headers, body).await {
                Ok(response) => response,
                Err(e) => routes::error_response(&e),
            }
        }

        _ => routes::error_response(&VaultError::NotFound("Route not found".into())),
    };

    debug!(
        "[{}] {} {} -> {}",
        addr,
        method,
        path,
        response.status().as_u16()
    );

    Ok(response)
}

/// Authenticated `/wills` and `/memorials` routes
async fn handle_api<B>(
    state: &AppState,
    method: &Method,
    segments: &[&str],
    headers: &HeaderMap,
    body: B,
) -> Result<Response<BoxBody>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let claims = routes::authenticate(headers, &state.jwt)?;
    let owner = claims.user_id.as_str();

    match (method, segments) {
        (&Method::GET, ["wills"]) => wills::list(state, owner).await,
        (&Method::POST, ["wills"]) => wills::create(state, owner, body).await,
        (&Method::GET, ["wills", id]) => wills::get(state, owner, id).await,
        (&Method::PUT, ["wills", id]) => wills::update(state, owner, id, body).await,
        (&Method::DELETE, ["wills", id]) => wills::delete(state, owner, id).await,
        (&Method::GET, ["wills", id, "pdf"]) => documents::will_pdf(state, owner, id).await,

        (&Method::GET, ["memorials"]) => memorials::list(state, owner).await,
        (&Method::POST, ["memorials"]) => memorials::create(state, owner, body).await,
        (&Method::GET, ["memorials", id]) => memorials::get(state, owner, id).await,
        (&Method::PUT, ["memorials", id]) => memorials::update(state, owner, id, body).await,
        (&Method::DELETE, ["memorials", id]) => memorials::delete(state, owner, id).await,
        (&Method::GET, ["memorials", id, "pdf"]) => {
            documents::memorial_pdf(state, owner, id).await
        }

        (_, [_]) | (_, [_, _]) | (_, [_, _, "pdf"]) => Err(VaultError::MethodNotAllowed(
            "Method not allowed".into(),
        )),

        _ => Err(VaultError::NotFound("Route not found".into())),
    }
}
