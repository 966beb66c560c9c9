/// Middleware modules for the API server
///
/// Bearer token verification lives in `app` as a `from_fn` layer; this
/// module holds the tower layers:
///
/// - `security`: Security headers on every response

pub mod security;
