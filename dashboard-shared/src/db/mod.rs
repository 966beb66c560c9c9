/// Database layer
///
/// # Modules
///
/// - `pool`: MySQL connection pools with a bounded liveness check
///
/// Queries live in the `repository` module at crate root level.

pub mod pool;
