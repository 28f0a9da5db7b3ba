//! Background tasks. Each one is spawned via `tokio::spawn` at startup and
//! stops when its [`CancellationToken`](tokio_util::sync::CancellationToken)
//! is cancelled.

pub mod session_sweep;
