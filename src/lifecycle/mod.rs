//! Process lifecycle: graceful shutdown of the server.

mod shutdown;

pub use shutdown::shutdown_signal;
