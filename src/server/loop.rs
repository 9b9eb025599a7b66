// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::handle_connection;
use crate::config::Config;
use crate::logger;

/// Accept connections on `listener`, one task each, until `shutdown` completes.
///
/// Accept errors are logged and the loop keeps going. Connections already
/// in flight keep running on their own tasks after the loop returns.
pub async fn run<F>(listener: TcpListener, config: Arc<Config>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        logger::log_trace(&format!("Accepted connection from {peer_addr}"));
                        handle_connection(stream, peer_addr, Arc::clone(&config));
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut shutdown => {
                logger::log_info("Received interrupt signal, exiting");
                return;
            }
        }
    }
}
