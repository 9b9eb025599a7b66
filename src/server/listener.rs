// Listener module
// Binds the TCP socket the accept loop runs on

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Backlog of not-yet-accepted connections
const BACKLOG: i32 = 128;

/// Bind `addr` with `SO_REUSEADDR` and hand the socket to tokio.
///
/// Restarting the server right after a stop can then rebind a port whose
/// old connections are still in `TIME_WAIT`.
pub fn create_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    // tokio requires a non-blocking socket
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    TcpListener::from_std(std::net::TcpListener::from(socket))
}
