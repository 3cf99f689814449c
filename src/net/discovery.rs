//! UDP host discovery and TCP connection handoff
//!
//! A host answers `NEON_PONG_DISCOVER` datagrams with `NEON_PONG_HERE` and
//! accepts one peer on the game port. A joiner broadcasts to its /24 and
//! collects the distinct responders for a fixed window.
//!
//! Every socket is blocking with a short timeout (or non-blocking and polled)
//! so the worker threads notice a stop request within one poll interval.

use std::io::{self, ErrorKind};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener, TcpStream, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::settings::DiscoverySettings;

pub const DISCOVERY_PORT: u16 = 8888;
pub const GAME_PORT: u16 = 8889;
/// How long a joiner listens for responses
pub const DISCOVERY_WINDOW: Duration = Duration::from_secs(3);

pub const DISCOVER_MESSAGE: &[u8] = b"NEON_PONG_DISCOVER";
pub const HERE_MESSAGE: &[u8] = b"NEON_PONG_HERE";

/// Socket timeout used by worker threads between stop-flag checks
const POLL_INTERVAL: Duration = Duration::from_millis(100);
const MAX_DATAGRAM: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("failed to bind {what} socket on {addr}: {source}")]
    Bind {
        what: &'static str,
        addr: SocketAddr,
        source: io::Error,
    },

    #[error("failed to connect to {addr}: {source}")]
    Connect { addr: SocketAddr, source: io::Error },

    #[error("socket error: {0}")]
    Io(#[from] io::Error),
}

/// A peer that connected to the game port
#[derive(Debug)]
pub struct Connection {
    pub stream: TcpStream,
    pub peer: SocketAddr,
}

/// A running host: discovery responder plus game-port listener
#[derive(Debug)]
pub struct HostHandle {
    running: Arc<AtomicBool>,
    discovery_addr: SocketAddr,
    game_addr: SocketAddr,
    connections: Receiver<Connection>,
    threads: Vec<JoinHandle<()>>,
}

impl HostHandle {
    /// Bind both sockets and start answering discovery probes.
    ///
    /// Binding failures are reported here; once running, socket errors are
    /// logged and the worker keeps going.
    pub fn start(settings: &DiscoverySettings) -> Result<Self, DiscoveryError> {
        let udp_addr = SocketAddr::new(settings.bind_address, settings.discovery_port);
        let udp = UdpSocket::bind(udp_addr).map_err(|source| DiscoveryError::Bind {
            what: "discovery",
            addr: udp_addr,
            source,
        })?;
        udp.set_read_timeout(Some(POLL_INTERVAL))?;

        let tcp_addr = SocketAddr::new(settings.bind_address, settings.game_port);
        let listener = TcpListener::bind(tcp_addr).map_err(|source| DiscoveryError::Bind {
            what: "game",
            addr: tcp_addr,
            source,
        })?;
        listener.set_nonblocking(true)?;

        let discovery_addr = udp.local_addr()?;
        let game_addr = listener.local_addr()?;
        let running = Arc::new(AtomicBool::new(true));
        let (tx, rx) = mpsc::channel();

        let threads = vec![
            {
                let running = Arc::clone(&running);
                thread::spawn(move || answer_probes(udp, running))
            },
            {
                let running = Arc::clone(&running);
                thread::spawn(move || accept_peer(listener, running, tx))
            },
        ];

        log::info!("Hosting: discovery on {}, game on {}", discovery_addr, game_addr);
        Ok(Self {
            running,
            discovery_addr,
            game_addr,
            connections: rx,
            threads,
        })
    }

    pub fn discovery_addr(&self) -> SocketAddr {
        self.discovery_addr
    }

    pub fn game_addr(&self) -> SocketAddr {
        self.game_addr
    }

    /// The connected peer, if one has arrived
    pub fn try_connection(&self) -> Option<Connection> {
        self.connections.try_recv().ok()
    }

    pub fn wait_for_connection(&self, timeout: Duration) -> Option<Connection> {
        self.connections.recv_timeout(timeout).ok()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Stop both workers and release the sockets. Returns within about one
    /// poll interval.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        for thread in self.threads.drain(..) {
            if thread.join().is_err() {
                log::warn!("Discovery worker panicked");
            }
        }
    }
}

impl Drop for HostHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}

fn answer_probes(socket: UdpSocket, running: Arc<AtomicBool>) {
    let mut buf = [0u8; MAX_DATAGRAM];
    while running.load(Ordering::Relaxed) {
        match socket.recv_from(&mut buf) {
            Ok((len, from)) if &buf[..len] == DISCOVER_MESSAGE => {
                log::debug!("Discovery probe from {}", from);
                if let Err(e) = socket.send_to(HERE_MESSAGE, from) {
                    log::warn!("Failed to answer {}: {}", from, e);
                }
            }
            Ok((len, from)) => log::debug!("Ignoring {} byte datagram from {}", len, from),
            Err(e) if is_timeout(&e) => {}
            Err(e) => {
                log::warn!("Discovery receive failed: {}", e);
                thread::sleep(POLL_INTERVAL);
            }
        }
    }
    log::debug!("Discovery responder stopped");
}

fn accept_peer(listener: TcpListener, running: Arc<AtomicBool>, tx: Sender<Connection>) {
    while running.load(Ordering::Relaxed) {
        match listener.accept() {
            Ok((stream, peer)) => {
                if let Err(e) = stream.set_nonblocking(false) {
                    log::warn!("Failed to configure stream from {}: {}", peer, e);
                    continue;
                }
                log::info!("Peer connected from {}", peer);
                // The receiver may already be gone if the host is shutting down
                let _ = tx.send(Connection { stream, peer });
                break;
            }
            Err(e) if is_timeout(&e) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                log::warn!("Accept failed: {}", e);
                thread::sleep(POLL_INTERVAL);
            }
        }
    }
    log::debug!("Game listener stopped");
}

/// Send one discovery probe to `target` and collect distinct responders for
/// `window`. `exclude` (normally our own address) is never reported.
pub fn probe(
    target: SocketAddr,
    exclude: Option<IpAddr>,
    window: Duration,
) -> Result<Vec<IpAddr>, DiscoveryError> {
    let any = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0);
    let socket = UdpSocket::bind(any).map_err(|source| DiscoveryError::Bind {
        what: "probe",
        addr: any,
        source,
    })?;
    socket.set_broadcast(true)?;
    socket.send_to(DISCOVER_MESSAGE, target)?;

    let deadline = Instant::now() + window;
    let mut hosts = Vec::new();
    let mut buf = [0u8; MAX_DATAGRAM];
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        socket.set_read_timeout(Some(remaining.min(POLL_INTERVAL)))?;
        match socket.recv_from(&mut buf) {
            Ok((len, from)) if &buf[..len] == HERE_MESSAGE => {
                let ip = from.ip();
                if Some(ip) != exclude && !hosts.contains(&ip) {
                    log::debug!("Found host {}", ip);
                    hosts.push(ip);
                }
            }
            Ok(_) => {}
            Err(e) if is_timeout(&e) => {}
            Err(e) => log::debug!("Probe receive failed: {}", e),
        }
    }
    Ok(hosts)
}

/// The /24 broadcast address of `ip`
pub fn broadcast_address(ip: Ipv4Addr) -> Ipv4Addr {
    let [a, b, c, _] = ip.octets();
    Ipv4Addr::new(a, b, c, 255)
}

/// Look for hosts on the local /24. Failures are logged and yield no hosts.
pub fn find_hosts(local_ip: Ipv4Addr, settings: &DiscoverySettings) -> Vec<IpAddr> {
    let target = SocketAddr::new(
        IpAddr::V4(broadcast_address(local_ip)),
        settings.discovery_port,
    );
    match probe(target, Some(IpAddr::V4(local_ip)), settings.timeout()) {
        Ok(hosts) => {
            log::info!("Discovery found {} host(s)", hosts.len());
            hosts
        }
        Err(e) => {
            log::warn!("Discovery failed: {}", e);
            Vec::new()
        }
    }
}

/// Open the game connection to a discovered host
pub fn connect(host: IpAddr, settings: &DiscoverySettings) -> Result<TcpStream, DiscoveryError> {
    let addr = SocketAddr::new(host, settings.game_port);
    let stream = TcpStream::connect_timeout(&addr, settings.timeout())
        .map_err(|source| DiscoveryError::Connect { addr, source })?;
    log::info!("Connected to host {}", addr);
    Ok(stream)
}

/// Best guess at this machine's LAN address.
///
/// Connecting a UDP socket sends nothing; it only makes the OS pick the
/// outgoing interface.
pub fn local_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(8, 8, 8, 8), 80)).ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(ip) if !ip.is_unspecified() => Some(ip),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback_settings() -> DiscoverySettings {
        DiscoverySettings {
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            discovery_port: 0,
            game_port: 0,
            timeout_ms: 500,
        }
    }

    #[test]
    fn test_broadcast_address() {
        assert_eq!(
            broadcast_address(Ipv4Addr::new(192, 168, 1, 42)),
            Ipv4Addr::new(192, 168, 1, 255)
        );
    }

    #[test]
    fn test_default_ports() {
        let settings = DiscoverySettings::default();
        assert_eq!(settings.discovery_port, 8888);
        assert_eq!(settings.game_port, 8889);
        assert_eq!(settings.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_probe_finds_loopback_host() {
        let host = HostHandle::start(&loopback_settings()).unwrap();
        let hosts = probe(host.discovery_addr(), None, Duration::from_millis(500)).unwrap();
        assert_eq!(hosts, vec![IpAddr::V4(Ipv4Addr::LOCALHOST)]);
    }

    #[test]
    fn test_probe_excludes_self() {
        let host = HostHandle::start(&loopback_settings()).unwrap();
        let exclude = Some(IpAddr::V4(Ipv4Addr::LOCALHOST));
        let hosts = probe(host.discovery_addr(), exclude, Duration::from_millis(300)).unwrap();
        assert!(hosts.is_empty());
    }

    #[test]
    fn test_probe_without_host_is_empty() {
        // Nobody listens on the port the released socket had
        let free = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0))
            .unwrap()
            .local_addr()
            .unwrap();
        let hosts = probe(free, None, Duration::from_millis(200)).unwrap();
        assert!(hosts.is_empty());
    }

    #[test]
    fn test_join_connects_to_host() {
        let host = HostHandle::start(&loopback_settings()).unwrap();
        let settings = DiscoverySettings {
            game_port: host.game_addr().port(),
            ..loopback_settings()
        };
        let _stream = connect(IpAddr::V4(Ipv4Addr::LOCALHOST), &settings).unwrap();
        let conn = host.wait_for_connection(Duration::from_secs(2)).unwrap();
        assert_eq!(conn.peer.ip(), IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn test_stop_is_prompt() {
        let mut host = HostHandle::start(&loopback_settings()).unwrap();
        let start = Instant::now();
        host.stop();
        assert!(!host.is_running());
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_bind_conflict_is_reported() {
        let first = HostHandle::start(&loopback_settings()).unwrap();
        let settings = DiscoverySettings {
            discovery_port: first.discovery_addr().port(),
            ..loopback_settings()
        };
        let err = HostHandle::start(&settings).unwrap_err();
        assert!(matches!(err, DiscoveryError::Bind { what: "discovery", .. }));
    }
}
