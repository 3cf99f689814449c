//! LAN play
//!
//! Only host discovery and the connection handoff live here; no match state
//! is exchanged over the socket.

pub mod discovery;

pub use discovery::{
    Connection, DiscoveryError, HostHandle, broadcast_address, connect, find_hosts, local_ipv4,
    probe,
};
