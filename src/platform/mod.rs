//! Platform abstraction layer
//!
//! Event-delivery threads (touch, mouse, window focus) talk to the simulation
//! only through the [`InputMailbox`].

pub mod input;

pub use input::InputMailbox;
