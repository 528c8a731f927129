//! CLI interface for rawgram
//!
//! Argument parsing and interface lookup for the interactive chat client.
//! The client itself is an external collaborator of the packet core: it
//! reads lines from stdin, sends each one to the configured peer, and
//! blocks for the matching response.

pub mod args;
pub mod interface;

pub use args::{Cli, Commands, Mode};
pub use interface::interface_mac;
