//! MCP client integration
//!
//! Generates the configuration MCP clients use to launch the memory server.

pub mod client_config;

pub use client_config::{
    find_launcher, find_launcher_default, LaunchOptions, McpClientConfig, McpServerEntry,
    Transport,
};
