mod client;

pub use client::{ProxyClient, ProxyConfig};
