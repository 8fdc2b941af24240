//! # SaleSys Desktop Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SaleSys Desktop                                  │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Tauri WebView (ui/)                                             │  │
//! │  │  New Sale • Products • Customers • Users • Sales Dashboard       │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                         invoke('command')                              │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  salesys_desktop::run()  ──► shell.rs ──► commands/ ──► state/   │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Backend gateway (HTTP, [client].endpoint)                       │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Built with `--features tauri`. For a headless run against the in-memory
//! backend see `demos/walkthrough.rs`.

// Prevents an additional console window on Windows in release
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

fn main() -> Result<(), Box<dyn std::error::Error>> {
    salesys_desktop::run()
}
