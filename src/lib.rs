//! Kaiwa is a terminal-first chat client that keeps multiple independent
//! conversations with a remote LLM API in a single full-screen interface.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns runtime state: the session store, the active-session
//!   pointer, configuration, and the credential.
//! - [`api`] defines chat payloads and the provider client, including the
//!   opaque conversation handle each session holds.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop that drives user input and display updates.
//! - [`utils`] carries the small shared pieces: URL construction, transcript
//!   logging, and sanitization of untrusted text.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which resolves settings and dispatches into
//! [`ui::chat_loop`] for the interactive session.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
