//! # KILN Host
//!
//! The pieces a real-time application needs around its transient storage:
//! configuration, an explicit application context, and asset loading.
//!
//! Window, graphics and input layers stay outside; they receive an
//! [`AppContext`] and call [`AppContext::load_asset`] whenever they need file
//! contents.
//!
//! ## Example
//!
//! ```rust,ignore
//! use kiln::{AppContext, KilnConfig};
//!
//! let config = KilnConfig::load("kiln.toml")?;
//! let _ = kiln_core::log::install(config.logger());
//! let mut ctx = AppContext::new(config);
//!
//! let shader = ctx.load_asset("shaders/quad.vert");
//! while ctx.is_running() {
//!     // update, render
//!     ctx.stop();
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod context;

pub use config::{ConfigError, ConfigResult, KilnConfig};
pub use context::{AppContext, Asset};
