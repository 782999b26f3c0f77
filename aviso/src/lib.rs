// aviso/src/lib.rs
//! # Aviso CLI Application
//!
//! This crate provides the executable around `aviso-core`: CLI parsing,
//! logger setup, desktop notification delivery, and the headless-browser
//! implementation of the authenticated portal session.

pub mod browser;
pub mod cli;
pub mod logger;
pub mod notify;
