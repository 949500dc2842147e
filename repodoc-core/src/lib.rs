#![doc = "repodoc-core: core logic library for repodoc."]

//! Fetches a bounded slice of a GitHub repository (metadata, a couple of
//! well-known root files and a handful of ranked source files) and asks an
//! LLM completion endpoint to write a README from it.
//!
//! # Usage
//! The CLI crate wires the concrete clients from [`github`] and [`completion`]
//! and a [`identity::FileIdentityStore`] into a [`workflow::RepoDoc`].
//! Tests swap any of them for the `mockall` mocks in [`contract`].

pub mod action;
pub mod completion;
pub mod config;
pub mod contract;
pub mod error;
pub mod generator;
pub mod github;
pub mod identity;
pub mod notify;
pub mod selector;
pub mod structure;
pub mod workflow;

pub use error::{RepoDocError, Result};
