//! elmready - Elm 0.19 upgrade readiness library
//!
//! This library provides the core functionality for checking whether the
//! dependencies declared in an Elm 0.18 `elm-package.json` have made it to
//! Elm 0.19:
//! - Manifest parsing
//! - Package catalog sources (bundled index, package.elm-lang.org)
//! - Readiness classification against the catalog and known renames

pub mod classifier;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod output;
pub mod progress;
pub mod registry;
pub mod session;
