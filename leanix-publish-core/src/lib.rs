#![doc = "leanix-publish-core: core logic library for leanix-publish."]

//! This crate contains the data model, error taxonomy and HTTP clients used to
//! publish a service manifest (and optionally its SBOM) to LeanIX technology
//! discovery. The CLI crate only wires configuration and logging around it.
//!
//! # Usage
//! Build a [`config::PublishConfig`], construct an [`auth::OAuthTokenFetcher`]
//! and a [`discovery::DiscoveryClient`], then call [`publish::publish`].

pub mod auth;
pub mod config;
pub mod contract;
pub mod discovery;
pub mod error;
pub mod files;
pub mod http;
pub mod publish;

pub use error::PublishError;
