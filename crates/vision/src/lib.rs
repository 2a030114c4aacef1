//! VisionRow remote-analysis infrastructure adapter.
//!
//! Implements the [`pipeline::ImageAnalyzer`] trait against the Azure
//! Computer Vision v3.2 REST API. Additional providers are added as new
//! implementations in this crate without any changes to the `pipeline` crate.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** All HTTP transport, request formatting, and response
//! parsing live here. The [`pipeline`] crate sees only
//! [`pipeline::ImageAnalyzer`].

mod client;
mod responses;

pub use client::AzureVisionClient;
