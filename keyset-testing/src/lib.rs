//! gRPC keyset testing server.
//!
//! Exposes keyset generation and public keyset derivation of a
//! [KeyManagementLibrary](keyset_testing_kms::KeyManagementLibrary) to the cross-language
//! test driver through the `tink_testing_api.Keyset` service in [api].

pub mod api;
pub mod app_server;
pub mod cli;
pub mod config;
pub mod convert;
