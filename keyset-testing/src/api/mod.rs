//! The `tink_testing_api.Keyset` gRPC service.
//!
//! [msgs] holds the protobuf messages, [server::KeysetService] the implementation. The
//! service trait, the tonic server wrapper and the client are generated by the build script.

pub mod msgs;
pub mod server;

#[allow(clippy::all)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/tink_testing_api.Keyset.rs"));
}

pub use generated::{keyset_client, keyset_server};
