//! Generates the gRPC service and client for `tink_testing_api.Keyset`.
//!
//! The messages are defined by hand in `src/api/msgs.rs`, so no protobuf compiler is needed.

use tonic_build::manual::{Builder, Method, Service};

fn method(name: &str, route_name: &str, input: &str, output: &str) -> Method {
    Method::builder()
        .name(name)
        .route_name(route_name)
        .input_type(format!("crate::api::msgs::{input}"))
        .output_type(format!("crate::api::msgs::{output}"))
        .codec_path("tonic::codec::ProstCodec")
        .build()
}

fn main() {
    let keyset = Service::builder()
        .name("Keyset")
        .package("tink_testing_api")
        .method(method(
            "generate",
            "Generate",
            "KeysetGenerateRequest",
            "KeysetGenerateResponse",
        ))
        .method(method(
            "public",
            "Public",
            "KeysetPublicRequest",
            "KeysetPublicResponse",
        ))
        .build();

    Builder::new().compile(&[keyset]);

    println!("cargo:rerun-if-changed=build.rs");
}
