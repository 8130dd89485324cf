//! Build script for swmgmt-routed.
//!
//! Generates the `routemgmt.RouteMgmt` gRPC server and client stubs. The
//! request/response messages are declared by hand in `src/route/proto.rs`
//! with prost derives, so the service is described with tonic-build's
//! manual builder and no protoc install is needed.

fn main() {
    let route_mgmt = tonic_build::manual::Service::builder()
        .name("RouteMgmt")
        .package("routemgmt")
        .method(
            tonic_build::manual::Method::builder()
                .name("add_route4")
                .route_name("AddRoute4")
                .input_type("crate::route::proto::AddRoute4Request")
                .output_type("crate::route::proto::RouteMgmtResult")
                .codec_path("tonic::codec::ProstCodec")
                .build(),
        )
        .method(
            tonic_build::manual::Method::builder()
                .name("withdraw_route4")
                .route_name("WithdrawRoute4")
                .input_type("crate::route::proto::WithdrawRoute4Request")
                .output_type("crate::route::proto::RouteMgmtResult")
                .codec_path("tonic::codec::ProstCodec")
                .build(),
        )
        .build();

    tonic_build::manual::Builder::new().compile(&[route_mgmt]);

    println!("cargo:rerun-if-changed=build.rs");
}
