fn main() {
    let protos = ["proto/keymapp.proto"];

    for proto in protos {
        println!("cargo:rerun-if-changed={proto}");
    }

    let protoc = protoc_bin_vendored::protoc_bin_path().expect("failed to get protoc binary path");

    let mut config = prost_build::Config::new();
    config.include_file("proto_mod.rs");
    config.protoc_executable(protoc);

    tonic_build::configure()
        .build_client(true)
        .build_server(false)
        .compile_protos_with_config(config, &protos, &["proto"])
        .expect("failed to compile protobuf definitions");
}
