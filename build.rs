use vergen_gitcl::{Build, Cargo, Emitter, Gitcl};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let build = Build::builder().build_timestamp(true).build();
    let cargo = Cargo::builder().build();
    let gitcl = Gitcl::builder().branch(true).sha(true).dirty(true).build();

    Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&cargo)?
        .add_instructions(&gitcl)?
        .emit()?;

    // Serde derives on the generated types give them a JSON encoding
    // alongside the prost binary encoding; the gateway relies on both.
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .type_attribute(".greeter.v1", "#[derive(serde::Serialize, serde::Deserialize)]")
        .type_attribute(".greeter.v1", "#[serde(default)]")
        .compile_protos(&["proto/greeter.proto"], &["proto"])?;

    Ok(())
}
