use schemac_cli::Config;
use schemac_codegen::{Emitter, EmitterKind};
use std::path::Path;

#[test]
fn load_from_toml() {
    let config: Config = r#"
        schema_file = "schema/app.schema"
        build_dir = "target/schemac"
        out_dir = "gen"

        [targets]
        persistence = "server/app/autogen/models"
        transfer = "server/app/autogen/schemas"

        [python]
        models_package = "server.models"
    "#
    .parse()
    .unwrap();

    assert_eq!(
        config.schema_file.as_deref(),
        Some(Path::new("schema/app.schema"))
    );
    assert_eq!(config.build_dir, Path::new("target/schemac"));
    assert_eq!(
        config.output_dir(EmitterKind::Persistence),
        Path::new("server/app/autogen/models")
    );
    assert_eq!(
        config.output_dir(EmitterKind::Endpoint),
        Path::new("gen/endpoint")
    );
    assert_eq!(
        config.python.models_package.as_deref(),
        Some("server.models")
    );
}

#[test]
fn missing_keys_use_defaults() {
    let config: Config = "schema_file = \"app.schema\"".parse().unwrap();

    assert_eq!(config.build_dir, Path::new("build"));
    assert_eq!(
        config.output_dir(EmitterKind::ClientModel),
        Path::new("generated/client-model")
    );
}

#[test]
fn unknown_target_is_rejected() {
    let err = "[targets]\nmobile = \"ios\"".parse::<Config>().unwrap_err();
    assert!(err.to_string().contains("unknown emitter `mobile`"));
}

#[test]
fn unknown_key_is_rejected() {
    assert!("schema = \"app.schema\"".parse::<Config>().is_err());
}

#[test]
fn load_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Schemac.toml");
    std::fs::write(&path, "build_dir = 7").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(err.to_string().contains("Schemac.toml"));
}

#[test]
fn configured_packages_reach_emitters() {
    let config: Config = "[python]\nmodels_package = \"server.models\"".parse().unwrap();
    let schema = schemac_core::Schema::parse("Table Notes {\n  id UUID [pk]\n}").unwrap();

    let output = config.emitter(EmitterKind::Transfer).emit(&schema).unwrap();
    let notes = &output.file("NotesSchema.py").unwrap().contents;

    assert!(notes.contains("        from server.models.NotesModel import Notes\n"));
}
