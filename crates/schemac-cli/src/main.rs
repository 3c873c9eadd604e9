use schemac_cli::SchemacCli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schemac=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    SchemacCli::new().parse_and_run()
}
