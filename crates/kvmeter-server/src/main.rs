use clap::Parser;
use kvmeter_server::{Cli, build_app};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::from_default_env().add_directive("kvmeter=info".parse()?);
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let app = build_app(&cli)?;
    info!(
        collectors = app.registry.len(),
        zone = %cli.metric_namespace,
        "metrics registry ready"
    );

    let addr = cli.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("kvmeter listening on {addr}");
    axum::serve(listener, app.router).await?;

    Ok(())
}
