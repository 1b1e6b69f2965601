use clap::Parser;
use tracing::error;

use collect_logs::cli::{Backend, Cli};
use collect_logs::collector::collect;
use collect_logs::kubernetes::KubeApi;
use collect_logs::oc::OcCli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let options = cli.collect_options();
    let result = match cli.backend {
        Backend::Oc => {
            let api = OcCli::new(&cli.oc_bin, cli.context.clone());
            collect(&api, &cli.namespace, &cli.artifacts_dir, &options).await
        }
        Backend::Kube => {
            let api = KubeApi::connect(cli.context.as_deref()).await?;
            collect(&api, &cli.namespace, &cli.artifacts_dir, &options).await
        }
    };

    if let Err(e) = result {
        error!("Collection for namespace {} failed: {}", cli.namespace, e);
        std::process::exit(1);
    }
    Ok(())
}
