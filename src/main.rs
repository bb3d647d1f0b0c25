use anyhow::Result;
use tracing::info;

use cert_expiry_notifier::config::SystemEnvironment;
use cert_expiry_notifier::probe::TlsProber;
use cert_expiry_notifier::runner::run;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    // Optional invocation input as inline JSON: `cert-expiry-notifier
    // '{"fqdn_list": ["example.com"]}'`. Without it the run is driven by
    // FQDN_LIST and DAYS from the environment.
    let raw_input = std::env::args().nth(1);

    let prober = TlsProber::new()?;
    let completion = run(raw_input.as_deref(), &SystemEnvironment, &prober).await?;
    info!(status = completion.status_code, body = %completion.body, "run complete");
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();
}
