use anyhow::Result;
use chrono::Utc;
use tracing::{error, info, warn};

use crate::config::{resolve_config, resolve_webhook_url, EnvironmentProvider};
use crate::filter::select_targets;
use crate::probe::{CertProber, DEFAULT_TLS_PORT};
use crate::slack::Notifier;
use crate::types::{Completion, HostCheckResult, InvocationInput};

/// Drive one invocation of the pipeline: resolve configuration, probe each
/// hostname in order, filter by threshold, notify.
///
/// Reported configuration errors (bad input, missing host list, missing
/// threshold) send one error notification and still complete with
/// `{200, "done"}`, so the scheduler only ever sees ran-or-crashed; an
/// unusable webhook URL is the one failure that surfaces, since without it
/// there is nowhere to report.
pub async fn run<E, P>(raw_input: Option<&str>, env: &E, prober: &P) -> Result<Completion>
where
    E: EnvironmentProvider,
    P: CertProber,
{
    let webhook_url = resolve_webhook_url(env)?;
    let notifier = Notifier::new(webhook_url);

    let input: Option<InvocationInput> = match raw_input {
        None => None,
        Some(raw) => match serde_json::from_str(raw) {
            Ok(input) => Some(input),
            Err(err) => {
                error!("invocation input is not a mapping: {}", err);
                notify_error_best_effort(
                    &notifier,
                    "invocation input is not a mapping",
                    "invalid input",
                    "unknown",
                )
                .await;
                return Ok(Completion::done());
            }
        },
    };

    let cfg = match resolve_config(input.as_ref(), env) {
        Ok(cfg) => cfg,
        // Webhook resolution already succeeded above, so any error here is a
        // reportable one.
        Err(err) => {
            error!("configuration error: {}", err);
            notify_error_best_effort(&notifier, &err.to_string(), err.kind(), "unknown").await;
            return Ok(Completion::done());
        }
    };
    info!(
        hosts = cfg.hostnames.len(),
        threshold_days = cfg.threshold_days,
        "checking certificate expiry"
    );

    let mut results: Vec<HostCheckResult> = Vec::with_capacity(cfg.hostnames.len());
    for fqdn in &cfg.hostnames {
        match prober.probe(fqdn, DEFAULT_TLS_PORT).await {
            Ok(expiry) => {
                info!(host = %fqdn, expiry = %expiry, "probe succeeded");
                results.push(HostCheckResult {
                    hostname: fqdn.clone(),
                    expiry_timestamp: Some(expiry),
                });
            }
            // One unreachable host must not abort the batch.
            Err(err) => {
                error!(host = %fqdn, "probe failed: {}", err);
                notify_error_best_effort(&notifier, &err.to_string(), err.kind(), fqdn).await;
                results.push(HostCheckResult {
                    hostname: fqdn.clone(),
                    expiry_timestamp: None,
                });
            }
        }
    }

    let targets = select_targets(&results, cfg.threshold_days, Utc::now());
    info!(flagged = targets.len(), "threshold filter applied");

    for target in &targets {
        if let Err(err) = notifier.notify_expiry(target).await {
            warn!(host = %target.hostname, "failed to deliver expiry notification: {:#}", err);
        }
    }

    Ok(Completion::done())
}

async fn notify_error_best_effort(
    notifier: &Notifier,
    description: &str,
    error_kind: &str,
    hostname: &str,
) {
    if let Err(err) = notifier.notify_error(description, error_kind, hostname).await {
        warn!("failed to deliver error notification: {:#}", err);
    }
}
