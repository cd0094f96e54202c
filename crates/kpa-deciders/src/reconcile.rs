//! Reconciler diff-apply: make the registry hold the desired Decider.

use tracing::{debug, info, info_span, Instrument};

use kpa_core::{AutoscalerConfig, PodAutoscaler};

use crate::decider::{make_decider, Decider};
use crate::error::{DecidersError, DecidersResult};
use crate::registry::Deciders;

/// Create the Decider if missing, update it if its spec drifted, and
/// leave it alone otherwise. Returns what the registry now holds.
pub async fn reconcile_decider<D>(deciders: &D, desired: Decider) -> DecidersResult<Decider>
where
    D: Deciders + ?Sized,
{
    let key = desired.key();
    let current = deciders.get(desired.namespace(), desired.name()).await;

    match current {
        Ok(existing) if existing.spec == desired.spec => {
            debug!(%key, "decider up to date");
            Ok(existing)
        }
        Ok(existing) => {
            let mut want = desired;
            want.metadata.resource_version = existing.metadata.resource_version;
            let updated = deciders.update(want).await?;
            info!(
                %key,
                target = updated.spec.target_concurrency,
                panic_threshold = updated.spec.panic_threshold,
                "decider updated"
            );
            Ok(updated)
        }
        Err(DecidersError::NotFound(_)) => {
            let created = deciders.create(desired).await?;
            info!(
                %key,
                target = created.spec.target_concurrency,
                panic_threshold = created.spec.panic_threshold,
                "decider created"
            );
            Ok(created)
        }
        Err(e) => Err(e),
    }
}

/// Resolve the PA into a Decider and apply it, inside a span naming the PA.
pub async fn reconcile_pod_autoscaler<D>(
    deciders: &D,
    pa: &PodAutoscaler,
    config: &AutoscalerConfig,
    service_name: &str,
) -> DecidersResult<Decider>
where
    D: Deciders + ?Sized,
{
    let span = info_span!("reconcile", pa = %pa.key());
    async move {
        let desired = make_decider(pa, config, service_name);
        reconcile_decider(deciders, desired).await
    }
    .instrument(span)
    .await
}

/// Delete the Decider for a removed PA. A missing Decider counts as done.
pub async fn remove_decider<D>(deciders: &D, namespace: &str, name: &str) -> DecidersResult<()>
where
    D: Deciders + ?Sized,
{
    match deciders.delete(namespace, name).await {
        Ok(()) => {
            info!(%namespace, %name, "decider deleted");
            Ok(())
        }
        Err(DecidersError::NotFound(_)) => {
            debug!(%namespace, %name, "decider already gone");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
