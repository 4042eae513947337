use std::{sync::Arc, time::Duration};

use futures::stream::StreamExt;
use k8s_openapi::api::{batch::v1::Job, core::v1::ConfigMap};
use kube::{
    api::{Patch, PatchParams},
    client::Client,
    core::object::HasSpec,
    runtime::Controller,
    Api,
};
use kube::{
    runtime::{
        controller::Action,
        watcher::{self, Config},
    },
    Resource, ResourceExt,
};
use serde_json::json;
use tracing::{debug, error};

use crate::benchmark::job::{
    job_spec, params_config_map_data, JobConfig, JobImageConfig,
};
use crate::benchmark::Benchmark;
use crate::labels::MANAGED_BY_LABEL_SELECTOR;
use crate::utils::{apply_config_map, apply_job, delete_job, Context};

/// Handle errors during reconciliation.
fn on_error(_benchmark: Arc<Benchmark>, _error: &Error, _context: Arc<Context>) -> Action {
    Action::requeue(Duration::from_secs(5))
}

/// Errors produced by the reconcile function.
#[derive(Debug, thiserror::Error)]
enum Error {
    #[error("App error: {source}")]
    App {
        #[from]
        source: anyhow::Error,
    },
    #[error("Kube error: {source}")]
    Kube {
        #[from]
        source: kube::Error,
    },
}

/// Start a controller for the Benchmark CRD.
pub async fn run() {
    let k_client: Client = Client::try_default().await.unwrap();
    let context: Arc<Context> = Arc::new(Context::new(k_client.clone()));

    let benchmarks: Api<Benchmark> = Api::all(k_client.clone());
    let jobs = Api::<Job>::all(k_client.clone());
    let config_maps = Api::<ConfigMap>::all(k_client.clone());

    Controller::new(benchmarks, Config::default())
        .owns(
            jobs,
            watcher::Config::default().labels(MANAGED_BY_LABEL_SELECTOR),
        )
        .owns(
            config_maps,
            watcher::Config::default().labels(MANAGED_BY_LABEL_SELECTOR),
        )
        .run(reconcile, on_error, context)
        .for_each(|rec_res| async move {
            match rec_res {
                Ok((benchmark, _)) => {
                    debug!(benchmark.name, "reconcile success");
                }
                Err(err) => {
                    error!(?err, "reconcile error")
                }
            }
        })
        .await;
}

/// Perform a reconcile pass for the Benchmark CRD
async fn reconcile(benchmark: Arc<Benchmark>, cx: Arc<Context>) -> Result<Action, Error> {
    let spec = benchmark.spec();
    debug!(?spec, "reconcile");

    let name = benchmark.name_any();
    let ns = benchmark
        .namespace()
        .ok_or_else(|| anyhow::anyhow!("benchmark resource must be namespaced"))?;
    let orefs = benchmark
        .controller_owner_ref(&())
        .map(|oref| vec![oref])
        .unwrap_or_default();

    let job_name = format!("{name}-fio");

    let workload = &spec.workload;
    if let Err(errs) = workload.validate() {
        // Authoring bugs are not transient, wait for the resource to be
        // edited instead of retrying.
        error!(benchmark = %name, %errs, "benchmark spec failed validation");
        delete_job(cx.clone(), &ns, &job_name).await?;
        return Ok(Action::await_change());
    }

    let resolved = workload.resolve_jobs().map_err(anyhow::Error::from)?;

    // Persist a nonce on first reconcile so derived resources stay stable.
    let status = benchmark.status.clone().unwrap_or_default();
    let benchmarks: Api<Benchmark> = Api::namespaced(cx.k_client.clone(), &ns);
    benchmarks
        .patch_status(
            &name,
            &PatchParams::default(),
            &Patch::Merge(json!({ "status": status })),
        )
        .await?;

    let params_config_map = format!("{name}-fio-params");
    apply_config_map(
        cx.clone(),
        &ns,
        orefs.clone(),
        &params_config_map,
        params_config_map_data(&resolved),
    )
    .await?;

    let config = JobConfig {
        name: name.clone(),
        workload: workload.name.clone().unwrap_or_default(),
        servers: workload.args.servers.unwrap_or(1),
        job_timeout: workload.args.job_timeout,
        pin_server: workload.args.pin_server.clone().filter(|s| !s.is_empty()),
        params_config_map,
        nonce: status.nonce,
        job_image_config: JobImageConfig::default(),
    };
    apply_job(cx, &ns, orefs, &job_name, job_spec(config)).await?;

    Ok(Action::requeue(Duration::from_secs(30)))
}
