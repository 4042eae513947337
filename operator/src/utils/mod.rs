//! Utils is shared functions and constants for the controller
use std::{collections::BTreeMap, sync::Arc};

use k8s_openapi::{
    api::{
        batch::v1::{Job, JobSpec, JobStatus},
        core::v1::ConfigMap,
    },
    apimachinery::pkg::apis::meta::v1::OwnerReference,
};

use kube::{
    api::{DeleteParams, Patch, PatchParams},
    client::Client,
    core::ObjectMeta,
    Api,
};

use crate::{labels::managed_labels, CONTROLLER_NAME};

/// Operator Context
pub struct Context {
    /// Kube client
    pub k_client: Client,
}

impl Context {
    /// Create new context
    pub fn new(k_client: Client) -> Self {
        Context { k_client }
    }
}

/// Apply a Job
pub async fn apply_job(
    cx: Arc<Context>,
    ns: &str,
    orefs: Vec<OwnerReference>,
    name: &str,
    spec: JobSpec,
) -> Result<Option<JobStatus>, kube::error::Error> {
    let serverside = PatchParams::apply(CONTROLLER_NAME);
    let jobs: Api<Job> = Api::namespaced(cx.k_client.clone(), ns);

    // Server-side apply job
    let job: Job = Job {
        metadata: ObjectMeta {
            name: Some(name.to_owned()),
            owner_references: Some(orefs),
            labels: managed_labels(),
            ..ObjectMeta::default()
        },
        spec: Some(spec),
        ..Default::default()
    };
    let job = jobs.patch(name, &serverside, &Patch::Apply(job)).await?;
    Ok(job.status)
}

/// Delete a job in namespace
pub async fn delete_job(
    cx: Arc<Context>,
    ns: &str,
    name: &str,
) -> Result<(), kube::error::Error> {
    let jobs: Api<Job> = Api::namespaced(cx.k_client.clone(), ns);

    match jobs.delete(name, &DeleteParams::default()).await {
        Ok(_) => Ok(()),
        Err(kube::Error::Api(err)) if err.reason == "NotFound" => Ok(()),
        Err(e) => Err(e),
    }
}

/// Apply a config map
pub async fn apply_config_map(
    cx: Arc<Context>,
    ns: &str,
    orefs: Vec<OwnerReference>,
    name: &str,
    data: BTreeMap<String, String>,
) -> Result<(), kube::error::Error> {
    let serverside = PatchParams::apply(CONTROLLER_NAME);
    let config_maps: Api<ConfigMap> = Api::namespaced(cx.k_client.clone(), ns);
    // Apply config map
    let map_data = ConfigMap {
        metadata: ObjectMeta {
            name: Some(name.to_owned()),
            owner_references: Some(orefs),
            labels: managed_labels(),
            ..ObjectMeta::default()
        },
        data: Some(data),
        ..Default::default()
    };
    config_maps
        .patch(name, &serverside, &Patch::Apply(map_data))
        .await?;
    Ok(())
}
