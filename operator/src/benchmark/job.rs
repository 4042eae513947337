use std::collections::BTreeMap;

use k8s_openapi::api::{
    batch::v1::JobSpec,
    core::v1::{
        ConfigMapVolumeSource, Container, EnvVar, PodSpec, PodTemplateSpec, Volume, VolumeMount,
    },
};
use kube::api::ObjectMeta;

use crate::benchmark::rules::JobParams;
use crate::labels::selector_labels;

/// Where the resolved per-job parameters are mounted inside the fio pods.
pub const PARAMS_MOUNT_PATH: &str = "/fiobench-params";

/// Configuration for benchmark job images.
#[derive(Clone, Debug)]
pub struct JobImageConfig {
    /// Image for all jobs created by the benchmark.
    pub image: String,
    /// Pull policy for image.
    pub image_pull_policy: String,
}

impl Default for JobImageConfig {
    fn default() -> Self {
        Self {
            image: "quay.io/cloud-bulldozer/fio:latest".to_owned(),
            image_pull_policy: "Always".to_owned(),
        }
    }
}

/// JobConfig defines which properties of the JobSpec can be customized.
pub struct JobConfig {
    pub name: String,
    pub workload: String,
    pub servers: u32,
    pub job_timeout: Option<u32>,
    pub pin_server: Option<String>,
    pub params_config_map: String,
    pub nonce: u32,
    pub job_image_config: JobImageConfig,
}

/// Data for the params config map handed to each fio pod: one entry per
/// requested job holding its resolved extra parameters, one per line.
pub fn params_config_map_data(jobs: &[JobParams]) -> BTreeMap<String, String> {
    jobs.iter()
        .map(|job| (job.name.clone(), job.params.join("\n")))
        .collect()
}

pub fn job_spec(config: JobConfig) -> JobSpec {
    let env_vars = vec![
        EnvVar {
            name: "BENCHMARK_NAME".to_owned(),
            value: Some(config.name.to_owned()),
            ..Default::default()
        },
        EnvVar {
            name: "BENCHMARK_WORKLOAD".to_owned(),
            value: Some(config.workload.to_owned()),
            ..Default::default()
        },
        EnvVar {
            name: "BENCHMARK_NONCE".to_owned(),
            value: Some(config.nonce.to_string()),
            ..Default::default()
        },
    ];

    JobSpec {
        backoff_limit: Some(1),
        parallelism: Some(config.servers as i32),
        completions: Some(config.servers as i32),
        active_deadline_seconds: config.job_timeout.map(i64::from),
        template: PodTemplateSpec {
            metadata: Some(ObjectMeta {
                labels: selector_labels("fio-job"),
                ..Default::default()
            }),
            spec: Some(PodSpec {
                hostname: Some("job".to_owned()),
                subdomain: Some("fio-job".to_owned()),
                node_name: config.pin_server,
                containers: vec![Container {
                    name: "fio".to_owned(),
                    image: Some(config.job_image_config.image),
                    image_pull_policy: Some(config.job_image_config.image_pull_policy),
                    command: Some(vec![
                        "/usr/local/bin/run_workload".to_owned(),
                        config.workload,
                    ]),
                    env: Some(env_vars),
                    volume_mounts: Some(vec![VolumeMount {
                        mount_path: PARAMS_MOUNT_PATH.to_owned(),
                        name: "fiobench-params".to_owned(),
                        ..Default::default()
                    }]),
                    ..Default::default()
                }],
                volumes: Some(vec![Volume {
                    config_map: Some(ConfigMapVolumeSource {
                        default_mode: Some(0o644),
                        name: Some(config.params_config_map),
                        ..Default::default()
                    }),
                    name: "fiobench-params".to_owned(),
                    ..Default::default()
                }]),
                restart_policy: Some("Never".to_owned()),
                ..Default::default()
            }),
        },
        ..Default::default()
    }
}
