//! Place all spec types into a single module so they can be used as a lightweight dependency
use kube::CustomResource;
use rand::random;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Primary CRD for describing a distributed storage benchmark run.
///
/// Field names match the document key vocabulary as authored, so there is no
/// serde renaming on these types.
#[derive(CustomResource, Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "fiobench.io",
    version = "v1alpha1",
    kind = "Benchmark",
    plural = "benchmarks",
    status = "BenchmarkStatus",
    derive = "PartialEq",
    namespaced
)]
pub struct BenchmarkSpec {
    /// Name of the cluster the benchmark runs against.
    pub clustername: Option<String>,
    /// User recorded alongside the benchmark results.
    pub test_user: Option<String>,
    /// Workload to run.
    pub workload: WorkloadSpec,
}

/// Describes the benchmark workload and its parameters.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
pub struct WorkloadSpec {
    /// Name of the workload driver, e.g. `fio_distributed`.
    pub name: Option<String>,
    /// Parameters shared by every job.
    #[serde(default)]
    pub args: WorkloadArgs,
    /// Extra per-job parameter rules, evaluated in order.
    #[serde(default)]
    pub job_params: Vec<JobParamRule>,
}

/// Flat mapping of workload parameters.
///
/// Scalar keys are optional: a key the author commented out deserializes as
/// absent, never as a default value. Required-ness is enforced by
/// [`validate`](crate::benchmark::validate) so that every violation can be
/// reported in a single pass.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
pub struct WorkloadArgs {
    /// When true the target files are written once before any measured sample runs.
    pub prefill: Option<bool>,
    /// Block size used for the prefill pass.
    pub prefill_bs: Option<String>,
    /// Number of times each job is repeated.
    pub samples: Option<u32>,
    /// Number of fio server pods to deploy.
    pub servers: Option<u32>,
    /// Node name to pin the server pods to.
    pub pin_server: Option<String>,
    /// Job patterns to run, in order.
    #[serde(default)]
    pub jobs: Vec<String>,
    /// Block sizes to sweep, in order.
    #[serde(default)]
    pub bs: Vec<String>,
    /// Concurrency levels to sweep, in order.
    #[serde(default)]
    pub numjobs: Vec<u32>,
    /// Number of in-flight I/Os per job.
    pub iodepth: Option<u32>,
    /// Runtime in seconds for read jobs.
    pub read_runtime: Option<u32>,
    /// Runtime in seconds for write jobs.
    pub write_runtime: Option<u32>,
    /// Seconds of unmeasured warmup for read jobs.
    pub read_ramp_time: Option<u32>,
    /// Seconds of unmeasured warmup for write jobs.
    pub write_ramp_time: Option<u32>,
    /// Size of the file each job operates on.
    pub filesize: Option<String>,
    /// Capture one latency log entry per this many milliseconds.
    pub log_sample_rate: Option<u32>,
    /// Storage class backing the server volumes.
    pub storageclass: Option<String>,
    /// Size of the volume requested for each server.
    pub storagesize: Option<String>,
    /// Target compressibility of the generated buffers, in percent.
    pub cmp_ratio: Option<u32>,
    /// Seconds before a job is considered hung.
    pub job_timeout: Option<u32>,
    /// Drop kernel caches on the server nodes before each sample.
    pub drop_cache_kernel_pages: Option<bool>,
}

/// Extra parameters applied to every job whose name contains `jobname_match`.
///
/// Rules are evaluated in document order and all matches apply: `randwrite`
/// picks up both a `write` rule and a `randwrite` rule. Duplicate flags
/// across matching rules are preserved, the executable decides precedence.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
pub struct JobParamRule {
    /// Substring matched against each requested job name, case-sensitive.
    pub jobname_match: String,
    /// Parameters appended for matching jobs, `key=value` or bare flags.
    /// Entries may reference `{{ workload_args.<key> }}`.
    #[serde(default)]
    pub params: Vec<String>,
}

/// Current status of a benchmark.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema)]
pub struct BenchmarkStatus {
    /// Unique value for this benchmark run.
    /// Keeps derived resources stable across reconcile passes.
    pub nonce: u32,
}

impl Default for BenchmarkStatus {
    fn default() -> BenchmarkStatus {
        BenchmarkStatus {
            nonce: random::<u32>(),
        }
    }
}
