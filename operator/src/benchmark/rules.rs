//! Ordered matching of `job_params` rules against requested job names.
//!
//! A rule applies when its `jobname_match` is a substring of the job name, so
//! patterns overlap on purpose: `randwrite` picks up both the `write` rule
//! and the `randwrite` rule. Every matching rule contributes its params in
//! document order and duplicates are kept as-is, the benchmark executable
//! applies its own precedence.
use crate::benchmark::spec::{JobParamRule, WorkloadArgs, WorkloadSpec};
use crate::benchmark::template::{self, TemplateError};

/// Fully resolved parameters for one requested job.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct JobParams {
    /// Requested job name.
    pub name: String,
    /// Literal parameter strings in rule order, free of placeholders.
    pub params: Vec<String>,
}

/// A template failure annotated with where in the document it happened.
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
#[error("job_params[{rule}].params[{param}] (jobname_match {jobname_match:?}): {source}")]
pub struct ResolveError {
    /// Index of the offending rule.
    pub rule: usize,
    /// Index of the offending param within the rule.
    pub param: usize,
    /// Pattern of the offending rule.
    pub jobname_match: String,
    /// The underlying template failure.
    #[source]
    pub source: TemplateError,
}

/// Rules whose `jobname_match` is a substring of `job`, with their document
/// index, in document order. All matches are collected, there is no
/// short-circuit on the first match.
pub fn matching_rules<'a>(
    job: &'a str,
    rules: &'a [JobParamRule],
) -> impl Iterator<Item = (usize, &'a JobParamRule)> + 'a {
    rules
        .iter()
        .enumerate()
        .filter(move |(_, rule)| job.contains(&rule.jobname_match))
}

/// Resolve the ordered extra-parameter list for one job name.
///
/// A job that matches no rule resolves to an empty list, not an error.
pub fn job_params(
    job: &str,
    rules: &[JobParamRule],
    args: &WorkloadArgs,
) -> Result<Vec<String>, ResolveError> {
    let mut params = Vec::new();
    for (i, rule) in matching_rules(job, rules) {
        for (j, raw) in rule.params.iter().enumerate() {
            let resolved = template::resolve(raw, args).map_err(|source| ResolveError {
                rule: i,
                param: j,
                jobname_match: rule.jobname_match.clone(),
                source,
            })?;
            params.push(resolved);
        }
    }
    Ok(params)
}

impl WorkloadSpec {
    /// Resolve parameters for every requested job, in `args.jobs` order.
    ///
    /// This is the fully-resolved artifact handed to the benchmark tooling,
    /// the spec itself is never mutated.
    pub fn resolve_jobs(&self) -> Result<Vec<JobParams>, ResolveError> {
        self.args
            .jobs
            .iter()
            .map(|job| {
                Ok(JobParams {
                    name: job.clone(),
                    params: job_params(job, &self.job_params, &self.args)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    fn workload() -> WorkloadSpec {
        WorkloadSpec {
            name: Some("fio_distributed".to_owned()),
            args: WorkloadArgs {
                jobs: vec!["randwrite".to_owned(), "randread".to_owned()],
                read_runtime: Some(300),
                write_runtime: Some(300),
                read_ramp_time: Some(5),
                write_ramp_time: Some(5),
                cmp_ratio: Some(75),
                ..Default::default()
            },
            job_params: vec![
                JobParamRule {
                    jobname_match: "write".to_owned(),
                    params: vec![
                        "fsync_on_close=1".to_owned(),
                        "create_on_open=1".to_owned(),
                        "runtime={{ workload_args.write_runtime }}".to_owned(),
                        "ramp_time={{ workload_args.write_ramp_time }}".to_owned(),
                    ],
                },
                JobParamRule {
                    jobname_match: "read".to_owned(),
                    params: vec![
                        "time_based=1".to_owned(),
                        "runtime={{ workload_args.read_runtime }}".to_owned(),
                        "ramp_time={{ workload_args.read_ramp_time }}".to_owned(),
                    ],
                },
                JobParamRule {
                    jobname_match: "randwrite".to_owned(),
                    params: vec![
                        "buffer_compress_percentage={{ workload_args.cmp_ratio }}".to_owned(),
                        "buffer_pattern=0xdeadface".to_owned(),
                        "randrepeat=0".to_owned(),
                        "allrandrepeat=0".to_owned(),
                        "time_based=1".to_owned(),
                    ],
                },
                JobParamRule {
                    jobname_match: "randread".to_owned(),
                    params: vec!["randrepeat=0".to_owned()],
                },
            ],
        }
    }

    #[test]
    fn randwrite_matches_write_then_randwrite() {
        let w = workload();
        let matched: Vec<usize> = matching_rules("randwrite", &w.job_params)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(matched, vec![0, 2]);
        let params = job_params("randwrite", &w.job_params, &w.args).unwrap();
        expect![[r#"
            [
                "fsync_on_close=1",
                "create_on_open=1",
                "runtime=300",
                "ramp_time=5",
                "buffer_compress_percentage=75",
                "buffer_pattern=0xdeadface",
                "randrepeat=0",
                "allrandrepeat=0",
                "time_based=1",
            ]
        "#]]
        .assert_debug_eq(&params);
    }

    #[test]
    fn randread_matches_read_then_randread() {
        let w = workload();
        let matched: Vec<usize> = matching_rules("randread", &w.job_params)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(matched, vec![1, 3]);
        let params = job_params("randread", &w.job_params, &w.args).unwrap();
        assert_eq!(
            params,
            vec!["time_based=1", "runtime=300", "ramp_time=5", "randrepeat=0"]
        );
    }

    #[test]
    fn duplicate_flags_are_preserved() {
        let w = workload();
        let params = job_params("randwrite", &w.job_params, &w.args).unwrap();
        let time_based = params.iter().filter(|p| *p == "time_based=1").count();
        // The write rule does not emit time_based but randwrite does; add a
        // second emitter and both occurrences must survive.
        let mut w2 = w.clone();
        w2.job_params[0].params.push("time_based=1".to_owned());
        let params2 = job_params("randwrite", &w2.job_params, &w2.args).unwrap();
        let time_based2 = params2.iter().filter(|p| *p == "time_based=1").count();
        assert_eq!(time_based, 1);
        assert_eq!(time_based2, 2);
    }

    #[test]
    fn no_matching_rule_is_empty_not_an_error() {
        let w = workload();
        assert_eq!(job_params("randrw", &w.job_params, &w.args).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn resolve_jobs_follows_requested_order() {
        let w = workload();
        let resolved = w.resolve_jobs().unwrap();
        let names: Vec<&str> = resolved.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["randwrite", "randread"]);
        for job in &resolved {
            for param in &job.params {
                assert!(!param.contains("{{"), "residual placeholder in {param:?}");
                assert!(!param.contains("}}"), "residual placeholder in {param:?}");
            }
        }
    }

    #[test]
    fn resolution_is_idempotent() {
        let w = workload();
        assert_eq!(w.resolve_jobs().unwrap(), w.resolve_jobs().unwrap());
    }

    #[test]
    fn missing_arg_reports_rule_and_param_location() {
        let mut w = workload();
        w.args.write_ramp_time = None;
        let err = w.resolve_jobs().unwrap_err();
        assert_eq!(err.rule, 0);
        assert_eq!(err.param, 3);
        assert_eq!(err.jobname_match, "write");
        assert_eq!(
            err.source,
            TemplateError::UnresolvedReference {
                key: "write_ramp_time".to_owned()
            }
        );
        assert_eq!(
            err.to_string(),
            "job_params[0].params[3] (jobname_match \"write\"): \
             unresolved reference to workload_args.write_ramp_time"
        );
    }
}
