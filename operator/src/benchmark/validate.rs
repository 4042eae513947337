//! Structural checks for benchmark specs before the controller acts on them.
//!
//! Validation is a pure pass over the whole spec that collects every
//! violation it finds, so an author can fix all issues in one edit.
use std::fmt;

use crate::benchmark::spec::{WorkloadArgs, WorkloadSpec};

/// Job patterns understood by the fio workload.
pub const KNOWN_JOBS: &[&str] = &[
    "read",
    "write",
    "randread",
    "randwrite",
    "readwrite",
    "randrw",
];

/// Unit suffixes accepted on quantity strings such as `10GiB` or `64KiB`.
const QUANTITY_UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "KB", "MB", "GB", "TB"];

/// A single violated field.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Violation {
    /// Path of the violated field within the spec.
    pub field: String,
    /// What is wrong with it.
    pub problem: String,
}

impl Violation {
    fn new(field: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            problem: problem.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.problem)
    }
}

/// All violations found in one validation pass.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ValidationErrors(pub Vec<Violation>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid benchmark spec: ")?;
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl WorkloadSpec {
    /// Check the shape of the workload spec.
    ///
    /// Collects every violation rather than stopping at the first.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut violations = Vec::new();
        if self.name.as_deref().map_or(true, str::is_empty) {
            violations.push(Violation::new("workload.name", "missing"));
        }
        self.args.check(&mut violations);
        for (i, rule) in self.job_params.iter().enumerate() {
            if rule.jobname_match.is_empty() {
                violations.push(Violation::new(
                    format!("workload.job_params[{i}].jobname_match"),
                    "must not be empty, an empty pattern matches every job",
                ));
            }
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(violations))
        }
    }
}

impl WorkloadArgs {
    fn check(&self, out: &mut Vec<Violation>) {
        if self.jobs.is_empty() {
            out.push(Violation::new("workload.args.jobs", "must list at least one job"));
        }
        for (i, job) in self.jobs.iter().enumerate() {
            if !KNOWN_JOBS.contains(&job.as_str()) {
                out.push(Violation::new(
                    format!("workload.args.jobs[{i}]"),
                    format!("unknown job type {job:?}"),
                ));
            }
        }
        if self.bs.is_empty() {
            out.push(Violation::new(
                "workload.args.bs",
                "must list at least one block size",
            ));
        }
        for (i, bs) in self.bs.iter().enumerate() {
            require_quantity(&format!("workload.args.bs[{i}]"), Some(bs), out);
        }
        if self.numjobs.is_empty() {
            out.push(Violation::new(
                "workload.args.numjobs",
                "must list at least one concurrency level",
            ));
        }
        for (i, n) in self.numjobs.iter().enumerate() {
            if *n == 0 {
                out.push(Violation::new(
                    format!("workload.args.numjobs[{i}]"),
                    "must be a positive integer",
                ));
            }
        }
        require_positive("workload.args.samples", self.samples, true, out);
        require_positive("workload.args.servers", self.servers, true, out);
        require_positive("workload.args.iodepth", self.iodepth, true, out);
        require_positive("workload.args.read_runtime", self.read_runtime, false, out);
        require_positive("workload.args.write_runtime", self.write_runtime, false, out);
        require_positive("workload.args.read_ramp_time", self.read_ramp_time, false, out);
        require_positive(
            "workload.args.write_ramp_time",
            self.write_ramp_time,
            false,
            out,
        );
        require_positive(
            "workload.args.log_sample_rate",
            self.log_sample_rate,
            false,
            out,
        );
        require_positive("workload.args.job_timeout", self.job_timeout, false, out);
        if let Some(ratio) = self.cmp_ratio {
            if !(1..=100).contains(&ratio) {
                out.push(Violation::new(
                    "workload.args.cmp_ratio",
                    "must be a percentage between 1 and 100",
                ));
            }
        }
        require_quantity("workload.args.prefill_bs", self.prefill_bs.as_deref(), out);
        if self.filesize.is_none() {
            out.push(Violation::new("workload.args.filesize", "missing"));
        }
        require_quantity("workload.args.filesize", self.filesize.as_deref(), out);
        if self.storagesize.is_none() {
            out.push(Violation::new("workload.args.storagesize", "missing"));
        }
        require_quantity("workload.args.storagesize", self.storagesize.as_deref(), out);
        if self.storageclass.as_deref().map_or(true, str::is_empty) {
            out.push(Violation::new("workload.args.storageclass", "missing"));
        }
    }
}

/// Require a positive integer, and its presence when `required` is set.
fn require_positive(field: &str, value: Option<u32>, required: bool, out: &mut Vec<Violation>) {
    match value {
        None if required => out.push(Violation::new(field, "missing")),
        Some(0) => out.push(Violation::new(field, "must be a positive integer")),
        _ => {}
    }
}

/// Require a quantity-with-unit string such as `10GiB`, when present.
fn require_quantity(field: &str, value: Option<&str>, out: &mut Vec<Violation>) {
    if let Some(value) = value {
        if !is_quantity(value) {
            out.push(Violation::new(
                field,
                format!("{value:?} is not a quantity with a unit suffix"),
            ));
        }
    }
}

/// A quantity is one or more digits followed by a known unit suffix.
fn is_quantity(s: &str) -> bool {
    let digits = s.len() - s.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    digits > 0 && QUANTITY_UNITS.contains(&&s[digits..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::spec::JobParamRule;

    fn valid_workload() -> WorkloadSpec {
        WorkloadSpec {
            name: Some("fio_distributed".to_owned()),
            args: WorkloadArgs {
                samples: Some(3),
                servers: Some(3),
                jobs: vec!["randwrite".to_owned(), "randread".to_owned()],
                bs: vec!["4KiB".to_owned(), "64KiB".to_owned()],
                numjobs: vec![1, 8],
                iodepth: Some(4),
                read_runtime: Some(300),
                write_runtime: Some(300),
                read_ramp_time: Some(5),
                write_ramp_time: Some(5),
                filesize: Some("2GiB".to_owned()),
                storageclass: Some("standard".to_owned()),
                storagesize: Some("10GiB".to_owned()),
                cmp_ratio: Some(75),
                ..Default::default()
            },
            job_params: vec![JobParamRule {
                jobname_match: "write".to_owned(),
                params: vec!["fsync_on_close=1".to_owned()],
            }],
        }
    }

    #[test]
    fn valid_spec_passes() {
        valid_workload().validate().unwrap();
    }

    #[test]
    fn all_violations_reported_in_one_pass() {
        let mut workload = valid_workload();
        workload.name = None;
        workload.args.jobs = vec!["randwrite".to_owned(), "fsync".to_owned()];
        workload.args.iodepth = Some(0);
        workload.args.filesize = Some("huge".to_owned());
        workload.args.storageclass = None;
        let errs = workload.validate().unwrap_err();
        let fields: Vec<&str> = errs.0.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "workload.name",
                "workload.args.jobs[1]",
                "workload.args.iodepth",
                "workload.args.filesize",
                "workload.args.storageclass",
            ]
        );
    }

    #[test]
    fn empty_jobs_rejected() {
        let mut workload = valid_workload();
        workload.args.jobs.clear();
        let errs = workload.validate().unwrap_err();
        assert_eq!(errs.0[0].field, "workload.args.jobs");
    }

    #[test]
    fn empty_jobname_match_rejected() {
        let mut workload = valid_workload();
        workload.job_params.push(JobParamRule::default());
        let errs = workload.validate().unwrap_err();
        assert_eq!(errs.0[0].field, "workload.job_params[1].jobname_match");
    }

    #[test]
    fn cmp_ratio_must_be_a_percentage() {
        let mut workload = valid_workload();
        workload.args.cmp_ratio = Some(150);
        let errs = workload.validate().unwrap_err();
        assert_eq!(errs.0[0].field, "workload.args.cmp_ratio");
    }

    #[test]
    fn quantities() {
        assert!(is_quantity("10GiB"));
        assert!(is_quantity("64KiB"));
        assert!(is_quantity("512B"));
        assert!(!is_quantity("GiB"));
        assert!(!is_quantity("10"));
        assert!(!is_quantity("10gib"));
        assert!(!is_quantity(""));
    }

    #[test]
    fn display_aggregates() {
        let mut workload = valid_workload();
        workload.name = None;
        workload.args.samples = None;
        let errs = workload.validate().unwrap_err();
        assert_eq!(
            errs.to_string(),
            "invalid benchmark spec: workload.name: missing; workload.args.samples: missing"
        );
    }
}
