//! Minimal placeholder expansion for job parameter strings.
//!
//! The only interpolation form is `{{ workload_args.<key> }}`. The key space
//! is flat so a bounded left-to-right scan is all that is needed, there is no
//! templating engine and substituted values are never rescanned.
use crate::benchmark::spec::WorkloadArgs;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const ARGS_PREFIX: &str = "workload_args.";

/// Errors produced while expanding placeholders in a single parameter string.
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
pub enum TemplateError {
    /// The placeholder names a key that is not present in the workload args.
    #[error("unresolved reference to workload_args.{key}")]
    UnresolvedReference {
        /// The missing key.
        key: String,
    },
    /// Unbalanced delimiters or an unsupported reference form.
    #[error("malformed placeholder in {raw:?}")]
    MalformedPlaceholder {
        /// The raw parameter string.
        raw: String,
    },
}

/// Expand every placeholder in `input` against `args`.
pub fn resolve(input: &str, args: &WorkloadArgs) -> Result<String, TemplateError> {
    let malformed = || TemplateError::MalformedPlaceholder {
        raw: input.to_owned(),
    };
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    loop {
        match (rest.find(OPEN), rest.find(CLOSE)) {
            (None, None) => {
                out.push_str(rest);
                return Ok(out);
            }
            // A stray delimiter either way round is unbalanced.
            (None, Some(_)) | (Some(_), None) => return Err(malformed()),
            (Some(open), Some(close)) => {
                if close < open {
                    return Err(malformed());
                }
                out.push_str(&rest[..open]);
                let inner = rest[open + OPEN.len()..close].trim();
                let key = inner.strip_prefix(ARGS_PREFIX).ok_or_else(malformed)?;
                let value = args
                    .lookup(key)
                    .ok_or_else(|| TemplateError::UnresolvedReference {
                        key: key.to_owned(),
                    })?;
                out.push_str(&value);
                rest = &rest[close + CLOSE.len()..];
            }
        }
    }
}

impl WorkloadArgs {
    /// String rendition of the arg named `key`, if the document carries it.
    ///
    /// List values render comma-joined. A list the author never wrote is an
    /// absent key, not an empty string.
    pub(crate) fn lookup(&self, key: &str) -> Option<String> {
        fn scalar<T: ToString>(value: &Option<T>) -> Option<String> {
            value.as_ref().map(T::to_string)
        }
        fn list<T: ToString>(values: &[T]) -> Option<String> {
            if values.is_empty() {
                None
            } else {
                Some(
                    values
                        .iter()
                        .map(T::to_string)
                        .collect::<Vec<_>>()
                        .join(","),
                )
            }
        }
        match key {
            "prefill" => scalar(&self.prefill),
            "prefill_bs" => scalar(&self.prefill_bs),
            "samples" => scalar(&self.samples),
            "servers" => scalar(&self.servers),
            "pin_server" => scalar(&self.pin_server),
            "jobs" => list(&self.jobs),
            "bs" => list(&self.bs),
            "numjobs" => list(&self.numjobs),
            "iodepth" => scalar(&self.iodepth),
            "read_runtime" => scalar(&self.read_runtime),
            "write_runtime" => scalar(&self.write_runtime),
            "read_ramp_time" => scalar(&self.read_ramp_time),
            "write_ramp_time" => scalar(&self.write_ramp_time),
            "filesize" => scalar(&self.filesize),
            "log_sample_rate" => scalar(&self.log_sample_rate),
            "storageclass" => scalar(&self.storageclass),
            "storagesize" => scalar(&self.storagesize),
            "cmp_ratio" => scalar(&self.cmp_ratio),
            "job_timeout" => scalar(&self.job_timeout),
            "drop_cache_kernel_pages" => scalar(&self.drop_cache_kernel_pages),
            _ => None,
        }
    }
}
