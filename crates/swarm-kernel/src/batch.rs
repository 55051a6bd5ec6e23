//! Batch input parsing and validation.
//!
//! The whole run is described by one JSON document on stdin:
//!
//! ```json
//! { "jobs": [ { "dir": "workers/alpha", "task": "fix the tests" } ],
//!   "max_parallel": 4 }
//! ```
//!
//! Shape checks are explicit, field by field, so each violated rule produces
//! its own diagnostic instead of a generic deserialization error.

use serde_json::Value;

use crate::error::SwarmError;

/// Cap applied when the input does not name one, bounded by the job count.
pub const DEFAULT_MAX_PARALLEL: usize = 4;

/// One requested unit of work, as given in the input.
///
/// The directory string is untrusted here; it only becomes a path after the
/// resolver has vetted it.
#[derive(Debug, Clone)]
pub struct JobSpec {
    /// 1-based position in the input, used in report tags.
    pub index: usize,
    /// Raw directory string, trimmed.
    pub dir: String,
    /// Opaque instruction forwarded to the agent as its final argument.
    pub task: String,
}

impl JobSpec {
    fn from_value(index: usize, job: &Value) -> Result<Self, SwarmError> {
        let map = job.as_object().ok_or(SwarmError::JobNotObject)?;

        let dir = map
            .get("dir")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(SwarmError::DirFieldInvalid)?;

        let task = map
            .get("task")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .ok_or(SwarmError::TaskFieldInvalid)?;

        Ok(Self {
            index,
            dir: dir.to_string(),
            task: task.to_string(),
        })
    }
}

/// The validated top-level input. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Jobs in input order.
    pub jobs: Vec<JobSpec>,
    /// Concurrency cap, always >= 1.
    pub max_parallel: usize,
}

impl Batch {
    /// Parse and validate a raw stdin payload.
    pub fn parse(input: &str) -> Result<Self, SwarmError> {
        if input.trim().is_empty() {
            return Err(SwarmError::EmptyInput);
        }
        let data: Value = serde_json::from_str(input)?;
        Self::from_value(&data)
    }

    /// Validate an already-parsed JSON document.
    pub fn from_value(data: &Value) -> Result<Self, SwarmError> {
        let map = data.as_object().ok_or(SwarmError::TopLevelNotObject)?;

        let jobs_raw = map
            .get("jobs")
            .and_then(Value::as_array)
            .filter(|jobs| !jobs.is_empty())
            .ok_or(SwarmError::JobsInvalid)?;

        let max_parallel = match map.get("max_parallel") {
            None | Some(Value::Null) => DEFAULT_MAX_PARALLEL.min(jobs_raw.len()),
            Some(v) => parse_max_parallel(v)?,
        };

        let jobs = jobs_raw
            .iter()
            .enumerate()
            .map(|(i, job)| JobSpec::from_value(i + 1, job))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { jobs, max_parallel })
    }
}

/// Positive integers only; floats, booleans, zero, and negatives are all
/// shape errors.
fn parse_max_parallel(v: &Value) -> Result<usize, SwarmError> {
    match v.as_u64() {
        Some(n) if n >= 1 => Ok(n as usize),
        _ => Err(SwarmError::MaxParallelInvalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Batch, SwarmError> {
        Batch::parse(input)
    }

    #[test]
    fn minimal_batch() {
        let batch = parse(r#"{"jobs":[{"dir":"a","task":"t"}]}"#).unwrap();
        assert_eq!(batch.jobs.len(), 1);
        assert_eq!(batch.jobs[0].index, 1);
        assert_eq!(batch.jobs[0].dir, "a");
        assert_eq!(batch.jobs[0].task, "t");
        assert_eq!(batch.max_parallel, 1);
    }

    #[test]
    fn default_cap_is_min_of_four_and_job_count() {
        let two = r#"{"jobs":[{"dir":"a","task":"t"},{"dir":"b","task":"t"}]}"#;
        assert_eq!(parse(two).unwrap().max_parallel, 2);

        let six_jobs: Vec<String> = (0..6)
            .map(|i| format!(r#"{{"dir":"d{}","task":"t"}}"#, i))
            .collect();
        let six = format!(r#"{{"jobs":[{}]}}"#, six_jobs.join(","));
        assert_eq!(parse(&six).unwrap().max_parallel, 4);
    }

    #[test]
    fn explicit_cap_kept() {
        let batch = parse(r#"{"jobs":[{"dir":"a","task":"t"}],"max_parallel":9}"#).unwrap();
        assert_eq!(batch.max_parallel, 9);
    }

    #[test]
    fn null_cap_falls_back_to_default() {
        let batch = parse(r#"{"jobs":[{"dir":"a","task":"t"}],"max_parallel":null}"#).unwrap();
        assert_eq!(batch.max_parallel, 1);
    }

    #[test]
    fn empty_input_rejected() {
        assert!(matches!(parse(""), Err(SwarmError::EmptyInput)));
        assert!(matches!(parse("   \n"), Err(SwarmError::EmptyInput)));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(
            parse("{not json"),
            Err(SwarmError::InvalidJson(_))
        ));
    }

    #[test]
    fn top_level_must_be_object() {
        assert!(matches!(
            parse(r#"[{"dir":"a","task":"t"}]"#),
            Err(SwarmError::TopLevelNotObject)
        ));
        assert!(matches!(parse("42"), Err(SwarmError::TopLevelNotObject)));
    }

    #[test]
    fn jobs_must_be_nonempty_array() {
        assert!(matches!(parse(r#"{}"#), Err(SwarmError::JobsInvalid)));
        assert!(matches!(
            parse(r#"{"jobs":[]}"#),
            Err(SwarmError::JobsInvalid)
        ));
        assert!(matches!(
            parse(r#"{"jobs":"a"}"#),
            Err(SwarmError::JobsInvalid)
        ));
    }

    #[test]
    fn job_must_be_object() {
        assert!(matches!(
            parse(r#"{"jobs":["a"]}"#),
            Err(SwarmError::JobNotObject)
        ));
    }

    #[test]
    fn dir_and_task_must_be_nonblank_strings() {
        assert!(matches!(
            parse(r#"{"jobs":[{"task":"t"}]}"#),
            Err(SwarmError::DirFieldInvalid)
        ));
        assert!(matches!(
            parse(r#"{"jobs":[{"dir":"  ","task":"t"}]}"#),
            Err(SwarmError::DirFieldInvalid)
        ));
        assert!(matches!(
            parse(r#"{"jobs":[{"dir":42,"task":"t"}]}"#),
            Err(SwarmError::DirFieldInvalid)
        ));
        assert!(matches!(
            parse(r#"{"jobs":[{"dir":"a"}]}"#),
            Err(SwarmError::TaskFieldInvalid)
        ));
        assert!(matches!(
            parse(r#"{"jobs":[{"dir":"a","task":""}]}"#),
            Err(SwarmError::TaskFieldInvalid)
        ));
    }

    #[test]
    fn dir_is_trimmed_task_is_not() {
        let batch = parse(r#"{"jobs":[{"dir":"  a  ","task":" do it "}]}"#).unwrap();
        assert_eq!(batch.jobs[0].dir, "a");
        assert_eq!(batch.jobs[0].task, " do it ");
    }

    #[test]
    fn bad_max_parallel_rejected() {
        for bad in [r#""2""#, "0", "-1", "2.5", "true"] {
            let input = format!(r#"{{"jobs":[{{"dir":"a","task":"t"}}],"max_parallel":{}}}"#, bad);
            assert!(
                matches!(parse(&input), Err(SwarmError::MaxParallelInvalid)),
                "accepted max_parallel={}",
                bad
            );
        }
    }

    #[test]
    fn indices_are_one_based_and_ordered() {
        let batch = parse(
            r#"{"jobs":[{"dir":"a","task":"t"},{"dir":"b","task":"t"},{"dir":"c","task":"t"}]}"#,
        )
        .unwrap();
        let indices: Vec<usize> = batch.jobs.iter().map(|j| j.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }
}
