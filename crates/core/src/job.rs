// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background job tracking.
//!
//! Jobs are reported and collected only from [`JobTable::scan`], which the
//! shell runs at each prompt. A completed job stays inspectable for
//! [`RETENTION_SCANS`] further scans unless it has been retained.

use std::fmt;
use std::io;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::buffer::OutputBuffer;
use crate::wait::WaitOutcome;

/// Scan passes a completed job survives before it is deleted.
pub const RETENTION_SCANS: u32 = 16;

/// Exit code given to jobs killed with [`JobTable::terminate`].
pub const TERMINATED_EXIT_CODE: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(u32);

impl JobId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Executing,
    CompletedAwaitingDelete,
    Retained,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobState::Executing => "executing",
            JobState::CompletedAwaitingDelete => "completed",
            JobState::Retained => "retained",
        })
    }
}

/// Scheduling priority classes understood by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Idle,
    BelowNormal,
    Normal,
    AboveNormal,
    High,
    Realtime,
}

impl FromStr for Priority {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "idle" | "low" => Ok(Priority::Idle),
            "belownormal" | "below_normal" => Ok(Priority::BelowNormal),
            "normal" => Ok(Priority::Normal),
            "abovenormal" | "above_normal" => Ok(Priority::AboveNormal),
            "high" => Ok(Priority::High),
            "realtime" => Ok(Priority::Realtime),
            _ => Err(JobError::UnknownPriority(s.to_string())),
        }
    }
}

/// The process behind a job.
pub trait JobProcess: Send {
    fn pid(&self) -> u32;

    /// Zero-timeout completion check.
    fn poll_exit(&mut self) -> io::Result<Option<i32>>;

    fn terminate(&mut self, exit_code: u32) -> io::Result<()>;

    fn set_priority(&mut self, priority: Priority) -> io::Result<()>;
}

impl<P: JobProcess + ?Sized> JobProcess for Box<P> {
    fn pid(&self) -> u32 {
        (**self).pid()
    }

    fn poll_exit(&mut self) -> io::Result<Option<i32>> {
        (**self).poll_exit()
    }

    fn terminate(&mut self, exit_code: u32) -> io::Result<()> {
        (**self).terminate(exit_code)
    }

    fn set_priority(&mut self, priority: Priority) -> io::Result<()> {
        (**self).set_priority(priority)
    }
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("job {0} not found")]
    NotFound(JobId),

    #[error("job {0} is not executing")]
    NotExecuting(JobId),

    #[error("job {0} has no buffered output")]
    NoOutput(JobId),

    #[error("unknown priority class '{0}'")]
    UnknownPriority(String),

    #[error("job {id}: {source}")]
    Io { id: JobId, source: io::Error },
}

/// A line the shell prints about a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobNotice {
    Started { id: JobId, command: String },
    Completed { id: JobId, exit_code: i32, command: String },
    /// `exit_code` is `None` for a job still executing at teardown.
    Deleted { id: JobId, exit_code: Option<i32>, command: String },
}

impl fmt::Display for JobNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobNotice::Started { id, command } => write!(f, "Job {id}: {command}"),
            JobNotice::Completed { id, exit_code, command } => {
                write!(f, "Job {id} completed, result {exit_code}: {command}")
            }
            JobNotice::Deleted { id, exit_code: Some(exit_code), command } => {
                write!(f, "Job {id} deleted, result {exit_code}: {command}")
            }
            JobNotice::Deleted { id, exit_code: None, command } => {
                write!(f, "Job {id} deleted: {command}")
            }
        }
    }
}

/// Read-only view of a job for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobInfo {
    pub id: JobId,
    pub state: JobState,
    pub pid: u32,
    pub exit_code: Option<i32>,
    pub command: String,
    pub has_output: bool,
}

struct Job<P> {
    id: JobId,
    state: JobState,
    process: P,
    pid: u32,
    exit_code: Option<i32>,
    scans_since_completion: u32,
    retain_on_completion: bool,
    command: String,
    output: Option<OutputBuffer>,
}

impl<P> Job<P> {
    fn info(&self) -> JobInfo {
        JobInfo {
            id: self.id,
            state: self.state,
            pid: self.pid,
            exit_code: self.exit_code,
            command: self.command.clone(),
            has_output: self.output.is_some(),
        }
    }

    fn complete(&mut self, exit_code: i32) -> JobNotice {
        self.exit_code = Some(exit_code);
        self.state = if self.retain_on_completion {
            JobState::Retained
        } else {
            JobState::CompletedAwaitingDelete
        };
        tracing::info!(job = %self.id, exit_code, "job completed");
        JobNotice::Completed { id: self.id, exit_code, command: self.command.clone() }
    }
}

/// Table of background jobs owned by the shell's main thread.
pub struct JobTable<P> {
    jobs: Vec<Job<P>>,
    last_id: u32,
}

impl<P> Default for JobTable<P> {
    fn default() -> Self {
        Self { jobs: Vec::new(), last_id: 0 }
    }
}

impl<P: JobProcess> JobTable<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Takes ownership of `process` as the next job.
    pub fn create(
        &mut self,
        process: P,
        command: impl Into<String>,
        output: Option<OutputBuffer>,
    ) -> (JobId, JobNotice) {
        self.last_id += 1;
        let id = JobId(self.last_id);
        let command = command.into();
        let pid = process.pid();
        tracing::info!(job = %id, pid, %command, "job created");
        self.jobs.push(Job {
            id,
            state: JobState::Executing,
            process,
            pid,
            exit_code: None,
            scans_since_completion: 0,
            retain_on_completion: false,
            command: command.clone(),
            output,
        });
        (id, JobNotice::Started { id, command })
    }

    /// One maintenance pass: reports completions and deletes expired jobs.
    pub fn scan(&mut self, teardown_all: bool) -> Vec<JobNotice> {
        let _span = tracing::debug_span!("job.scan", teardown_all, jobs = self.jobs.len()).entered();
        let mut notices = Vec::new();

        for job in &mut self.jobs {
            match job.state {
                JobState::Executing => match job.process.poll_exit() {
                    Ok(Some(code)) => notices.push(job.complete(code)),
                    Ok(None) => {}
                    Err(e) => tracing::warn!(job = %job.id, error = %e, "job poll failed"),
                },
                JobState::CompletedAwaitingDelete => job.scans_since_completion += 1,
                JobState::Retained => {}
            }
        }

        let mut kept = Vec::with_capacity(self.jobs.len());
        for job in self.jobs.drain(..) {
            let expired = job.state == JobState::CompletedAwaitingDelete
                && job.scans_since_completion >= RETENTION_SCANS;
            if !(teardown_all || expired) {
                kept.push(job);
                continue;
            }
            tracing::debug!(job = %job.id, executing = job.exit_code.is_none(), "job deleted");
            notices.push(JobNotice::Deleted {
                id: job.id,
                exit_code: job.exit_code,
                command: job.command,
            });
        }
        self.jobs = kept;
        notices
    }

    fn job_mut(&mut self, id: JobId) -> Result<&mut Job<P>, JobError> {
        self.jobs.iter_mut().find(|job| job.id == id).ok_or(JobError::NotFound(id))
    }

    fn executing_mut(&mut self, id: JobId) -> Result<&mut Job<P>, JobError> {
        let job = self.job_mut(id)?;
        if job.state != JobState::Executing {
            return Err(JobError::NotExecuting(id));
        }
        Ok(job)
    }

    pub fn terminate(&mut self, id: JobId) -> Result<(), JobError> {
        let job = self.executing_mut(id)?;
        tracing::info!(job = %id, pid = job.pid, "terminating job");
        job.process.terminate(TERMINATED_EXIT_CODE).map_err(|source| JobError::Io { id, source })
    }

    pub fn set_priority(&mut self, id: JobId, priority: Priority) -> Result<(), JobError> {
        let job = self.executing_mut(id)?;
        job.process.set_priority(priority).map_err(|source| JobError::Io { id, source })
    }

    pub fn output(&mut self, id: JobId) -> Result<(Vec<u8>, Vec<u8>), JobError> {
        let job = self.job_mut(id)?;
        job.output.as_ref().map(OutputBuffer::contents).ok_or(JobError::NoOutput(id))
    }

    /// Forwards the job's future output into `stdout`/`stderr` too.
    pub fn pipe(
        &mut self,
        id: JobId,
        stdout: Box<dyn io::Write + Send>,
        stderr: Box<dyn io::Write + Send>,
    ) -> Result<(), JobError> {
        let job = self.job_mut(id)?;
        let buffer = job.output.as_ref().ok_or(JobError::NoOutput(id))?;
        buffer.pipe_to(stdout, stderr);
        Ok(())
    }

    /// Exempts a job from deletion by scans.
    pub fn retain(&mut self, id: JobId) -> Result<(), JobError> {
        let job = self.job_mut(id)?;
        match job.state {
            JobState::Executing => job.retain_on_completion = true,
            JobState::CompletedAwaitingDelete | JobState::Retained => job.state = JobState::Retained,
        }
        Ok(())
    }

    /// Blocks on the job through `wait`; a cancelled wait terminates it.
    pub fn wait<F>(&mut self, id: JobId, wait: F) -> Result<WaitOutcome, JobError>
    where
        F: FnOnce(&mut P) -> WaitOutcome,
    {
        let job = self.job_mut(id)?;
        if job.state != JobState::Executing {
            return Ok(WaitOutcome::ProcessExit);
        }
        let outcome = wait(&mut job.process);
        if outcome == WaitOutcome::Cancel {
            job.process
                .terminate(TERMINATED_EXIT_CODE)
                .map_err(|source| JobError::Io { id, source })?;
        }
        Ok(outcome)
    }

    /// The id following `prev` (`0` starts the walk), or `0` when exhausted.
    pub fn next_id(&self, prev: u32) -> u32 {
        self.jobs.iter().map(|job| job.id.0).find(|id| *id > prev).unwrap_or(0)
    }

    pub fn info(&self, id: JobId) -> Option<JobInfo> {
        self.jobs.iter().find(|job| job.id == id).map(Job::info)
    }

    pub fn list(&self) -> Vec<JobInfo> {
        self.jobs.iter().map(Job::info).collect()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
