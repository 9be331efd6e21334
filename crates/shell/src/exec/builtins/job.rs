// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `job`: inspect and control background jobs.

use wsh_core::{JobId, JobInfo, Priority, WaitOutcome, TERMINATED_EXIT_CODE};

use super::BuiltinIo;
use crate::exec::{ExecError, Shell};

const USAGE: &str = "usage: job [--json | -k N | -p N CLASS | -o N | -w N | -r N | -t N]";

fn parse_id(text: Option<&String>) -> Result<JobId, ExecError> {
    let text = text.ok_or_else(|| ExecError::builtin("job", USAGE))?;
    text.parse::<u32>()
        .map(JobId::new)
        .map_err(|_| ExecError::builtin("job", format!("invalid job id '{text}'")))
}

fn describe(info: &JobInfo) -> String {
    match info.exit_code {
        Some(code) => {
            format!("Job {} ({}, result {}): {}", info.id, info.state, code, info.command)
        }
        None => format!("Job {} ({}, pid {}): {}", info.id, info.state, info.pid, info.command),
    }
}

impl Shell {
    pub(super) fn job(&mut self, args: &[String], io: &mut BuiltinIo) -> Result<i32, ExecError> {
        let flag = args.first().map(String::as_str);
        let id = args.get(1);
        match flag {
            None => {
                for info in self.jobs.list() {
                    io.line(&describe(&info));
                }
            }
            Some("--json") => {
                let json = serde_json::to_string_pretty(&self.jobs.list())
                    .map_err(|e| ExecError::builtin("job", e.to_string()))?;
                io.line(&json);
            }
            Some("-k") => self.jobs.terminate(parse_id(id)?)?,
            Some("-p") => {
                let id = parse_id(id)?;
                let class = args.get(2).ok_or_else(|| ExecError::builtin("job", USAGE))?;
                let priority: Priority = class.parse()?;
                self.jobs.set_priority(id, priority)?;
            }
            Some("-o") => {
                let (out, err) = self.jobs.output(parse_id(id)?)?;
                io.out.extend_from_slice(&out);
                io.err.extend_from_slice(&err);
            }
            Some("-w") => {
                if self.wait_job(parse_id(id)?)? == WaitOutcome::Cancel {
                    return Ok(TERMINATED_EXIT_CODE as i32);
                }
            }
            Some("-r") => self.jobs.retain(parse_id(id)?)?,
            Some("-t") => {
                let (stdout, stderr) = (self.stdout.clone(), self.stderr.clone());
                self.jobs.pipe(parse_id(id)?, Box::new(stdout), Box::new(stderr))?;
            }
            Some(_) => return Err(ExecError::builtin("job", USAGE)),
        }
        Ok(0)
    }
}
