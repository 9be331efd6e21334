// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::process::StdioSpec;
use std::io::Read;

fn sh(script: &str) -> LaunchRequest {
    let mut request =
        LaunchRequest::new(vec!["/bin/sh".to_string(), "-c".to_string(), script.to_string()]);
    request.env = std::env::vars().collect();
    request
}

#[test]
fn reports_exit_code() {
    let mut child = SystemLauncher::new().launch(sh("exit 3")).unwrap();
    assert_eq!(child.wait().unwrap(), 3);
    assert_eq!(child.poll_exit().unwrap(), Some(3));
}

#[test]
fn missing_program_is_a_spawn_error() {
    let request = LaunchRequest::new(vec!["/definitely/not/here".to_string()]);
    let err = SystemLauncher::new().launch(request).err().unwrap();
    assert!(matches!(err, LaunchError::Spawn { .. }));
}

#[test]
fn passes_environment_and_directory() {
    let dir = tempfile::tempdir().unwrap();
    let (mut reader, writer) = io::pipe().unwrap();
    let mut request = sh("printf '%s|' \"$WSH_TEST\"; pwd");
    request.env.push(("WSH_TEST".to_string(), "value".to_string()));
    request.cwd = dir.path().to_path_buf();
    request.stdout = StdioSpec::PipeWrite(writer);

    let mut child = SystemLauncher::new().launch(request).unwrap();
    let mut output = String::new();
    reader.read_to_string(&mut output).unwrap();
    assert_eq!(child.wait().unwrap(), 0);

    let (value, cwd) = output.trim_end().split_once('|').unwrap();
    assert_eq!(value, "value");
    assert_eq!(
        std::fs::canonicalize(cwd).unwrap(),
        std::fs::canonicalize(dir.path()).unwrap()
    );
}

#[test]
fn wait_for_times_out_then_sees_exit() {
    let cancel = CancelToken::new();
    let mut child = SystemLauncher::new().launch(sh("sleep 0.3")).unwrap();
    assert_eq!(
        child.wait_for(Some(Duration::from_millis(20)), &cancel, None),
        WaitSignal::Timeout
    );
    assert_eq!(child.wait_for(None, &cancel, None), WaitSignal::Target);
    assert_eq!(child.wait().unwrap(), 0);
}

#[test]
fn terminate_stops_child() {
    let mut child = SystemLauncher::new().launch(sh("sleep 30")).unwrap();
    assert_eq!(child.poll_exit().unwrap(), None);
    child.interrupt(false).unwrap();
    assert_eq!(child.wait().unwrap(), 128 + 9);
}

#[test]
fn capture_is_unavailable_without_debugger() {
    let mut request = sh("true");
    request.capture_environment = true;
    let mut child = SystemLauncher::new().launch(request).unwrap();
    child.wait().unwrap();
    assert!(child.take_captured_state().is_none());
}
