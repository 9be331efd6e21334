// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{self, Cursor, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;
use wsh_adapters::{CancelToken, FakeAliases, FakeChild, FakeConsole, FakeLauncher, FakeTaskbar};
use wsh_core::Environment;

use super::*;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct Fixture {
    shell: Shell,
    launcher: FakeLauncher,
    out: Captured,
    dir: TempDir,
}

fn fixture(prompt: Option<&str>) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let launcher = FakeLauncher::new();
    let out = Captured::default();
    let mut env = Environment::new();
    env.set("PATH", "C:\\Windows");
    if let Some(prompt) = prompt {
        env.set("WSH_PROMPT", prompt);
    }
    let shell = Shell::builder()
        .env(env)
        .cwd(dir.path())
        .launcher(launcher.clone())
        .console(FakeConsole::new())
        .console_aliases(FakeAliases::new())
        .taskbar(FakeTaskbar::new())
        .cancel(CancelToken::new())
        .stdout(Output::new(out.clone()))
        .stderr(Output::new(out.clone()))
        .build()
        .unwrap();
    Fixture { shell, launcher, out, dir }
}

#[test]
fn runs_lines_until_end_of_input() {
    let mut f = fixture(Some(""));
    let prompt = Output::new(f.out.clone());
    let code = interact(&mut f.shell, Cursor::new("echo one\necho two\n"), &prompt);

    assert_eq!(code, 0);
    assert_eq!(f.out.text(), "one\ntwo\n");
}

#[test]
fn exit_stops_reading() {
    let mut f = fixture(Some(""));
    let prompt = Output::new(f.out.clone());
    let code = interact(&mut f.shell, Cursor::new("exit 4\necho unreachable\n"), &prompt);

    assert_eq!(code, 4);
    assert_eq!(f.out.text(), "");
}

#[test]
fn returns_last_exit_code_at_end_of_input() {
    let mut f = fixture(Some(""));
    f.launcher.push_child(FakeChild::new(7));
    let prompt = Output::new(f.out.clone());

    assert_eq!(interact(&mut f.shell, Cursor::new("tool\n"), &prompt), 7);
    assert_eq!(f.launcher.programs(), vec!["tool"]);
}

#[test]
fn prompt_is_rendered_before_each_line() {
    let mut f = fixture(Some("$G$ "));
    let prompt = Output::new(f.out.clone());
    interact(&mut f.shell, Cursor::new("echo hi\n"), &prompt);

    assert_eq!(f.out.text(), "> hi\n> ");
}

#[test]
fn prompt_follows_set() {
    let mut f = fixture(Some(""));
    let prompt = Output::new(f.out.clone());
    interact(&mut f.shell, Cursor::new("set WSH_PROMPT=$Q$\n"), &prompt);

    assert_eq!(f.out.text(), "=");
}

#[test]
fn default_prompt_shows_directory() {
    let mut f = fixture(None);
    let prompt = Output::new(f.out.clone());
    interact(&mut f.shell, Cursor::new(""), &prompt);

    assert_eq!(f.out.text(), format!("{}> ", f.dir.path().display()));
}

#[test]
fn background_jobs_are_reported_at_the_next_prompt() {
    let mut f = fixture(Some(""));
    let server = FakeChild::new(0);
    f.launcher.push_child(server.clone());
    let prompt = Output::new(f.out.clone());

    server.finish(0);
    interact(&mut f.shell, Cursor::new("server &!\necho next\n"), &prompt);

    let text = f.out.text();
    assert!(text.contains("Job 1 completed, result 0: server"), "{text}");
    assert!(text.contains("next\n"), "{text}");
}

#[test]
fn init_script_runs_first() {
    let mut f = fixture(Some(""));
    let script = f.dir.path().join("init.ys1");
    std::fs::write(&script, "set GREETING=hello\n").unwrap();

    run_init(&mut f.shell, Some(&script));
    let prompt = Output::new(f.out.clone());
    interact(&mut f.shell, Cursor::new("echo %GREETING%\n"), &prompt);

    assert_eq!(f.out.text(), "hello\n");
}

#[test]
fn missing_init_script_is_reported() {
    let mut f = fixture(Some(""));
    run_init(&mut f.shell, Some(Path::new("missing.ys1")));

    assert!(f.out.text().starts_with("wsh: script failed"), "{}", f.out.text());
    assert!(!f.shell.exit_requested());
}
