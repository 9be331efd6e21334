// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::format::FnResolver;

/// Understands just enough commands to observe the interpreter.
#[derive(Default)]
struct FakeHost {
    env: Environment,
    cwd: PathBuf,
    output: Vec<String>,
    errors: Vec<String>,
    executed: Vec<String>,
    exit: bool,
}

impl FakeHost {
    fn new() -> Self {
        Self { cwd: PathBuf::from("/start"), ..Self::default() }
    }
}

impl ScriptHost for FakeHost {
    fn execute(&mut self, command: &str) -> i32 {
        self.executed.push(command.to_string());
        let env = self.env.clone();
        let command =
            Template::new(command).delimiter('%').expand(&mut FnResolver(|name: &str| {
                env.get(name).map(str::to_string)
            }));
        let (word, rest) = command.split_once(' ').unwrap_or((command.as_str(), ""));
        match word {
            "echo" => {
                self.output.push(rest.to_string());
                0
            }
            "set" => {
                let (name, value) = rest.split_once('=').unwrap_or((rest, ""));
                if value.is_empty() {
                    self.env.remove(name);
                } else {
                    self.env.set(name, value);
                }
                0
            }
            "cd" => {
                self.cwd = PathBuf::from(rest);
                0
            }
            "exit" => {
                self.exit = true;
                0
            }
            "fail" => 7,
            _ => 9009,
        }
    }

    fn exit_requested(&self) -> bool {
        self.exit
    }

    fn environment(&self) -> &Environment {
        &self.env
    }

    fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    fn current_dir(&self) -> PathBuf {
        self.cwd.clone()
    }

    fn set_current_dir(&mut self, dir: &Path) -> io::Result<()> {
        self.cwd = dir.to_path_buf();
        Ok(())
    }

    fn report_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

fn run(source: &str, args: &[&str]) -> (FakeHost, i32) {
    let mut host = FakeHost::new();
    let mut script =
        Script::from_source("test.ys1", source, args.iter().map(|a| a.to_string()).collect());
    let code = script.run(&mut host);
    (host, code)
}

#[test]
fn set_then_echo_sees_new_value() {
    let (host, code) = run("set FOO=BAR\necho %FOO%\n", &[]);
    assert_eq!(host.output, ["BAR"]);
    assert_eq!(host.env.get("FOO"), Some("BAR"));
    assert_eq!(code, 0);
}

#[test]
fn call_frame_rolls_back_environment() {
    let source = "set A=1\ncall :sub\necho %A%\ngoto :eof\n:sub\nset A=2\nreturn 0\n";
    let (host, _) = run(source, &[]);
    assert_eq!(host.output, ["1"]);
    assert_eq!(host.env.get("A"), Some("1"));
}

#[test]
fn return_preserves_named_variables() {
    let source = "set A=1\nset B=1\ncall :sub\necho %A% %B%\ngoto :eof\n:sub\nset A=2\nset B=2\nreturn 0 A\n";
    let (host, _) = run(source, &[]);
    assert_eq!(host.output, ["2 1"]);
}

#[test]
fn preserved_deletion_stays_deleted() {
    let source = "set A=1\ncall :sub\necho [%A%]\ngoto :eof\n:sub\nset A=\nreturn 0 a\n";
    let (host, _) = run(source, &[]);
    assert_eq!(host.output, ["[%A%]"]);
    assert!(!host.env.contains("A"));
}

#[test]
fn variables_created_in_call_are_removed() {
    let source = "call :sub\necho [%NEW%]\ngoto :eof\n:sub\nset NEW=x\nreturn\n";
    let (host, _) = run(source, &[]);
    assert_eq!(host.output, ["[%NEW%]"]);
}

#[test]
fn return_restores_directory() {
    let source = "call :sub\necho done\ngoto :eof\n:sub\ncd /elsewhere\nreturn 0\n";
    let (host, _) = run(source, &[]);
    assert_eq!(host.cwd, PathBuf::from("/start"));
}

#[test]
fn scenario_script_without_eof_guard_falls_into_subroutine() {
    let source = "set A=1\ncall :sub\necho %A%\n:sub\nset A=2\nreturn 0\n";
    let (host, code) = run(source, &[]);
    assert_eq!(host.output, ["1"]);
    assert_eq!(code, 0);
}

#[test]
fn call_arguments_are_positional_in_frame() {
    let source = "call :sub one \"two words\"\necho %1%\ngoto :eof\n:sub\necho %1%|%2%|%*%\nreturn\n";
    let (host, _) = run(source, &["outer"]);
    assert_eq!(host.output, ["one|two words|one \"two words\"", "outer"]);
}

#[test]
fn global_arguments_and_script_name() {
    let (host, _) = run("echo %0% %1% %2% [%3%] %~SCRIPTNAME%\necho %*%\n", &["a", "b"]);
    assert_eq!(host.output, ["test.ys1 a b [] test.ys1", "a b"]);
}

#[test]
fn unknown_names_are_left_for_the_host() {
    let script = Script::from_source("s.ys1", "", vec![]);
    assert_eq!(script.expand("%PATH% %1%"), "%PATH% ");
}

#[test]
fn escapes_survive_for_the_host() {
    let script = Script::from_source("s.ys1", "", vec!["x".to_string()]);
    assert_eq!(script.expand("echo a^&b ^%1^% %1%"), "echo a^&b ^%1^% x");
}

#[test]
fn shift_moves_arguments_and_fails() {
    let (host, code) = run("shift\necho %1%\nshift\nshift\nshift\necho [%1%]\nshift\n", &["a", "b"]);
    assert_eq!(host.output, ["b", "[]"]);
    assert_eq!(code, 1);
}

#[test]
fn shift_is_capped_at_argc() {
    let mut script = Script::from_source("s.ys1", "", vec!["a".to_string()]);
    for _ in 0..5 {
        assert_eq!(script.shift(), 1);
    }
    assert_eq!(script.args().shift_count(), 2);
    assert_eq!(script.args().arg(0), None);
}

#[test]
fn goto_skips_lines_and_labels_ignore_case() {
    let (host, _) = run("goto :Later\necho skipped\n:LATER\necho reached\n", &[]);
    assert_eq!(host.output, ["reached"]);
}

#[test]
fn goto_unknown_label_fails_without_moving() {
    let mut host = FakeHost::new();
    let mut script = Script::from_source("s.ys1", "echo a\n:x\n", vec![]);
    assert_eq!(script.goto("nowhere", &mut host), 1);
    assert_eq!(script.active_line(), 0);
    assert_eq!(host.errors, ["wsh: goto failed: label 'nowhere' not found"]);
}

#[test]
fn eof_label_is_past_last_line() {
    let script = Script::from_source("s.ys1", "a\nb\n:eof_not\n", vec![]);
    assert_eq!(script.find_label(":EOF"), Some(3));
    assert_eq!(script.find_label("eof_not"), Some(2));
}

#[test]
fn call_unknown_label_discards_frame() {
    let (host, code) = run("call :missing\n", &[]);
    assert_eq!(code, 1);
    assert_eq!(host.errors, ["wsh: call failed: label ':missing' not found"]);
}

#[test]
fn call_without_label_runs_as_command() {
    let (host, _) = run("call other.ys1\n", &[]);
    assert_eq!(host.executed, ["call other.ys1"]);
}

#[test]
fn global_return_sets_exit_code_and_stops() {
    let (host, code) = run("echo a\nreturn 4\necho b\n", &[]);
    assert_eq!(host.output, ["a"]);
    assert_eq!(code, 4);
}

#[yare::parameterized(
    bare = { "return", 0 },
    hex = { "return 0x10", 16 },
    junk = { "return abc", 0 },
)]
fn global_return_parses_permissively(line: &str, expected: i32) {
    let (_, code) = run(line, &[]);
    assert_eq!(code, expected);
}

#[test]
fn return_in_frame_sets_exit_code_of_the_call() {
    let mut host = FakeHost::new();
    let mut script = Script::from_source("s.ys1", "call :sub\n:sub\n", vec![]);
    let argv = vec!["call".to_string(), ":sub".to_string()];
    assert_eq!(script.call(argv, &mut host), 0);
    assert_eq!(script.call_depth(), 1);
    assert_eq!(script.active_line(), 1);

    assert_eq!(script.return_(&["3".to_string()], &mut host), 3);
    assert_eq!(script.call_depth(), 0);
    assert_eq!(script.active_line(), 0);
}

#[test]
fn falling_off_end_in_call_returns_to_caller() {
    let source = "set A=1\ncall :sub\necho after %A%\nreturn 0\n:sub\nset A=2\n";
    let (host, code) = run(source, &[]);
    assert_eq!(host.output, ["after 1"]);
    assert_eq!(code, 0);
}

#[test]
fn exit_request_stops_script() {
    let (host, _) = run("echo a\nexit\necho b\n", &[]);
    assert_eq!(host.output, ["a"]);
}

#[test]
fn last_command_sets_exit_code() {
    let (_, code) = run("echo a\nfail\n", &[]);
    assert_eq!(code, 7);
}

#[test]
fn include_splices_after_active_line() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("lib.ys1"), "echo included\n:fn\necho in fn\n").unwrap();

    let mut host = FakeHost::new();
    host.cwd = dir.path().to_path_buf();
    let mut script =
        Script::from_source("s.ys1", "include lib.ys1\necho after\ngoto :eof\n", vec![]);
    script.run(&mut host);

    assert_eq!(host.output, ["included", "in fn", "after"]);
    assert_eq!(script.lines().len(), 6);
}

#[test]
fn include_of_missing_file_leaves_lines() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = FakeHost::new();
    host.cwd = dir.path().to_path_buf();
    let mut script = Script::from_source("s.ys1", "include nope.ys1\n", vec![]);
    assert_eq!(script.include(Path::new("nope.ys1"), &mut host), 1);
    assert_eq!(script.lines().len(), 1);
    assert!(host.errors[0].starts_with("wsh: include failed: cannot include"));
}

#[test]
fn nested_calls_unwind_in_order() {
    let source = "\
set L=0
call :one
echo %L%
goto :eof
:one
set L=1
call :two
echo one %L%
return 0 L
:two
set L=2
return 0
";
    let (host, _) = run(source, &[]);
    assert_eq!(host.output, ["one 1", "1"]);
}

#[test]
fn load_reads_file_and_reports_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("s.ys1");
    std::fs::write(&path, "echo a\r\necho b\r\n").unwrap();
    let script = Script::load(&path, vec![]).unwrap();
    assert_eq!(script.lines(), ["echo a", "echo b"]);

    let missing = Script::load(&dir.path().join("none.ys1"), vec![]);
    assert!(matches!(missing, Err(ScriptError::Load { .. })));
}

#[yare::parameterized(
    plain = { "run.ys1", true },
    upper = { "RUN.YS1", true },
    other = { "run.cmd", false },
    none = { "run", false },
)]
fn script_extension(program: &str, expected: bool) {
    assert_eq!(is_script(program), expected);
}

#[test]
fn split_arguments_honours_quotes() {
    assert_eq!(split_arguments("call :x \"a b\" c"), ["call", ":x", "a b", "c"]);
    assert_eq!(split_arguments("  "), Vec::<String>::new());
    assert_eq!(split_arguments("x \"\""), ["x", ""]);
}
