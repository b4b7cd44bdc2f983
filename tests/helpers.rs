//! Shared test helpers to reduce duplication across integration tests.

#![allow(dead_code)]

#[allow(clippy::duplicate_mod)]
#[path = "fixtures/mod.rs"]
pub mod fixtures;

use fixtures::{MockEditor, MockTerminal, Transcript};
use futures::stream;
use nut_term::{Args, CommandError, CommandResult, Response, Shell, ShellError, SubShell};

pub type TestShell = Shell<MockEditor, MockTerminal>;
pub type TestSubShell = SubShell<MockEditor, MockTerminal>;

// ============================================================================
// Shell Creation Helpers
// ============================================================================

/// Route `log` output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Create a bare shell plus the transcript its collaborators write to.
pub fn create_bare_shell() -> (TestShell, Transcript) {
    init_logging();
    let transcript = Transcript::default();
    let shell = Shell::new(
        MockEditor::new(transcript.clone()),
        MockTerminal::new(transcript.clone()),
    );
    shell.activate();
    (shell, transcript)
}

/// Create a shell with the standard test commands registered:
/// - `echo ARGS...`: prints the joined positional args as one line
/// - `fail`: errors with "boom"
/// - `gen`: streams "a", "b", "c"
/// - `flags`: prints each flag as `name=value`
pub fn create_test_shell() -> (TestShell, Transcript) {
    let (shell, transcript) = create_bare_shell();
    shell
        .register("echo", |shell, args| Response::immediate(echo(shell, args)))
        .unwrap()
        .register("fail", |_shell, _args| {
            Response::fail(anyhow::anyhow!("boom"))
        })
        .unwrap()
        .register("gen", |_shell, _args| Response::chunks(["a", "b", "c"]))
        .unwrap()
        .register("flags", |shell, args| Response::immediate(flags(shell, args)))
        .unwrap();
    (shell, transcript)
}

async fn echo(shell: TestSubShell, args: Args) -> CommandResult {
    shell.print_line(&args.positional.join(" "))?;
    Ok(())
}

async fn flags(shell: TestSubShell, args: Args) -> CommandResult {
    for (name, value) in args.flags.iter() {
        shell.print_line(&format!("{}={:?}", name, value))?;
    }
    Ok(())
}

/// Stream that yields `items` and then fails with `message`.
pub fn failing_stream(items: &[&str], message: &'static str) -> Response {
    let mut chunks: Vec<Result<String, CommandError>> =
        items.iter().map(|s| Ok(s.to_string())).collect();
    chunks.push(Err(anyhow::anyhow!(message)));
    Response::streamed(stream::iter(chunks))
}

// ============================================================================
// Execution Helpers
// ============================================================================

/// Feed lines to the editor and run the REPL until the script runs out.
pub async fn run_lines(shell: &TestShell, lines: &[&str]) {
    shell.editor().push_lines(lines);
    shell.repl().await.unwrap();
}

/// Error returned by `execute`, as a `ShellError`.
pub async fn shell_error(shell: &TestShell, line: &str) -> ShellError {
    let err = shell.execute(line).await.unwrap_err();
    err.downcast::<ShellError>()
        .unwrap_or_else(|err| panic!("expected ShellError, got {:?}", err))
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert that output contains all expected strings.
pub fn assert_contains_all(output: &str, expected: &[&str]) {
    for exp in expected {
        assert!(
            output.contains(exp),
            "Expected '{}' in output, got: {}",
            exp,
            output
        );
    }
}

/// Assert that output does NOT contain any of the strings.
pub fn assert_contains_none(output: &str, forbidden: &[&str]) {
    for forbid in forbidden {
        assert!(
            !output.contains(forbid),
            "Did not expect '{}' in output, got: {}",
            forbid,
            output
        );
    }
}

/// Assert the line editor's attach/detach calls balance and it owns input.
pub fn assert_attachment_balanced(shell: &TestShell) {
    let editor = shell.editor();
    assert_eq!(
        editor.attaches(),
        editor.detaches(),
        "attach/detach calls must pair up"
    );
    assert!(editor.is_attached(), "line editor should own input");
    assert!(shell.is_attached());
}
