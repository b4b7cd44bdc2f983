//! Built-in commands: `help`, `clear`, `env`, `set`, `unset`.
//!
//! Ordinary registry entries; a host may override any of them by
//! registering the same name afterwards.

use super::{Args, Shell, SubShell};
use crate::error::{CommandResult, ShellError};
use crate::io::{LineEditor, Terminal};
use crate::response::Response;

impl<E, T> Shell<E, T>
where
    E: LineEditor + 'static,
    T: Terminal + 'static,
{
    /// Register the built-in commands.
    pub fn register_builtins(&self) -> Result<&Self, ShellError> {
        let env = self.environment();
        let set_keys = env.clone();

        self.register("help", |shell, _args| Response::immediate(help(shell)))?
            .register("clear", |shell, _args| Response::immediate(clear(shell)))?
            .register("env", |shell, _args| Response::immediate(print_env(shell)))?
            .register_with_autocomplete(
                "set",
                |shell, args| Response::immediate(set(shell, args)),
                move |index, _args| match index {
                    0 => set_keys.keys(),
                    _ => Vec::new(),
                },
            )?
            .register_with_autocomplete(
                "unset",
                |shell, args| Response::immediate(unset(shell, args)),
                move |_index, _args| env.keys(),
            )
    }
}

async fn help<E: LineEditor, T: Terminal>(shell: SubShell<E, T>) -> CommandResult {
    let names = shell.commands()?;
    shell.print_list(names.as_slice())?;
    Ok(())
}

async fn clear<E: LineEditor, T: Terminal>(shell: SubShell<E, T>) -> CommandResult {
    shell.clear()?;
    Ok(())
}

async fn print_env<E: LineEditor, T: Terminal>(shell: SubShell<E, T>) -> CommandResult {
    for (key, value) in shell.environment()?.vars() {
        shell.print_line(&format!("{}={}", key, value))?;
    }
    Ok(())
}

async fn set<E: LineEditor, T: Terminal>(shell: SubShell<E, T>, args: Args) -> CommandResult {
    let Some((key, value)) = args.positional.split_first() else {
        anyhow::bail!("usage: set KEY [VALUE...]");
    };
    let env = shell.environment()?;
    env.set(key.as_str(), value.join(" "));
    Ok(())
}

async fn unset<E: LineEditor, T: Terminal>(shell: SubShell<E, T>, args: Args) -> CommandResult {
    if args.positional.is_empty() {
        anyhow::bail!("usage: unset KEY...");
    }
    let env = shell.environment()?;
    for key in &args.positional {
        env.remove(key);
    }
    Ok(())
}
