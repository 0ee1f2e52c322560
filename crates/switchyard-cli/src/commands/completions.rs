//! Shell completion scripts

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io;

use crate::args::Args as CliArgs;

/// Completions command arguments
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `args.shell` to stdout
pub fn execute(args: &CompletionsArgs) -> Result<()> {
    let mut cmd = CliArgs::command();
    let bin_name = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, bin_name, &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::args::Args;
    use crate::commands::Command;
    use clap::Parser;
    use clap_complete::Shell;

    #[test]
    fn test_every_shell_parses() {
        for (name, shell) in [
            ("bash", Shell::Bash),
            ("zsh", Shell::Zsh),
            ("fish", Shell::Fish),
            ("powershell", Shell::PowerShell),
            ("elvish", Shell::Elvish),
        ] {
            let args = Args::parse_from(["switchyard", "completions", name]);
            assert!(
                matches!(args.command, Some(Command::Completions(ref c)) if c.shell == shell),
                "{name}"
            );
        }
    }
}
