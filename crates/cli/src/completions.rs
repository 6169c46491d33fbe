// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wr completions <shell>`
//!
//! ```bash
//! wr completions bash > ~/.local/share/bash-completion/completions/wr
//! wr completions zsh > ~/.zfunc/_wr
//! ```
//!
//! The bash script also completes `wr run DOC <TAB>` with the document's
//! input names, listed by the hidden `wr complete-inputs`.

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::{self, Write};

const BIN: &str = "wr";

/// Completes input names once `wr run` has its document, falling back to
/// the generated completion otherwise
const BASH_RUN_INPUTS: &str = r#"
_wr_run_inputs() {
    if [[ "${COMP_WORDS[1]}" == run && ${COMP_CWORD} -ge 3 && "${COMP_WORDS[COMP_CWORD]}" != -* ]]; then
        local names
        names=$(wr complete-inputs "${COMP_WORDS[2]}" "${COMP_WORDS[COMP_CWORD]}" 2>/dev/null)
        if [[ -n "$names" ]]; then
            compopt -o nospace
            COMPREPLY=($names)
            return 0
        fi
    fi
    _wr "$@"
}
complete -F _wr_run_inputs -o bashdefault -o default wr
"#;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `shell`
pub fn write_completions<C: CommandFactory>(shell: Shell, out: &mut dyn Write) -> io::Result<()> {
    let mut cmd = C::command();
    generate(shell, &mut cmd, BIN, out);
    if shell == Shell::Bash {
        out.write_all(BASH_RUN_INPUTS.as_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(clap::Parser)]
    #[command(name = "wr")]
    struct Cli {
        #[command(subcommand)]
        command: Sub,
    }

    #[derive(clap::Subcommand)]
    enum Sub {
        Run,
    }

    fn script(shell: Shell) -> String {
        let mut out = Vec::new();
        write_completions::<Cli>(shell, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn bash_completes_run_inputs() {
        let bash = script(Shell::Bash);
        assert!(bash.contains("_wr()"));
        assert!(bash.contains("wr complete-inputs"));
        assert!(bash.trim_end().ends_with("complete -F _wr_run_inputs -o bashdefault -o default wr"));
    }

    #[test]
    fn other_shells_use_generated_script_only() {
        assert!(!script(Shell::Zsh).contains("complete-inputs"));
    }
}
