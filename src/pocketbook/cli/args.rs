use clap::{ArgAction, Parser};
use pocketbook::i18n::Language;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pocketbook", bin_name = "pocketbook", version)]
#[command(about = "Conversational keeper for contacts and notes", long_about = None)]
pub struct Cli {
    /// Directory holding contacts.json, notes.json and settings
    #[arg(long, env = "POCKETBOOK_DATA", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Interface language for this session (en, uk)
    #[arg(long, value_name = "LANG")]
    pub lang: Option<Language>,

    /// More log output on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Run this one command line (e.g. `show all`) instead of the shell
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl Cli {
    /// The trailing words as one command line, if any were given.
    pub fn command_line(&self) -> Option<String> {
        let line = self.command.join(" ");
        let line = line.trim();
        (!line.is_empty()).then(|| line.to_string())
    }
}
