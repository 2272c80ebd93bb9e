use clap::{Parser, Subcommand};
use secrecy::SecretString;

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(
        short = 's',
        long = "stdout",
        action,
        help = "Controls if it logs to stdout/stderr instead of to a file"
    )]
    pub is_to_std_out: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a session. Does nothing if one is already stored
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "ACTAS_PASSWORD", hide_env_values = true)]
        password: SecretString,
    },
    /// Forget the stored session
    Logout,
    /// Show who is logged in and which dashboard they get
    Status,
    /// List all actas
    Actas,
    /// Show one acta
    Acta { id: u64 },
    /// Check that the backend is reachable
    Health,
}
