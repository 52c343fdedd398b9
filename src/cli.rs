use clap::{Parser, Subcommand};

/// Print-shop job management server
#[derive(Parser)]
#[command(name = "printshop-manager", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server (the default when no subcommand is given)
    Serve,
    /// Check database connectivity and list the tables in the public schema
    VerifyDb,
}
