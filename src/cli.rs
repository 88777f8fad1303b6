use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fundboard")]
#[command(author, version, about = "Startup funding dashboard API server")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Load the demo data set into the database
    Seed,

    /// Apply pending schema migrations and print the schema version
    Migrate,

    /// Validate configuration file
    Validate,

    /// Generate a bcrypt password hash
    HashPassword {
        /// Password to hash
        password: String,
    },

    /// Set the password of an existing account (seeded accounts have none)
    SetPassword {
        /// Account email
        email: String,
        /// New password
        password: String,
    },

    /// Display version information
    Version,
}
