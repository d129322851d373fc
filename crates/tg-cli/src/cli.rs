use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tg")]
#[command(about = "Tenant access gate: decode session tokens and check tenant access")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Membership API URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a session token without verifying it
    Claims {
        #[arg(long)]
        token: String,
    },

    /// Decide whether a session may enter a tenant
    Check {
        #[arg(long)]
        token: String,

        /// User id (defaults to the token's user id)
        #[arg(long)]
        user: Option<String>,

        /// Tenant slug
        #[arg(long)]
        tenant: String,
    },

    /// Print where logging out of a tenant lands
    Logout {
        #[arg(long)]
        tenant: String,
    },
}
