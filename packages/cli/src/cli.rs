use api::{ReportId, ReportStatus};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "findme", version, about = "FindMe missing-persons client")]
pub struct Cli {
    /// Override the API base URL from settings
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Sign in and keep the session token
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        name: String,
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List public reports
    List(ListArgs),
    /// List your own reports
    Mine {
        #[arg(long)]
        newest: bool,
    },
    /// Show one report
    Show { id: ReportId },
    /// Server-side search
    Search(SearchArgs),
    /// Quick search across name, location, contact and details
    Find { term: String },
    /// Submit a new report
    Report(ReportArgs),
    /// Change fields of one of your reports
    Update {
        id: ReportId,
        #[command(flatten)]
        fields: UpdateArgs,
    },
    /// Delete one of your reports
    Delete { id: ReportId },
    /// Check backend health
    Health,
}

#[derive(Args)]
pub struct ListArgs {
    /// Case-insensitive part of the full name
    #[arg(long)]
    pub name: Option<String>,
    /// Exact last-seen location, or "All"
    #[arg(long, default_value = "All")]
    pub location: String,
    /// Missing, Found or "All"
    #[arg(long, default_value = "All")]
    pub status: String,
    /// Sort by creation time, newest first
    #[arg(long)]
    pub newest: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub gender: Option<String>,
    #[arg(long)]
    pub status: Option<ReportStatus>,
    #[arg(long)]
    pub age_min: Option<u32>,
    #[arg(long)]
    pub age_max: Option<u32>,
}

#[derive(Args)]
pub struct ReportArgs {
    #[arg(long)]
    pub full_name: String,
    #[arg(long)]
    pub age: String,
    #[arg(long)]
    pub gender: String,
    #[arg(long, default_value = "")]
    pub height: String,
    #[arg(long)]
    pub location: String,
    /// Date last seen, YYYY-MM-DD
    #[arg(long)]
    pub date: String,
    #[arg(long, default_value = "Missing")]
    pub status: String,
    #[arg(long, default_value = "")]
    pub info: String,
    #[arg(long, default_value = "")]
    pub photo_url: String,
    #[arg(long)]
    pub contact_name: String,
    #[arg(long)]
    pub contact_phone: String,
    #[arg(long)]
    pub case_number: String,
}

#[derive(Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub age: Option<u32>,
    #[arg(long)]
    pub gender: Option<String>,
    #[arg(long)]
    pub height: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    /// Date last seen, YYYY-MM-DD
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub status: Option<ReportStatus>,
    #[arg(long)]
    pub info: Option<String>,
    #[arg(long)]
    pub photo_url: Option<String>,
    #[arg(long)]
    pub contact_name: Option<String>,
    #[arg(long)]
    pub contact_phone: Option<String>,
}
