use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(
    name = "simplenote",
    version,
    about,
    long_about = "Download your Simplenote notes as JSON"
)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Args, PartialEq, Default)]
pub struct ConfigArgs {
    /// Profile name, or path to a profile TOML file
    #[arg(long, short, env = "SIMPLENOTE_PROFILE", global = true)]
    pub profile_path: Option<String>,

    /// Which server api to talk to
    #[arg(long, value_enum, global = true)]
    pub dialect: Option<Dialect>,

    /// File the incremental download appends to
    #[arg(long, value_name = "PATH", global = true)]
    pub notes_file: Option<String>,

    /// File receiving raw HTTP traces during the incremental download
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<String>,

    /// Override the Simperium data api root
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Override the Simperium auth root
    #[arg(long, value_name = "URL", global = true)]
    pub auth_url: Option<String>,

    /// Override the legacy api root
    #[arg(long, value_name = "URL", global = true)]
    pub legacy_url: Option<String>,

    /// Show debug output and a summary on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Prints out the resolved configuration
    Config(CredentialArgs),
    /// Prints every note as pretty JSON to stdout
    #[command(alias = "download_all")]
    DownloadAll(DownloadArgs),
    /// Appends notes not downloaded yet to the notes file
    #[command(alias = "download_incremental")]
    DownloadIncremental(DownloadArgs),
}

#[derive(Debug, Args, PartialEq, Default)]
pub struct CredentialArgs {
    /// Simperium API key (not needed for the legacy dialect)
    #[arg(env = "SIMPLENOTE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
    /// Account email
    #[arg(env = "SIMPLENOTE_USER")]
    pub user: Option<String>,
    /// Account password
    #[arg(env = "SIMPLENOTE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args, PartialEq)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Also fetch every older version the server still keeps
    #[arg(long, default_value_t = false)]
    pub all_versions: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// api.simperium.com, needs an API key
    #[default]
    Simperium,
    /// simple-note.appspot.com/api2, supports writes
    Legacy,
}
