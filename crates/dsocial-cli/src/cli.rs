use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dsocial",
    about = "dSocial: post images to a feed stored on IPFS",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Config file (defaults to ./dsocial.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// IPFS HTTP RPC base URL, overriding the config file
    #[arg(long, global = true)]
    pub gateway: Option<String>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Publish an image post on the current profile
    Post(PostArgs),
    /// Show posts from the current profile, newest first
    Feed(FeedArgs),
    /// Show or change the current profile
    Profile(ProfileArgs),
    /// Print a stored object
    Show(ShowArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct PostArgs {
    #[arg(short, long, default_value = "")]
    pub caption: String,
    #[arg(short, long)]
    pub image: PathBuf,
}

#[derive(Args)]
pub struct FeedArgs {
    /// Number of posts to show (defaults to the page size)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,
    /// Start at this post instead of the profile's newest
    #[arg(long)]
    pub from: Option<String>,
    /// Read another profile (hash or link) without switching to it
    #[arg(long)]
    pub profile: Option<String>,
}

#[derive(Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: Option<ProfileAction>,
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Switch to a profile by hash or link
    Use { target: String },
    /// Forget the current profile
    Clear,
}

#[derive(Args)]
pub struct ShowArgs {
    pub hash: String,
    /// Write the object's image to this file
    #[arg(long)]
    pub save_image: Option<PathBuf>,
}
