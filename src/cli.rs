use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "showcase",
    version,
    about = "Rank an organisation's GitHub repositories and render them into a static page"
)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(flatten)]
    pub paths: PathArgs,

    /// Defaults to `run` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Fetch, score and merge repository data into the JSON snapshot
    Collect,
    /// Render the HTML page from an existing JSON snapshot
    Render,
    /// Collect then render
    Run,
}

#[derive(Args, Clone, Debug)]
pub struct PathArgs {
    /// Directory every other path is resolved against
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    #[arg(long, global = true, default_value = "config.yml")]
    pub config: PathBuf,

    /// Directory of per-repository override files
    #[arg(long, global = true, default_value = "repos")]
    pub overrides_dir: PathBuf,

    #[arg(long, global = true, default_value = "site")]
    pub site_dir: PathBuf,

    #[arg(long, global = true, default_value = "templates")]
    pub templates_dir: PathBuf,
}

impl PathArgs {
    pub fn config_path(&self) -> PathBuf {
        self.root.join(&self.config)
    }

    pub fn overrides_path(&self) -> PathBuf {
        self.root.join(&self.overrides_dir)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.root.join(&self.site_dir).join("data").join("all.json")
    }

    pub fn page_path(&self) -> PathBuf {
        self.root.join(&self.site_dir).join("index.html")
    }

    pub fn template_path(&self) -> PathBuf {
        self.root.join(&self.templates_dir).join("index.html")
    }
}
