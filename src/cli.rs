use std::path::PathBuf;

use bundle_installer::InstallOptions;
use clap::Parser;

/// Command-line arguments for the installer
#[derive(Parser, Debug)]
#[command(version, about = "Install the embedded application bundle on this machine")]
pub struct Args {
    /// Use this manifest instead of the embedded installer.toml
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Deploy from a bundle directory (data/, program/, gui/, service/) instead of the embedded files
    #[arg(long, value_name = "DIR")]
    pub bundle_dir: Option<PathBuf>,

    /// Stage every target directory under this root
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Don't run post-install commands
    #[arg(long)]
    pub skip_commands: bool,

    /// Print the bundle contents and exit
    #[arg(long)]
    pub list: bool,

    /// Log at debug level (RUST_LOG still wins)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Args {
    pub fn install_options(&self) -> InstallOptions {
        InstallOptions {
            root: self.root.clone(),
            skip_commands: self.skip_commands,
        }
    }
}
