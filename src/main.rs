mod cli;

use std::io::Write;

use anyhow::{Context, Result};
use bundle_installer::error::{EXIT_DIRECTORY, EXIT_SUCCESS};
use bundle_installer::{
    BundleProvider, Category, DirectoryBundle, EmbeddedBundle, HostPlatform, InstallError,
    Installer, InstallerConfig,
};
use clap::Parser;
use log::{error, info};

fn main() {
    let args = cli::Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .filter_level(level)
        .parse_default_env()
        .init();

    let code = match real_main(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            EXIT_DIRECTORY
        }
    };
    std::process::exit(code);
}

fn real_main(args: &cli::Args) -> Result<i32> {
    let config = match &args.manifest {
        Some(path) => InstallerConfig::from_path(path)
            .with_context(|| format!("Failed to load manifest {}", path.display()))?,
        None => InstallerConfig::embedded().context("Embedded manifest is invalid")?,
    };

    let bundle: Box<dyn BundleProvider> = match &args.bundle_dir {
        Some(dir) => Box::new(DirectoryBundle::new(dir)),
        None => Box::new(EmbeddedBundle),
    };

    if args.list {
        print_bundle(&config, bundle.as_ref());
        return Ok(EXIT_SUCCESS);
    }

    info!("Installing {} ({})", config.application_name, std::env::consts::OS);
    let platform = HostPlatform::new(&config.application_name);
    let installer =
        Installer::new(&config, &platform, bundle.as_ref()).with_options(args.install_options());

    match installer.run() {
        Ok(report) => {
            let failed = report.commands.iter().filter(|c| !c.succeeded()).count();
            if failed > 0 {
                info!("{failed} post-install command(s) failed");
            }
            println!("Installation completed successfully!");
            Ok(EXIT_SUCCESS)
        }
        Err(e) => {
            if matches!(e, InstallError::Unprivileged | InstallError::PrivilegeCheck(_)) {
                eprintln!("This software installer requires privileges.");
            }
            error!("{e}");
            Ok(e.exit_code())
        }
    }
}

fn print_bundle(config: &InstallerConfig, bundle: &dyn BundleProvider) {
    println!("{}", config.application_name);
    for category in Category::ALL {
        match bundle.list(category) {
            Ok(names) => {
                for name in names {
                    println!("  {category}/{name}");
                }
            }
            Err(e) => eprintln!("  {category}: {e}"),
        }
    }
}
