//! Installation sequence.
//!
//! 1. Check privileges
//! 2. Create directories (and register the event-log source)
//! 3. Deploy data, program, gui and service files
//! 4. Publish the program directory on the system PATH
//! 5. Provision manifest registry keys
//! 6. Run post-install commands
//!
//! Steps 1 to 3 are fatal on failure; the rest only log.

use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::bundle::{BundleProvider, Category};
use crate::commands::{CommandOutcome, CommandRunner};
use crate::config::InstallerConfig;
use crate::deploy::{FileDescriptor, WriteOutcome, write_file};
use crate::error::InstallError;
use crate::layout::{InstallLayout, PostWriteHook};
use crate::platform::Platform;

/// Knobs set from the command line
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Prefix every target directory with this staging root
    pub root: Option<PathBuf>,
    pub skip_commands: bool,
}

/// What a completed run did
#[derive(Debug)]
pub struct InstallReport {
    pub layout: InstallLayout,
    pub files: Vec<WriteOutcome>,
    pub commands: Vec<CommandOutcome>,
}

pub struct Installer<'a, P: Platform, B: BundleProvider + ?Sized> {
    config: &'a InstallerConfig,
    platform: &'a P,
    bundle: &'a B,
    options: InstallOptions,
}

impl<'a, P: Platform, B: BundleProvider + ?Sized> Installer<'a, P, B> {
    pub fn new(config: &'a InstallerConfig, platform: &'a P, bundle: &'a B) -> Self {
        Self {
            config,
            platform,
            bundle,
            options: InstallOptions::default(),
        }
    }

    pub fn with_options(mut self, options: InstallOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the whole forward pass. Artifacts written before a fatal error
    /// stay on disk.
    pub fn run(&self) -> Result<InstallReport, InstallError> {
        self.ensure_privileged()?;

        let layout = self.resolve_layout()?;
        self.create_directories(&layout)?;
        self.platform.register_event_source(&self.config.application_name);

        let files = self.deploy_all(&layout)?;

        if let Err(e) = self.platform.publish_path(layout.program_dir()) {
            error!("Failed to add {} to the system PATH: {e}", layout.program_dir().display());
        }

        self.provision_registry();

        let commands = if self.options.skip_commands {
            info!("Skipping post-install commands");
            Vec::new()
        } else {
            CommandRunner::new(self.platform).run_all(self.config.commands.for_kind(P::KIND))
        };

        Ok(InstallReport {
            layout,
            files,
            commands,
        })
    }

    fn ensure_privileged(&self) -> Result<(), InstallError> {
        match self.platform.is_privileged() {
            Ok(true) => Ok(()),
            Ok(false) => Err(InstallError::Unprivileged),
            Err(e) => Err(InstallError::PrivilegeCheck(e)),
        }
    }

    fn resolve_layout(&self) -> Result<InstallLayout, InstallError> {
        let layout = self.platform.layout(&self.config.application_name)?;
        Ok(match &self.options.root {
            Some(root) => layout.rerooted(root),
            None => layout,
        })
    }

    fn create_directories(&self, layout: &InstallLayout) -> Result<(), InstallError> {
        for dir in layout.directories() {
            std::fs::create_dir_all(dir).map_err(|source| InstallError::CreateDirectory {
                path: dir.to_path_buf(),
                source,
            })?;
            debug!("Directory ready: {}", dir.display());
        }
        Ok(())
    }

    fn deploy_all(&self, layout: &InstallLayout) -> Result<Vec<WriteOutcome>, InstallError> {
        let mut outcomes = Vec::new();
        for category in Category::ALL {
            self.deploy_category(layout, category, &mut outcomes)?;
        }
        Ok(outcomes)
    }

    /// Unreadable bundle entries are skipped; write failures abort.
    fn deploy_category(
        &self,
        layout: &InstallLayout,
        category: Category,
        outcomes: &mut Vec<WriteOutcome>,
    ) -> Result<(), InstallError> {
        let names = match self.bundle.list(category) {
            Ok(names) => names,
            Err(e) => {
                error!("Error reading embedded files ({category}): {e}");
                return Ok(());
            }
        };

        let target = layout.target(category);
        for name in names {
            let content = match self.bundle.read(category, &name) {
                Ok(content) => content,
                Err(e) => {
                    error!("Error reading file {name}: {e}");
                    continue;
                }
            };

            let file = FileDescriptor {
                category,
                target_dir: target.dir.clone(),
                name,
                content,
                post_write: target.hook,
            };
            let outcome = write_file(&file)?;
            if let Some(hook) = file.post_write {
                self.run_hook(hook, outcome.path());
            }
            outcomes.push(outcome);
        }
        Ok(())
    }

    fn run_hook(&self, hook: PostWriteHook, path: &Path) {
        match hook {
            PostWriteHook::RegisterService => self.platform.register_and_start(path),
            PostWriteHook::PublishShortcut => self.platform.publish_shortcut(path),
        }
    }

    fn provision_registry(&self) {
        for spec in &self.config.registry {
            if let Err(e) = self.platform.provision_key(&spec.key, &spec.values) {
                warn!("Failed to provision registry key {}: {e}", spec.key);
            }
        }
    }
}
