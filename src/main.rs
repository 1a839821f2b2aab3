mod config;
mod patch_key;
mod store;
mod toggle_format;
mod util;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::patch_key::{PatchIdentity, PatchKey};
use crate::store::{ConsoleNotifier, PatchStore};
use crate::toggle_format::{Catalog, PatchMetadata};

#[derive(Parser)]
#[command(name = "patchstate", about = "Per-patch enable flags for the patch menu")]
struct Cli {
    /// Base directory holding `patches/` (overrides the config file)
    #[arg(long, global = true)]
    base: Option<PathBuf>,
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IdentityArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    app_ver: String,
    /// Title ID, or the patch definition path standing in for it
    #[arg(long)]
    title_id: String,
    #[arg(long)]
    elf: String,
}

impl From<IdentityArgs> for PatchIdentity {
    fn from(args: IdentityArgs) -> Self {
        PatchIdentity {
            title: args.title,
            name: args.name,
            app_version: args.app_ver,
            title_id: args.title_id,
            elf_name: args.elf,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the key and toggle file for a patch identity
    Key {
        #[command(flatten)]
        identity: IdentityArgs,
    },
    /// Print whether a patch is enabled, creating its toggle file if missing
    Status {
        /// Key in toggle file form, e.g. 0x6bd9cc8db3714e03
        #[arg(long, conflicts_with_all = ["title", "name", "app_ver", "title_id", "elf"])]
        key: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        app_ver: Option<String>,
        #[arg(long)]
        title_id: Option<String>,
        #[arg(long)]
        elf: Option<String>,
    },
    /// Flip the state stored in a toggle file
    Toggle {
        #[arg(long, short)]
        file: PathBuf,
        /// Patch name shown in the notification
        #[arg(long, short)]
        name: String,
    },
    /// Build the catalog for a patch definition from a JSON array of patch entries
    Register {
        /// Definition name, resolved to `patches/xml/<name>.xml`
        #[arg(long)]
        definition: String,
        #[arg(long, short)]
        patches: PathBuf,
    },
    /// List every toggle file and its state
    List,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref());
    if let Some(base) = cli.base {
        config.base_dir = base;
    }
    let mut store = PatchStore::new(config, ConsoleNotifier);
    log::debug!("Using base directory {}", store.base_dir().display());

    match cli.command {
        Commands::Key { identity } => {
            let key = store.key_for(&identity.into());
            println!("{}", key);
            println!("{}", store.settings_file(key).display());
        }
        Commands::Status {
            key,
            title,
            name,
            app_ver,
            title_id,
            elf,
        } => {
            let key = match key {
                Some(text) => PatchKey::parse(&text)
                    .with_context(|| format!("Invalid patch key: {}", text))?,
                None => {
                    let (Some(title), Some(name), Some(app_ver), Some(title_id), Some(elf)) =
                        (title, name, app_ver, title_id, elf)
                    else {
                        bail!("status needs --key or all of --title --name --app-ver --title-id --elf");
                    };
                    store.key_for(&PatchIdentity {
                        title,
                        name,
                        app_version: app_ver,
                        title_id,
                        elf_name: elf,
                    })
                }
            };

            let enabled = store.load_or_init_state(key);
            println!("{} {}", key, if enabled { "enabled" } else { "disabled" });
        }
        Commands::Toggle { file, name } => {
            store.toggle(&file, &name);
        }
        Commands::Register {
            definition,
            patches,
        } => {
            let raw = std::fs::read(&patches)
                .with_context(|| format!("Failed to read patch list: {}", patches.display()))?;
            let entries: Vec<PatchMetadata> = serde_json::from_slice(&raw)
                .with_context(|| format!("Failed to parse patch list: {}", patches.display()))?;

            if !store.locate_definition(&definition) {
                log::warn!(
                    "Patch definition {} does not exist",
                    store.definition_path().display()
                );
            }

            let mut catalog = Catalog::default();
            for entry in entries {
                store.register_patch_metadata(&mut catalog, entry);
            }

            if catalog.is_empty() {
                println!("No patches registered");
                return Ok(());
            }

            let enabled_count = catalog.enablement().iter().filter(|&&on| on).count();
            println!("Registered {} patches, {} enabled", catalog.len(), enabled_count);
            for index in 0..catalog.len() {
                let Some((meta, enabled)) = catalog.get(index) else {
                    break;
                };
                println!(
                    "  [{}] {} v{} by {} ({} {} {}) {}",
                    if enabled { "x" } else { " " },
                    meta.name,
                    meta.patch_ver,
                    meta.author,
                    meta.title,
                    meta.app_ver,
                    meta.app_elf,
                    meta.note,
                );
            }
        }
        Commands::List => {
            if let Some(version) = store.read_catalog_version() {
                println!("Patch repository: {}", version);
            }
            for (key, enabled) in store.scan_settings() {
                println!("{} {}", key, if enabled { "enabled" } else { "disabled" });
            }
        }
    }

    Ok(())
}
