use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use tracing::{debug, info};

use keyblob::{KeyCache, KeyId, KeyMask};

#[derive(Parser, Debug)]
#[command(name = "keyblob")]
#[command(about = "Generate, inspect and split RSA/HMAC key files", version)]
pub struct Cli {
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a complete set of user keys and write them to a key file
    Generate {
        /// Key file to create
        #[arg(long, short)]
        output: PathBuf,
    },

    /// List the keys held in a key file
    Inspect {
        /// Key file to read
        file: PathBuf,
    },

    /// Write a subset of the keys from one or more key files to a new key file
    Extract {
        /// Keys needed to read archives
        #[arg(short = 'r')]
        read: bool,

        /// Keys needed to write archives
        #[arg(short = 'w')]
        write: bool,

        /// Keys needed to read and delete archives
        #[arg(short = 'd')]
        delete: bool,

        /// Only the key needed to delete all archives
        #[arg(long)]
        nuke: bool,

        /// Explicit key ids, comma separated (e.g. 1,4,5)
        #[arg(long, value_delimiter = ',')]
        keylist: Vec<u8>,

        /// Key file to create
        #[arg(long, short)]
        output: PathBuf,

        /// Key files to read
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn selected_keys(
    read: bool,
    write: bool,
    delete: bool,
    nuke: bool,
    keylist: &[u8],
) -> anyhow::Result<KeyMask> {
    let mut mask = KeyMask::empty();
    if read {
        mask |= KeyMask::READ;
    }
    if write {
        mask |= KeyMask::WRITE;
    }
    if delete {
        mask |= KeyMask::READ | KeyMask::AUTH_DELETE;
    }
    if nuke {
        mask |= KeyMask::AUTH_DELETE;
    }
    for &type_byte in keylist {
        let id = KeyId::try_from(type_byte).context("invalid --keylist entry")?;
        mask |= id.mask();
    }

    if mask.is_empty() {
        anyhow::bail!("No keys selected: use -r, -w, -d, --nuke or --keylist");
    }
    Ok(mask)
}

fn write_key_file(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options
        .open(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    file.write_all(data)
        .with_context(|| format!("cannot write {}", path.display()))?;

    info!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

fn read_key_file(cache: &mut KeyCache, path: &Path, mask: KeyMask) -> anyhow::Result<()> {
    let buf = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    cache
        .import(&buf, mask)
        .with_context(|| format!("error reading keys from {}", path.display()))?;

    debug!("Read {} bytes from {}", buf.len(), path.display());
    Ok(())
}

fn describe(cache: &KeyCache, id: KeyId) -> anyhow::Result<String> {
    let size = match cache.lookup_rsa(id) {
        Ok(key) => format!("{} bits", key.modulus_bits()),
        Err(_) => format!("{} bytes", cache.lookup_hmac(id)?.as_bytes().len()),
    };
    Ok(format!(
        "{:>2}  {:<11}  {:<32}  {}",
        id as u8,
        id.kind().describe(),
        id.name(),
        size
    ))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    match cli.command {
        Commands::Generate { output } => {
            let mut cache = KeyCache::new();
            keyblob::generate_keys(&mut cache, KeyMask::USER)
                .context("failed to generate keys")?;

            let container = cache.export(KeyMask::USER)?;
            write_key_file(&output, &container)?;
        }

        Commands::Inspect { file } => {
            let mut cache = KeyCache::new();
            read_key_file(&mut cache, &file, KeyMask::USER | KeyMask::ROOT_PUB)?;

            for id in KeyId::ALL.into_iter().filter(|id| cache.has(*id)) {
                println!("{}", describe(&cache, id)?);
            }
        }

        Commands::Extract {
            read,
            write,
            delete,
            nuke,
            keylist,
            output,
            files,
        } => {
            let mask = selected_keys(read, write, delete, nuke, &keylist)?;

            let mut cache = KeyCache::new();
            for file in &files {
                read_key_file(&mut cache, file, mask)?;
            }

            if let Some(name) = cache.missing(mask) {
                anyhow::bail!(
                    "The {} key is required but not in any of the provided key files",
                    name
                );
            }

            let container = cache.export(mask)?;
            write_key_file(&output, &container)?;
        }
    }

    Ok(())
}
