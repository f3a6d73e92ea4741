use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use k5core::crypto::enc_provider::DES;
use k5core::crypto::{
    DES_KEY_SIZE, HashProvider, ProviderInfo, fixup_parity, is_weak_key, pbkdf2_hmac_sha1,
    random_key,
};
use k5core::{CipherState, CryptoIov, EncProvider, Enctype, Key, KeyBlock, KeyUsage, Registry};
use serde::Serialize;
use std::path::PathBuf;
use zeroize::Zeroizing;

mod input;

#[derive(Debug, Args)]
struct DataArgs {
    /// Message bytes as hex
    #[arg(required_unless_present = "data_file", conflicts_with = "data_file")]
    data: Option<String>,

    /// Read raw message bytes from a file
    #[arg(long, value_name = "PATH")]
    data_file: Option<PathBuf>,
}

impl DataArgs {
    fn read(&self) -> Result<Zeroizing<Vec<u8>>> {
        input::read_data(self.data.as_deref(), self.data_file.as_deref())
    }
}

#[derive(Debug, Args)]
struct CipherArgs {
    /// Enctype name (e.g. des-cbc-crc, arcfour-hmac) or number
    #[arg(long)]
    enctype: String,

    /// Key as hex
    #[arg(long)]
    key: String,

    /// Initial chaining value as hex (block ciphers only)
    #[arg(long)]
    iv: Option<String>,

    #[command(flatten)]
    data: DataArgs,
}

#[derive(Debug, Parser)]
#[command(name = "k5core")]
#[command(
    version,
    about = "Kerberos crypto core: providers, HMAC, PBKDF2 and DES key tools."
)]
struct Cli {
    /// Log filter directives; overrides K5CORE_LOG
    #[arg(long, global = true, value_name = "FILTER")]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Lists registered encryption and hash providers
    Providers {
        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Derives a key from the password with PBKDF2-HMAC-SHA1
    Pbkdf2 {
        /// Salt as text
        #[arg(long)]
        salt: String,

        #[arg(long, default_value_t = 4096)]
        iterations: u32,

        /// Output length in bytes
        #[arg(long, default_value_t = 16)]
        length: usize,
    },

    /// Computes an HMAC over the message
    Hmac {
        #[arg(long, default_value = "SHA1")]
        hash: String,

        /// Key as hex
        #[arg(long)]
        key: String,

        #[command(flatten)]
        data: DataArgs,
    },

    /// Encrypts the message in place
    Encrypt(CipherArgs),

    /// Decrypts the message in place
    Decrypt(CipherArgs),

    /// Computes a DES CBC-MAC
    CbcMac {
        /// Key as hex
        #[arg(long)]
        key: String,

        /// Initial chaining value as hex
        #[arg(long)]
        iv: Option<String>,

        #[command(flatten)]
        data: DataArgs,
    },

    /// Fixes DES key parity and checks for weak keys, or makes a random key
    #[command(arg_required_else_help = true)]
    DesKey {
        /// Key as hex
        #[arg(conflicts_with = "random")]
        key: Option<String>,

        #[arg(long, default_value_t = false)]
        random: bool,
    },
}

#[derive(Serialize)]
struct Listing<'a> {
    enc: Vec<&'a ProviderInfo>,
    hash: Vec<&'a HashProvider>,
}

fn setup_logging(directives: Option<&str>) -> Result<()> {
    use tracing::metadata::LevelFilter;
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let builder = EnvFilter::builder().with_default_directive(LevelFilter::WARN.into());
    let env_filter = match directives {
        Some(d) => builder.parse_lossy(d),
        None => builder.with_env_var("K5CORE_LOG").from_env_lossy(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .context("failed to set tracing global subscriber")?;

    Ok(())
}

fn transform(args: &CipherArgs, decrypt: bool) -> Result<()> {
    let enctype = Enctype::parse(&args.enctype)
        .with_context(|| format!("unknown enctype '{}'", args.enctype))?;
    let provider = enctype.provider();
    let key = Key::new(KeyBlock::new(enctype, &input::decode_hex("key", &args.key)?));
    let mut data = args.data.read()?;

    let mut state = match &args.iv {
        Some(_) if provider.info().block_size == 1 => {
            bail!("{} does not take an IV", enctype.name())
        }
        Some(iv) => CipherState::iv(&input::decode_hex("iv", iv)?),
        None => provider
            .init_state(key.keyblock(), KeyUsage(0))
            .with_context(|| format!("{} is not available", provider.info().name))?,
    };

    let iovs = &mut [CryptoIov::data(&mut data)];
    let result = if decrypt {
        provider.decrypt(&key, Some(&mut state), iovs)
    } else {
        provider.encrypt(&key, Some(&mut state), iovs)
    };
    result.with_context(|| format!("{} failed", provider.info().name))?;

    println!("{}", hex::encode(&data[..]));
    if let Some(iv) = state.as_iv() {
        println!("iv: {}", hex::encode(iv));
    }
    provider.free_state(state)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(args.log.as_deref())?;
    let registry = Registry::builtin();

    match args.command {
        Commands::Providers { json } => {
            if json {
                let listing = Listing {
                    enc: registry.enc_providers().map(|(_, p)| p.info()).collect(),
                    hash: registry.hash_providers().collect(),
                };
                println!("{}", serde_json::to_string_pretty(&listing)?);
                return Ok(());
            }

            println!("{:<12}  {:>5}  {:>9}  {:>10}", "Cipher", "Block", "KeyBytes", "KeyLength");
            for (name, p) in registry.enc_providers() {
                let info = p.info();
                println!(
                    "{:<12}  {:>5}  {:>9}  {:>10}",
                    name, info.block_size, info.key_bytes, info.key_length
                );
            }
            println!();
            println!("{:<12}  {:>5}  {:>9}", "Hash", "Size", "BlockSize");
            for h in registry.hash_providers() {
                println!("{:<12}  {:>5}  {:>9}", h.name, h.hashsize, h.blocksize);
            }
        }
        Commands::Pbkdf2 {
            salt,
            iterations,
            length,
        } => {
            let password = input::read_password()?;
            let mut out = Zeroizing::new(vec![0u8; length]);
            pbkdf2_hmac_sha1(&mut out, iterations, password.as_bytes(), salt.as_bytes())
                .context("key derivation failed")?;
            println!("{}", hex::encode(&out[..]));
        }
        Commands::Hmac { hash, key, data } => {
            // HMAC uses only the key bytes; the enctype is a placeholder
            let key = Key::new(KeyBlock::new(
                Enctype::ArcfourHmac,
                &input::decode_hex("key", &key)?,
            ));
            let mut data = data.read()?;
            let sum = registry
                .make_checksum(&hash, &key, &[CryptoIov::data(&mut data)])
                .with_context(|| format!("hmac-{hash} failed"))?;
            println!("{}", hex::encode(sum));
        }
        Commands::Encrypt(cipher) => transform(&cipher, false)?,
        Commands::Decrypt(cipher) => transform(&cipher, true)?,
        Commands::CbcMac { key, iv, data } => {
            let key = Key::new(KeyBlock::new(
                Enctype::DesCbcCrc,
                &input::decode_hex("key", &key)?,
            ));
            let iv = iv.map(|iv| input::decode_hex("iv", &iv)).transpose()?;
            let mut data = data.read()?;
            let mut out = [0u8; 8];
            DES.cbc_mac(
                &key,
                &[CryptoIov::data(&mut data)],
                iv.as_ref().map(|iv| iv.as_slice()),
                &mut out,
            )
            .context("cbc-mac failed")?;
            println!("{}", hex::encode(out));
        }
        Commands::DesKey { key, random } => {
            let key: [u8; DES_KEY_SIZE] = match (key, random) {
                (_, true) => random_key()?
                    .contents()
                    .try_into()
                    .context("generated key has the wrong size")?,
                (Some(hex_key), false) => {
                    let bytes = input::decode_hex("key", &hex_key)?;
                    let mut key: [u8; DES_KEY_SIZE] = bytes[..]
                        .try_into()
                        .with_context(|| format!("DES key must be {DES_KEY_SIZE} bytes"))?;
                    fixup_parity(&mut key);
                    key
                }
                (None, false) => bail!("either KEY or --random is required"),
            };
            let key = Zeroizing::new(key);
            println!("{}", hex::encode(&key[..]));
            if is_weak_key(&key) {
                println!("weak");
            }
        }
    }

    Ok(())
}
