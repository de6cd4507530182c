use clap::Parser;
use num_bigint::BigUint;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rsa_bleichenbacher::attacks::{AttackConfig, Bleichenbacher};
use rsa_bleichenbacher::rsa::{DecryptionOracle, OracleMode, RsaKeyGenerator, RsaService};
use std::time::{Duration, Instant};

/// Recovers a PKCS#1 v1.5 encrypted message through a padding oracle.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// RSA modulus size in bits
    #[arg(long, default_value_t = 256)]
    bits: usize,

    /// Message to encrypt and then recover
    #[arg(long, default_value = "kick it, CC")]
    message: String,

    /// Seed for key generation and padding (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Public exponent
    #[arg(long, default_value_t = 65537)]
    exponent: u32,

    /// Use the full PKCS#1 v1.5 check instead of the `00 02` prefix oracle
    #[arg(long)]
    strict: bool,

    /// Give up after this many oracle queries
    #[arg(long)]
    max_queries: Option<u64>,

    /// Give up after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Multipliers tested in parallel per batch
    #[arg(long, default_value_t = 1)]
    batch_size: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    log::info!("generating a {}-bit RSA key", args.bits);
    let keypair = RsaKeyGenerator::new(0.999_999, args.bits)
        .with_public_exponent(BigUint::from(args.exponent))
        .generate_keypair_with_rng(&mut rng);
    let service = RsaService::from_keypair(keypair);
    let public_key = service.public_key();
    let ciphertext = service.encrypt_pkcs1(args.message.as_bytes(), &mut rng)?;
    println!("n = {:x}", public_key.n);
    println!("c = {:x}", ciphertext);

    let mode = if args.strict { OracleMode::Strict } else { OracleMode::PrefixOnly };
    let oracle = DecryptionOracle::new(service, mode);

    let mut config = AttackConfig::default().with_batch_size(args.batch_size);
    if let Some(max) = args.max_queries {
        config = config.with_max_queries(max);
    }
    if let Some(secs) = args.timeout {
        config = config.with_time_limit(Duration::from_secs(secs));
    }

    let started = Instant::now();
    let recovered = Bleichenbacher::new(&public_key, &ciphertext, &oracle, config)?.run()?;
    let message = recovered.message()?;

    println!("block      = {}", hex::encode(&recovered.block));
    println!("message    = {}", String::from_utf8_lossy(&message));
    println!("queries    = {}", recovered.queries);
    println!("iterations = {}", recovered.iterations);
    println!("elapsed    = {:?}", started.elapsed());
    Ok(())
}
