use num_bigint::BigUint;
use rand::SeedableRng;
use rand::rngs::StdRng;
use num_traits::One;
use rsa_bleichenbacher::attacks::bleichenbacher::{
    AttackConfig, AttackError, Bleichenbacher, CandidateSet, Phase, narrow, recover_plaintext,
};
use rsa_bleichenbacher::number_theory::mod_inverse;
use rsa_bleichenbacher::rsa::pkcs1;
use rsa_bleichenbacher::rsa::{DecryptionOracle, OracleMode, RsaKeyGenerator, RsaPublicKey, RsaService};
use std::time::Duration;

const MESSAGE: &[u8] = b"kick it, CC";

/// Hard stop so a broken search fails instead of hanging the suite.
const BUDGET: u64 = 2_000_000;

fn setup(seed: u64) -> (RsaService, BigUint) {
    setup_with_bits(seed, 256)
}

fn setup_with_bits(seed: u64, bits: usize) -> (RsaService, BigUint) {
    let mut rng = StdRng::seed_from_u64(seed);
    let keypair = RsaKeyGenerator::new(0.999_999, bits).generate_keypair_with_rng(&mut rng);
    let service = RsaService::from_keypair(keypair);
    let ciphertext = service.encrypt_pkcs1(MESSAGE, &mut rng).unwrap();
    (service, ciphertext)
}

#[test]
fn test_attack_recovers_message_and_only_narrows() {
    let (service, ciphertext) = setup(47);
    let public_key = service.public_key();
    let plaintext = BigUint::from_bytes_be(&service.decrypt_block(&ciphertext));
    let oracle = DecryptionOracle::new(service, OracleMode::PrefixOnly);

    let config = AttackConfig::default().with_max_queries(BUDGET);
    let mut attack = Bleichenbacher::new(&public_key, &ciphertext, &oracle, config).unwrap();
    assert_eq!(attack.phase(), Phase::SearchingS1);
    assert!(attack.state().candidates.contains(&plaintext));

    let mut previous = attack.state().clone();
    let block = loop {
        let outcome = attack.step().unwrap();
        let current = attack.state().clone();

        assert_eq!(current.iteration, previous.iteration + 1);
        assert!(current.candidates.total_length() <= previous.candidates.total_length());
        assert!(current.candidates.contains(&plaintext));
        let intervals = current.candidates.intervals();
        for (i, a) in intervals.iter().enumerate() {
            assert!(intervals[i + 1..].iter().all(|b| !a.intersects(b)));
        }

        if let Some(block) = outcome {
            break block;
        }
        assert_ne!(attack.phase(), Phase::Done);
        previous = current;
    };

    assert_eq!(attack.phase(), Phase::Done);
    assert_eq!(block.len(), 32);
    assert_eq!(BigUint::from_bytes_be(&block), plaintext);
    assert_eq!(pkcs1::unpad(&block).unwrap(), MESSAGE.to_vec());
    assert_eq!(attack.queries(), oracle.calls());
    assert!(attack.queries() < 50_000, "took {} queries", attack.queries());
}

#[test]
fn test_parallel_scan_matches_sequential() {
    let (service, ciphertext) = setup(48);
    let public_key = service.public_key();
    let oracle = DecryptionOracle::new(service, OracleMode::PrefixOnly);

    let sequential = Bleichenbacher::new(
        &public_key,
        &ciphertext,
        &oracle,
        AttackConfig::default().with_max_queries(BUDGET),
    )
    .unwrap()
    .run()
    .unwrap();

    let parallel = Bleichenbacher::new(
        &public_key,
        &ciphertext,
        &oracle,
        AttackConfig::default().with_max_queries(BUDGET).with_batch_size(16),
    )
    .unwrap()
    .run()
    .unwrap();

    assert_eq!(sequential.message().unwrap(), MESSAGE.to_vec());
    assert_eq!(parallel.block, sequential.block);
    // the same multipliers are found, so the runs take the same path
    assert_eq!(parallel.iterations, sequential.iterations);
    assert!(parallel.queries >= sequential.queries);
}

#[test]
fn test_recover_plaintext_with_closure_oracle() {
    let (service, ciphertext) = setup(49);
    let public_key = service.public_key();
    let oracle = |candidate: &[u8]| {
        let block = service.decrypt_block(&BigUint::from_bytes_be(candidate));
        pkcs1::has_conforming_prefix(&block)
    };

    let block = recover_plaintext(&public_key.n, &public_key.e, &ciphertext, &oracle).unwrap();
    assert_eq!(pkcs1::unpad(&block).unwrap(), MESSAGE.to_vec());
}

#[test]
fn test_attack_with_strict_oracle() {
    // 250 bits still gives k = 32, but n is far above 3B so conforming
    // multipliers are common
    let (service, ciphertext) = setup_with_bits(47, 250);
    let public_key = service.public_key();
    assert_eq!(public_key.modulus_len(), 32);
    let oracle = DecryptionOracle::new(service, OracleMode::Strict);

    let config = AttackConfig::default().with_max_queries(200_000);
    let recovered = Bleichenbacher::new(&public_key, &ciphertext, &oracle, config)
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(recovered.message().unwrap(), MESSAGE.to_vec());
    assert_eq!(recovered.queries, oracle.calls());
}

#[test]
fn test_contradictory_oracle_exhausts_candidate_set() {
    let (service, ciphertext) = setup(55);
    let public_key = service.public_key();
    let n = public_key.n.clone();
    let bound = BigUint::one() << (8 * (public_key.modulus_len() - 2));
    let initial = CandidateSet::initial(&bound);
    let m_inv = mod_inverse(&service.decrypt(&ciphertext), &n).unwrap();

    // Accepts exactly the multipliers that no conforming plaintext admits.
    let liar = |candidate: &[u8]| {
        let blinded = service.decrypt(&BigUint::from_bytes_be(candidate));
        let s = (blinded * &m_inv) % &n;
        narrow(&initial, &s, &bound, &n).is_empty()
    };

    let config = AttackConfig::default().with_max_queries(200_000);
    let mut attack = Bleichenbacher::new(&public_key, &ciphertext, &liar, config).unwrap();
    assert_eq!(attack.step(), Err(AttackError::CandidateSetExhausted { iteration: 1 }));

    // the failed iteration leaves the state untouched
    assert_eq!(attack.phase(), Phase::SearchingS1);
    assert_eq!(attack.state().iteration, 0);
    assert_eq!(attack.state().candidates, initial);
    assert!(attack.queries() > 0);
}

#[test]
fn test_rejecting_oracle_exhausts_query_budget() {
    let (service, ciphertext) = setup(51);
    let public_key = service.public_key();
    let never = |_: &[u8]| false;

    let config = AttackConfig::default().with_max_queries(5_000);
    let mut attack = Bleichenbacher::new(&public_key, &ciphertext, &never, config).unwrap();
    assert_eq!(attack.step(), Err(AttackError::QueryBudgetExceeded { queries: 5_000 }));
    assert_eq!(attack.queries(), 5_000);
    assert_eq!(attack.phase(), Phase::SearchingS1);
}

#[test]
fn test_rejecting_oracle_exhausts_query_budget_in_parallel() {
    let (service, ciphertext) = setup(52);
    let public_key = service.public_key();
    let never = |_: &[u8]| false;

    let config = AttackConfig::default().with_max_queries(5_000).with_batch_size(32);
    let result = Bleichenbacher::new(&public_key, &ciphertext, &never, config).unwrap().run();
    assert_eq!(result, Err(AttackError::QueryBudgetExceeded { queries: 5_000 }));
}

#[test]
fn test_rejecting_oracle_exhausts_time_budget() {
    let (service, ciphertext) = setup(53);
    let public_key = service.public_key();
    let never = |_: &[u8]| false;

    let config = AttackConfig::default().with_time_limit(Duration::from_millis(50));
    let result = Bleichenbacher::new(&public_key, &ciphertext, &never, config).unwrap().run();
    assert!(matches!(result, Err(AttackError::TimeBudgetExceeded { elapsed }) if elapsed >= Duration::from_millis(50)));
}

#[test]
fn test_invalid_ciphertext_is_rejected() {
    let (service, _) = setup(54);
    let public_key = service.public_key();
    let never = |_: &[u8]| false;

    for c in [BigUint::from(0u32), public_key.n.clone(), &public_key.n + 5u32] {
        let result = Bleichenbacher::new(&public_key, &c, &never, AttackConfig::default());
        assert!(matches!(result, Err(AttackError::InvalidCiphertext)));
    }
}

#[test]
fn test_small_modulus_is_rejected() {
    let public_key = RsaPublicKey::new(BigUint::from(0xc5e2_a9b1_u64 * 0xf00d_u64), BigUint::from(3u32));
    let never = |_: &[u8]| false;
    let result = Bleichenbacher::new(&public_key, &BigUint::from(2u32), &never, AttackConfig::default());
    assert!(matches!(result, Err(AttackError::ModulusTooSmall(6))));
}
