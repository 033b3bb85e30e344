//! Property-based tests for classification, aggregation, selection and scoring
//!
//! These tests use quickcheck to check invariants that must hold for every
//! snapshot, not just the hand-picked ones in the other test files.

mod common;

use common::{token_id, tx_id, CONFIRMED_HEIGHT};
use dustwatch_common::classification::{classify, classify_all, is_valid_token_id};
use dustwatch_common::config::{ClassificationConfig, ScoreWeights};
use dustwatch_common::portfolio::aggregate;
use dustwatch_common::scoring::composite_score;
use dustwatch_common::selection::{select_for_strategy, SpendStrategy};
use dustwatch_common::types::{RawTokenAttachment, RawUtxo, UtxoType};
use quickcheck::{Arbitrary, Gen, TestResult};
use quickcheck_macros::quickcheck;

// Values clustered around the thresholds so every type shows up
#[derive(Clone, Debug)]
struct ArbitraryUtxo(RawUtxo);

impl Arbitrary for ArbitraryUtxo {
    fn arbitrary(g: &mut Gen) -> Self {
        let value = match u8::arbitrary(g) % 4 {
            0 => u64::arbitrary(g) % 600,
            1 => 500 + u64::arbitrary(g) % 700,
            2 => 900 + u64::arbitrary(g) % 10_000,
            _ => u64::arbitrary(g) % 10_000_000,
        };
        let index = u32::arbitrary(g);
        let mut utxo = RawUtxo::new(tx_id(index), index % 4, value);
        if bool::arbitrary(g) {
            utxo = utxo.with_confirmation_height(CONFIRMED_HEIGHT);
        }

        utxo = match u8::arbitrary(g) % 6 {
            0 => utxo.with_token(RawTokenAttachment::new(token_id(u8::arbitrary(g) % 8), u64::arbitrary(g))),
            1 => utxo.with_token(
                RawTokenAttachment::new(token_id(u8::arbitrary(g) % 8), 0u64).mint_authority(),
            ),
            // Malformed id, must be ignored
            2 => utxo.with_token(RawTokenAttachment::new("not-a-token", 1u64)),
            // Valid id with an unparseable amount, still a token
            3 => utxo.with_token(RawTokenAttachment::new(token_id(u8::arbitrary(g) % 8), "1.5e3")),
            _ => utxo,
        };

        ArbitraryUtxo(utxo)
    }
}

fn raw(utxos: &[ArbitraryUtxo]) -> Vec<RawUtxo> {
    utxos.iter().map(|u| u.0.clone()).collect()
}

#[quickcheck]
fn exactly_one_type_and_consistent_flags(utxo: ArbitraryUtxo) -> bool {
    let classified = classify(&utxo.0, &ClassificationConfig::default());
    let utxo_type = classified.utxo_type();

    let matching = UtxoType::ALL.iter().filter(|t| **t == utxo_type).count();
    matching == 1
        && classified.is_pure_dust() == (utxo_type == UtxoType::PureDust)
        && classified.has_token()
            == matches!(utxo_type, UtxoType::TokenBearing | UtxoType::MintAuthority)
}

#[quickcheck]
fn selection_never_contains_tokens(utxos: Vec<ArbitraryUtxo>) -> bool {
    let config = ClassificationConfig::default();
    let classified = classify_all(&raw(&utxos), &config);

    SpendStrategy::ALL.iter().all(|strategy| {
        let selection = select_for_strategy(&classified, *strategy, &config);
        selection.selected.iter().all(|u| {
            !matches!(u.utxo_type(), UtxoType::TokenBearing | UtxoType::MintAuthority)
                && !u.is_pure_dust()
        })
    })
}

#[quickcheck]
fn well_formed_token_id_is_always_protected(utxos: Vec<ArbitraryUtxo>) -> bool {
    let config = ClassificationConfig::default();
    let raw = raw(&utxos);
    let classified = classify_all(&raw, &config);

    let protected = raw
        .iter()
        .filter(|u| {
            u.token_attachment
                .as_ref()
                .map(|t| is_valid_token_id(&t.token_id))
                .unwrap_or(false)
        })
        .count();

    SpendStrategy::ALL.iter().all(|strategy| {
        select_for_strategy(&classified, *strategy, &config).stats.protected_tokens == protected
    })
}

#[quickcheck]
fn selection_accounts_for_every_output(utxos: Vec<ArbitraryUtxo>) -> bool {
    let config = ClassificationConfig::default();
    let classified = classify_all(&raw(&utxos), &config);

    SpendStrategy::ALL.iter().all(|strategy| {
        let s = select_for_strategy(&classified, *strategy, &config).stats;
        s.eligible + s.protected_tokens + s.excluded_dust + s.excluded_below_minimum
            == classified.len()
    })
}

#[quickcheck]
fn aggregation_is_complete(utxos: Vec<ArbitraryUtxo>) -> bool {
    let classified = classify_all(&raw(&utxos), &ClassificationConfig::default());
    let summary = aggregate(&classified);

    summary.by_type.values().sum::<usize>() == classified.len()
        && summary.by_health.values().sum::<usize>() == classified.len()
        && summary.token_holdings.iter().map(|h| h.utxo_count).sum::<usize>()
            == summary.token_utxos
}

#[quickcheck]
fn classification_is_idempotent(utxo: ArbitraryUtxo) -> bool {
    let config = ClassificationConfig::default();
    classify(&utxo.0, &config) == classify(&utxo.0, &config)
}

#[quickcheck]
fn more_dust_never_raises_the_score(
    privacy: u8,
    healthy: u8,
    suspicious: u8,
    dust_a: u8,
    dust_b: u8,
) -> TestResult {
    let (privacy, healthy, suspicious) = (privacy % 101, healthy % 101, suspicious % 101);
    let (dust_a, dust_b) = (dust_a % 101, dust_b % 101);
    if dust_a == dust_b {
        return TestResult::discard();
    }
    let (low, high) = if dust_a < dust_b {
        (dust_a, dust_b)
    } else {
        (dust_b, dust_a)
    };
    let weights = ScoreWeights::default();

    let score = |dust: u8| {
        composite_score(
            f64::from(privacy),
            f64::from(healthy) / 100.0,
            f64::from(dust),
            f64::from(suspicious),
            &weights,
        )
    };

    TestResult::from_bool(score(high) <= score(low))
}

#[quickcheck]
fn score_stays_in_range(privacy: u8, healthy: u8, dust: u8, suspicious: u8) -> bool {
    let score = composite_score(
        f64::from(privacy),
        f64::from(healthy) / 255.0,
        f64::from(dust),
        f64::from(suspicious),
        &ScoreWeights::default(),
    );
    (0.0..=100.0).contains(&score)
}
