mod common;

use common::*;
use dustwatch_common::analytics::AnalyticsRecord;
use dustwatch_common::config::EngineConfig;
use dustwatch_common::engine::AnalysisEngine;
use dustwatch_common::scoring::{AnalyticsCoverage, ThreatKind};
use dustwatch_common::types::{HealthStatus, RawTokenAttachment, RawUtxo, UtxoType};
use dustwatch_common::wallet_client::{
    enrich_token_metadata, DetailedBalance, SnapshotFile, TokenMetadata, WalletClient,
    WalletClientError,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use tempfile::tempdir;

/// Wallet client double that counts metadata lookups
struct MockWalletClient {
    utxos: Result<Vec<RawUtxo>, WalletClientError>,
    metadata: HashMap<String, TokenMetadata>,
    lookups: RefCell<Vec<String>>,
}

impl MockWalletClient {
    fn new(utxos: Vec<RawUtxo>) -> Self {
        Self {
            utxos: Ok(utxos),
            metadata: HashMap::new(),
            lookups: RefCell::new(Vec::new()),
        }
    }

    fn offline() -> Self {
        Self {
            utxos: Err(WalletClientError::Unavailable("connection refused".to_string())),
            metadata: HashMap::new(),
            lookups: RefCell::new(Vec::new()),
        }
    }

    fn with_metadata(mut self, token: u8, ticker: &str, decimals: u8) -> Self {
        self.metadata.insert(
            token_id(token),
            TokenMetadata {
                ticker: Some(ticker.to_string()),
                name: Some(format!("{} token", ticker)),
                decimals,
                protocol_tag: "ALP".to_string(),
            },
        );
        self
    }
}

impl WalletClient for MockWalletClient {
    fn utxo_snapshot(&self) -> Result<Vec<RawUtxo>, WalletClientError> {
        self.utxos.clone()
    }

    fn token_metadata(&self, token_id: &str) -> Result<TokenMetadata, WalletClientError> {
        self.lookups.borrow_mut().push(token_id.to_string());
        self.metadata
            .get(token_id)
            .cloned()
            .ok_or_else(|| WalletClientError::NotFound(token_id.to_string()))
    }

    fn detailed_balance(&self) -> Result<DetailedBalance, WalletClientError> {
        Err(WalletClientError::Unavailable("balance endpoint down".to_string()))
    }
}

#[test]
fn test_enrichment_fills_missing_metadata_once_per_token() {
    setup();
    let mut utxos = vec![
        plain(0, 546).with_token(RawTokenAttachment::new(token_id(1), 10u64)),
        plain(1, 546).with_token(RawTokenAttachment::new(token_id(1), 20u64)),
        plain(2, 546).with_token(RawTokenAttachment::new(token_id(2), 30u64)),
        plain(3, 5_000),
    ];
    let client = MockWalletClient::new(Vec::new()).with_metadata(1, "CRD", 4);

    let warnings = enrich_token_metadata(&mut utxos, &client);

    assert_eq!(client.lookups.borrow().len(), 2);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].token_id, token_id(2));

    let enriched = utxos[1].token_attachment.as_ref().unwrap();
    assert_eq!(enriched.ticker.as_deref(), Some("CRD"));
    assert_eq!(enriched.decimals, 4);
    assert_eq!(enriched.protocol_tag, "ALP");

    // The failed token is left as it was
    let untouched = utxos[2].token_attachment.as_ref().unwrap();
    assert!(untouched.ticker.is_none());
}

#[test]
fn test_enrichment_keeps_reported_values() {
    setup();
    let mut utxos = vec![plain(0, 546).with_token(
        RawTokenAttachment::new(token_id(1), 10u64)
            .with_ticker("OWN")
            .with_protocol("SLP"),
    )];
    let client = MockWalletClient::new(Vec::new()).with_metadata(1, "CRD", 2);

    enrich_token_metadata(&mut utxos, &client);

    let attachment = utxos[0].token_attachment.as_ref().unwrap();
    assert_eq!(attachment.ticker.as_deref(), Some("OWN"));
    assert_eq!(attachment.protocol_tag, "SLP");
    assert_eq!(attachment.name.as_deref(), Some("CRD token"));
}

#[test]
fn test_engine_surfaces_enrichment_and_balance_warnings() {
    setup();
    let client = MockWalletClient::new(vec![
        token_utxo(0, 546, 0x05, 10),
        plain(1, 25_000),
    ]);
    let engine = AnalysisEngine::new(EngineConfig::default());

    let analysis = engine.analyze(&client, WALLET).unwrap();

    assert_eq!(analysis.utxos.len(), 2);
    assert_eq!(analysis.enrichment_warnings.len(), 1);
    assert!(analysis.balance.is_none());
    assert!(analysis
        .report
        .warnings
        .iter()
        .any(|w| w.contains("Balance unavailable")));
    assert!(analysis
        .report
        .warnings
        .iter()
        .any(|w| w.contains("token metadata unavailable")));
}

#[test]
fn test_engine_fails_when_snapshot_unavailable() {
    setup();
    let engine = AnalysisEngine::default();

    let err = engine.analyze(&MockWalletClient::offline(), WALLET).unwrap_err();

    assert!(err.user_message().contains("connection refused"));
}

#[test]
fn test_snapshot_file_round_trip_through_engine() {
    setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");

    let dusted: Vec<RawUtxo> = (0..5).map(|i| plain(i, 546)).collect();
    let mut snapshot = SnapshotFile::new(WALLET, dusted);
    snapshot.utxos.push(plain(9, 75_000));
    snapshot.analytics.push(AnalyticsRecord {
        tx_id: tx_id(9),
        output_index: 0,
        privacy_score: Some(80),
        status: Some(HealthStatus::Suspicious),
    });
    fs::write(&path, serde_json::to_string_pretty(&snapshot).unwrap()).unwrap();

    let loaded = SnapshotFile::load(&path).unwrap();
    assert_eq!(loaded, snapshot);

    let analysis = AnalysisEngine::default()
        .analyze_snapshot(&loaded, None)
        .unwrap();
    let report = &analysis.report;

    assert_eq!(report.wallet_address, WALLET);
    assert_eq!(report.analytics_coverage, AnalyticsCoverage::Full);
    assert_eq!(report.metrics.privacy_score, 80.0);
    assert_eq!(report.metrics.suspicious_utxos, 1);
    assert!(report.has_threat(ThreatKind::SystematicDust));
    assert!(report.has_threat(ThreatKind::SuspiciousActivity));

    let balance = analysis.balance.unwrap();
    assert_eq!(balance.confirmed, 77_730);
    assert_eq!(balance.unconfirmed, 0);
    assert_eq!(balance.total, 77_730);
}

#[test]
fn test_snapshot_without_analytics_uses_engine_default() {
    setup();
    let snapshot = SnapshotFile::new(WALLET, plain_utxos(&[5_000, 7_000]));

    let analysis = AnalysisEngine::default()
        .analyze_snapshot(&snapshot, Some("ecash:override"))
        .unwrap();

    assert_eq!(analysis.report.wallet_address, "ecash:override");
    assert_eq!(
        analysis.report.analytics_coverage,
        AnalyticsCoverage::Unavailable
    );
}

#[test]
fn test_snapshot_json_with_token_metadata() {
    setup();
    let json = format!(
        r#"{{
            "address": "{wallet}",
            "utxos": [
                {{"tx_id": "{tx}", "output_index": 1, "value_atoms": 546,
                  "confirmation_height": 812000,
                  "token_attachment": {{"token_id": "{token}", "amount": "1500"}}}}
            ],
            "balance": {{"confirmed": 546, "unconfirmed": 0, "total": 546}},
            "token_metadata": {{
                "{token}": {{"ticker": "XEC2", "name": "Second", "decimals": 2, "protocol_tag": "ALP"}}
            }}
        }}"#,
        wallet = WALLET,
        tx = tx_id(1),
        token = token_id(0x33)
    );

    let snapshot = SnapshotFile::from_json(&json).unwrap();
    assert_eq!(snapshot.detailed_balance().unwrap().total, 546);
    assert!(snapshot.analytics().is_none());

    let analysis = AnalysisEngine::default()
        .analyze_snapshot(&snapshot, None)
        .unwrap();
    assert!(analysis.enrichment_warnings.is_empty());
    assert_eq!(analysis.utxos[0].utxo_type(), UtxoType::TokenBearing);

    let token = analysis.utxos[0].token().unwrap();
    assert_eq!(token.ticker.as_deref(), Some("XEC2"));
    assert_eq!(token.decimals, 2);
}

#[test]
fn test_load_missing_or_invalid_snapshot() {
    setup();
    let dir = tempdir().unwrap();

    assert!(SnapshotFile::load(dir.path().join("missing.json")).is_err());

    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"address\": 5 }").unwrap();
    let err = SnapshotFile::load(&path).unwrap_err();
    assert!(err.user_message().contains("Invalid snapshot"));
}
