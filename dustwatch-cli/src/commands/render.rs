//! Plain-text rendering of engine results.

use dustwatch_common::portfolio::PortfolioSummary;
use dustwatch_common::scoring::{AnalyticsCoverage, SecurityReport};
use dustwatch_common::selection::StrategySelection;
use dustwatch_common::types::{sanitize_for_display, ClassifiedUtxo, HealthStatus, UtxoType};
use dustwatch_common::wallet_client::DetailedBalance;

pub fn print_report(report: &SecurityReport, balance: Option<&DetailedBalance>) {
    println!("Wallet: {}", report.wallet_address);
    println!(
        "Security score: {}/100 ({})",
        report.overall_score, report.status
    );
    if let Some(balance) = balance {
        println!(
            "Balance: {} atoms ({} confirmed, {} unconfirmed)",
            balance.total, balance.confirmed, balance.unconfirmed
        );
    }

    let m = &report.metrics;
    println!(
        "UTXOs: {} total, {} healthy, {} dust, {} token, {} suspicious, {} unconfirmed",
        m.total_utxos,
        m.healthy_utxos,
        m.dust_utxos,
        m.token_utxos,
        m.suspicious_utxos,
        m.unconfirmed_utxos
    );
    println!(
        "Privacy score: {:.1}  dust ratio: {:.1}%  suspicious ratio: {:.1}%",
        m.privacy_score, m.dust_ratio, m.suspicious_ratio
    );

    match report.analytics_coverage {
        AnalyticsCoverage::Full => {}
        AnalyticsCoverage::Partial { failed } => {
            println!("Analytics partially available: {failed} outputs scored with defaults");
        }
        AnalyticsCoverage::Unavailable => {
            println!(
                "Analytics unavailable: privacy and suspicious activity could not be assessed; \
                 the score uses conservative defaults"
            );
        }
    }

    println!();
    if report.threats.is_empty() {
        if report.analytics_coverage == AnalyticsCoverage::Unavailable {
            println!("No threats detected from UTXO structure alone (analysis incomplete)");
        } else {
            println!("No threats found: clean bill of health");
        }
    } else {
        println!("Threats ({}):", report.threats.len());
        for threat in &report.threats {
            println!(
                "  [{}] {} ({}): {}",
                threat.severity.as_str().to_uppercase(),
                threat.title,
                threat.kind,
                threat.description
            );
        }
    }

    for pattern in report.dust_patterns.iter().filter(|p| !p.systematic) {
        println!(
            "  note: {} dust outputs share the value {} atoms",
            pattern.count, pattern.value_atoms
        );
    }

    if !report.recommendations.is_empty() {
        println!();
        println!("Recommendations:");
        for rec in &report.recommendations {
            println!(
                "  [{}] {}: {}",
                rec.priority.as_str().to_uppercase(),
                rec.title,
                rec.action
            );
            if let Some(hint) = &rec.command_hint {
                println!("      $ {hint}");
            }
        }
    }

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
}

pub fn print_classification(utxos: &[ClassifiedUtxo], summary: &PortfolioSummary) {
    for utxo in utxos {
        let token = match utxo.token() {
            Some(token) => format!(
                " token={} amount={}",
                token
                    .ticker
                    .clone()
                    .unwrap_or_else(|| sanitize_for_display(&token.token_id, 8)),
                token
                    .display_amount()
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| token.amount_atoms.to_string())
            ),
            None => String::new(),
        };
        println!(
            "{:<20} {:>14} {:<14} {:<10}{}",
            sanitize_for_display(&utxo.outpoint().to_string(), 16),
            utxo.value_atoms(),
            utxo.utxo_type().as_str(),
            utxo.health().status.as_str(),
            token
        );
    }

    println!();
    println!("Total UTXOs: {}", summary.total_utxos);
    for utxo_type in UtxoType::ALL {
        println!("  {:<14} {}", utxo_type.as_str(), summary.count(utxo_type));
    }
    println!(
        "Healthy: {}  Dust: {}  Suspicious: {}",
        summary.health_count(HealthStatus::Healthy),
        summary.health_count(HealthStatus::Dust),
        summary.health_count(HealthStatus::Suspicious)
    );
    println!(
        "Spendable plain value: {} atoms of {} total",
        summary.spendable_value_atoms, summary.total_value_atoms
    );

    if summary.token_holdings.is_empty() {
        return;
    }
    println!(
        "Tokens: {} ids across {} UTXOs ({} mint authorities)",
        summary.unique_token_ids, summary.token_utxos, summary.mint_authority_count
    );
    for holding in &summary.token_holdings {
        println!(
            "  {:<12} {:>24} in {} UTXOs",
            holding
                .ticker
                .clone()
                .unwrap_or_else(|| sanitize_for_display(&holding.token_id, 8)),
            holding
                .display_amount()
                .map(|a| a.to_string())
                .unwrap_or_else(|| holding.total_atoms.to_string()),
            holding.utxo_count
        );
    }
}

pub fn print_selection(selection: &StrategySelection) {
    if let Some(warning) = &selection.warning {
        println!("{warning}");
        return;
    }

    println!(
        "Strategy {}: {} of {} UTXOs eligible, {} atoms",
        selection.strategy,
        selection.stats.eligible,
        selection.stats.considered,
        selection.stats.selected_value_atoms
    );
    for utxo in &selection.selected {
        println!("  {} {}", utxo.outpoint(), utxo.value_atoms());
    }
    println!(
        "Excluded: {} token-protected, {} dust, {} below minimum",
        selection.stats.protected_tokens,
        selection.stats.excluded_dust,
        selection.stats.excluded_below_minimum
    );
}
