#![allow(dead_code)]

use async_trait::async_trait;
use payroute::bootstrap::{self, Payroute};
use payroute::config::PayrouteConfig;
use payroute::domain::ports::{Gateway, GatewayResult};
use payroute::domain::transaction::Amount;
use rand::Rng;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

pub fn core() -> Payroute {
    bootstrap::build(&PayrouteConfig::default()).expect("default config must build")
}

pub fn amount(value: Decimal) -> Amount {
    Amount::new(value).expect("test amounts are positive")
}

pub fn json_callback(id: &str, status: &str) -> Vec<u8> {
    format!(r#"{{"transaction_id": "{}", "status": "{}"}}"#, id, status).into_bytes()
}

pub fn xml_callback(id: &str, status: &str) -> Vec<u8> {
    format!(
        r#"
        <callback>
            <transaction_id>{}</transaction_id>
            <status>{}</status>
        </callback>
        "#,
        id, status
    )
    .into_bytes()
}

/// Hands out sequential identifiers: `seq-1`, `seq-2`, ...
#[derive(Default)]
pub struct SequentialGateway {
    next: AtomicU64,
}

#[async_trait]
impl Gateway for SequentialGateway {
    fn name(&self) -> &str {
        "sequential"
    }

    async fn process_deposit(&self, _amount: Amount) -> GatewayResult {
        Ok(format!("seq-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn process_withdrawal(&self, _amount: Amount) -> GatewayResult {
        Ok(format!("seq-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1))
    }
}

/// Writes an instructions CSV with `rows` random deposits/withdrawals spread
/// over the default gateways.
pub fn generate_instructions(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(["type", "gateway", "amount", "outcome"])?;

    let mut rng = rand::thread_rng();
    for _ in 0..rows {
        let kind = if rng.gen_bool(0.5) { "deposit" } else { "withdrawal" };
        let gateway = if rng.gen_bool(0.5) { "gateway_a" } else { "gateway_b" };
        let cents: u32 = rng.gen_range(1..=1_000_000);
        let amount = format!("{}.{:02}", cents / 100, cents % 100);
        let outcome = ["completed", "failed", ""][rng.gen_range(0..3)];
        wtr.write_record([kind, gateway, amount.as_str(), outcome])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn random_amount() -> Amount {
    let cents: i64 = rand::thread_rng().gen_range(1..=100_000);
    amount(Decimal::new(cents, 2))
}
