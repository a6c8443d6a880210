//! A counter session driven through the command layer, the way the binary
//! runs it.

use agro_db::{MemoryStore, SqliteStore};
use agro_till::cli::{execute, Command, PrinterKind};
use agro_till::error::ErrorCode;
use agro_till::state::{AppConfig, Register};
use chrono::{Local, TimeZone};
use serde_json::Value;

fn run(register: &mut Register, config: &AppConfig, command: Command) -> Value {
    let now = Local.with_ymd_and_hms(2026, 10, 16, 18, 5, 0).earliest().unwrap();
    let mut out = Vec::new();
    execute(&command, register, config, true, now, &mut out).unwrap();
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn test_sale_then_summary_and_reprint() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        receipts_dir: Some(dir.path().join("receipts")),
        ..AppConfig::default()
    };
    let mut register = Register::open(Box::new(SqliteStore::in_memory().unwrap()), &config);

    run(&mut register, &config, Command::Set { id: "m_chicken_rice".into(), qty: "2".into() });
    run(&mut register, &config, Command::Add { id: "m_tea".into() });
    let cart = run(&mut register, &config, Command::Add { id: "m_tea".into() });
    assert_eq!(cart["cart"]["subtotalLabel"], "₹220");
    assert_eq!(cart["changed"]["qty"], 2);

    let checkout = run(&mut register, &config, Command::Checkout { printer: PrinterKind::File });
    assert_eq!(checkout["printed"], true);
    assert_eq!(checkout["saved"], true);
    assert_eq!(checkout["subtotalLabel"], "₹220");

    let bill_id = checkout["billId"].as_str().unwrap().to_string();
    let receipt_file = dir.path().join("receipts").join(format!("{}.txt", bill_id));
    assert!(std::fs::read_to_string(receipt_file).unwrap().contains("Chicken Rice"));

    let summary = run(&mut register, &config, Command::Summary);
    assert_eq!(summary["view"]["revenueLabel"], "₹220");
    assert_eq!(summary["view"]["mostSold"], "Chicken Rice");
    assert_eq!(summary["view"]["itemsSold"], 4);

    let bills = run(&mut register, &config, Command::Bills { today: true });
    assert_eq!(bills["bills"].as_array().map(Vec::len), Some(1));

    let receipt = run(
        &mut register,
        &config,
        Command::Receipt { bill_id: bill_id.clone(), printer: PrinterKind::File },
    );
    assert_eq!(receipt["billId"], bill_id.as_str());
}

#[test]
fn test_rejections_carry_codes() {
    let config = AppConfig::default();
    let mut register = Register::with_defaults(Box::new(MemoryStore::new()));
    let now = Local::now();
    let mut out = Vec::new();

    let err = execute(
        &Command::Checkout { printer: PrinterKind::None },
        &mut register,
        &config,
        true,
        now,
        &mut out,
    )
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::EmptyCart);

    let err = execute(
        &Command::Add { id: "m_pizza".into() },
        &mut register,
        &config,
        true,
        now,
        &mut out,
    )
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let err = execute(
        &Command::Receipt { bill_id: "bill_0_deadbeef".into(), printer: PrinterKind::None },
        &mut register,
        &config,
        true,
        now,
        &mut out,
    )
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    assert!(out.is_empty());
    assert!(register.sales().is_empty());
}
