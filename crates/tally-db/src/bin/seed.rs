//! # Seed Data Generator
//!
//! Bootstraps a database with an admin manager, a demo customer and a
//! small catalog. Without an admin nobody can register further managers.
//!
//! ## Usage
//! ```bash
//! cargo run -p tally-db --bin seed -- --admin-phone 79990000000 --admin-password secret1
//!
//! # Specify database path
//! cargo run -p tally-db --bin seed -- --db ./data/tally.db --admin-phone ... --admin-password ...
//! ```

use std::collections::BTreeSet;
use std::env;

use tally_core::validation::{validate_password, validate_phone};
use tally_core::{Money, ProductInput, Role};
use tally_db::security::hash_password;
use tally_db::{Database, DbConfig};

/// Demo catalog: (name, price in minor units, qty)
const PRODUCTS: &[(&str, i64, i64)] = &[
    ("Milk 1L", 89, 40),
    ("Bread", 45, 60),
    ("Butter 200g", 199, 25),
    ("Eggs x10", 129, 30),
    ("Coffee 250g", 549, 12),
    ("Green Tea", 299, 18),
    ("Apple Juice 1L", 159, 22),
    ("Cheddar 300g", 389, 15),
];

const DEMO_CUSTOMER: (&str, &str, &str) = ("Demo Customer", "79990000001", "customer1");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./data/tally.db");
    let mut admin_phone: Option<String> = None;
    let mut admin_password: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--admin-phone" => {
                if i + 1 < args.len() {
                    admin_phone = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--admin-password" => {
                if i + 1 < args.len() {
                    admin_password = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let (Some(admin_phone), Some(admin_password)) = (admin_phone, admin_password) else {
        print_help();
        return Err("--admin-phone and --admin-password are required".into());
    };
    validate_phone(&admin_phone)?;
    validate_password(&admin_password)?;

    println!("🌱 Tally Seed");
    println!("=============");
    println!("Database: {}", db_path);
    println!();

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Managers
    if db.managers().count().await? > 0 {
        println!("⚠ Managers already exist, skipping admin creation");
    } else {
        let roles = BTreeSet::from([Role::Admin, Role::Manager]);
        let admin = db
            .managers()
            .insert("Administrator", &admin_phone, &hash_password(&admin_password)?, &roles)
            .await?;
        let role_names: Vec<String> = admin.roles.iter().map(Role::to_string).collect();
        println!(
            "✓ Created admin manager #{} ({}) roles: {}",
            admin.id,
            admin.phone,
            role_names.join(", ")
        );
    }

    // Customers
    if db.customers().count().await? > 0 {
        println!("⚠ Customers already exist, skipping demo customer");
    } else {
        let (name, phone, password) = DEMO_CUSTOMER;
        let customer = db
            .customers()
            .insert(name, phone, &hash_password(password)?)
            .await?;
        println!(
            "✓ Created demo customer #{} ({} / {})",
            customer.id, phone, password
        );
    }

    // Products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products, skipping catalog", existing);
    } else {
        for (name, price, qty) in PRODUCTS {
            let input = ProductInput {
                id: None,
                name: (*name).to_string(),
                price: Money::from_minor(*price),
                qty: *qty,
                active: true,
            };
            if let Err(e) = db.products().insert(&input).await {
                eprintln!("Failed to insert {}: {}", name, e);
            }
        }
        println!("✓ Created {} products", db.products().count().await?);
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn print_help() {
    println!("Tally Seed");
    println!();
    println!("Usage: seed --admin-phone <PHONE> --admin-password <PASSWORD> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -d, --db <PATH>              Database file path (default: ./data/tally.db)");
    println!("      --admin-phone <PHONE>    Login of the admin manager");
    println!("      --admin-password <PW>    Password of the admin manager");
    println!("  -h, --help                   Show this help message");
}
