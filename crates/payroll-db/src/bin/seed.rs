//! # Seed Data Generator
//!
//! Populates the database with sample employees for development.
//!
//! ## Usage
//! ```bash
//! # Generate 50 employees (default)
//! cargo run -p payroll-db --bin seed
//!
//! # Generate custom amount into a specific database
//! cargo run -p payroll-db --bin seed -- --count 200 --db ./data/payroll.db
//! ```
//!
//! Each employee gets a name from the sample list (suffixed with a number
//! once the list wraps), a salary between 30,000 and 129,000, a start date
//! spread over 2015-2024, and the gender attached to the sample name.

use chrono::{Duration, NaiveDate};
use std::env;

use payroll_core::NewEmployee;
use payroll_db::{Database, DbConfig};

/// Sample names with their gender codes.
const SAMPLE_EMPLOYEES: &[(&str, char)] = &[
    ("Bill", 'M'),
    ("Terisa", 'F'),
    ("Charlie", 'M'),
    ("Mark", 'M'),
    ("Gunjan", 'F'),
    ("Anil", 'M'),
    ("Priya", 'F'),
    ("Deepak", 'M'),
    ("Meera", 'F'),
    ("Rohan", 'M'),
    ("Kavya", 'F'),
    ("Sanjay", 'M'),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 50;
    let mut db_path = String::from("./payroll_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Payroll Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of employees to generate (default: 50)");
                println!("  -d, --db <PATH>    Database file path (default: ./payroll_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Payroll Seed Data Generator");
    println!("===========================");
    println!("Database:  {}", db_path);
    println!("Employees: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.employees().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} employees", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut generated = 0;
    for seed in 0..count {
        let employee = generate_employee(seed);
        if let Err(e) = db.employees().insert(&employee).await {
            eprintln!("Failed to insert {}: {}", employee.name, e);
            continue;
        }
        generated += 1;
    }

    println!();
    println!("✓ Generated {} employees", generated);

    let averages = db.employees().average_salary_by_gender().await?;
    for (gender, average) in &averages {
        println!("  Average salary ({}): {:.2}", gender, average);
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single employee with deterministic data.
fn generate_employee(seed: usize) -> NewEmployee {
    let (base_name, gender) = SAMPLE_EMPLOYEES[seed % SAMPLE_EMPLOYEES.len()];
    let round = seed / SAMPLE_EMPLOYEES.len();

    let name = if round == 0 {
        base_name.to_string()
    } else {
        format!("{} {}", base_name, round + 1)
    };

    // 30,000 - 129,000 in steps of 1,000
    let salary = 30_000.0 + ((seed * 37) % 100) as f64 * 1_000.0;

    // Spread start dates over ten years from 2015-01-01
    let epoch = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default();
    let start_date = epoch + Duration::days(((seed * 97) % 3650) as i64);

    NewEmployee {
        name,
        salary,
        start_date: Some(start_date),
        gender: Some(gender),
    }
}
