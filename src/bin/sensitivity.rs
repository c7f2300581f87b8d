//! Sensitivity tables for the preset deals
//!
//! Prints the average net yield of the reference apartment across an
//! occupancy/ADR grid, and the flip XIRR of the sample villa across a range
//! of sale prices. Every cell runs independently on the rayon pool.

use chrono::Local;
use property_returns::scenario::{sale_price_sweep, ScenarioRunner};
use property_returns::{InvestmentAssumptions, RentalAssumptions};

const OCCUPANCIES: [f64; 5] = [55.0, 60.0, 65.0, 70.0, 75.0];
const ADRS: [f64; 5] = [1_500_000.0, 1_700_000.0, 1_900_000.0, 2_100_000.0, 2_300_000.0];

fn main() {
    env_logger::init();

    println!("Property Returns Sensitivity");
    println!("============================\n");

    let runner = ScenarioRunner::with_assumptions(RentalAssumptions::reference_apartment());
    let grid = runner.occupancy_adr_grid(&OCCUPANCIES, &ADRS);

    println!("Average net yield (%), reference apartment");
    print!("{:>8}", "Occ\\ADR");
    for adr in ADRS {
        print!(" {:>10.1}M", adr / 1_000_000.0);
    }
    println!();
    println!("{}", "-".repeat(8 + ADRS.len() * 12));

    for (occ, row) in OCCUPANCIES.iter().zip(&grid) {
        print!("{:>7.0}%", occ);
        for cell in row {
            match cell {
                Ok(summary) => print!(" {:>11.2}", summary.avg_roi_after_management),
                Err(_) => print!(" {:>11}", "err"),
            }
        }
        println!();
    }
    println!();

    let villa = InvestmentAssumptions::sample_villa(Local::now().date_naive());
    let prices: Vec<f64> = (0..9).map(|i| 3_600_000_000.0 + i as f64 * 200_000_000.0).collect();

    println!("Flip XIRR by sale price, sample villa");
    println!("{:>14} {:>10} {:>16}", "Sale Price", "XIRR", "Net Profit");
    println!("{}", "-".repeat(42));
    for (price, result) in sale_price_sweep(&villa, &prices) {
        match result {
            Ok(r) => println!(
                "{:>13.2}B {:>9.2}% {:>15.1}M",
                price / 1e9,
                r.rate * 100.0,
                r.net_profit / 1e6
            ),
            Err(e) => println!("{:>13.2}B {:>10}", price / 1e9, e),
        }
    }
}
