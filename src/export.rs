//! CSV export of schedules and projections

use chrono::NaiveDate;
use serde::Serialize;
use std::io;
use std::path::Path;

use crate::projection::YearlyProjection;
use crate::xirr::CashFlowEvent;

#[derive(Serialize)]
struct ScheduleRecord<'a> {
    date: NaiveDate,
    description: String,
    direction: &'a str,
    amount: f64,
    cumulative: f64,
}

/// One row per cash flow with a running total
pub fn write_schedule_csv<W: io::Write>(events: &[CashFlowEvent], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut cumulative = 0.0;

    for event in events {
        cumulative += event.amount;
        wtr.serialize(ScheduleRecord {
            date: event.date,
            description: event.kind.to_string(),
            direction: if event.is_outflow() { "outflow" } else { "inflow" },
            amount: event.amount,
            cumulative,
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// One row per projection year, every column of [`YearlyProjection`]
pub fn write_projection_csv<W: io::Write>(rows: &[YearlyProjection], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_schedule_csv_file(events: &[CashFlowEvent], path: &Path) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_schedule_csv(events, file)?;
    log::info!("Wrote {} cash flows to {}", events.len(), path.display());
    Ok(())
}

pub fn write_projection_csv_file(rows: &[YearlyProjection], path: &Path) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_projection_csv(rows, file)?;
    log::info!("Wrote {} projection years to {}", rows.len(), path.display());
    Ok(())
}
