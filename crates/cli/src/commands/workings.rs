// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sqsctl workings`: jobs currently being invoked

use anyhow::Result;

use crate::client::{DaemonClient, Workings};
use crate::output::{format_age, print_json, OutputFormat};
use crate::table::{Column, Table};

pub async fn handle(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let workings = client.workings().await?;
    match format {
        OutputFormat::Text => {
            if workings.jobs.is_empty() {
                println!("No jobs in flight");
                return Ok(());
            }
            let mut stdout = std::io::stdout();
            table(&workings, Table::new(columns())).render(&mut stdout)?;
        }
        OutputFormat::Json => print_json(&workings)?,
    }
    Ok(())
}

fn columns() -> Vec<Column> {
    vec![
        Column::left("ID").with_max(40),
        Column::left("WORKER"),
        Column::right("AGE"),
        Column::muted("STARTED"),
    ]
}

/// Ages are measured against the daemon's snapshot time, not the local clock.
fn table(workings: &Workings, mut table: Table) -> Table {
    for job in &workings.jobs {
        table.row(vec![
            job.id.clone(),
            job.worker.clone(),
            format_age(job.started_at_ms, workings.taken_at_ms),
            job.started_at_ms.to_string(),
        ]);
    }
    table
}

#[cfg(test)]
#[path = "workings_tests.rs"]
mod tests;
