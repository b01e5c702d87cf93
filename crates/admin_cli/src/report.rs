//! Reports printed as pretty JSON, in the same shape the HTTP API returns.

use std::error::Error;

use chrono::NaiveDate;
use engine::{Engine, Period, PeriodParams, TransactionFilter, reports};
use server::views;

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Kind {
    Summary,
    Trend,
    Budgets,
}

pub async fn render(
    engine: &Engine,
    owner: &str,
    kind: Kind,
    params: PeriodParams,
    today: NaiveDate,
) -> Result<String, Box<dyn Error + Send + Sync>> {
    let filter = TransactionFilter::default();

    let json = match kind {
        Kind::Summary => {
            let period = Period::resolve(&params, today, Period::month_of(today))?;
            let summary = reports::balance_summary(engine, owner, &filter, period).await?;
            serde_json::to_string_pretty(&views::summary(summary))?
        }
        Kind::Trend => {
            let year = Period::trend_year(&params, today)?;
            let months: Vec<_> = reports::monthly_trend(engine, owner, year, &filter)
                .await?
                .into_iter()
                .map(views::month)
                .collect();
            serde_json::to_string_pretty(&months)?
        }
        Kind::Budgets => {
            let period = Period::resolve(&params, today, Period::AllTime)?;
            let usage: Vec<_> = reports::budget_utilization(engine, owner, period)
                .await?
                .into_iter()
                .map(views::budget_usage)
                .collect();
            serde_json::to_string_pretty(&usage)?
        }
    };

    Ok(json)
}
