//! Demo ledger for a fresh owner.
//!
//! Amounts and dates are derived from `today` only, so two seeds with the
//! same date produce the same ledger.

use std::error::Error;

use chrono::{Datelike, Months, NaiveDate};
use engine::{
    BudgetCmd, Category, CategoryCmd, Engine, PaymentMethodCmd, PaymentMethodKind,
    RecurringPaymentCmd, ReminderCmd, ReminderPriority, TransactionCmd, TransactionKind,
};

/// Six months of history, the current one included.
const MONTHS: u32 = 6;

struct DemoCategory {
    name: &'static str,
    description: &'static str,
    color: &'static str,
    icon: &'static str,
    kind: TransactionKind,
    /// Expected monthly amount in whole units.
    monthly: i64,
}

const CATEGORIES: &[DemoCategory] = &[
    DemoCategory {
        name: "Alimentación",
        description: "Comida y bebidas",
        color: "#FF69B4",
        icon: "🍕",
        kind: TransactionKind::Expense,
        monthly: 600_000,
    },
    DemoCategory {
        name: "Transporte",
        description: "Gasolina, transporte público",
        color: "#87CEEB",
        icon: "🚗",
        kind: TransactionKind::Expense,
        monthly: 220_000,
    },
    DemoCategory {
        name: "Hogar",
        description: "Servicios públicos, alquiler",
        color: "#98FB98",
        icon: "🏠",
        kind: TransactionKind::Expense,
        monthly: 450_000,
    },
    DemoCategory {
        name: "Entretenimiento",
        description: "Cine, juegos, diversión",
        color: "#DDA0DD",
        icon: "🎮",
        kind: TransactionKind::Expense,
        monthly: 200_000,
    },
    DemoCategory {
        name: "Salud",
        description: "Médico, medicinas",
        color: "#FFB6C1",
        icon: "💊",
        kind: TransactionKind::Expense,
        monthly: 120_000,
    },
    DemoCategory {
        name: "Compras",
        description: "Ropa, accesorios",
        color: "#F0E68C",
        icon: "🛒",
        kind: TransactionKind::Expense,
        monthly: 250_000,
    },
    DemoCategory {
        name: "Educación",
        description: "Cursos, libros",
        color: "#FFA07A",
        icon: "📚",
        kind: TransactionKind::Expense,
        monthly: 100_000,
    },
    DemoCategory {
        name: "Mascotas",
        description: "Comida y cuidado de gatos",
        color: "#FFE4E1",
        icon: "🐱",
        kind: TransactionKind::Expense,
        monthly: 110_000,
    },
    DemoCategory {
        name: "Ingresos Salario",
        description: "Salario mensual",
        color: "#90EE90",
        icon: "💰",
        kind: TransactionKind::Income,
        monthly: 3_200_000,
    },
    DemoCategory {
        name: "Ingresos Extra",
        description: "Trabajos extra, bonos",
        color: "#98FB98",
        icon: "💎",
        kind: TransactionKind::Income,
        monthly: 450_000,
    },
];

struct DemoRecurring {
    name: &'static str,
    platform: Option<&'static str>,
    /// Whole units per month.
    monthly: i64,
    /// Whole units per year, for payments billed yearly.
    annual: Option<i64>,
    on_card: bool,
}

const RECURRING: &[DemoRecurring] = &[
    DemoRecurring {
        name: "Netflix",
        platform: Some("Netflix"),
        monthly: 17_000,
        annual: None,
        on_card: true,
    },
    DemoRecurring {
        name: "Spotify",
        platform: Some("Spotify"),
        monthly: 15_000,
        annual: None,
        on_card: true,
    },
    DemoRecurring {
        name: "Internet",
        platform: None,
        monthly: 80_000,
        annual: None,
        on_card: false,
    },
    DemoRecurring {
        name: "Gimnasio",
        platform: None,
        monthly: 120_000,
        annual: None,
        on_card: false,
    },
    DemoRecurring {
        name: "Seguro de Vida",
        platform: None,
        monthly: 85_000 / 12,
        annual: Some(85_000),
        on_card: true,
    },
    DemoRecurring {
        name: "Veterinario",
        platform: None,
        monthly: 150_000,
        annual: None,
        on_card: false,
    },
];

fn cents(units: i64) -> i64 {
    units * 100
}

fn first_of_month(day: NaiveDate) -> Option<NaiveDate> {
    day.with_day(1)
}

/// A day in `1..=28` of the month starting at `month_start`.
fn demo_day(month_start: NaiveDate, salt: u32) -> Option<NaiveDate> {
    month_start.with_day(1 + salt % 28)
}

/// Split `monthly` into `parts` amounts that vary a little around the mean.
fn demo_amounts(monthly: i64, parts: u32, salt: u32) -> Vec<i64> {
    let mean = monthly / i64::from(parts);
    (0..parts)
        .map(|i| {
            let swing = i64::from((salt * 7 + i * 13) % 11) - 5;
            (mean + swing * mean / 20).max(1)
        })
        .collect()
}

async fn ensure_categories(
    engine: &Engine,
    owner: &str,
) -> Result<(Vec<Category>, usize), Box<dyn Error + Send + Sync>> {
    let existing = engine.list_categories(owner, true).await?;
    let mut created = 0;
    let mut categories = Vec::with_capacity(CATEGORIES.len());

    for demo in CATEGORIES {
        if let Some(found) = existing.iter().find(|c| c.name == demo.name) {
            categories.push(found.clone());
            continue;
        }
        let cmd = CategoryCmd::new(demo.name, demo.kind)
            .description(demo.description)
            .color(demo.color)
            .icon(demo.icon)
            .monthly_budget(cents(demo.monthly));
        categories.push(engine.create_category(owner, cmd).await?);
        created += 1;
    }

    Ok((categories, created))
}

/// Seed the demo ledger. Returns `false` when every demo category already
/// existed and nothing was written.
pub async fn run(
    engine: &Engine,
    owner: &str,
    today: NaiveDate,
) -> Result<bool, Box<dyn Error + Send + Sync>> {
    let (categories, created) = ensure_categories(engine, owner).await?;
    if created == 0 {
        return Ok(false);
    }
    tracing::info!(owner, created, "categories ready");

    let cash = engine
        .create_payment_method(owner, PaymentMethodCmd::new("Efectivo", PaymentMethodKind::Cash))
        .await?;
    let card = engine
        .create_payment_method(
            owner,
            PaymentMethodCmd::new("Tarjeta Gatuna", PaymentMethodKind::Credit)
                .bank("Banco Michi")
                .credit_limit(cents(5_000_000))
                .expires_on(today.checked_add_months(Months::new(36)).unwrap_or(today)),
        )
        .await?;

    let current = first_of_month(today).ok_or("invalid date")?;
    let mut inserted = 0;
    for offset in 0..MONTHS {
        let month_start = current
            .checked_sub_months(Months::new(offset))
            .ok_or("date out of range")?;

        for (index, (demo, category)) in CATEGORIES.iter().zip(&categories).enumerate() {
            let salt = offset * 31 + index as u32;
            let parts = match demo.kind {
                TransactionKind::Income => 1,
                TransactionKind::Expense => 2 + salt % 4,
            };
            for (part, amount) in demo_amounts(cents(demo.monthly), parts, salt)
                .into_iter()
                .enumerate()
            {
                let day = demo_day(month_start, salt + part as u32 * 9).ok_or("invalid date")?;
                if day > today {
                    continue;
                }
                let method = if demo.name == "Compras" { card.id } else { cash.id };
                let note = match demo.kind {
                    TransactionKind::Income => format!("Ingreso de {}", demo.name.to_lowercase()),
                    TransactionKind::Expense => {
                        format!("Gasto en {} - {}", demo.name.to_lowercase(), part + 1)
                    }
                };
                let cmd = TransactionCmd::new(demo.kind, amount, day)
                    .category(category.id)
                    .payment_method(method)
                    .note(note);
                engine.create_transaction(owner, cmd).await?;
                inserted += 1;
            }
        }
    }
    tracing::info!(owner, inserted, "transactions ready");

    let started = current
        .checked_sub_months(Months::new(MONTHS))
        .ok_or("date out of range")?;
    for (index, demo) in RECURRING.iter().enumerate() {
        let next = demo_day(current, index as u32 * 4 + 4).ok_or("invalid date")?;
        let mut cmd = RecurringPaymentCmd::new(demo.name, cents(demo.monthly), started)
            .next_renewal_on(next);
        if let Some(platform) = demo.platform {
            cmd = cmd.platform(platform);
        }
        if let Some(annual) = demo.annual {
            cmd = cmd.annual_amount(cents(annual));
        }
        cmd = cmd.payment_method(if demo.on_card { card.id } else { cash.id });
        engine.create_recurring_payment(owner, cmd).await?;
    }

    for (demo, category) in CATEGORIES.iter().zip(&categories) {
        if demo.kind == TransactionKind::Expense {
            let cmd = BudgetCmd::new(
                current.year(),
                current.month(),
                category.id,
                cents(demo.monthly),
            );
            engine.set_budget(owner, cmd).await?;
        }
    }

    let due = today.checked_add_days(chrono::Days::new(5)).unwrap_or(today);
    engine
        .create_reminder(
            owner,
            ReminderCmd::new("Pagar arriendo", due)
                .amount(cents(1_200_000))
                .payment_method(cash.id)
                .priority(ReminderPriority::High),
        )
        .await?;

    Ok(true)
}
