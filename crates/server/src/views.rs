//! Engine report values in their wire shape.
//!
//! Shared by the HTTP handlers and the admin CLI so both print the same JSON.

use api_types::report::{
    BudgetStatus as ApiBudgetStatus, BudgetUsageView, CategoryAmountView, DashboardView,
    MonthTotalsView, PeriodView, SummaryView,
};
use engine::{
    BalanceSummary, BudgetStatus, BudgetUsage, CategoryAmount, Dashboard, MonthTotals, Period,
};

pub fn period(period: Period) -> PeriodView {
    match period {
        Period::AllTime => PeriodView::default(),
        Period::Year(year) => PeriodView {
            year: Some(year),
            month: None,
        },
        Period::Month { year, month } => PeriodView {
            year: Some(year),
            month: Some(month),
        },
    }
}

pub fn summary(summary: BalanceSummary) -> SummaryView {
    SummaryView {
        income: summary.income.to_decimal(),
        expenses: summary.expenses.to_decimal(),
        balance: summary.balance.to_decimal(),
        recurring_monthly_total: summary.recurring_monthly_total.to_decimal(),
        available_credit: summary.available_credit.to_decimal(),
    }
}

pub fn category(amount: CategoryAmount) -> CategoryAmountView {
    CategoryAmountView {
        category_id: amount.category_id,
        category: amount.name,
        color: amount.color,
        icon: amount.icon,
        amount: amount.amount.to_decimal(),
    }
}

pub fn month(totals: MonthTotals) -> MonthTotalsView {
    MonthTotalsView {
        month: totals.month,
        income: totals.income.to_decimal(),
        expenses: totals.expenses.to_decimal(),
        balance: totals.balance.to_decimal(),
    }
}

pub fn budget_status(status: BudgetStatus) -> ApiBudgetStatus {
    match status {
        BudgetStatus::OnTrack => ApiBudgetStatus::OnTrack,
        BudgetStatus::Warning => ApiBudgetStatus::Warning,
        BudgetStatus::OverBudget => ApiBudgetStatus::OverBudget,
    }
}

pub fn budget_usage(usage: BudgetUsage) -> BudgetUsageView {
    BudgetUsageView {
        budget_id: usage.budget_id,
        category_id: usage.category_id,
        category: usage.category,
        year: usage.year,
        month: usage.month,
        planned: usage.planned.to_decimal(),
        spent: usage.spent.to_decimal(),
        remaining: usage.remaining.to_decimal(),
        utilization_pct: usage.utilization_pct,
        status: budget_status(usage.status),
    }
}

pub fn dashboard(dashboard: Dashboard) -> DashboardView {
    DashboardView {
        period: period(dashboard.period),
        summary: summary(dashboard.summary),
        categories: dashboard.categories.into_iter().map(category).collect(),
    }
}
