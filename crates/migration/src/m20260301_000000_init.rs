//! Initial schema.
//!
//! - `users`: authentication, `username` is the owner key of every row
//! - `categories`: income/expense labels with display color and icon
//! - `payment_methods`: cash, debit and credit cards
//! - `transactions`: dated incomes and expenses in minor units
//! - `recurring_payments`: subscriptions and fixed monthly charges
//! - `budgets`: planned expense per category and month
//! - `reminders`: upcoming payments to remember

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    UserId,
    Name,
    NameNorm,
    Kind,
    Color,
    Icon,
    Description,
    MonthlyBudgetMinor,
    Active,
    CreatedAt,
}

#[derive(Iden)]
enum PaymentMethods {
    Table,
    Id,
    UserId,
    Name,
    Kind,
    Bank,
    CreditLimitMinor,
    ExpiresOn,
    Active,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    UserId,
    Kind,
    AmountMinor,
    OccurredOn,
    CategoryId,
    PaymentMethodId,
    Note,
    Installments,
    InstallmentIndex,
    CreatedAt,
}

#[derive(Iden)]
enum RecurringPayments {
    Table,
    Id,
    UserId,
    Name,
    Platform,
    MonthlyAmountMinor,
    AnnualAmountMinor,
    PaymentMethodId,
    StartedOn,
    NextRenewalOn,
    Status,
}

#[derive(Iden)]
enum Budgets {
    Table,
    Id,
    UserId,
    Year,
    Month,
    CategoryId,
    PlannedMinor,
}

#[derive(Iden)]
enum Reminders {
    Table,
    Id,
    UserId,
    Title,
    AmountMinor,
    DueOn,
    PaymentMethodId,
    CategoryId,
    Status,
    Priority,
}

fn id_column<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(&mut id_column(Categories::Id))
                    .col(ColumnDef::new(Categories::UserId).string().not_null())
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::NameNorm).string().not_null())
                    .col(ColumnDef::new(Categories::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Categories::Color)
                            .string()
                            .not_null()
                            .default("#FF69B4"),
                    )
                    .col(ColumnDef::new(Categories::Icon).string().not_null())
                    .col(ColumnDef::new(Categories::Description).string())
                    .col(ColumnDef::new(Categories::MonthlyBudgetMinor).big_integer())
                    .col(
                        ColumnDef::new(Categories::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Categories::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categories-user_id")
                            .from(Categories::Table, Categories::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-user_id-name_norm-unique")
                    .table(Categories::Table)
                    .col(Categories::UserId)
                    .col(Categories::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Payment methods
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(PaymentMethods::Table)
                    .if_not_exists()
                    .col(&mut id_column(PaymentMethods::Id))
                    .col(ColumnDef::new(PaymentMethods::UserId).string().not_null())
                    .col(ColumnDef::new(PaymentMethods::Name).string().not_null())
                    .col(ColumnDef::new(PaymentMethods::Kind).string().not_null())
                    .col(ColumnDef::new(PaymentMethods::Bank).string())
                    .col(
                        ColumnDef::new(PaymentMethods::CreditLimitMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(PaymentMethods::ExpiresOn).date())
                    .col(
                        ColumnDef::new(PaymentMethods::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payment_methods-user_id")
                            .from(PaymentMethods::Table, PaymentMethods::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payment_methods-user_id-name-unique")
                    .table(PaymentMethods::Table)
                    .col(PaymentMethods::UserId)
                    .col(PaymentMethods::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(&mut id_column(Transactions::Id))
                    .col(ColumnDef::new(Transactions::UserId).string().not_null())
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::OccurredOn).date().not_null())
                    .col(ColumnDef::new(Transactions::CategoryId).integer())
                    .col(ColumnDef::new(Transactions::PaymentMethodId).integer())
                    .col(ColumnDef::new(Transactions::Note).string())
                    .col(
                        ColumnDef::new(Transactions::Installments)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Transactions::InstallmentIndex)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-user_id")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-category_id")
                            .from(Transactions::Table, Transactions::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-payment_method_id")
                            .from(Transactions::Table, Transactions::PaymentMethodId)
                            .to(PaymentMethods::Table, PaymentMethods::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-user_id-occurred_on")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::OccurredOn)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Recurring payments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(RecurringPayments::Table)
                    .if_not_exists()
                    .col(&mut id_column(RecurringPayments::Id))
                    .col(ColumnDef::new(RecurringPayments::UserId).string().not_null())
                    .col(ColumnDef::new(RecurringPayments::Name).string().not_null())
                    .col(ColumnDef::new(RecurringPayments::Platform).string())
                    .col(
                        ColumnDef::new(RecurringPayments::MonthlyAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RecurringPayments::AnnualAmountMinor).big_integer())
                    .col(ColumnDef::new(RecurringPayments::PaymentMethodId).integer())
                    .col(
                        ColumnDef::new(RecurringPayments::StartedOn)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringPayments::NextRenewalOn)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringPayments::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recurring_payments-user_id")
                            .from(RecurringPayments::Table, RecurringPayments::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recurring_payments-payment_method_id")
                            .from(RecurringPayments::Table, RecurringPayments::PaymentMethodId)
                            .to(PaymentMethods::Table, PaymentMethods::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Budgets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(&mut id_column(Budgets::Id))
                    .col(ColumnDef::new(Budgets::UserId).string().not_null())
                    .col(ColumnDef::new(Budgets::Year).integer().not_null())
                    .col(ColumnDef::new(Budgets::Month).integer().not_null())
                    .col(ColumnDef::new(Budgets::CategoryId).integer().not_null())
                    .col(
                        ColumnDef::new(Budgets::PlannedMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budgets-user_id")
                            .from(Budgets::Table, Budgets::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budgets-category_id")
                            .from(Budgets::Table, Budgets::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budgets-user_id-year-month-category_id-unique")
                    .table(Budgets::Table)
                    .col(Budgets::UserId)
                    .col(Budgets::Year)
                    .col(Budgets::Month)
                    .col(Budgets::CategoryId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Reminders
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Reminders::Table)
                    .if_not_exists()
                    .col(&mut id_column(Reminders::Id))
                    .col(ColumnDef::new(Reminders::UserId).string().not_null())
                    .col(ColumnDef::new(Reminders::Title).string().not_null())
                    .col(ColumnDef::new(Reminders::AmountMinor).big_integer())
                    .col(ColumnDef::new(Reminders::DueOn).date().not_null())
                    .col(ColumnDef::new(Reminders::PaymentMethodId).integer())
                    .col(ColumnDef::new(Reminders::CategoryId).integer())
                    .col(
                        ColumnDef::new(Reminders::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Reminders::Priority)
                            .string()
                            .not_null()
                            .default("normal"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reminders-user_id")
                            .from(Reminders::Table, Reminders::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reminders-payment_method_id")
                            .from(Reminders::Table, Reminders::PaymentMethodId)
                            .to(PaymentMethods::Table, PaymentMethods::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reminders-category_id")
                            .from(Reminders::Table, Reminders::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-reminders-user_id-due_on")
                    .table(Reminders::Table)
                    .col(Reminders::UserId)
                    .col(Reminders::DueOn)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse order of creation
        manager
            .drop_table(Table::drop().table(Reminders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecurringPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentMethods::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
