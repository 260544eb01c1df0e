use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Income {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub note: Option<String>,
    pub amount: f64,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub date: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Expense {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub note: Option<String>,
    pub amount: f64,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Budget {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub limit: f64,
    pub icon: String,
    pub color: String,
}

/// Fields for a new income, or the full replacement of an existing one.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct IncomeInput {
    pub name: String,
    pub note: Option<String>,
    pub amount: f64,
    #[schema(value_type = Option<String>, example = "2024-06-01T12:34:56Z")]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct ExpenseInput {
    pub name: String,
    pub note: Option<String>,
    pub amount: f64,
    #[schema(value_type = Option<String>, example = "2024-06-01T12:34:56Z")]
    pub date: Option<DateTime<Utc>>,
    pub budget_id: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct BudgetInput {
    pub name: String,
    pub limit: f64,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Partial expense change; only truthy values overwrite.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct ExpenseUpdate {
    pub name: Option<String>,
    pub note: Option<String>,
    pub amount: Option<f64>,
    #[schema(value_type = Option<String>, example = "2024-06-01T12:34:56Z")]
    pub date: Option<DateTime<Utc>>,
    pub budget_id: Option<String>,
}

/// Partial budget change; only truthy values overwrite.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct BudgetUpdate {
    pub name: Option<String>,
    pub limit: Option<f64>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Which embedded array of a group an entry lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Income,
    Expense,
    Budget,
}

impl EntryKind {
    /// Document field holding the array.
    pub fn field(&self) -> &'static str {
        match self {
            EntryKind::Income => "incomes",
            EntryKind::Expense => "expenses",
            EntryKind::Budget => "budgets",
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum LedgerEntry {
    Income(Income),
    Expense(Expense),
    Budget(Budget),
}

impl LedgerEntry {
    pub fn kind(&self) -> EntryKind {
        match self {
            LedgerEntry::Income(_) => EntryKind::Income,
            LedgerEntry::Expense(_) => EntryKind::Expense,
            LedgerEntry::Budget(_) => EntryKind::Budget,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            LedgerEntry::Income(income) => &income.id,
            LedgerEntry::Expense(expense) => &expense.id,
            LedgerEntry::Budget(budget) => &budget.id,
        }
    }
}

fn truthy_str(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn truthy_amount(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

impl Expense {
    pub fn apply_update(&mut self, update: ExpenseUpdate) {
        if let Some(name) = truthy_str(update.name) {
            self.name = name;
        }
        if let Some(note) = truthy_str(update.note) {
            self.note = Some(note);
        }
        if let Some(amount) = truthy_amount(update.amount) {
            self.amount = amount;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(budget_id) = truthy_str(update.budget_id) {
            self.budget_id = Some(budget_id);
        }
    }
}

impl Budget {
    pub fn apply_update(&mut self, update: BudgetUpdate) {
        if let Some(name) = truthy_str(update.name) {
            self.name = name;
        }
        if let Some(limit) = truthy_amount(update.limit) {
            self.limit = limit;
        }
        if let Some(icon) = truthy_str(update.icon) {
            self.icon = icon;
        }
        if let Some(color) = truthy_str(update.color) {
            self.color = color;
        }
    }
}
