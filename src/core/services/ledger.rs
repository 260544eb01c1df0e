use super::groups::{GroupService, new_id};
use crate::constants::{
    BUDGET_ADDED, BUDGET_DELETED, BUDGET_UPDATED, DELETE_SUCCESS, EXPENSE_ADDED, EXPENSE_DELETED, EXPENSE_UPDATED,
    INCOME_ADDED, INCOME_DELETED, INCOME_UPDATED,
};
use crate::core::errors::{FieldError, LedgerError};
use crate::core::guard::{Requirement, require};
use crate::core::models::{
    group::Group,
    ledger::{
        Budget, BudgetInput, BudgetUpdate, EntryKind, Expense, ExpenseInput, ExpenseUpdate, Income, IncomeInput,
        LedgerEntry,
    },
    principal::Principal,
};
use crate::infrastructure::ai::BudgetPlanner;
use crate::infrastructure::storage::{GroupRepository, UserRepository};
use chrono::{DateTime, Datelike, Utc};
use tracing::info;

fn in_month(date: &DateTime<Utc>, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}

fn validate_month(month: u32) -> Result<(), LedgerError> {
    if !(1..=12).contains(&month) {
        return Err(LedgerError::InvalidInput(
            "month".to_string(),
            FieldError {
                field: "month".to_string(),
                title: "Invalid month".to_string(),
                description: "Month must be between 1 and 12".to_string(),
            },
        ));
    }
    Ok(())
}

impl<G: GroupRepository, U: UserRepository, A: BudgetPlanner> GroupService<G, U, A> {
    /// Resolves the group named by the caller and requires membership.
    async fn by_group_and_entry_id(&self, principal: &Principal, group_id: &str) -> Result<Group, LedgerError> {
        let group = self
            .groups
            .find_by_id(group_id)
            .await?
            .ok_or(LedgerError::GroupNotFound)?;
        require(&group, &principal.id, Requirement::Member)?;
        Ok(group)
    }

    /// Resolves whichever group embeds `entry_id` and requires membership.
    async fn by_entry_id_across_groups(
        &self,
        principal: &Principal,
        kind: EntryKind,
        entry_id: &str,
        not_found: LedgerError,
    ) -> Result<Group, LedgerError> {
        let Some(group) = self.groups.find_by_entry(kind, entry_id).await? else {
            return Err(not_found);
        };
        require(&group, &principal.id, Requirement::Member)?;
        Ok(group)
    }

    async fn push(&self, group_id: &str, entry: &LedgerEntry, what: &str) -> Result<(), LedgerError> {
        if self.groups.push_entry(group_id, entry).await? == 0 {
            return Err(LedgerError::PersistenceFailed(format!("add {}", what)));
        }
        Ok(())
    }

    async fn replace(&self, group_id: &str, entry: &LedgerEntry, what: &str) -> Result<(), LedgerError> {
        if self.groups.set_entry(group_id, entry).await? == 0 {
            return Err(LedgerError::PersistenceFailed(format!("update {}", what)));
        }
        Ok(())
    }

    async fn pull(&self, group_id: &str, kind: EntryKind, entry_id: &str, what: &str) -> Result<(), LedgerError> {
        if self.groups.pull_entry(group_id, kind, entry_id).await? == 0 {
            return Err(LedgerError::PersistenceFailed(format!("delete {}", what)));
        }
        Ok(())
    }

    // Incomes

    pub async fn add_income(&self, principal: &Principal, group_id: &str, input: IncomeInput) -> Result<Income, LedgerError> {
        let group = self.by_group_and_entry_id(principal, group_id).await?;
        let income = Income {
            id: new_id(),
            name: input.name,
            note: input.note,
            amount: input.amount,
            date: input.date.unwrap_or_else(Utc::now),
        };
        self.push(&group.id, &LedgerEntry::Income(income.clone()), "income").await?;
        info!(action = INCOME_ADDED, group_id, income_id = %income.id);
        Ok(income)
    }

    /// Name, note and amount always overwrite; the date only when given.
    pub async fn update_income(
        &self,
        principal: &Principal,
        group_id: &str,
        income_id: &str,
        input: IncomeInput,
    ) -> Result<Income, LedgerError> {
        let group = self.by_group_and_entry_id(principal, group_id).await?;
        let mut income = group
            .incomes
            .into_iter()
            .find(|i| i.id == income_id)
            .ok_or(LedgerError::IncomeNotFound)?;

        income.name = input.name;
        income.note = input.note;
        income.amount = input.amount;
        if let Some(date) = input.date {
            income.date = date;
        }
        self.replace(group_id, &LedgerEntry::Income(income.clone()), "income").await?;
        info!(action = INCOME_UPDATED, group_id, income_id);
        Ok(income)
    }

    pub async fn delete_income(
        &self,
        principal: &Principal,
        group_id: &str,
        income_id: &str,
    ) -> Result<&'static str, LedgerError> {
        let group = self.by_group_and_entry_id(principal, group_id).await?;
        if !group.incomes.iter().any(|i| i.id == income_id) {
            return Err(LedgerError::IncomeNotFound);
        }
        self.pull(group_id, EntryKind::Income, income_id, "income").await?;
        info!(action = INCOME_DELETED, group_id, income_id);
        Ok(DELETE_SUCCESS)
    }

    pub async fn find_income_by_id(&self, income_id: &str) -> Result<Option<Income>, LedgerError> {
        let group = self.groups.find_by_entry(EntryKind::Income, income_id).await?;
        Ok(group.and_then(|g| g.incomes.into_iter().find(|i| i.id == income_id)))
    }

    // Expenses

    pub async fn add_expense(
        &self,
        principal: &Principal,
        group_id: &str,
        input: ExpenseInput,
    ) -> Result<Expense, LedgerError> {
        let group = self.by_group_and_entry_id(principal, group_id).await?;
        let expense = Expense {
            id: new_id(),
            name: input.name,
            note: input.note,
            amount: input.amount,
            date: input.date.unwrap_or_else(Utc::now),
            budget_id: input.budget_id.filter(|b| !b.is_empty()),
        };
        self.push(&group.id, &LedgerEntry::Expense(expense.clone()), "expense").await?;
        info!(action = EXPENSE_ADDED, group_id, expense_id = %expense.id);
        Ok(expense)
    }

    pub async fn update_expense(
        &self,
        principal: &Principal,
        expense_id: &str,
        update: ExpenseUpdate,
    ) -> Result<Expense, LedgerError> {
        let group = self
            .by_entry_id_across_groups(principal, EntryKind::Expense, expense_id, LedgerError::ExpenseNotFound)
            .await?;
        let mut expense = group
            .expenses
            .into_iter()
            .find(|e| e.id == expense_id)
            .ok_or(LedgerError::ExpenseNotFound)?;

        expense.apply_update(update);
        self.replace(&group.id, &LedgerEntry::Expense(expense.clone()), "expense").await?;
        info!(action = EXPENSE_UPDATED, group_id = %group.id, expense_id);
        Ok(expense)
    }

    pub async fn delete_expense(&self, principal: &Principal, expense_id: &str) -> Result<Expense, LedgerError> {
        let group = self
            .by_entry_id_across_groups(principal, EntryKind::Expense, expense_id, LedgerError::ExpenseNotFound)
            .await?;
        let expense = group
            .expenses
            .into_iter()
            .find(|e| e.id == expense_id)
            .ok_or(LedgerError::ExpenseNotFound)?;

        self.pull(&group.id, EntryKind::Expense, expense_id, "expense").await?;
        info!(action = EXPENSE_DELETED, group_id = %group.id, expense_id);
        Ok(expense)
    }

    // Budgets

    /// Icon and color default to an empty string, not to a palette entry.
    pub async fn add_budget(&self, principal: &Principal, group_id: &str, input: BudgetInput) -> Result<Budget, LedgerError> {
        let group = self.by_group_and_entry_id(principal, group_id).await?;
        let budget = Budget {
            id: new_id(),
            name: input.name,
            limit: input.limit,
            icon: input.icon.unwrap_or_default(),
            color: input.color.unwrap_or_default(),
        };
        self.push(&group.id, &LedgerEntry::Budget(budget.clone()), "budget").await?;
        info!(action = BUDGET_ADDED, group_id, budget_id = %budget.id);
        Ok(budget)
    }

    pub async fn update_budget(
        &self,
        principal: &Principal,
        budget_id: &str,
        update: BudgetUpdate,
    ) -> Result<Budget, LedgerError> {
        let group = self
            .by_entry_id_across_groups(principal, EntryKind::Budget, budget_id, LedgerError::BudgetNotFound)
            .await?;
        let mut budget = group
            .budgets
            .into_iter()
            .find(|b| b.id == budget_id)
            .ok_or(LedgerError::BudgetNotFound)?;

        budget.apply_update(update);
        self.replace(&group.id, &LedgerEntry::Budget(budget.clone()), "budget").await?;
        info!(action = BUDGET_UPDATED, group_id = %group.id, budget_id);
        Ok(budget)
    }

    pub async fn delete_budget(&self, principal: &Principal, budget_id: &str) -> Result<Budget, LedgerError> {
        let group = self
            .by_entry_id_across_groups(principal, EntryKind::Budget, budget_id, LedgerError::BudgetNotFound)
            .await?;
        let budget = group
            .budgets
            .into_iter()
            .find(|b| b.id == budget_id)
            .ok_or(LedgerError::BudgetNotFound)?;

        self.pull(&group.id, EntryKind::Budget, budget_id, "budget").await?;
        info!(action = BUDGET_DELETED, group_id = %group.id, budget_id);
        Ok(budget)
    }

    // Monthly views

    async fn existing_group(&self, group_id: &str) -> Result<Group, LedgerError> {
        self.groups
            .find_by_id(group_id)
            .await?
            .ok_or(LedgerError::GroupNotFound)
    }

    pub async fn incomes_in_month(&self, group_id: &str, year: i32, month: u32) -> Result<Vec<Income>, LedgerError> {
        validate_month(month)?;
        let group = self.existing_group(group_id).await?;
        Ok(group
            .incomes
            .into_iter()
            .filter(|i| in_month(&i.date, year, month))
            .collect())
    }

    pub async fn expenses_in_month(&self, group_id: &str, year: i32, month: u32) -> Result<Vec<Expense>, LedgerError> {
        validate_month(month)?;
        let group = self.existing_group(group_id).await?;
        Ok(group
            .expenses
            .into_iter()
            .filter(|e| in_month(&e.date, year, month))
            .collect())
    }

    pub async fn budget_expenses_in_month(
        &self,
        group_id: &str,
        budget_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<Expense>, LedgerError> {
        Ok(self
            .expenses_in_month(group_id, year, month)
            .await?
            .into_iter()
            .filter(|e| e.budget_id.as_deref() == Some(budget_id))
            .collect())
    }

    pub async fn incomes_this_month(&self, group_id: &str) -> Result<Vec<Income>, LedgerError> {
        let now = Utc::now();
        self.incomes_in_month(group_id, now.year(), now.month()).await
    }

    pub async fn expenses_this_month(&self, group_id: &str) -> Result<Vec<Expense>, LedgerError> {
        let now = Utc::now();
        self.expenses_in_month(group_id, now.year(), now.month()).await
    }

    pub async fn budget_expenses_this_month(&self, group_id: &str, budget_id: &str) -> Result<Vec<Expense>, LedgerError> {
        let now = Utc::now();
        self.budget_expenses_in_month(group_id, budget_id, now.year(), now.month())
            .await
    }
}
