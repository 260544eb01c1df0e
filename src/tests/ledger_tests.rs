use super::{TestApp, create_test_app, register_principal};
use crate::core::errors::LedgerError;
use crate::core::models::{
    group::{Group, NewGroup},
    ledger::{BudgetInput, BudgetUpdate, ExpenseInput, ExpenseUpdate, IncomeInput},
    principal::Principal,
};
use chrono::{TimeZone, Utc};

async fn household(app: &TestApp) -> (Principal, Principal, Group) {
    let alice = register_principal(app, "alice").await;
    let bob = register_principal(app, "bob").await;
    let group = app
        .groups
        .create_group(
            &alice,
            NewGroup {
                name: "Household".to_string(),
                description: String::new(),
            },
        )
        .await
        .unwrap();
    (alice, bob, group)
}

fn salary(amount: f64) -> IncomeInput {
    IncomeInput {
        name: "Salary".to_string(),
        note: Some("June".to_string()),
        amount,
        date: None,
    }
}

#[tokio::test]
async fn test_add_income_defaults_date_to_now() {
    let app = create_test_app();
    let (alice, _, group) = household(&app).await;

    let before = Utc::now();
    let income = app.groups.add_income(&alice, &group.id, salary(2500.0)).await.unwrap();
    assert!(income.date >= before);
    assert_eq!(income.amount, 2500.0);

    let stored = app.groups.find_group_by_id(&group.id).await.unwrap().unwrap();
    assert_eq!(stored.incomes, vec![income.clone()]);
    assert_eq!(app.groups.find_income_by_id(&income.id).await.unwrap(), Some(income));
    assert!(app.groups.find_income_by_id("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_ledger_writes_require_membership() {
    let app = create_test_app();
    let (_, bob, group) = household(&app).await;

    let income = app.groups.add_income(&bob, &group.id, salary(10.0)).await;
    assert!(matches!(income, Err(LedgerError::NotGroupMember)));

    let missing = app.groups.add_income(&bob, "missing", salary(10.0)).await;
    assert!(matches!(missing, Err(LedgerError::GroupNotFound)));

    app.groups.join_group(&bob, &group.invite).await.unwrap();
    app.groups.add_income(&bob, &group.id, salary(10.0)).await.unwrap();
}

#[tokio::test]
async fn test_update_income_overwrites_fields_and_keeps_date() {
    let app = create_test_app();
    let (alice, _, group) = household(&app).await;
    let original = app.groups.add_income(&alice, &group.id, salary(2500.0)).await.unwrap();

    let updated = app
        .groups
        .update_income(
            &alice,
            &group.id,
            &original.id,
            IncomeInput {
                name: "Bonus".to_string(),
                note: None,
                amount: 0.0,
                date: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.name, "Bonus");
    assert_eq!(updated.note, None);
    assert_eq!(updated.amount, 0.0);
    assert_eq!(updated.date, original.date);

    let stored = app.groups.find_income_by_id(&original.id).await.unwrap();
    assert_eq!(stored, Some(updated));

    let missing = app
        .groups
        .update_income(&alice, &group.id, "missing", salary(1.0))
        .await;
    assert!(matches!(missing, Err(LedgerError::IncomeNotFound)));
}

#[tokio::test]
async fn test_delete_income() {
    let app = create_test_app();
    let (alice, _, group) = household(&app).await;
    let income = app.groups.add_income(&alice, &group.id, salary(100.0)).await.unwrap();

    let message = app.groups.delete_income(&alice, &group.id, &income.id).await.unwrap();
    assert_eq!(message, "Delete Successful");
    assert!(app.groups.find_income_by_id(&income.id).await.unwrap().is_none());

    let again = app.groups.delete_income(&alice, &group.id, &income.id).await;
    assert!(matches!(again, Err(LedgerError::IncomeNotFound)));
}

#[tokio::test]
async fn test_expense_lifecycle() {
    let app = create_test_app();
    let (alice, bob, group) = household(&app).await;
    app.groups.join_group(&bob, &group.invite).await.unwrap();

    let expense = app
        .groups
        .add_expense(
            &alice,
            &group.id,
            ExpenseInput {
                name: "Groceries".to_string(),
                note: None,
                amount: 80.0,
                date: None,
                budget_id: Some(String::new()),
            },
        )
        .await
        .unwrap();
    assert_eq!(expense.budget_id, None);

    let updated = app
        .groups
        .update_expense(
            &bob,
            &expense.id,
            ExpenseUpdate {
                name: Some(String::new()),
                amount: Some(95.5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Groceries");
    assert_eq!(updated.amount, 95.5);

    let removed = app.groups.delete_expense(&alice, &expense.id).await.unwrap();
    assert_eq!(removed, updated);
    let stored = app.groups.find_group_by_id(&group.id).await.unwrap().unwrap();
    assert!(stored.expenses.is_empty());

    let again = app.groups.delete_expense(&alice, &expense.id).await;
    assert!(matches!(again, Err(LedgerError::ExpenseNotFound)));
}

#[tokio::test]
async fn test_expense_edits_by_outsider_are_denied() {
    let app = create_test_app();
    let (alice, bob, group) = household(&app).await;
    let expense = app
        .groups
        .add_expense(
            &alice,
            &group.id,
            ExpenseInput {
                name: "Rent".to_string(),
                amount: 900.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let update = app
        .groups
        .update_expense(&bob, &expense.id, ExpenseUpdate::default())
        .await;
    assert!(matches!(update, Err(LedgerError::NotGroupMember)));
    let delete = app.groups.delete_expense(&bob, &expense.id).await;
    assert!(matches!(delete, Err(LedgerError::NotGroupMember)));

    let unknown = app
        .groups
        .update_expense(&alice, "missing", ExpenseUpdate::default())
        .await;
    assert!(matches!(unknown, Err(LedgerError::ExpenseNotFound)));
}

#[tokio::test]
async fn test_budget_lifecycle() {
    let app = create_test_app();
    let (alice, _, group) = household(&app).await;

    let budget = app
        .groups
        .add_budget(
            &alice,
            &group.id,
            BudgetInput {
                name: "Food".to_string(),
                limit: 400.0,
                icon: None,
                color: Some("green".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(budget.icon, "");
    assert_eq!(budget.color, "green");

    let updated = app
        .groups
        .update_budget(
            &alice,
            &budget.id,
            BudgetUpdate {
                limit: Some(0.0),
                icon: Some("restaurant".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.limit, 400.0);
    assert_eq!(updated.icon, "restaurant");

    let removed = app.groups.delete_budget(&alice, &budget.id).await.unwrap();
    assert_eq!(removed, updated);
    let missing = app.groups.update_budget(&alice, &budget.id, BudgetUpdate::default()).await;
    assert!(matches!(missing, Err(LedgerError::BudgetNotFound)));
}

#[tokio::test]
async fn test_monthly_views() {
    let app = create_test_app();
    let (alice, _, group) = household(&app).await;
    let june = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    let july = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();

    for date in [june, july] {
        app.groups
            .add_income(
                &alice,
                &group.id,
                IncomeInput {
                    date: Some(date),
                    ..salary(1000.0)
                },
            )
            .await
            .unwrap();
    }
    let budget = app
        .groups
        .add_budget(
            &alice,
            &group.id,
            BudgetInput {
                name: "Food".to_string(),
                limit: 300.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    for (budget_id, date) in [(Some(budget.id.clone()), june), (None, june), (Some(budget.id.clone()), july)] {
        app.groups
            .add_expense(
                &alice,
                &group.id,
                ExpenseInput {
                    name: "Shop".to_string(),
                    amount: 20.0,
                    date: Some(date),
                    budget_id,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    let incomes = app.groups.incomes_in_month(&group.id, 2024, 6).await.unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].date, june);

    assert_eq!(app.groups.expenses_in_month(&group.id, 2024, 6).await.unwrap().len(), 2);
    let budgeted = app
        .groups
        .budget_expenses_in_month(&group.id, &budget.id, 2024, 6)
        .await
        .unwrap();
    assert_eq!(budgeted.len(), 1);
    assert_eq!(budgeted[0].budget_id.as_deref(), Some(budget.id.as_str()));

    assert!(app.groups.incomes_this_month(&group.id).await.unwrap().is_empty());

    let bad_month = app.groups.incomes_in_month(&group.id, 2024, 13).await;
    assert!(matches!(bad_month, Err(LedgerError::InvalidInput(..))));
    let missing = app.groups.expenses_this_month("missing").await;
    assert!(matches!(missing, Err(LedgerError::GroupNotFound)));
}

#[tokio::test]
async fn test_this_month_includes_fresh_entries() {
    let app = create_test_app();
    let (alice, _, group) = household(&app).await;
    let expense = app
        .groups
        .add_expense(
            &alice,
            &group.id,
            ExpenseInput {
                name: "Coffee".to_string(),
                amount: 3.5,
                budget_id: Some("b1".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(app.groups.expenses_this_month(&group.id).await.unwrap(), vec![expense.clone()]);
    assert_eq!(
        app.groups.budget_expenses_this_month(&group.id, "b1").await.unwrap(),
        vec![expense]
    );
}
