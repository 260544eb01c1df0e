use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    api::models::{
        CreateAiGroupRequest, ErrorResponse, JoinGroupRequest, LoginRequest, LoginResponse, MessageResponse,
        ProfilePictureResponse, UpdateGroupRequest, UpdateUserGroupRequest, UserResponse,
    },
    core::models::{
        group::{Group, GroupMember, NewGroup, Role},
        ledger::{Budget, BudgetInput, BudgetUpdate, Expense, ExpenseInput, ExpenseUpdate, Income, IncomeInput},
        user::{NewUser, ProfileUpdate},
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "Bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::register,
        super::handlers::login,
        super::handlers::list_users,
        super::handlers::get_user,
        super::handlers::get_groups_by_user_id,
        super::handlers::update_user_group,
        super::handlers::update_profile,
        super::handlers::update_profile_picture,
        super::handlers::create_group,
        super::handlers::create_ai_group,
        super::handlers::join_group,
        super::handlers::find_group_by_invite,
        super::handlers::get_group_by_id,
        super::handlers::update_group,
        super::handlers::delete_group,
        super::handlers::add_income,
        super::handlers::update_income,
        super::handlers::delete_income,
        super::handlers::find_income_by_id,
        super::handlers::list_month_incomes,
        super::handlers::add_expense,
        super::handlers::update_expense,
        super::handlers::delete_expense,
        super::handlers::list_month_expenses,
        super::handlers::add_budget,
        super::handlers::update_budget,
        super::handlers::delete_budget,
        super::handlers::list_month_budget_expenses
    ),
    components(schemas(
        NewUser,
        ProfileUpdate,
        LoginRequest,
        LoginResponse,
        UserResponse,
        ProfilePictureResponse,
        UpdateUserGroupRequest,
        NewGroup,
        CreateAiGroupRequest,
        JoinGroupRequest,
        UpdateGroupRequest,
        MessageResponse,
        ErrorResponse,
        Role,
        GroupMember,
        Group,
        Income,
        IncomeInput,
        Expense,
        ExpenseInput,
        ExpenseUpdate,
        Budget,
        BudgetInput,
        BudgetUpdate
    )),
    modifiers(&SecurityAddon),
    info(
        title = "Group Ledger API",
        description = "API for household budgeting groups: members, incomes, expenses and budgets",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
