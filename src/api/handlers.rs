use crate::{
    api::{AppState, models::*},
    core::{
        errors::LedgerError,
        models::{
            group::{Group, NewGroup},
            ledger::{Budget, BudgetInput, BudgetUpdate, Expense, ExpenseInput, ExpenseUpdate, Income, IncomeInput},
            principal::Principal,
            user::{NewUser, ProfileUpdate},
        },
    },
};
use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post, put},
};
use http::header;

const MAX_PICTURE_BYTES: usize = 5 * 1024 * 1024;

// Middleware to validate the bearer token and attach the principal
async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| LedgerError::Unauthorized("No token provided".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| LedgerError::Unauthorized("Invalid token type".to_string()))?;

    let principal = state.users.validate_token(token)?;
    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

pub fn api_routes(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/users", get(list_users))
        .route("/users/{user_id}", get(get_user))
        .route("/users/{user_id}/groups", get(get_groups_by_user_id))
        .route("/users/{user_id}/group", put(update_user_group))
        .route("/profile", put(update_profile))
        .route(
            "/profile/picture",
            post(update_profile_picture).layer(DefaultBodyLimit::max(MAX_PICTURE_BYTES)),
        )
        .route("/groups", post(create_group))
        .route("/groups/ai", post(create_ai_group))
        .route("/groups/join", post(join_group))
        .route("/groups/invite/{invite}", get(find_group_by_invite))
        .route(
            "/groups/{group_id}",
            get(get_group_by_id).put(update_group).delete(delete_group),
        )
        .route("/groups/{group_id}/incomes", get(list_month_incomes).post(add_income))
        .route(
            "/groups/{group_id}/incomes/{income_id}",
            put(update_income).delete(delete_income),
        )
        .route("/incomes/{income_id}", get(find_income_by_id))
        .route("/groups/{group_id}/expenses", get(list_month_expenses).post(add_expense))
        .route("/expenses/{expense_id}", put(update_expense).delete(delete_expense))
        .route("/groups/{group_id}/budgets", post(add_budget))
        .route(
            "/groups/{group_id}/budgets/{budget_id}/expenses",
            get(list_month_budget_expenses),
        )
        .route("/budgets/{budget_id}", put(update_budget).delete(delete_budget))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected_routes)
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/register",
    request_body = NewUser,
    responses(
        (status = 200, description = "User registered", body = UserResponse),
        (status = 400, description = "Missing required field", body = ErrorResponse),
        (status = 409, description = "Email or username already exists", body = ErrorResponse)
    )
)]
async fn register(State(state): State<AppState>, Json(req): Json<NewUser>) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.register(req).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid password", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Result<Json<LoginResponse>, ApiError> {
    let session = state.users.login(&req.email, &req.password).await?;
    Ok(Json(session.into()))
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "All users", body = Vec<UserResponse>)),
    security(("Bearer" = []))
)]
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(("user_id" = String, Path, description = "ID of the user")),
    responses((status = 200, description = "The user, or null", body = UserResponse)),
    security(("Bearer" = []))
)]
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Option<UserResponse>>, ApiError> {
    let user = state.users.get_user(&user_id).await?;
    Ok(Json(user.map(UserResponse::from)))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/groups",
    params(("user_id" = String, Path, description = "ID of the user")),
    responses((status = 200, description = "Groups the user belongs to", body = Vec<Group>)),
    security(("Bearer" = []))
)]
async fn get_groups_by_user_id(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Group>>, ApiError> {
    Ok(Json(state.groups.get_groups_by_user_id(&user_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/users/{user_id}/group",
    request_body = UpdateUserGroupRequest,
    params(("user_id" = String, Path, description = "ID of the user")),
    responses(
        (status = 204, description = "Group reference updated"),
        (status = 500, description = "Failed to update user group", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn update_user_group(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateUserGroupRequest>,
) -> Result<StatusCode, ApiError> {
    state.users.update_user_group(&user_id, &req.group_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<ProfileUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.update_profile(&principal, req).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/api/profile/picture",
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Picture uploaded", body = ProfilePictureResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 502, description = "Media host failure", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn update_profile_picture(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    body: Bytes,
) -> Result<Json<ProfilePictureResponse>, ApiError> {
    let file_name = format!("{}-profile", principal.id);
    let change = state
        .users
        .update_profile_picture(&principal, &file_name, body.to_vec())
        .await?;
    Ok(Json(change.into()))
}

#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = NewGroup,
    responses(
        (status = 200, description = "Group created", body = Group),
        (status = 403, description = "Owned group limit reached", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn create_group(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<NewGroup>,
) -> Result<Json<Group>, ApiError> {
    Ok(Json(state.groups.create_group(&principal, req).await?))
}

#[utoipa::path(
    post,
    path = "/api/groups/ai",
    request_body = CreateAiGroupRequest,
    responses(
        (status = 200, description = "Group generated", body = Group),
        (status = 502, description = "AI failed to generate group", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn create_ai_group(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateAiGroupRequest>,
) -> Result<Json<Group>, ApiError> {
    Ok(Json(state.groups.create_ai_group(&principal, &req.prompt).await?))
}

#[utoipa::path(
    post,
    path = "/api/groups/join",
    request_body = JoinGroupRequest,
    responses(
        (status = 200, description = "Joined group", body = Group),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 409, description = "Already a member", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn join_group(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<JoinGroupRequest>,
) -> Result<Json<Group>, ApiError> {
    Ok(Json(state.groups.join_group(&principal, &req.invite).await?))
}

#[utoipa::path(
    get,
    path = "/api/groups/invite/{invite}",
    params(("invite" = String, Path, description = "Invite token")),
    responses((status = 200, description = "The group, or null", body = Group)),
    security(("Bearer" = []))
)]
async fn find_group_by_invite(
    State(state): State<AppState>,
    Path(invite): Path<String>,
) -> Result<Json<Option<Group>>, ApiError> {
    Ok(Json(state.groups.find_group_by_invite(&invite).await?))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}",
    params(("group_id" = String, Path, description = "ID of the group")),
    responses((status = 200, description = "The group, or null", body = Group)),
    security(("Bearer" = []))
)]
async fn get_group_by_id(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<Json<Option<Group>>, ApiError> {
    Ok(Json(state.groups.find_group_by_id(&group_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/groups/{group_id}",
    request_body = UpdateGroupRequest,
    params(("group_id" = String, Path, description = "ID of the group")),
    responses(
        (status = 200, description = "Group updated", body = Group),
        (status = 403, description = "Not a member or not an admin", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn update_group(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(group_id): Path<String>,
    Json(req): Json<UpdateGroupRequest>,
) -> Result<Json<Group>, ApiError> {
    let group = state
        .groups
        .update_group(&principal, &group_id, req.name, req.description)
        .await?;
    Ok(Json(group))
}

#[utoipa::path(
    delete,
    path = "/api/groups/{group_id}",
    params(("group_id" = String, Path, description = "ID of the group")),
    responses(
        (status = 200, description = "Group deleted", body = MessageResponse),
        (status = 403, description = "Not a member or not the owner", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn delete_group(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(group_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state.groups.delete_group(&principal, &group_id).await?;
    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/incomes",
    request_body = IncomeInput,
    params(("group_id" = String, Path, description = "ID of the group")),
    responses(
        (status = 200, description = "Income added", body = Income),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn add_income(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(group_id): Path<String>,
    Json(req): Json<IncomeInput>,
) -> Result<Json<Income>, ApiError> {
    Ok(Json(state.groups.add_income(&principal, &group_id, req).await?))
}

#[utoipa::path(
    put,
    path = "/api/groups/{group_id}/incomes/{income_id}",
    request_body = IncomeInput,
    params(
        ("group_id" = String, Path, description = "ID of the group"),
        ("income_id" = String, Path, description = "ID of the income")
    ),
    responses(
        (status = 200, description = "Income updated", body = Income),
        (status = 404, description = "Group or income not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn update_income(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((group_id, income_id)): Path<(String, String)>,
    Json(req): Json<IncomeInput>,
) -> Result<Json<Income>, ApiError> {
    let income = state
        .groups
        .update_income(&principal, &group_id, &income_id, req)
        .await?;
    Ok(Json(income))
}

#[utoipa::path(
    delete,
    path = "/api/groups/{group_id}/incomes/{income_id}",
    params(
        ("group_id" = String, Path, description = "ID of the group"),
        ("income_id" = String, Path, description = "ID of the income")
    ),
    responses(
        (status = 200, description = "Income deleted", body = MessageResponse),
        (status = 404, description = "Group or income not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn delete_income(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((group_id, income_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state.groups.delete_income(&principal, &group_id, &income_id).await?;
    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/incomes/{income_id}",
    params(("income_id" = String, Path, description = "ID of the income")),
    responses((status = 200, description = "The income, or null", body = Income)),
    security(("Bearer" = []))
)]
async fn find_income_by_id(
    State(state): State<AppState>,
    Path(income_id): Path<String>,
) -> Result<Json<Option<Income>>, ApiError> {
    Ok(Json(state.groups.find_income_by_id(&income_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/incomes",
    params(("group_id" = String, Path, description = "ID of the group"), MonthQuery),
    responses(
        (status = 200, description = "Incomes dated in the month", body = Vec<Income>),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn list_month_incomes(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<Income>>, ApiError> {
    let incomes = match query.explicit() {
        Some((year, month)) => state.groups.incomes_in_month(&group_id, year, month).await?,
        None => state.groups.incomes_this_month(&group_id).await?,
    };
    Ok(Json(incomes))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/expenses",
    request_body = ExpenseInput,
    params(("group_id" = String, Path, description = "ID of the group")),
    responses(
        (status = 200, description = "Expense added", body = Expense),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn add_expense(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(group_id): Path<String>,
    Json(req): Json<ExpenseInput>,
) -> Result<Json<Expense>, ApiError> {
    Ok(Json(state.groups.add_expense(&principal, &group_id, req).await?))
}

#[utoipa::path(
    put,
    path = "/api/expenses/{expense_id}",
    request_body = ExpenseUpdate,
    params(("expense_id" = String, Path, description = "ID of the expense")),
    responses(
        (status = 200, description = "Expense updated", body = Expense),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn update_expense(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(expense_id): Path<String>,
    Json(req): Json<ExpenseUpdate>,
) -> Result<Json<Expense>, ApiError> {
    Ok(Json(state.groups.update_expense(&principal, &expense_id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/api/expenses/{expense_id}",
    params(("expense_id" = String, Path, description = "ID of the expense")),
    responses(
        (status = 200, description = "The removed expense", body = Expense),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn delete_expense(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(expense_id): Path<String>,
) -> Result<Json<Expense>, ApiError> {
    Ok(Json(state.groups.delete_expense(&principal, &expense_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/expenses",
    params(("group_id" = String, Path, description = "ID of the group"), MonthQuery),
    responses(
        (status = 200, description = "Expenses dated in the month", body = Vec<Expense>),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn list_month_expenses(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let expenses = match query.explicit() {
        Some((year, month)) => state.groups.expenses_in_month(&group_id, year, month).await?,
        None => state.groups.expenses_this_month(&group_id).await?,
    };
    Ok(Json(expenses))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/budgets",
    request_body = BudgetInput,
    params(("group_id" = String, Path, description = "ID of the group")),
    responses(
        (status = 200, description = "Budget added", body = Budget),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn add_budget(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(group_id): Path<String>,
    Json(req): Json<BudgetInput>,
) -> Result<Json<Budget>, ApiError> {
    Ok(Json(state.groups.add_budget(&principal, &group_id, req).await?))
}

#[utoipa::path(
    put,
    path = "/api/budgets/{budget_id}",
    request_body = BudgetUpdate,
    params(("budget_id" = String, Path, description = "ID of the budget")),
    responses(
        (status = 200, description = "Budget updated", body = Budget),
        (status = 404, description = "Budget not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn update_budget(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(budget_id): Path<String>,
    Json(req): Json<BudgetUpdate>,
) -> Result<Json<Budget>, ApiError> {
    Ok(Json(state.groups.update_budget(&principal, &budget_id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/api/budgets/{budget_id}",
    params(("budget_id" = String, Path, description = "ID of the budget")),
    responses(
        (status = 200, description = "The removed budget", body = Budget),
        (status = 404, description = "Budget not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn delete_budget(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(budget_id): Path<String>,
) -> Result<Json<Budget>, ApiError> {
    Ok(Json(state.groups.delete_budget(&principal, &budget_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/budgets/{budget_id}/expenses",
    params(
        ("group_id" = String, Path, description = "ID of the group"),
        ("budget_id" = String, Path, description = "ID of the budget"),
        MonthQuery
    ),
    responses(
        (status = 200, description = "Expenses of the budget dated in the month", body = Vec<Expense>),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn list_month_budget_expenses(
    State(state): State<AppState>,
    Path((group_id, budget_id)): Path<(String, String)>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let expenses = match query.explicit() {
        Some((year, month)) => {
            state
                .groups
                .budget_expenses_in_month(&group_id, &budget_id, year, month)
                .await?
        }
        None => state.groups.budget_expenses_this_month(&group_id, &budget_id).await?,
    };
    Ok(Json(expenses))
}
