use crate::constants::{
    AI_BUDGET_NAME_MAX_LEN, BUDGET_COLORS, BUDGET_ICONS, DEFAULT_AI_GROUP_NAME, DEFAULT_BUDGET_COLOR,
    DEFAULT_BUDGET_ICON,
};
use crate::core::errors::LedgerError;
use serde::Deserialize;
use tracing::warn;

/// Group skeleton proposed by the language model, after defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBlueprint {
    pub name: String,
    pub description: String,
    pub budgets: Vec<BudgetBlueprint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetBlueprint {
    pub name: String,
    pub limit: f64,
    pub icon: String,
    pub color: String,
}

#[derive(Deserialize)]
struct RawBlueprint {
    name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    budgets: Vec<RawBudget>,
}

#[derive(Deserialize)]
struct RawBudget {
    name: String,
    #[serde(default)]
    limit: f64,
    icon: Option<String>,
    color: Option<String>,
}

pub fn build_prompt(request: &str) -> String {
    format!(
        "You are a budgeting assistant. Based on the user's request, create a shared budget group.\n\
         Respond with ONLY a JSON object, no markdown and no explanation, in exactly this shape:\n\
         {{\"name\": string, \"description\": string, \"budgets\": [{{\"name\": string, \"limit\": number, \"icon\": string, \"color\": string}}]}}\n\
         Rules:\n\
         - each budget name is at most {max_len} characters\n\
         - limit is a positive number\n\
         - icon must be one of: {icons}\n\
         - color must be one of: {colors}\n\
         User request: {request}",
        max_len = AI_BUDGET_NAME_MAX_LEN,
        icons = BUDGET_ICONS.join(", "),
        colors = BUDGET_COLORS.join(", "),
        request = request.trim(),
    )
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn pick(value: Option<String>, allowed: &[&str], fallback: &str) -> String {
    match value {
        Some(v) if allowed.contains(&v.as_str()) => v,
        _ => fallback.to_string(),
    }
}

pub fn parse_blueprint(completion: &str) -> Result<GroupBlueprint, LedgerError> {
    let raw: RawBlueprint = serde_json::from_str(strip_code_fence(completion)).map_err(|e| {
        warn!(error = %e, "model returned an unparsable group blueprint");
        LedgerError::AiGenerationFailed
    })?;

    let name = raw
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_AI_GROUP_NAME.to_string());

    let budgets = raw
        .budgets
        .into_iter()
        .filter(|b| !b.name.trim().is_empty())
        .map(|b| BudgetBlueprint {
            name: b.name.trim().chars().take(AI_BUDGET_NAME_MAX_LEN).collect(),
            limit: b.limit,
            icon: pick(b.icon, BUDGET_ICONS, DEFAULT_BUDGET_ICON),
            color: pick(b.color, BUDGET_COLORS, DEFAULT_BUDGET_COLOR),
        })
        .collect();

    Ok(GroupBlueprint {
        name,
        description: raw.description.unwrap_or_default(),
        budgets,
    })
}
