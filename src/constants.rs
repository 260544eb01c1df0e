// Group policy
pub const MAX_OWNED_GROUPS: usize = 3;
pub const MAX_JOINED_GROUPS: usize = 3;

// Contract markers returned to callers
pub const DELETE_SUCCESS: &str = "Delete Successful";
pub const PROFILE_PICTURE_UPDATED: &str = "Profile picture updated successfully!";

// AI group bootstrap
pub const DEFAULT_AI_GROUP_NAME: &str = "My Budget Group";
pub const AI_BUDGET_NAME_MAX_LEN: usize = 15;
pub const DEFAULT_BUDGET_ICON: &str = "wallet";
pub const DEFAULT_BUDGET_COLOR: &str = "blue";

pub const BUDGET_ICONS: &[&str] = &[
    "restaurant",
    "shopping-cart",
    "attach-money",
    "wallet",
    "home",
    "directions-car",
    "local-hospital",
    "school",
    "flight",
    "movie",
    "fitness-center",
    "pets",
    "savings",
    "receipt",
    "phone-android",
    "child-care",
];

pub const BUDGET_COLORS: &[&str] = &[
    "red", "orange", "yellow", "green", "teal", "blue", "purple", "pink", "brown", "gray",
];

// Action names used as structured log fields
pub const USER_REGISTERED: &str = "user_registered";
pub const USER_LOGGED_IN: &str = "user_logged_in";
pub const PROFILE_UPDATED: &str = "profile_updated";
pub const PROFILE_PICTURE_CHANGED: &str = "profile_picture_changed";
pub const USER_GROUP_ASSIGNED: &str = "user_group_assigned";
pub const GROUP_CREATED: &str = "group_created";
pub const AI_GROUP_CREATED: &str = "ai_group_created";
pub const MEMBER_JOINED: &str = "member_joined";
pub const GROUP_UPDATED: &str = "group_updated";
pub const GROUP_DELETED: &str = "group_deleted";
pub const INCOME_ADDED: &str = "income_added";
pub const INCOME_UPDATED: &str = "income_updated";
pub const INCOME_DELETED: &str = "income_deleted";
pub const EXPENSE_ADDED: &str = "expense_added";
pub const EXPENSE_UPDATED: &str = "expense_updated";
pub const EXPENSE_DELETED: &str = "expense_deleted";
pub const BUDGET_ADDED: &str = "budget_added";
pub const BUDGET_UPDATED: &str = "budget_updated";
pub const BUDGET_DELETED: &str = "budget_deleted";
