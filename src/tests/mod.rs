mod ai_tests;
mod group_tests;
mod ledger_tests;

use crate::core::errors::LedgerError;
use crate::core::models::{principal::Principal, user::NewUser};
use crate::core::services::{GroupService, UserService};
use crate::infrastructure::ai::BudgetPlanner;
use crate::infrastructure::media::MediaHost;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use async_trait::async_trait;

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_HASH_COST: u32 = 4;

/// Planner that answers every prompt with a fixed completion.
pub struct ScriptedPlanner {
    pub reply: Result<String, ()>,
}

impl ScriptedPlanner {
    pub fn replying(reply: &str) -> Self {
        ScriptedPlanner {
            reply: Ok(reply.to_string()),
        }
    }

    pub fn failing() -> Self {
        ScriptedPlanner { reply: Err(()) }
    }
}

#[async_trait]
impl BudgetPlanner for ScriptedPlanner {
    async fn complete(&self, _prompt: &str) -> Result<String, LedgerError> {
        self.reply.clone().map_err(|_| LedgerError::AiGenerationFailed)
    }
}

pub struct FakeMediaHost {
    pub url: Option<String>,
}

#[async_trait]
impl MediaHost for FakeMediaHost {
    async fn upload(&self, file_name: &str, _bytes: Vec<u8>) -> Result<String, LedgerError> {
        match &self.url {
            Some(base) => Ok(format!("{}/{}", base, file_name)),
            None => Err(LedgerError::UploadFailed("host unavailable".to_string())),
        }
    }
}

pub struct TestApp {
    pub storage: InMemoryStorage,
    pub users: UserService<InMemoryStorage, FakeMediaHost>,
    pub groups: GroupService<InMemoryStorage, InMemoryStorage, ScriptedPlanner>,
}

pub fn create_test_app_with(planner: ScriptedPlanner, media: FakeMediaHost) -> TestApp {
    let storage = InMemoryStorage::new();
    TestApp {
        users: UserService::new(storage.clone(), media, TEST_SECRET, TEST_HASH_COST),
        groups: GroupService::new(storage.clone(), storage.clone(), planner),
        storage,
    }
}

pub fn create_test_app() -> TestApp {
    create_test_app_with(
        ScriptedPlanner::failing(),
        FakeMediaHost {
            url: Some("https://media.test".to_string()),
        },
    )
}

pub fn new_user(handle: &str) -> NewUser {
    NewUser {
        name: format!("{} Name", handle),
        username: handle.to_string(),
        email: format!("{}@example.com", handle),
        password: "hunter22".to_string(),
        gender: Some("female".to_string()),
        ..Default::default()
    }
}

/// Registers `handle` and returns the principal a login token would carry.
pub async fn register_principal(app: &TestApp, handle: &str) -> Principal {
    let user = app.users.register(new_user(handle)).await.unwrap();
    Principal::new(user.id, user.name, user.email)
}
