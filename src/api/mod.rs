pub mod handlers;
pub mod models;
pub mod openapi;

use std::sync::Arc;

use crate::core::services::{GroupService, UserService};
use crate::infrastructure::{ai::openai::OpenAiPlanner, media::uploader::HttpMediaHost, storage::mongo::MongoStorage};

pub type Users = UserService<MongoStorage, HttpMediaHost>;
pub type Groups = GroupService<MongoStorage, MongoStorage, OpenAiPlanner>;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<Users>,
    pub groups: Arc<Groups>,
}
