use askama::Template;
use crate::models::{CurrentUser, Flash, Role, User};

#[derive(Template)]
#[template(path = "users.html")]
pub struct UsersPageTemplate {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub base_url: String,
    pub flash_messages: Vec<Flash>,
    pub has_flash_messages: bool,
    pub users: Vec<User>,
    pub roles: Vec<Role>,
    pub can_manage: bool,
    pub error: Option<String>,
}

crate::impl_page_context!(UsersPageTemplate);
