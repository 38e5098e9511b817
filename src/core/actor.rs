use crate::config::Config;
use crate::core::outcome::Rejection;

/// Who is acting, and whether they hold the privileged capability.
///
/// Built once per invocation and passed to each operation that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub is_admin: bool,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, is_admin: bool) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin,
        }
    }

    /// `--user` wins over `default_user`; admin iff listed in `admin_users`.
    pub fn from_config(cfg: &Config, user: Option<&str>) -> Self {
        let user_id = user
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(&cfg.default_user)
            .to_string();
        let is_admin = cfg.is_admin(&user_id);
        Self { user_id, is_admin }
    }

    pub fn require_admin(&self, operation: &str) -> Result<(), Rejection> {
        if self.is_admin {
            Ok(())
        } else {
            Err(Rejection::forbidden(format!(
                "User '{}' is not allowed to {operation}.",
                self.user_id
            )))
        }
    }
}
