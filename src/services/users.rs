use crate::{db::DbPool, entities::app_user, errors::ServiceError};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Staff identity returned by a successful login: role plus shop
/// affiliation, nothing session-shaped.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StaffProfile {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct UserService {
    db_pool: Arc<DbPool>,
}

impl UserService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Looks the email/password pair up against the staff table. The stored
    /// credential is plaintext, matching the system this replaces; no token
    /// is issued.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<StaffProfile, ServiceError> {
        let db = &*self.db_pool;

        let user = app_user::Entity::find()
            .filter(app_user::Column::Email.eq(email))
            .filter(app_user::Column::Password.eq(password))
            .one(db)
            .await?;

        match user {
            Some(user) => {
                info!(user_id = %user.id, role = %user.role, "staff login succeeded");
                Ok(StaffProfile {
                    id: user.id,
                    email: user.email,
                    role: user.role,
                    shop_id: user.shop_id,
                })
            }
            None => {
                warn!("staff login failed");
                Err(ServiceError::AuthError(
                    "Invalid email or password".to_string(),
                ))
            }
        }
    }
}
