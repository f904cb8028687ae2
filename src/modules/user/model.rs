use serde::{Deserialize, Serialize};

use crate::modules::user::schema::UserEntity;

#[derive(Debug, Deserialize, Serialize)]
pub struct UserResponse {
    pub id: uuid::Uuid,
    pub email: String,
    pub name: String,
    pub date_of_birth: chrono::NaiveDate,
    pub profile_picture: Option<String>,
}

impl From<UserEntity> for UserResponse {
    fn from(entity: UserEntity) -> Self {
        UserResponse {
            id: entity.id,
            email: entity.email,
            name: entity.name,
            date_of_birth: entity.date_of_birth,
            profile_picture: entity.profile_picture,
        }
    }
}
