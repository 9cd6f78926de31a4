//! Profile entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub password_hash: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Posts,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for quill_core::domain::Profile {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            avatar_url: model.avatar_url,
            password_hash: model.password_hash,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// The author projection the post read paths attach.
impl From<Model> for quill_core::domain::Author {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            avatar_url: model.avatar_url,
        }
    }
}

impl From<quill_core::domain::Profile> for ActiveModel {
    fn from(profile: quill_core::domain::Profile) -> Self {
        Self {
            id: Set(profile.id),
            email: Set(profile.email),
            full_name: Set(profile.full_name),
            avatar_url: Set(profile.avatar_url),
            password_hash: Set(profile.password_hash),
            created_at: Set(profile.created_at.into()),
            updated_at: Set(profile.updated_at.into()),
        }
    }
}
