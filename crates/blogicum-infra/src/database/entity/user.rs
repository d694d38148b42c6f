//! User entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use blogicum_core::domain::{NewUser, User};

use crate::database::DomainMapped;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub date_joined: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl DomainMapped for Entity {
    type Domain = User;
    type New = NewUser;
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            password_hash: model.password_hash,
            date_joined: model.date_joined.into(),
        }
    }
}

impl From<User> for ActiveModel {
    fn from(user: User) -> Self {
        Self {
            id: Set(user.id),
            username: Set(user.username),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            date_joined: Set(user.date_joined.into()),
        }
    }
}

impl From<NewUser> for ActiveModel {
    fn from(user: NewUser) -> Self {
        Self {
            username: Set(user.username),
            first_name: Set(String::new()),
            last_name: Set(String::new()),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            date_joined: Set(user.date_joined.into()),
            ..Default::default()
        }
    }
}
