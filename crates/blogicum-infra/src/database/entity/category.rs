//! Category entity for SeaORM.

use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;

use blogicum_core::domain::{Category, NewCategory};

use crate::database::DomainMapped;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub is_published: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl DomainMapped for Entity {
    type Domain = Category;
    type New = NewCategory;
}

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            is_published: model.is_published,
            created_at: model.created_at.into(),
        }
    }
}

impl From<Category> for ActiveModel {
    fn from(category: Category) -> Self {
        Self {
            id: Set(category.id),
            name: Set(category.name),
            description: Set(category.description),
            is_published: Set(category.is_published),
            created_at: Set(category.created_at.into()),
        }
    }
}

impl From<NewCategory> for ActiveModel {
    fn from(category: NewCategory) -> Self {
        Self {
            name: Set(category.name),
            description: Set(category.description),
            is_published: Set(category.is_published),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
    }
}
