//! Location entity for SeaORM.

use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;

use blogicum_core::domain::{Location, NewLocation};

use crate::database::DomainMapped;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
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
    type Domain = Location;
    type New = NewLocation;
}

impl From<Model> for Location {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            is_published: model.is_published,
            created_at: model.created_at.into(),
        }
    }
}

impl From<Location> for ActiveModel {
    fn from(location: Location) -> Self {
        Self {
            id: Set(location.id),
            name: Set(location.name),
            is_published: Set(location.is_published),
            created_at: Set(location.created_at.into()),
        }
    }
}

impl From<NewLocation> for ActiveModel {
    fn from(location: NewLocation) -> Self {
        Self {
            name: Set(location.name),
            is_published: Set(location.is_published),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
    }
}
