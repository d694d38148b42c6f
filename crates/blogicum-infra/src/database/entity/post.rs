//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use blogicum_core::domain::{NewPost, Post};

use crate::database::DomainMapped;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub pub_date: DateTimeWithTimeZone,
    pub is_published: bool,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Location,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl DomainMapped for Entity {
    type Domain = Post;
    type New = NewPost;
}

impl From<Model> for Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            pub_date: model.pub_date.into(),
            is_published: model.is_published,
            author_id: model.author_id,
            category_id: model.category_id,
            location_id: model.location_id,
            created_at: model.created_at.into(),
        }
    }
}

impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title),
            content: Set(post.content),
            pub_date: Set(post.pub_date.into()),
            is_published: Set(post.is_published),
            author_id: Set(post.author_id),
            category_id: Set(post.category_id),
            location_id: Set(post.location_id),
            created_at: Set(post.created_at.into()),
        }
    }
}

impl From<NewPost> for ActiveModel {
    fn from(post: NewPost) -> Self {
        Self {
            title: Set(post.title),
            content: Set(post.content),
            pub_date: Set(post.pub_date.into()),
            is_published: Set(post.is_published),
            author_id: Set(post.author_id),
            category_id: Set(post.category_id),
            location_id: Set(post.location_id),
            created_at: Set(post.created_at.into()),
            ..Default::default()
        }
    }
}
