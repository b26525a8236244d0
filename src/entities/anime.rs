use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "anime")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// User-visible identifier; unique within one catalog.
    #[sea_orm(unique)]
    pub code: String,
    pub title: String,
    pub country: Option<String>,
    pub language: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub video: Option<String>,
    pub is_private: bool,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::episodes::Entity")]
    Episodes,
    #[sea_orm(has_one = "super::ongoing_anime::Entity")]
    OngoingAnime,
}

impl Related<super::episodes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Episodes.def()
    }
}

impl Related<super::ongoing_anime::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OngoingAnime.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
