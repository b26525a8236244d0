use crate::domain::AnimeCode;
use crate::entities::{anime, prelude::*};
use crate::models::anime::{CatalogEntry, EntryDetails};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::collections::HashMap;

pub struct AnimeRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AnimeRepository<'a, C> {
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn map_model_to_entry(model: anime::Model) -> CatalogEntry {
        CatalogEntry {
            code: AnimeCode::from(model.code),
            title: model.title,
            details: EntryDetails {
                country: model.country,
                language: model.language,
                year: model.year,
                genre: model.genre,
                description: model.description,
                image: model.image,
                video: model.video,
            },
        }
    }

    /// Plain insert; a duplicate code surfaces as a unique-constraint error.
    pub async fn insert(&self, entry: &CatalogEntry) -> Result<(), DbErr> {
        let details = &entry.details;
        let active_model = anime::ActiveModel {
            code: Set(entry.code.to_string()),
            title: Set(entry.title.clone()),
            country: Set(details.country.clone()),
            language: Set(details.language.clone()),
            year: Set(details.year),
            genre: Set(details.genre.clone()),
            description: Set(details.description.clone()),
            image: Set(details.image.clone()),
            video: Set(details.video.clone()),
            is_private: Set(false),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        Anime::insert(active_model).exec(self.db).await?;
        Ok(())
    }

    pub async fn get(&self, code: &str) -> Result<Option<CatalogEntry>, DbErr> {
        let model = Anime::find()
            .filter(anime::Column::Code.eq(code))
            .one(self.db)
            .await?;

        Ok(model.map(Self::map_model_to_entry))
    }

    pub async fn list_all(&self) -> Result<Vec<CatalogEntry>, DbErr> {
        let rows = Anime::find()
            .order_by_asc(anime::Column::Id)
            .all(self.db)
            .await?;

        Ok(rows.into_iter().map(Self::map_model_to_entry).collect())
    }

    /// Code to title for every local entry.
    pub async fn titles_by_code(&self) -> Result<HashMap<AnimeCode, String>, DbErr> {
        let rows: Vec<(String, String)> = Anime::find()
            .select_only()
            .column(anime::Column::Code)
            .column(anime::Column::Title)
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(code, title)| (AnimeCode::from(code), title))
            .collect())
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        Anime::find().count(self.db).await
    }
}
