use crate::domain::AnimeCode;
use crate::entities::{ongoing_anime, prelude::*};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

pub struct OngoingRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> OngoingRepository<'a, C> {
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Insert-or-ignore. Returns `true` when the marker did not exist yet.
    pub async fn mark(&self, anime_code: &str) -> Result<bool, DbErr> {
        let active_model = ongoing_anime::ActiveModel {
            anime_code: Set(anime_code.to_string()),
            added_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        let inserted = OngoingAnime::insert(active_model)
            .on_conflict(
                OnConflict::column(ongoing_anime::Column::AnimeCode)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(inserted > 0)
    }

    pub async fn is_ongoing(&self, anime_code: &str) -> Result<bool, DbErr> {
        let count = OngoingAnime::find()
            .filter(ongoing_anime::Column::AnimeCode.eq(anime_code))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    pub async fn list_codes(&self) -> Result<Vec<AnimeCode>, DbErr> {
        let rows = OngoingAnime::find()
            .order_by_asc(ongoing_anime::Column::AnimeCode)
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| AnimeCode::from(row.anime_code))
            .collect())
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        OngoingAnime::find().count(self.db).await
    }
}
