use crate::domain::AnimeCode;
use crate::entities::{anime, episodes, prelude::*};
use crate::models::episode::Episode;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Set,
};

pub struct EpisodeRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EpisodeRepository<'a, C> {
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn map_model(model: episodes::Model) -> Episode {
        Episode {
            anime_code: AnimeCode::from(model.anime_code),
            episode_number: model.episode_number,
            video_file_id: model.video_file_id,
        }
    }

    pub async fn insert(&self, episode: &Episode) -> Result<(), DbErr> {
        let active_model = episodes::ActiveModel {
            anime_code: Set(episode.anime_code.to_string()),
            episode_number: Set(episode.episode_number),
            video_file_id: Set(episode.video_file_id.clone()),
            is_private: Set(false),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        Episodes::insert(active_model).exec(self.db).await?;
        Ok(())
    }

    pub async fn exists(&self, anime_code: &str, episode_number: i32) -> Result<bool, DbErr> {
        let count = Episodes::find()
            .filter(episodes::Column::AnimeCode.eq(anime_code))
            .filter(episodes::Column::EpisodeNumber.eq(episode_number))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    pub async fn list_for(&self, anime_code: &str) -> Result<Vec<Episode>, DbErr> {
        let rows = Episodes::find()
            .filter(episodes::Column::AnimeCode.eq(anime_code))
            .order_by_asc(episodes::Column::EpisodeNumber)
            .all(self.db)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        Episodes::find().count(self.db).await
    }

    /// Episodes whose `anime_code` has no matching entry. Always zero while
    /// foreign keys are enforced.
    pub async fn count_orphans(&self) -> Result<u64, DbErr> {
        let known = Anime::find()
            .select_only()
            .column(anime::Column::Code)
            .into_query();

        Episodes::find()
            .filter(episodes::Column::AnimeCode.not_in_subquery(known))
            .count(self.db)
            .await
    }
}
