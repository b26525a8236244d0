use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Anime::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Anime::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Anime::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Anime::Title).string().not_null())
                    .col(ColumnDef::new(Anime::Country).string().null())
                    .col(ColumnDef::new(Anime::Language).string().null())
                    .col(ColumnDef::new(Anime::Year).integer().null())
                    .col(ColumnDef::new(Anime::Genre).string().null())
                    .col(ColumnDef::new(Anime::Description).string().null())
                    .col(ColumnDef::new(Anime::Image).string().null())
                    .col(ColumnDef::new(Anime::Video).string().null())
                    .col(
                        ColumnDef::new(Anime::IsPrivate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Anime::CreatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Episodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Episodes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Episodes::AnimeCode).string().not_null())
                    .col(ColumnDef::new(Episodes::EpisodeNumber).integer().not_null())
                    .col(ColumnDef::new(Episodes::VideoFileId).string().not_null())
                    .col(
                        ColumnDef::new(Episodes::IsPrivate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Episodes::CreatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_episodes_anime_code")
                            .from(Episodes::Table, Episodes::AnimeCode)
                            .to(Anime::Table, Anime::Code)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One row per (anime_code, episode_number)
        manager
            .create_index(
                Index::create()
                    .name("idx_episodes_code_number")
                    .table(Episodes::Table)
                    .col(Episodes::AnimeCode)
                    .col(Episodes::EpisodeNumber)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OngoingAnime::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OngoingAnime::AnimeCode)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OngoingAnime::AddedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ongoing_anime_code")
                            .from(OngoingAnime::Table, OngoingAnime::AnimeCode)
                            .to(Anime::Table, Anime::Code)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OngoingAnime::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Episodes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Anime::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Anime {
    Table,
    Id,
    Code,
    Title,
    Country,
    Language,
    Year,
    Genre,
    Description,
    Image,
    Video,
    IsPrivate,
    CreatedAt,
}

#[derive(Iden)]
enum Episodes {
    Table,
    Id,
    AnimeCode,
    EpisodeNumber,
    VideoFileId,
    IsPrivate,
    CreatedAt,
}

#[derive(Iden)]
enum OngoingAnime {
    Table,
    AnimeCode,
    AddedAt,
}
