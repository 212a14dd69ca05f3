//! Initial migration to create the ludex database schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_sync_attempts(manager).await?;
        self.create_rawg_games(manager).await?;
        self.create_igdb_games(manager).await?;
        self.create_shark_stores(manager).await?;
        self.create_shark_deals(manager).await?;
        self.create_shark_games(manager).await?;
        self.create_steam_apps(manager).await?;
        self.create_steam_player_snapshots(manager).await?;
        self.create_twitch_games(manager).await?;
        self.create_twitch_streams(manager).await?;
        self.create_twitch_clips(manager).await?;
        self.create_twitch_viewer_snapshots(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            TwitchViewerSnapshots::Table.into_iden(),
            TwitchClips::Table.into_iden(),
            TwitchStreams::Table.into_iden(),
            TwitchGames::Table.into_iden(),
            SteamPlayerSnapshots::Table.into_iden(),
            SteamApps::Table.into_iden(),
            SharkGames::Table.into_iden(),
            SharkDeals::Table.into_iden(),
            SharkStores::Table.into_iden(),
            IgdbGames::Table.into_iden(),
            RawgGames::Table.into_iden(),
            SyncAttempts::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

impl Migration {
    async fn create_sync_attempts(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SyncAttempts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SyncAttempts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SyncAttempts::Source).string().not_null())
                    .col(ColumnDef::new(SyncAttempts::SyncType).string().not_null())
                    .col(
                        ColumnDef::new(SyncAttempts::Status)
                            .string()
                            .not_null()
                            .default("running"),
                    )
                    .col(
                        ColumnDef::new(SyncAttempts::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SyncAttempts::EndedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SyncAttempts::ItemsProcessed)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SyncAttempts::ItemsAdded)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SyncAttempts::LastCursor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SyncAttempts::ErrorMessage).text().null())
                    .col(
                        ColumnDef::new(SyncAttempts::Metadata)
                            .json()
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .to_owned(),
            )
            .await?;

        // The latest-cursor read filters on (source, sync_type) for every
        // attempt start.
        manager
            .create_index(
                Index::create()
                    .name("idx_sync_attempts_source_type")
                    .table(SyncAttempts::Table)
                    .col(SyncAttempts::Source)
                    .col(SyncAttempts::SyncType)
                    .to_owned(),
            )
            .await
    }

    async fn create_rawg_games(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RawgGames::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RawgGames::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RawgGames::Title).string().not_null())
                    .col(ColumnDef::new(RawgGames::Slug).string().null())
                    .col(ColumnDef::new(RawgGames::Description).text().null())
                    .col(ColumnDef::new(RawgGames::Released).date().null())
                    .col(ColumnDef::new(RawgGames::ReleaseYear).integer().null())
                    .col(ColumnDef::new(RawgGames::CoverImage).text().null())
                    .col(ColumnDef::new(RawgGames::Metacritic).integer().null())
                    .col(ColumnDef::new(RawgGames::Rating).double().null())
                    .col(ColumnDef::new(RawgGames::RatingCount).integer().null())
                    .col(ColumnDef::new(RawgGames::Playtime).integer().null())
                    .col(ColumnDef::new(RawgGames::EsrbRating).string().null())
                    .col(ColumnDef::new(RawgGames::Website).text().null())
                    .col(json_array(RawgGames::Genres))
                    .col(json_array(RawgGames::Platforms))
                    .col(json_array(RawgGames::Stores))
                    .col(json_array(RawgGames::Developers))
                    .col(json_array(RawgGames::Publishers))
                    .col(json_array(RawgGames::Screenshots))
                    .col(json_array(RawgGames::Tags))
                    .col(
                        ColumnDef::new(RawgGames::LastFetched)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_igdb_games(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IgdbGames::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IgdbGames::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IgdbGames::Name).string().not_null())
                    .col(ColumnDef::new(IgdbGames::Slug).string().not_null())
                    .col(ColumnDef::new(IgdbGames::Summary).text().null())
                    .col(ColumnDef::new(IgdbGames::Storyline).text().null())
                    .col(
                        ColumnDef::new(IgdbGames::FirstReleaseDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(IgdbGames::ReleaseYear).integer().null())
                    .col(ColumnDef::new(IgdbGames::CoverUrl).text().null())
                    .col(ColumnDef::new(IgdbGames::IgdbRating).double().null())
                    .col(ColumnDef::new(IgdbGames::AggregatedRating).double().null())
                    .col(
                        ColumnDef::new(IgdbGames::RatingCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(IgdbGames::AggregatedRatingCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(IgdbGames::Category)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(IgdbGames::Status).integer().null())
                    .col(json_array(IgdbGames::Genres))
                    .col(json_array(IgdbGames::Platforms))
                    .col(json_array(IgdbGames::Developers))
                    .col(json_array(IgdbGames::Publishers))
                    .col(json_array(IgdbGames::Screenshots))
                    .col(
                        ColumnDef::new(IgdbGames::Metadata)
                            .json()
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .col(
                        ColumnDef::new(IgdbGames::LastFetched)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_shark_stores(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SharkStores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SharkStores::StoreId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SharkStores::StoreName).string().not_null())
                    .col(
                        ColumnDef::new(SharkStores::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SharkStores::Banner).text().null())
                    .col(ColumnDef::new(SharkStores::Logo).text().null())
                    .col(ColumnDef::new(SharkStores::Icon).text().null())
                    .col(
                        ColumnDef::new(SharkStores::LastFetched)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_shark_deals(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SharkDeals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SharkDeals::DealId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SharkDeals::GameId).string().not_null())
                    .col(ColumnDef::new(SharkDeals::Title).string().not_null())
                    .col(ColumnDef::new(SharkDeals::StoreId).string().not_null())
                    .col(ColumnDef::new(SharkDeals::StoreName).string().null())
                    .col(ColumnDef::new(SharkDeals::SalePrice).double().not_null())
                    .col(ColumnDef::new(SharkDeals::NormalPrice).double().not_null())
                    .col(
                        ColumnDef::new(SharkDeals::Savings)
                            .double()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SharkDeals::MetacriticScore).integer().null())
                    .col(ColumnDef::new(SharkDeals::MetacriticLink).text().null())
                    .col(ColumnDef::new(SharkDeals::SteamRatingText).string().null())
                    .col(
                        ColumnDef::new(SharkDeals::SteamRatingPercent)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SharkDeals::SteamRatingCount)
                            .integer()
                            .null(),
                    )
                    .col(ColumnDef::new(SharkDeals::SteamAppId).string().null())
                    .col(
                        ColumnDef::new(SharkDeals::ReleaseDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SharkDeals::LastChange)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(SharkDeals::DealRating).double().null())
                    .col(ColumnDef::new(SharkDeals::Thumb).text().null())
                    .col(
                        ColumnDef::new(SharkDeals::IsOnSale)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SharkDeals::LastFetched)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shark_deals_game_id")
                    .table(SharkDeals::Table)
                    .col(SharkDeals::GameId)
                    .to_owned(),
            )
            .await
    }

    async fn create_shark_games(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SharkGames::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SharkGames::GameId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SharkGames::Title).string().not_null())
                    .col(ColumnDef::new(SharkGames::SteamAppId).string().null())
                    .col(ColumnDef::new(SharkGames::Thumb).text().null())
                    .col(ColumnDef::new(SharkGames::Cheapest).double().null())
                    .col(ColumnDef::new(SharkGames::CheapestDealId).string().null())
                    .col(ColumnDef::new(SharkGames::HistoricalLow).double().null())
                    .col(
                        ColumnDef::new(SharkGames::HistoricalLowDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(json_array(SharkGames::StoreIds))
                    .col(
                        ColumnDef::new(SharkGames::LastFetched)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_steam_apps(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SteamApps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SteamApps::AppId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SteamApps::Name).string().not_null())
                    .col(
                        ColumnDef::new(SteamApps::AppType)
                            .string()
                            .not_null()
                            .default("unknown"),
                    )
                    .col(
                        ColumnDef::new(SteamApps::IsFree)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SteamApps::RequiredAge).integer().null())
                    .col(ColumnDef::new(SteamApps::ShortDescription).text().null())
                    .col(ColumnDef::new(SteamApps::HeaderImage).text().null())
                    .col(ColumnDef::new(SteamApps::Website).text().null())
                    .col(json_array(SteamApps::Developers))
                    .col(json_array(SteamApps::Publishers))
                    .col(json_array(SteamApps::Categories))
                    .col(json_array(SteamApps::Genres))
                    .col(
                        ColumnDef::new(SteamApps::PriceOverview)
                            .json()
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .col(ColumnDef::new(SteamApps::MetacriticScore).integer().null())
                    .col(ColumnDef::new(SteamApps::Recommendations).integer().null())
                    .col(ColumnDef::new(SteamApps::ReleaseDate).string().null())
                    .col(
                        ColumnDef::new(SteamApps::ControllerSupport)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SteamApps::DlcCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SteamApps::CurrentPlayers).integer().null())
                    .col(ColumnDef::new(SteamApps::ReviewScore).integer().null())
                    .col(ColumnDef::new(SteamApps::ReviewScoreDesc).string().null())
                    .col(ColumnDef::new(SteamApps::TotalPositive).integer().null())
                    .col(ColumnDef::new(SteamApps::TotalNegative).integer().null())
                    .col(ColumnDef::new(SteamApps::TotalReviews).integer().null())
                    .col(
                        ColumnDef::new(SteamApps::Metadata)
                            .json()
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .col(
                        ColumnDef::new(SteamApps::LastFetched)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SteamApps::LastQuickUpdate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Hot refresh orders by staleness over games only.
        manager
            .create_index(
                Index::create()
                    .name("idx_steam_apps_type_quick_update")
                    .table(SteamApps::Table)
                    .col(SteamApps::AppType)
                    .col(SteamApps::LastQuickUpdate)
                    .to_owned(),
            )
            .await
    }

    async fn create_steam_player_snapshots(
        &self,
        manager: &SchemaManager<'_>,
    ) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SteamPlayerSnapshots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SteamPlayerSnapshots::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SteamPlayerSnapshots::AppId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SteamPlayerSnapshots::PlayerCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SteamPlayerSnapshots::CapturedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_steam_player_snapshots_app")
                    .table(SteamPlayerSnapshots::Table)
                    .col(SteamPlayerSnapshots::AppId)
                    .col(SteamPlayerSnapshots::CapturedAt)
                    .to_owned(),
            )
            .await
    }

    async fn create_twitch_games(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TwitchGames::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TwitchGames::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TwitchGames::Name).string().not_null())
                    .col(ColumnDef::new(TwitchGames::BoxArtUrl).text().null())
                    .col(ColumnDef::new(TwitchGames::IgdbId).string().null())
                    .col(
                        ColumnDef::new(TwitchGames::CurrentViewers)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TwitchGames::CurrentChannels)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TwitchGames::LanguageBreakdown)
                            .json()
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .col(json_array(TwitchGames::TopStreamers))
                    .col(json_array(TwitchGames::Tags))
                    .col(big_int_zero(TwitchGames::PeakViewersToday))
                    .col(big_int_zero(TwitchGames::PeakViewersWeek))
                    .col(big_int_zero(TwitchGames::PeakViewersMonth))
                    .col(big_int_zero(TwitchGames::PeakViewersAllTime))
                    .col(big_int_zero(TwitchGames::AvgViewersDay))
                    .col(big_int_zero(TwitchGames::AvgViewersWeek))
                    .col(big_int_zero(TwitchGames::AvgViewersMonth))
                    .col(
                        ColumnDef::new(TwitchGames::LastFetched)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_twitch_streams(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TwitchStreams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TwitchStreams::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TwitchStreams::GameId).string().not_null())
                    .col(ColumnDef::new(TwitchStreams::GameName).string().null())
                    .col(ColumnDef::new(TwitchStreams::UserId).string().not_null())
                    .col(ColumnDef::new(TwitchStreams::UserLogin).string().not_null())
                    .col(
                        ColumnDef::new(TwitchStreams::UserDisplayName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TwitchStreams::Title).text().null())
                    .col(
                        ColumnDef::new(TwitchStreams::ViewerCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TwitchStreams::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(TwitchStreams::Language).string().null())
                    .col(ColumnDef::new(TwitchStreams::ThumbnailUrl).text().null())
                    .col(json_array(TwitchStreams::Tags))
                    .col(
                        ColumnDef::new(TwitchStreams::IsMature)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(TwitchStreams::CapturedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_twitch_streams_game")
                    .table(TwitchStreams::Table)
                    .col(TwitchStreams::GameId)
                    .to_owned(),
            )
            .await
    }

    async fn create_twitch_clips(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TwitchClips::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TwitchClips::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TwitchClips::GameId).string().not_null())
                    .col(
                        ColumnDef::new(TwitchClips::BroadcasterId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TwitchClips::BroadcasterName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TwitchClips::CreatorId).string().null())
                    .col(ColumnDef::new(TwitchClips::CreatorName).string().null())
                    .col(ColumnDef::new(TwitchClips::Title).text().null())
                    .col(
                        ColumnDef::new(TwitchClips::ViewCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TwitchClips::CreatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(TwitchClips::Duration).double().null())
                    .col(ColumnDef::new(TwitchClips::ThumbnailUrl).text().null())
                    .col(ColumnDef::new(TwitchClips::EmbedUrl).text().null())
                    .col(ColumnDef::new(TwitchClips::Url).text().null())
                    .col(ColumnDef::new(TwitchClips::VideoId).string().null())
                    .col(ColumnDef::new(TwitchClips::VodOffset).integer().null())
                    .col(ColumnDef::new(TwitchClips::Language).string().null())
                    .col(
                        ColumnDef::new(TwitchClips::CapturedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_twitch_clips_game")
                    .table(TwitchClips::Table)
                    .col(TwitchClips::GameId)
                    .to_owned(),
            )
            .await
    }

    async fn create_twitch_viewer_snapshots(
        &self,
        manager: &SchemaManager<'_>,
    ) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TwitchViewerSnapshots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TwitchViewerSnapshots::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TwitchViewerSnapshots::GameId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TwitchViewerSnapshots::Viewers)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TwitchViewerSnapshots::Channels)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TwitchViewerSnapshots::CapturedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_twitch_viewer_snapshots_game")
                    .table(TwitchViewerSnapshots::Table)
                    .col(TwitchViewerSnapshots::GameId)
                    .col(TwitchViewerSnapshots::CapturedAt)
                    .to_owned(),
            )
            .await
    }
}

/// A non-null JSON column defaulting to an empty array.
fn json_array<T: IntoIden + 'static>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .json()
        .not_null()
        .default(Expr::cust("'[]'"))
        .to_owned()
}

/// A non-null big integer column defaulting to zero.
fn big_int_zero<T: IntoIden + 'static>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .big_integer()
        .not_null()
        .default(0)
        .to_owned()
}

#[derive(DeriveIden)]
enum SyncAttempts {
    Table,
    Id,
    Source,
    SyncType,
    Status,
    StartedAt,
    EndedAt,
    ItemsProcessed,
    ItemsAdded,
    LastCursor,
    ErrorMessage,
    Metadata,
}

#[derive(DeriveIden)]
enum RawgGames {
    Table,
    Id,
    Title,
    Slug,
    Description,
    Released,
    ReleaseYear,
    CoverImage,
    Metacritic,
    Rating,
    RatingCount,
    Playtime,
    EsrbRating,
    Website,
    Genres,
    Platforms,
    Stores,
    Developers,
    Publishers,
    Screenshots,
    Tags,
    LastFetched,
}

#[derive(DeriveIden)]
enum IgdbGames {
    Table,
    Id,
    Name,
    Slug,
    Summary,
    Storyline,
    FirstReleaseDate,
    ReleaseYear,
    CoverUrl,
    IgdbRating,
    AggregatedRating,
    RatingCount,
    AggregatedRatingCount,
    Category,
    Status,
    Genres,
    Platforms,
    Developers,
    Publishers,
    Screenshots,
    Metadata,
    LastFetched,
}

#[derive(DeriveIden)]
enum SharkStores {
    Table,
    StoreId,
    StoreName,
    IsActive,
    Banner,
    Logo,
    Icon,
    LastFetched,
}

#[derive(DeriveIden)]
enum SharkDeals {
    Table,
    DealId,
    GameId,
    Title,
    StoreId,
    StoreName,
    SalePrice,
    NormalPrice,
    Savings,
    MetacriticScore,
    MetacriticLink,
    SteamRatingText,
    SteamRatingPercent,
    SteamRatingCount,
    SteamAppId,
    ReleaseDate,
    LastChange,
    DealRating,
    Thumb,
    IsOnSale,
    LastFetched,
}

#[derive(DeriveIden)]
enum SharkGames {
    Table,
    GameId,
    Title,
    SteamAppId,
    Thumb,
    Cheapest,
    CheapestDealId,
    HistoricalLow,
    HistoricalLowDate,
    StoreIds,
    LastFetched,
}

#[derive(DeriveIden)]
enum SteamApps {
    Table,
    AppId,
    Name,
    AppType,
    IsFree,
    RequiredAge,
    ShortDescription,
    HeaderImage,
    Website,
    Developers,
    Publishers,
    Categories,
    Genres,
    PriceOverview,
    MetacriticScore,
    Recommendations,
    ReleaseDate,
    ControllerSupport,
    DlcCount,
    CurrentPlayers,
    ReviewScore,
    ReviewScoreDesc,
    TotalPositive,
    TotalNegative,
    TotalReviews,
    Metadata,
    LastFetched,
    LastQuickUpdate,
}

#[derive(DeriveIden)]
enum SteamPlayerSnapshots {
    Table,
    Id,
    AppId,
    PlayerCount,
    CapturedAt,
}

#[derive(DeriveIden)]
enum TwitchGames {
    Table,
    Id,
    Name,
    BoxArtUrl,
    IgdbId,
    CurrentViewers,
    CurrentChannels,
    LanguageBreakdown,
    TopStreamers,
    Tags,
    PeakViewersToday,
    PeakViewersWeek,
    PeakViewersMonth,
    PeakViewersAllTime,
    AvgViewersDay,
    AvgViewersWeek,
    AvgViewersMonth,
    LastFetched,
}

#[derive(DeriveIden)]
enum TwitchStreams {
    Table,
    Id,
    GameId,
    GameName,
    UserId,
    UserLogin,
    UserDisplayName,
    Title,
    ViewerCount,
    StartedAt,
    Language,
    ThumbnailUrl,
    Tags,
    IsMature,
    CapturedAt,
}

#[derive(DeriveIden)]
enum TwitchClips {
    Table,
    Id,
    GameId,
    BroadcasterId,
    BroadcasterName,
    CreatorId,
    CreatorName,
    Title,
    ViewCount,
    CreatedAt,
    Duration,
    ThumbnailUrl,
    EmbedUrl,
    Url,
    VideoId,
    VodOffset,
    Language,
    CapturedAt,
}

#[derive(DeriveIden)]
enum TwitchViewerSnapshots {
    Table,
    Id,
    GameId,
    Viewers,
    Channels,
    CapturedAt,
}
