use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GameRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameRecords::Name).string().not_null())
                    .col(ColumnDef::new(GameRecords::Attempts).integer().not_null())
                    .col(ColumnDef::new(GameRecords::TimeSeconds).double().not_null())
                    .col(
                        ColumnDef::new(GameRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Ranking order for leaderboard queries
        manager
            .create_index(
                Index::create()
                    .name("idx_game_records_ranking")
                    .table(GameRecords::Table)
                    .col(GameRecords::Attempts)
                    .col(GameRecords::TimeSeconds)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GameRecords {
    Table,
    Id,
    Name,
    Attempts,
    TimeSeconds,
    CreatedAt,
}
