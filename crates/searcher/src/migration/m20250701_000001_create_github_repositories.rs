//! Initial migration to create the github_repositories table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GitHubRepositories::Table)
                    .if_not_exists()
                    // Identity assigned by GitHub, never generated locally
                    .col(
                        ColumnDef::new(GitHubRepositories::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GitHubRepositories::Name).string().not_null())
                    .col(ColumnDef::new(GitHubRepositories::Description).text().null())
                    .col(
                        ColumnDef::new(GitHubRepositories::OwnerName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GitHubRepositories::Language).string().null())
                    .col(
                        ColumnDef::new(GitHubRepositories::StarsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GitHubRepositories::ForksCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GitHubRepositories::LastUpdated)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // The reader filters on language and sorts on each count column
        manager
            .create_index(
                Index::create()
                    .name("idx_github_repos_language")
                    .table(GitHubRepositories::Table)
                    .col(GitHubRepositories::Language)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_github_repos_stars_count")
                    .table(GitHubRepositories::Table)
                    .col(GitHubRepositories::StarsCount)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GitHubRepositories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GitHubRepositories {
    #[sea_orm(iden = "github_repositories")]
    Table,
    Id,
    Name,
    Description,
    OwnerName,
    Language,
    StarsCount,
    ForksCount,
    LastUpdated,
}
