//! Create media file table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MediaFile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MediaFile::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MediaFile::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(MediaFile::Name).string_len(256).not_null())
                    .col(
                        ColumnDef::new(MediaFile::ContentType)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MediaFile::Size).big_integer().not_null())
                    .col(
                        ColumnDef::new(MediaFile::StorageKey)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MediaFile::Url).string_len(1024).not_null())
                    .col(
                        ColumnDef::new(MediaFile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_file_user")
                            .from(MediaFile::Table, MediaFile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for listing a user's uploads)
        manager
            .create_index(
                Index::create()
                    .name("idx_media_file_user_id")
                    .table(MediaFile::Table)
                    .col(MediaFile::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MediaFile::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MediaFile {
    Table,
    Id,
    UserId,
    Name,
    ContentType,
    Size,
    StorageKey,
    Url,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
