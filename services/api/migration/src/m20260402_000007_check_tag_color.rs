use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Tag colours are `#RRGGBB`.
const ADD_CHECK: &str =
    "ALTER TABLE tags ADD CONSTRAINT chk_tags_color_hex CHECK (color ~ '^#[0-9A-Fa-f]{6}$')";
const DROP_CHECK: &str = "ALTER TABLE tags DROP CONSTRAINT IF EXISTS chk_tags_color_hex";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(ADD_CHECK).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(DROP_CHECK).await?;
        Ok(())
    }
}
