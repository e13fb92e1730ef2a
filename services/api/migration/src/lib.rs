use sea_orm_migration::prelude::*;

mod m20260401_000001_create_users;
mod m20260401_000002_create_ingredients;
mod m20260401_000003_create_tags;
mod m20260401_000004_create_recipes;
mod m20260401_000005_create_user_marks;
mod m20260401_000006_add_lookup_indexes;
mod m20260402_000007_check_tag_color;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260401_000001_create_users::Migration),
            Box::new(m20260401_000002_create_ingredients::Migration),
            Box::new(m20260401_000003_create_tags::Migration),
            Box::new(m20260401_000004_create_recipes::Migration),
            Box::new(m20260401_000005_create_user_marks::Migration),
            Box::new(m20260401_000006_add_lookup_indexes::Migration),
            Box::new(m20260402_000007_check_tag_color::Migration),
        ]
    }
}
