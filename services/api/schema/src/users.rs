use sea_orm::entity::prelude::*;

/// Registered account. `password` holds an argon2 PHC string.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub date_joined: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::recipes::Entity")]
    Recipes,
    #[sea_orm(has_many = "super::recipe_favorites::Entity")]
    RecipeFavorites,
    #[sea_orm(has_many = "super::recipe_carts::Entity")]
    RecipeCarts,
}

impl Related<super::recipes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipes.def()
    }
}

impl Related<super::recipe_favorites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeFavorites.def()
    }
}

impl Related<super::recipe_carts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeCarts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
