//! sea-orm entities for the Foodgram database.

pub mod ingredient_units;
pub mod ingredients;
pub mod measurement_units;
pub mod recipe_carts;
pub mod recipe_favorites;
pub mod recipe_ingredients;
pub mod recipe_tags;
pub mod recipes;
pub mod subscriptions;
pub mod tags;
pub mod users;
