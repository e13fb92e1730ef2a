pub mod auth;
pub mod ingredient;
pub mod mark;
pub mod recipe;
pub mod shopping_cart;
pub mod subscription;
pub mod tag;
pub mod user;
