
mod catalog_test;
mod mark_test;
mod recipe_test;
mod router_test;
mod subscription_test;
mod user_test;
