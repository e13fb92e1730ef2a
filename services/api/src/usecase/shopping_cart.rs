use foodgram_domain::shopping_list::ShoppingList;

use crate::domain::repository::RecipeMarkRepository;
use crate::error::ApiError;

/// Sum the ingredients of every carted recipe by name + unit.
pub struct DownloadShoppingListUseCase<K: RecipeMarkRepository> {
    pub marks: K,
}

impl<K: RecipeMarkRepository> DownloadShoppingListUseCase<K> {
    pub async fn execute(&self, user_id: i32) -> Result<ShoppingList, ApiError> {
        let lines = self.marks.cart_lines(user_id).await?;
        let list: ShoppingList = lines.iter().collect();
        tracing::debug!(user_id, entries = list.entries().len(), "built shopping list");
        Ok(list)
    }
}
