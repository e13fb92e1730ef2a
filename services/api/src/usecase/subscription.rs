use foodgram_domain::pagination::PageRequest;

use crate::domain::repository::{RecipeRepository, SubscriptionRepository, UserRepository};
use crate::domain::types::{SubscriptionView, User};
use crate::error::ApiError;

/// Attach each author's recipes, newest first. `recipes_limit` caps the
/// embedded list when positive; `recipes_count` is always the full total.
pub async fn subscription_views<R: RecipeRepository>(
    recipes: &R,
    authors: Vec<User>,
    recipes_limit: Option<u32>,
) -> Result<Vec<SubscriptionView>, ApiError> {
    let ids: Vec<i32> = authors.iter().map(|a| a.id).collect();
    let counts = recipes.count_by_authors(&ids).await?;
    let limit = recipes_limit.filter(|&l| l > 0).map(u64::from);

    let mut views = Vec::with_capacity(authors.len());
    for author in authors {
        let recipes_count = counts.get(&author.id).copied().unwrap_or(0);
        let preview = if recipes_count == 0 {
            Vec::new()
        } else {
            recipes.short_by_author(author.id, limit).await?
        };
        views.push(SubscriptionView {
            author,
            recipes: preview,
            recipes_count,
        });
    }
    Ok(views)
}

// ── Subscribe ────────────────────────────────────────────────────────────────

pub struct SubscribeUseCase<U, S, R>
where
    U: UserRepository,
    S: SubscriptionRepository,
    R: RecipeRepository,
{
    pub users: U,
    pub subscriptions: S,
    pub recipes: R,
}

impl<U, S, R> SubscribeUseCase<U, S, R>
where
    U: UserRepository,
    S: SubscriptionRepository,
    R: RecipeRepository,
{
    pub async fn execute(
        &self,
        caller: i32,
        author_id: i32,
        recipes_limit: Option<u32>,
    ) -> Result<SubscriptionView, ApiError> {
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        if author.id == caller {
            return Err(ApiError::SelfSubscription);
        }
        if !self.subscriptions.add(caller, author.id).await? {
            return Err(ApiError::AlreadySubscribed);
        }
        let mut views = subscription_views(&self.recipes, vec![author], recipes_limit).await?;
        views.pop().ok_or_else(|| anyhow::anyhow!("subscription view missing").into())
    }
}

// ── Unsubscribe ──────────────────────────────────────────────────────────────

pub struct UnsubscribeUseCase<U: UserRepository, S: SubscriptionRepository> {
    pub users: U,
    pub subscriptions: S,
}

impl<U: UserRepository, S: SubscriptionRepository> UnsubscribeUseCase<U, S> {
    pub async fn execute(&self, caller: i32, author_id: i32) -> Result<(), ApiError> {
        self.users
            .find_by_id(author_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        if !self.subscriptions.remove(caller, author_id).await? {
            return Err(ApiError::SubscriptionNotFound);
        }
        Ok(())
    }
}

// ── ListSubscriptions ────────────────────────────────────────────────────────

pub struct ListSubscriptionsUseCase<S: SubscriptionRepository, R: RecipeRepository> {
    pub subscriptions: S,
    pub recipes: R,
}

impl<S: SubscriptionRepository, R: RecipeRepository> ListSubscriptionsUseCase<S, R> {
    pub async fn execute(
        &self,
        caller: i32,
        page: PageRequest,
        recipes_limit: Option<u32>,
    ) -> Result<(Vec<SubscriptionView>, u64), ApiError> {
        let (authors, count) = self.subscriptions.list_following(caller, page).await?;
        let views = subscription_views(&self.recipes, authors, recipes_limit).await?;
        Ok((views, count))
    }
}
