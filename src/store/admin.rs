use futures_util::future::try_join;

use board_store::Filter;

use super::BoardStore;
use crate::analytics::{self, Analytics};
use crate::error::{StoreError, StoreResult};
use crate::ordering::ItemId;

impl BoardStore {
    /// Company analytics, served from the last computation while it is
    /// younger than the configured TTL
    pub async fn load_analytics(&self) -> StoreResult<Analytics> {
        if let Some(cached) = self.fresh_analytics() {
            return Ok(cached);
        }
        self.fetch_analytics()
            .await
            .map_err(|e| self.report("Failed to load analytics", e))
    }

    /// Recompute regardless of age
    pub async fn refresh_analytics(&self) -> StoreResult<Analytics> {
        let analytics = self
            .fetch_analytics()
            .await
            .map_err(|e| self.report("Failed to refresh analytics", e))?;
        self.announce("Analytics refreshed successfully");
        Ok(analytics)
    }

    fn fresh_analytics(&self) -> Option<Analytics> {
        let company_id = self.session()?.company_id;
        let ttl_ms = i64::try_from(self.config.analytics_ttl_secs.saturating_mul(1000)).unwrap_or(i64::MAX);
        let now = chrono::Utc::now().timestamp_millis();
        self.analytics
            .borrow()
            .as_ref()
            .filter(|a| a.company_id == company_id && now - a.generated_at < ttl_ms)
            .cloned()
    }

    async fn fetch_analytics(&self) -> StoreResult<Analytics> {
        let session = self.session().ok_or(StoreError::NoSession)?;
        if !session.can_view_analytics() {
            return Err(StoreError::NotPermitted("analytics".to_string()));
        }

        let company = Filter::all().eq("company_id", session.company_id.clone());
        let (boards, members) = try_join(
            self.backend.boards.list(&company),
            self.backend.members.list(&company),
        )
        .await?;

        let board_ids: Vec<ItemId> = boards.iter().map(|b| b.id).collect();
        let lists = self.backend.lists.list(&Filter::all().is_in("board_id", board_ids)).await?;
        let list_ids: Vec<ItemId> = lists.iter().map(|l| l.id).collect();
        let cards = self.backend.cards.list(&Filter::all().is_in("list_id", list_ids)).await?;

        let analytics = analytics::compute(&session.company_id, &boards, &lists, &cards, &members);
        log::info!(
            "Analytics for {}: {} boards, {} tasks",
            analytics.company_id,
            analytics.overview.total_boards,
            analytics.overview.tasks.total
        );
        *self.analytics.borrow_mut() = Some(analytics.clone());
        Ok(analytics)
    }
}
