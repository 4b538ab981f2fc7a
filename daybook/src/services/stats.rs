//! Stats and coin balance with a short-lived read cache
//!
//! Reads are memoized for a few seconds; any write through the service
//! drops the cache.

use crate::config::STATS_CACHE_TTL;
use crate::database::{CoinBreakdown, Repository, Stats, StatsUpdate};
use crate::error::{AppError, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

struct Cached<T> {
    value: T,
    stored_at: Instant,
}

impl<T: Copy> Cached<T> {
    fn fresh(&self, ttl: Duration) -> Option<T> {
        (self.stored_at.elapsed() < ttl).then_some(self.value)
    }
}

#[derive(Default)]
struct StatsCache {
    stats: Option<Cached<Stats>>,
    coins: Option<Cached<CoinBreakdown>>,
}

/// Service for the stats and coins rows
#[derive(Clone)]
pub struct StatsService {
    repo: Repository,
    cache: Arc<Mutex<StatsCache>>,
    ttl: Duration,
}

impl StatsService {
    pub fn new(repo: Repository) -> Self {
        Self::with_ttl(repo, STATS_CACHE_TTL)
    }

    pub fn with_ttl(repo: Repository, ttl: Duration) -> Self {
        Self {
            repo,
            cache: Arc::new(Mutex::new(StatsCache::default())),
            ttl,
        }
    }

    fn cache(&self) -> Result<MutexGuard<'_, StatsCache>> {
        self.cache
            .lock()
            .map_err(|e| AppError::Generic(format!("Stats cache lock error: {}", e)))
    }

    /// Current stats; zeros when the row does not exist yet
    pub async fn get_stats(&self) -> Result<Stats> {
        let cached = self.cache()?.stats.as_ref().and_then(|c| c.fresh(self.ttl));
        if let Some(stats) = cached {
            return Ok(stats);
        }

        let stats = self.repo.get_stats().await?.unwrap_or_default();
        self.cache()?.stats = Some(Cached {
            value: stats,
            stored_at: Instant::now(),
        });

        Ok(stats)
    }

    /// Apply a partial update and drop cached values
    pub async fn update_stats(&self, update: StatsUpdate) -> Result<Stats> {
        let stats = self.repo.update_stats(&update).await?;
        self.invalidate()?;

        tracing::info!("Stats updated: {:?}", stats);

        Ok(stats)
    }

    pub async fn get_coin_breakdown(&self) -> Result<CoinBreakdown> {
        let cached = self.cache()?.coins.as_ref().and_then(|c| c.fresh(self.ttl));
        if let Some(coins) = cached {
            return Ok(coins);
        }

        let coins = self.repo.get_coins().await?.unwrap_or_default();
        self.cache()?.coins = Some(Cached {
            value: coins,
            stored_at: Instant::now(),
        });

        Ok(coins)
    }

    /// Total coin balance
    pub async fn get_coins(&self) -> Result<i64> {
        Ok(self.get_coin_breakdown().await?.total)
    }

    pub async fn welcome_bonus_given(&self) -> Result<bool> {
        Ok(self.get_coin_breakdown().await?.welcome_bonus)
    }

    pub fn invalidate(&self) -> Result<()> {
        *self.cache()? = StatsCache::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_memory_pool;

    async fn create_test_service(ttl: Duration) -> (StatsService, Repository) {
        let pool = create_memory_pool().await.unwrap();
        let repo = Repository::new(pool);
        (StatsService::with_ttl(repo.clone(), ttl), repo)
    }

    #[tokio::test]
    async fn test_defaults_without_rows() {
        let (service, _repo) = create_test_service(STATS_CACHE_TTL).await;

        assert_eq!(service.get_stats().await.unwrap(), Stats::default());
        assert_eq!(service.get_coins().await.unwrap(), 0);
        assert!(!service.welcome_bonus_given().await.unwrap());
    }

    #[tokio::test]
    async fn test_update_invalidates_cache() {
        let (service, _repo) = create_test_service(Duration::from_secs(60)).await;

        service.get_stats().await.unwrap();
        service
            .update_stats(StatsUpdate {
                games_played: Some(4),
                highest_score: Some(120),
                ..Default::default()
            })
            .await
            .unwrap();

        let stats = service.get_stats().await.unwrap();
        assert_eq!(stats.games_played, 4);
        assert_eq!(stats.highest_score, 120);
        assert_eq!(stats.games_won, 0);
    }

    #[tokio::test]
    async fn test_reads_are_memoized() {
        let (service, repo) = create_test_service(Duration::from_secs(60)).await;

        service.get_stats().await.unwrap();

        // Written behind the service's back
        repo.update_stats(&StatsUpdate {
            games_won: Some(9),
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(service.get_stats().await.unwrap().games_won, 0);

        service.invalidate().unwrap();
        assert_eq!(service.get_stats().await.unwrap().games_won, 9);
    }

    #[tokio::test]
    async fn test_expired_cache_rereads() {
        let (service, repo) = create_test_service(Duration::ZERO).await;

        service.get_stats().await.unwrap();
        repo.update_stats(&StatsUpdate {
            total_score: Some(300),
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(service.get_stats().await.unwrap().total_score, 300);
    }

    #[tokio::test]
    async fn test_coin_breakdown() {
        let (service, repo) = create_test_service(STATS_CACHE_TTL).await;

        sqlx::query(
            "INSERT INTO coins (amount, achievement_coins, game_coins, welcome_bonus_given) VALUES (150, 50, 100, 1)",
        )
        .execute(repo.pool())
        .await
        .unwrap();

        let coins = service.get_coin_breakdown().await.unwrap();
        assert_eq!(coins.total, 150);
        assert_eq!(coins.achievement, 50);
        assert_eq!(coins.game, 100);
        assert!(coins.welcome_bonus);
        assert_eq!(service.get_coins().await.unwrap(), 150);
        assert!(service.welcome_bonus_given().await.unwrap());
    }
}
