//! Per-category sequence counter
//!
//! This module advances a category's persisted counter with
//! compare-and-swap semantics and renders committed values into
//! human-readable identifiers.
//!
//! The counter is the one place in the platform where uncoordinated
//! concurrent writes are a correctness violation, not a performance
//! nuance: two workers committing against the same category must never
//! both observe the same resulting value. `commit_next` therefore loops
//! on the store's CAS primitive with bounded, backed-off retries and
//! surfaces [`AllocError::AllocationContention`] when the budget is
//! exhausted.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::category::AllocationCategory;
use crate::error::{AllocError, AllocResult};
use crate::store::CategoryStore;

/// How rendered identifiers are shaped.
///
/// # Examples
///
/// ```
/// use hr_alloc::IdentifierFormat;
///
/// let format = IdentifierFormat::default();
/// assert_eq!(format.separator, "-");
/// assert_eq!(format.min_digits, 4);
/// ```
#[derive(Debug, Clone)]
pub struct IdentifierFormat {
    /// Separator between tenant code, category code, and number
    pub separator: String,

    /// Minimum digits in the numeric part; longer values are never
    /// truncated
    pub min_digits: usize,
}

impl Default for IdentifierFormat {
    fn default() -> Self {
        Self {
            separator: "-".to_string(),
            min_digits: 4,
        }
    }
}

/// Retry behavior when the counter CAS loses a race.
#[derive(Debug, Clone)]
pub struct ContentionPolicy {
    /// Maximum CAS attempts before surfacing contention
    pub max_attempts: u32,

    /// Delay before the first retry
    pub initial_delay: Duration,

    /// Ceiling on the backed-off delay
    pub max_delay: Duration,

    /// Base for exponential backoff (typically 2.0)
    pub exponential_base: f64,
}

impl Default for ContentionPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(250),
            exponential_base: 2.0,
        }
    }
}

impl ContentionPolicy {
    /// A policy that fails on the first lost race.
    ///
    /// Useful when the caller owns its own retry loop.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            exponential_base: 1.0,
        }
    }
}

/// Advances per-category counters with CAS semantics.
pub struct SequenceCounter {
    categories: Arc<dyn CategoryStore>,
    policy: ContentionPolicy,
}

impl std::fmt::Debug for SequenceCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceCounter")
            .field("policy", &self.policy)
            .finish()
    }
}

impl SequenceCounter {
    /// Create a counter with the default contention policy.
    pub fn new(categories: Arc<dyn CategoryStore>) -> Self {
        Self::with_policy(categories, ContentionPolicy::default())
    }

    /// Create a counter with a custom contention policy.
    pub fn with_policy(categories: Arc<dyn CategoryStore>, policy: ContentionPolicy) -> Self {
        Self { categories, policy }
    }

    /// Preview the next sequence value without committing it.
    ///
    /// Two workers may see the same preview; only
    /// [`commit_next`](Self::commit_next) reserves a value.
    pub fn peek_next(category: &AllocationCategory) -> u64 {
        category.sequence + 1
    }

    /// Atomically reserve and return the next sequence value.
    ///
    /// Reads the category, verifies it is active, and attempts a
    /// compare-and-swap from the observed counter. A lost race is retried
    /// with exponential backoff up to the policy's attempt budget.
    ///
    /// # Errors
    ///
    /// - [`AllocError::CategoryNotFound`] if the category is unknown
    /// - [`AllocError::CategoryInactive`] if it cannot issue
    /// - [`AllocError::AllocationContention`] when the retry budget is
    ///   exhausted
    pub async fn commit_next(&self, category_id: Uuid) -> AllocResult<u64> {
        let mut delay = self.policy.initial_delay;

        for attempt in 1..=self.policy.max_attempts {
            let category = self
                .categories
                .find(category_id)
                .await?
                .ok_or(AllocError::CategoryNotFound { id: category_id })?;
            if !category.is_active {
                return Err(AllocError::CategoryInactive { id: category_id });
            }

            let observed = category.sequence;
            let next = observed + 1;
            if self
                .categories
                .compare_and_swap_sequence(category_id, observed, next)
                .await?
            {
                if attempt > 1 {
                    debug!(
                        category = %category_id,
                        attempts = attempt,
                        sequence = next,
                        "Sequence committed after contention"
                    );
                }
                return Ok(next);
            }

            warn!(
                category = %category_id,
                attempt,
                max_attempts = self.policy.max_attempts,
                "Sequence CAS lost race, retrying"
            );
            if attempt < self.policy.max_attempts {
                sleep(delay).await;
                delay = Duration::from_secs_f64(
                    (delay.as_secs_f64() * self.policy.exponential_base)
                        .min(self.policy.max_delay.as_secs_f64()),
                );
            }
        }

        Err(AllocError::AllocationContention {
            attempts: self.policy.max_attempts,
        })
    }
}

/// Render a committed sequence value into a full identifier.
///
/// The shape is `<tenant code><sep><category code><sep><zero-padded
/// number>`. Padding widens short values and never truncates long ones.
///
/// # Errors
///
/// [`AllocError::InvalidSequence`] for sequence 0 (values start at 1).
///
/// # Examples
///
/// ```
/// use hr_alloc::{render, AllocationCategory, CategoryKind, IdentifierFormat};
/// use uuid::Uuid;
///
/// let category =
///     AllocationCategory::new(Uuid::now_v7(), CategoryKind::EmployeeNumber, "NB", "Numbers")
///         .unwrap();
/// let format = IdentifierFormat::default();
///
/// assert_eq!(render("ABC", &category, 7, &format).unwrap(), "ABC-NB-0007");
/// assert_eq!(render("ABC", &category, 12345, &format).unwrap(), "ABC-NB-12345");
/// ```
pub fn render(
    tenant_code: &str,
    category: &AllocationCategory,
    sequence: u64,
    format: &IdentifierFormat,
) -> AllocResult<String> {
    if sequence == 0 {
        return Err(AllocError::InvalidSequence { sequence });
    }
    Ok(format!(
        "{tenant_code}{sep}{code}{sep}{sequence:0min_digits$}",
        sep = format.separator,
        code = category.code,
        min_digits = format.min_digits,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryKind;
    use crate::store::MemoryCategoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn category(code: &str) -> AllocationCategory {
        AllocationCategory::new(Uuid::now_v7(), CategoryKind::EmployeeNumber, code, "test")
            .unwrap()
    }

    #[test]
    fn test_peek_does_not_mutate() {
        let cat = category("EMP");
        assert_eq!(SequenceCounter::peek_next(&cat), 1);
        assert_eq!(cat.sequence, 0);
    }

    #[test]
    fn test_render_pads_and_never_truncates() {
        let cat = category("NB");
        let format = IdentifierFormat::default();

        assert_eq!(render("ABC", &cat, 7, &format).unwrap(), "ABC-NB-0007");
        assert_eq!(render("ABC", &cat, 12345, &format).unwrap(), "ABC-NB-12345");
    }

    #[test]
    fn test_render_rejects_zero() {
        let cat = category("NB");
        let result = render("ABC", &cat, 0, &IdentifierFormat::default());
        assert!(matches!(result, Err(AllocError::InvalidSequence { .. })));
    }

    #[test]
    fn test_render_custom_format() {
        let cat = category("AST");
        let format = IdentifierFormat {
            separator: "/".to_string(),
            min_digits: 6,
        };
        assert_eq!(render("INI", &cat, 42, &format).unwrap(), "INI/AST/000042");
    }

    #[tokio::test]
    async fn test_commit_next_advances() {
        let store = Arc::new(MemoryCategoryStore::new());
        let cat = category("EMP");
        let id = cat.id;
        store.insert(cat).await.unwrap();

        let counter = SequenceCounter::new(store.clone());
        assert_eq!(counter.commit_next(id).await.unwrap(), 1);
        assert_eq!(counter.commit_next(id).await.unwrap(), 2);
        assert_eq!(store.find(id).await.unwrap().unwrap().sequence, 2);
    }

    #[tokio::test]
    async fn test_commit_next_on_inactive_category() {
        let store = Arc::new(MemoryCategoryStore::new());
        let mut cat = category("EMP");
        cat.deactivate();
        let id = cat.id;
        store.insert(cat).await.unwrap();

        let counter = SequenceCounter::new(store);
        assert!(matches!(
            counter.commit_next(id).await,
            Err(AllocError::CategoryInactive { .. })
        ));
    }

    /// Category store whose CAS always loses, to exercise the contention
    /// path the in-memory store cannot produce.
    struct ContestedCategoryStore {
        inner: MemoryCategoryStore,
        cas_calls: AtomicU32,
    }

    #[async_trait]
    impl CategoryStore for ContestedCategoryStore {
        async fn insert(&self, category: AllocationCategory) -> AllocResult<()> {
            self.inner.insert(category).await
        }

        async fn find(&self, id: Uuid) -> AllocResult<Option<AllocationCategory>> {
            self.inner.find(id).await
        }

        async fn update(&self, category: AllocationCategory) -> AllocResult<()> {
            self.inner.update(category).await
        }

        async fn compare_and_swap_sequence(
            &self,
            _id: Uuid,
            _expected: u64,
            _next: u64,
        ) -> AllocResult<bool> {
            self.cas_calls.fetch_add(1, Ordering::SeqCst);
            Ok(false)
        }

        async fn remove(&self, id: Uuid) -> AllocResult<()> {
            self.inner.remove(id).await
        }
    }

    #[tokio::test]
    async fn test_contention_surfaces_after_budget() {
        let store = Arc::new(ContestedCategoryStore {
            inner: MemoryCategoryStore::new(),
            cas_calls: AtomicU32::new(0),
        });
        let cat = category("EMP");
        let id = cat.id;
        store.insert(cat).await.unwrap();

        let policy = ContentionPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            exponential_base: 2.0,
        };
        let counter = SequenceCounter::with_policy(store.clone(), policy);

        let result = counter.commit_next(id).await;
        assert!(matches!(
            result,
            Err(AllocError::AllocationContention { attempts: 3 })
        ));
        assert_eq!(store.cas_calls.load(Ordering::SeqCst), 3);
    }
}
