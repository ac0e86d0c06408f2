use crate::error::{AutomationError, Result};
use crate::resolve::context::DocumentContext;
use crate::selectors::{SelectorEntry, SelectorStrategy};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default bounded wait per strategy attempt
pub const DEFAULT_STRATEGY_TIMEOUT_MS: u64 = 5000;

/// Default polling interval while waiting for a strategy to match
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Where in an entry's chain the winning strategy sat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategySource {
    /// The entry's primary strategy matched
    Primary,
    /// The fallback at this position (0-based) matched
    Fallback(usize),
}

/// Outcome of a single strategy attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum AttemptOutcome {
    /// Zero matches within the per-strategy wait
    NoMatch,
    /// More than one match; the strategy was skipped rather than returning
    /// an arbitrary element
    Ambiguous { count: usize },
    /// The document context failed while evaluating the strategy
    ContextError { message: String },
}

/// Record of one strategy attempt, kept for telemetry and error reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    /// Strategy description, e.g. `id("cart-items")`
    pub strategy: String,
    /// Position in the chain
    pub source: StrategySource,
    /// What happened
    pub outcome: AttemptOutcome,
}

/// A successful resolution: the element plus which strategy found it.
///
/// `strategy_used` and `source` exist so callers can track creeping
/// degradation: a primary that keeps losing to its fallbacks means the
/// selector pack needs a new version before the fallbacks rot too.
#[derive(Debug, Clone)]
pub struct Resolution<H> {
    /// The located element
    pub handle: H,
    /// The strategy that produced the unique match
    pub strategy_used: SelectorStrategy,
    /// Whether the winner was the primary or a fallback
    pub source: StrategySource,
    /// Strategies that were tried and failed before the winner
    pub attempts: Vec<Attempt>,
}

impl<H> Resolution<H> {
    /// True when a fallback won instead of the primary
    pub fn degraded(&self) -> bool {
        self.source != StrategySource::Primary
    }
}

/// Bounded-wait configuration for strategy attempts
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Maximum wait per strategy before moving to the next fallback. Worst
    /// case resolution latency is `(1 + fallbacks) * per_strategy_timeout`.
    pub per_strategy_timeout: Duration,

    /// Sleep between polls of the document context
    pub poll_interval: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            per_strategy_timeout: Duration::from_millis(DEFAULT_STRATEGY_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl ResolverConfig {
    /// Single-shot configuration: every strategy gets exactly one poll.
    /// Useful against contexts that are already settled (tests, parsed HTML).
    pub fn no_wait() -> Self {
        Self {
            per_strategy_timeout: Duration::ZERO,
            poll_interval: Duration::ZERO,
        }
    }

    /// Builder method: set the per-strategy timeout
    pub fn with_strategy_timeout(mut self, timeout: Duration) -> Self {
        self.per_strategy_timeout = timeout;
        self
    }
}

/// Walks a selector entry's chain against a document context and returns the
/// first strategy yielding exactly one match
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    /// Create a resolver with the given wait configuration
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Resolve an entry to a unique element; absence is a hard error.
    ///
    /// Strategies are tried in chain order. Exactly one match wins; zero
    /// matches (after the bounded wait) falls through; multiple matches are
    /// ambiguous and are skipped rather than picking one arbitrarily. When
    /// the whole chain is exhausted the error carries every attempt.
    pub fn resolve<C: DocumentContext>(
        &self,
        entry: &SelectorEntry,
        ctx: &C,
    ) -> Result<Resolution<C::Handle>> {
        self.resolve_scoped(entry, ctx, None)
    }

    /// Resolve an entry whose absence is an expected, handled condition
    /// (optional banners, empty-state markers). Exhaustion returns `Ok(None)`
    /// instead of an error.
    pub fn try_resolve<C: DocumentContext>(
        &self,
        entry: &SelectorEntry,
        ctx: &C,
    ) -> Result<Option<Resolution<C::Handle>>> {
        match self.resolve_scoped(entry, ctx, None) {
            Ok(resolution) => Ok(Some(resolution)),
            Err(AutomationError::SelectorExhausted { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// [`Resolver::resolve`], searching only the descendants of `scope`
    pub fn resolve_within<C: DocumentContext>(
        &self,
        entry: &SelectorEntry,
        ctx: &C,
        scope: &C::Handle,
    ) -> Result<Resolution<C::Handle>> {
        self.resolve_scoped(entry, ctx, Some(scope))
    }

    /// [`Resolver::try_resolve`], searching only the descendants of `scope`
    pub fn try_resolve_within<C: DocumentContext>(
        &self,
        entry: &SelectorEntry,
        ctx: &C,
        scope: &C::Handle,
    ) -> Result<Option<Resolution<C::Handle>>> {
        match self.resolve_scoped(entry, ctx, Some(scope)) {
            Ok(resolution) => Ok(Some(resolution)),
            Err(AutomationError::SelectorExhausted { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn resolve_scoped<C: DocumentContext>(
        &self,
        entry: &SelectorEntry,
        ctx: &C,
        scope: Option<&C::Handle>,
    ) -> Result<Resolution<C::Handle>> {
        let mut attempts = Vec::new();

        for (position, strategy) in entry.chain().enumerate() {
            let source = if position == 0 {
                StrategySource::Primary
            } else {
                StrategySource::Fallback(position - 1)
            };

            match self.attempt(strategy, ctx, scope) {
                AttemptResult::Unique(handle) => {
                    match source {
                        StrategySource::Primary => {
                            log::debug!("'{}' resolved by primary {}", entry.name, strategy.describe())
                        }
                        StrategySource::Fallback(index) => log::warn!(
                            "'{}' resolved by fallback #{} {} after primary failed",
                            entry.name,
                            index,
                            strategy.describe()
                        ),
                    }
                    return Ok(Resolution {
                        handle,
                        strategy_used: strategy.clone(),
                        source,
                        attempts,
                    });
                }
                AttemptResult::Failed(outcome) => {
                    log::debug!(
                        "'{}' strategy {} failed: {:?}",
                        entry.name,
                        strategy.describe(),
                        outcome
                    );
                    attempts.push(Attempt {
                        strategy: strategy.describe(),
                        source,
                        outcome,
                    });
                }
            }
        }

        Err(AutomationError::SelectorExhausted {
            entry: entry.name.clone(),
            attempts,
        })
    }

    /// One bounded attempt: poll until the strategy yields a unique match or
    /// the deadline passes. An ambiguous result is terminal for the strategy;
    /// waiting longer only ever adds matches.
    fn attempt<C: DocumentContext>(
        &self,
        strategy: &SelectorStrategy,
        ctx: &C,
        scope: Option<&C::Handle>,
    ) -> AttemptResult<C::Handle> {
        let deadline = Instant::now() + self.config.per_strategy_timeout;

        loop {
            let found = match scope {
                Some(scope) => ctx.find_matches_within(scope, strategy),
                None => ctx.find_matches(strategy),
            };

            match found {
                Ok(matches) => match matches.len() {
                    1 => {
                        return AttemptResult::Unique(
                            matches.into_iter().next().expect("len checked"),
                        );
                    }
                    0 => {
                        if Instant::now() >= deadline {
                            return AttemptResult::Failed(AttemptOutcome::NoMatch);
                        }
                        std::thread::sleep(self.config.poll_interval);
                    }
                    count => {
                        return AttemptResult::Failed(AttemptOutcome::Ambiguous { count });
                    }
                },
                Err(e) => {
                    return AttemptResult::Failed(AttemptOutcome::ContextError {
                        message: e.to_string(),
                    });
                }
            }
        }
    }
}

enum AttemptResult<H> {
    Unique(H),
    Failed(AttemptOutcome),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::fake::FakeDocument;
    use crate::selectors::{SelectorKind, SelectorStrategy};

    fn strategy(expr: &str, score: u8) -> SelectorStrategy {
        SelectorStrategy::new(SelectorKind::Attribute, expr, score)
    }

    fn resolver() -> Resolver {
        Resolver::new(ResolverConfig::no_wait())
    }

    #[test]
    fn test_primary_unique_match_short_circuits() {
        let doc = FakeDocument::new()
            .with_matches(&strategy("[data-qa='total']", 90), &[7])
            .with_matches(&strategy("[data-old='total']", 50), &[8]);

        let entry = SelectorEntry::new("total", strategy("[data-qa='total']", 90))
            .with_fallback(strategy("[data-old='total']", 50));

        let resolution = resolver().resolve(&entry, &doc).unwrap();
        assert_eq!(resolution.handle, 7);
        assert_eq!(resolution.source, StrategySource::Primary);
        assert!(!resolution.degraded());
        assert!(resolution.attempts.is_empty());

        // Fallbacks must never be evaluated once the primary matches
        assert_eq!(doc.evaluated(), vec!["attribute(\"[data-qa='total']\")"]);
    }

    #[test]
    fn test_fallback_order_skips_ambiguous() {
        // primary: zero matches, fallback 0: two matches, fallback 1: one match
        let doc = FakeDocument::new()
            .with_matches(&strategy("[data-qa='row']", 90), &[])
            .with_matches(&strategy("[data-old='row']", 70), &[1, 2])
            .with_matches(&strategy("[data-legacy='row']", 30), &[3]);

        let entry = SelectorEntry::new("row", strategy("[data-qa='row']", 90))
            .with_fallback(strategy("[data-old='row']", 70))
            .with_fallback(strategy("[data-legacy='row']", 30));

        let resolution = resolver().resolve(&entry, &doc).unwrap();
        assert_eq!(resolution.handle, 3);
        assert_eq!(resolution.source, StrategySource::Fallback(1));
        assert!(resolution.degraded());

        assert_eq!(resolution.attempts.len(), 2);
        assert_eq!(resolution.attempts[0].outcome, AttemptOutcome::NoMatch);
        assert_eq!(
            resolution.attempts[1].outcome,
            AttemptOutcome::Ambiguous { count: 2 }
        );
    }

    #[test]
    fn test_exhaustion_reports_every_attempt() {
        let doc = FakeDocument::new()
            .with_matches(&strategy("[data-qa='x']", 90), &[])
            .with_matches(&strategy("[data-old='x']", 50), &[4, 5, 6]);

        let entry = SelectorEntry::new("banner", strategy("[data-qa='x']", 90))
            .with_fallback(strategy("[data-old='x']", 50));

        let err = resolver().resolve(&entry, &doc).unwrap_err();
        match err {
            AutomationError::SelectorExhausted { entry, attempts } => {
                assert_eq!(entry, "banner");
                assert_eq!(attempts.len(), 2);
                assert_eq!(attempts[1].outcome, AttemptOutcome::Ambiguous { count: 3 });
            }
            other => panic!("expected SelectorExhausted, got {:?}", other),
        }
    }

    #[test]
    fn test_try_resolve_absent_is_none() {
        let doc = FakeDocument::new();
        let entry = SelectorEntry::new("optional_banner", strategy("[data-qa='banner']", 80));

        let resolution = resolver().try_resolve(&entry, &doc).unwrap();
        assert!(resolution.is_none());
    }

    #[test]
    fn test_context_error_is_skipped_not_fatal() {
        let doc = FakeDocument::new()
            .with_failure(&strategy("[broken", 90), "invalid selector")
            .with_matches(&strategy("[data-old='x']", 50), &[9]);

        let entry = SelectorEntry::new("x", strategy("[broken", 90))
            .with_fallback(strategy("[data-old='x']", 50));

        let resolution = resolver().resolve(&entry, &doc).unwrap();
        assert_eq!(resolution.handle, 9);
        match &resolution.attempts[0].outcome {
            AttemptOutcome::ContextError { message } => {
                assert!(message.contains("invalid selector"))
            }
            other => panic!("expected ContextError, got {:?}", other),
        }
    }

    #[test]
    fn test_scoped_resolution() {
        let row_name = strategy("[data-qa='name']", 90);
        let doc = FakeDocument::new()
            .with_scoped_matches(11, &row_name, &[21])
            .with_scoped_matches(12, &row_name, &[22]);

        let entry = SelectorEntry::new("item_name", row_name.clone());

        let in_first = resolver().resolve_within(&entry, &doc, &11).unwrap();
        let in_second = resolver().resolve_within(&entry, &doc, &12).unwrap();
        assert_eq!(in_first.handle, 21);
        assert_eq!(in_second.handle, 22);
    }

    #[test]
    fn test_poll_until_deadline_then_no_match() {
        // Appears after two polls; generous timeout lets the poll loop find it
        let doc = FakeDocument::new()
            .with_matches(&strategy("[data-qa='late']", 90), &[5])
            .visible_after(2);

        let entry = SelectorEntry::new("late", strategy("[data-qa='late']", 90));

        let patient = Resolver::new(
            ResolverConfig::no_wait().with_strategy_timeout(Duration::from_millis(250)),
        );
        let resolution = patient.resolve(&entry, &doc).unwrap();
        assert_eq!(resolution.handle, 5);

        let impatient = resolver();
        let doc = FakeDocument::new()
            .with_matches(&strategy("[data-qa='late']", 90), &[5])
            .visible_after(2);
        assert!(impatient.resolve(&entry, &doc).is_err());
    }
}
