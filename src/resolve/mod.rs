//! Element resolution with ranked fallback chains.
//!
//! The [`Resolver`] walks a [`SelectorEntry`](crate::selectors::SelectorEntry)'s
//! strategy chain against a [`DocumentContext`]: the first strategy yielding
//! exactly one match wins, ambiguous strategies are skipped, and every
//! success reports which strategy it took so degradation (primary failing,
//! fallback carrying the load) is visible before the whole chain rots.

pub mod cdp;
pub mod context;
pub mod resolver;

#[cfg(test)]
pub mod fake;

pub use cdp::CdpDocument;
pub use context::DocumentContext;
pub use resolver::{
    Attempt, AttemptOutcome, Resolution, Resolver, ResolverConfig, StrategySource,
};
