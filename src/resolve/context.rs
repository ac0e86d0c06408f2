use crate::error::Result;
use crate::selectors::SelectorStrategy;

/// Narrow document-access capability the resolver and extractors run against.
///
/// The only things this crate ever asks of a live page: find the elements a
/// strategy matches (document-rooted or under a previously returned handle),
/// and read an element's text or one of its attributes. Everything else
/// (navigation, clicks, screenshots, session lifecycle) belongs to the
/// automation layers above and stays out of this trait on purpose.
///
/// Handles are owned values so implementations are free to re-attach to the
/// underlying driver per call instead of holding driver lifetimes.
pub trait DocumentContext {
    /// Opaque reference to a located element
    type Handle: Clone;

    /// All elements the strategy matches, searching from the document root
    fn find_matches(&self, strategy: &SelectorStrategy) -> Result<Vec<Self::Handle>>;

    /// All elements the strategy matches among the descendants of `scope`
    fn find_matches_within(
        &self,
        scope: &Self::Handle,
        strategy: &SelectorStrategy,
    ) -> Result<Vec<Self::Handle>>;

    /// Visible text content of an element
    fn text_of(&self, handle: &Self::Handle) -> Result<String>;

    /// Attribute value of an element, `None` when the attribute is absent
    fn attribute_of(&self, handle: &Self::Handle, name: &str) -> Result<Option<String>>;
}
