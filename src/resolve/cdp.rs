use crate::error::{AutomationError, Result};
use crate::resolve::context::DocumentContext;
use crate::selectors::{Query, SelectorStrategy};
use headless_chrome::{Element, Tab};

/// [`DocumentContext`] backed by a Chrome DevTools Protocol tab.
///
/// Takes an already-navigated tab; navigation, login, and tab lifecycle are
/// the caller's concern. Handles are CDP node ids, re-attached to the tab on
/// every read so no driver lifetimes leak into the rest of the crate.
pub struct CdpDocument<'a> {
    tab: &'a Tab,
}

impl<'a> CdpDocument<'a> {
    /// Wrap a tab that is already showing the page to inspect
    pub fn new(tab: &'a Tab) -> Self {
        Self { tab }
    }

    fn element(&self, node_id: u32) -> Result<Element<'a>> {
        Element::new(self.tab, node_id)
            .map_err(|e| AutomationError::Unknown(format!("stale node {}: {}", node_id, e)))
    }

    /// Run a lowered query document-rooted. The driver reports an empty
    /// result set as an error for some query paths; both mean "no match".
    fn query_document(&self, query: &Query) -> Vec<u32> {
        let found = match query {
            Query::Css(css) => self.tab.find_elements(css),
            Query::XPath(xpath) => self.tab.find_elements_by_xpath(xpath),
        };
        match found {
            Ok(elements) => elements.iter().map(|e| e.node_id).collect(),
            Err(e) => {
                log::debug!("document query {:?} matched nothing: {}", query, e);
                Vec::new()
            }
        }
    }

    fn query_scoped(&self, scope: &Element<'a>, query: &Query) -> Vec<u32> {
        let found = match query {
            Query::Css(css) => scope.find_elements(css),
            Query::XPath(xpath) => scope.find_elements_by_xpath(xpath),
        };
        match found {
            Ok(elements) => elements.iter().map(|e| e.node_id).collect(),
            Err(e) => {
                log::debug!("scoped query {:?} matched nothing: {}", query, e);
                Vec::new()
            }
        }
    }
}

impl DocumentContext for CdpDocument<'_> {
    type Handle = u32;

    fn find_matches(&self, strategy: &SelectorStrategy) -> Result<Vec<u32>> {
        Ok(self.query_document(&strategy.to_query(false)))
    }

    fn find_matches_within(&self, scope: &u32, strategy: &SelectorStrategy) -> Result<Vec<u32>> {
        let scope = self.element(*scope)?;
        Ok(self.query_scoped(&scope, &strategy.to_query(true)))
    }

    fn text_of(&self, handle: &u32) -> Result<String> {
        self.element(*handle)?
            .get_inner_text()
            .map_err(|e| AutomationError::Unknown(format!("read text of node {}: {}", handle, e)))
    }

    fn attribute_of(&self, handle: &u32, name: &str) -> Result<Option<String>> {
        let attributes = self
            .element(*handle)?
            .get_attributes()
            .map_err(|e| {
                AutomationError::Unknown(format!("read attributes of node {}: {}", handle, e))
            })?
            .unwrap_or_default();

        // DOM.getAttributes returns a flat interleaved name/value list
        Ok(attributes
            .chunks_exact(2)
            .find(|pair| pair[0] == name)
            .map(|pair| pair[1].clone()))
    }
}
