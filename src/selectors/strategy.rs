use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a strategy's expression locates elements.
///
/// The kinds form a closed set so the fallback loop in the resolver is a
/// first-class iteration over known lowering rules, not ad-hoc string
/// probing. Expressions are interpreted per kind:
///
/// - `Id`: an element id, without the leading `#`
/// - `Attribute`: a complete CSS attribute selector, e.g. `[data-testid='row']`
/// - `Role`: an ARIA role name, optionally `role:accessible name`
/// - `Class`: a single class name, without the leading `.`
/// - `Text`: literal visible text, matched by containment
/// - `Structural`: a complete CSS path, e.g. `main > div:nth-child(2) ul`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    Id,
    Attribute,
    Role,
    Class,
    Text,
    Structural,
}

impl SelectorKind {
    /// Strategy kind name as used in definition files and log lines
    pub fn name(&self) -> &'static str {
        match self {
            SelectorKind::Id => "id",
            SelectorKind::Attribute => "attribute",
            SelectorKind::Role => "role",
            SelectorKind::Class => "class",
            SelectorKind::Text => "text",
            SelectorKind::Structural => "structural",
        }
    }
}

/// A single element-location rule with a durability estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectorStrategy {
    /// How to interpret the expression
    pub kind: SelectorKind,

    /// The location expression, interpreted per [`SelectorKind`]
    pub expression: String,

    /// 0-100 estimate of how likely this strategy keeps working as the
    /// target markup evolves; higher is more durable
    pub stability_score: u8,
}

/// A concrete query a document context can execute
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// CSS selector, usable document-rooted or element-scoped as-is
    Css(String),
    /// XPath expression; `scoped` restricts it to the descendants of the
    /// element it is evaluated against
    XPath(String),
}

impl SelectorStrategy {
    /// Create a strategy
    pub fn new(kind: SelectorKind, expression: impl Into<String>, stability_score: u8) -> Self {
        Self {
            kind,
            expression: expression.into(),
            stability_score: stability_score.min(100),
        }
    }

    /// Lower this strategy to an executable query.
    ///
    /// `scoped` controls whether text lookups produce a document-rooted or a
    /// relative XPath; CSS queries are unaffected because the context applies
    /// them against whichever root it searches under.
    pub fn to_query(&self, scoped: bool) -> Query {
        match self.kind {
            SelectorKind::Id => Query::Css(format!("#{}", css_escape(&self.expression))),
            SelectorKind::Attribute => Query::Css(self.expression.clone()),
            SelectorKind::Role => {
                // "role" or "role:accessible name"
                match self.expression.split_once(':') {
                    Some((role, name)) => Query::Css(format!(
                        "[role='{}'][aria-label='{}']",
                        role.trim(),
                        name.trim()
                    )),
                    None => Query::Css(format!("[role='{}']", self.expression.trim())),
                }
            }
            SelectorKind::Class => Query::Css(format!(".{}", css_escape(&self.expression))),
            SelectorKind::Text => {
                let root = if scoped { ".//*" } else { "//*" };
                Query::XPath(format!(
                    "{}[contains(normalize-space(.), {})]",
                    root,
                    xpath_literal(&self.expression)
                ))
            }
            SelectorKind::Structural => Query::Css(self.expression.clone()),
        }
    }

    /// Short description used in attempt logs, e.g. `text("Meus Pedidos")`
    pub fn describe(&self) -> String {
        format!("{}({:?})", self.kind.name(), self.expression)
    }
}

/// Escape characters that would terminate or alter a CSS identifier
fn css_escape(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    for c in ident.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => out.push(c),
            _ => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

/// Quote a string as an XPath literal, handling embedded quotes via concat()
fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{}'", text);
    }
    if !text.contains('"') {
        return format!("\"{}\"", text);
    }
    let parts: Vec<String> = text
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_lowering() {
        let strategy = SelectorStrategy::new(SelectorKind::Id, "order-list", 95);
        assert_eq!(strategy.to_query(false), Query::Css("#order-list".to_string()));
    }

    #[test]
    fn test_attribute_lowering_passthrough() {
        let strategy =
            SelectorStrategy::new(SelectorKind::Attribute, "[data-testid='cart-item']", 80);
        assert_eq!(
            strategy.to_query(false),
            Query::Css("[data-testid='cart-item']".to_string())
        );
    }

    #[test]
    fn test_role_lowering() {
        let strategy = SelectorStrategy::new(SelectorKind::Role, "list", 70);
        assert_eq!(strategy.to_query(false), Query::Css("[role='list']".to_string()));

        let named = SelectorStrategy::new(SelectorKind::Role, "button: Adicionar", 70);
        assert_eq!(
            named.to_query(false),
            Query::Css("[role='button'][aria-label='Adicionar']".to_string())
        );
    }

    #[test]
    fn test_class_lowering() {
        let strategy = SelectorStrategy::new(SelectorKind::Class, "cart-row", 40);
        assert_eq!(strategy.to_query(true), Query::Css(".cart-row".to_string()));
    }

    #[test]
    fn test_text_lowering_scoped_and_rooted() {
        let strategy = SelectorStrategy::new(SelectorKind::Text, "Meus Pedidos", 55);
        assert_eq!(
            strategy.to_query(false),
            Query::XPath("//*[contains(normalize-space(.), 'Meus Pedidos')]".to_string())
        );
        assert_eq!(
            strategy.to_query(true),
            Query::XPath(".//*[contains(normalize-space(.), 'Meus Pedidos')]".to_string())
        );
    }

    #[test]
    fn test_text_with_embedded_quote() {
        let strategy = SelectorStrategy::new(SelectorKind::Text, "d'Oro", 55);
        match strategy.to_query(false) {
            Query::XPath(xpath) => assert!(xpath.contains("\"d'Oro\"")),
            Query::Css(_) => panic!("text strategy must lower to xpath"),
        }
    }

    #[test]
    fn test_score_clamped_to_100() {
        let strategy = SelectorStrategy::new(SelectorKind::Id, "root", 255);
        assert_eq!(strategy.stability_score, 100);
    }

    #[test]
    fn test_serde_round_trip() {
        let strategy = SelectorStrategy::new(SelectorKind::Attribute, "[data-qa='price']", 85);
        let json = serde_json::to_string(&strategy).unwrap();
        assert!(json.contains("\"kind\":\"attribute\""));
        assert!(json.contains("\"stabilityScore\":85"));

        let back: SelectorStrategy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, strategy);
    }
}
