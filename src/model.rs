//! Resource kinds, keys and the handle types generated code is built from.
//!
//! [`ResourceHandle`] and [`ResourceItem`] are the runtime side: generated
//! shard files declare them as `static` values, so both are constructible
//! in `const` context from `'static` data. [`ResourceKey`] is the owned,
//! validated key the generator works with.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};

static SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid suffix regex"));

/// Keywords that are legal as raw identifiers (`r#type`).
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Names that cannot be written as identifiers at all, raw or not.
const FORBIDDEN_IDENTS: &[&str] = &["_", "crate", "self", "Self", "super"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Drawable,
    String,
    Plurals,
    Font,
    File,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Drawable,
        ResourceKind::String,
        ResourceKind::Plurals,
        ResourceKind::Font,
        ResourceKind::File,
    ];

    /// Tag used in key strings and as the accessor module name.
    pub const fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Drawable => "drawable",
            ResourceKind::String => "string",
            ResourceKind::Plurals => "plurals",
            ResourceKind::Font => "font",
            ResourceKind::File => "file",
        }
    }

    /// Enum variant name as written in generated code.
    pub const fn variant_name(self) -> &'static str {
        match self {
            ResourceKind::Drawable => "Drawable",
            ResourceKind::String => "String",
            ResourceKind::Plurals => "Plurals",
            ResourceKind::Font => "Font",
            ResourceKind::File => "File",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated `<kind>:<suffix>` key.
///
/// Ordering is by kind, then by suffix byte-wise, which is the order keys
/// are packed into shards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey {
    kind: ResourceKind,
    suffix: String,
}

impl ResourceKey {
    pub fn new(kind: ResourceKind, suffix: impl Into<String>) -> Result<Self> {
        let suffix = suffix.into();
        validate_suffix(kind, &suffix)?;
        Ok(Self { kind, suffix })
    }

    /// Parses the display form, e.g. `drawable:icon_6`.
    pub fn parse(s: &str) -> Result<Self> {
        let Some((kind, suffix)) = s.split_once(':') else {
            return Err(GenError::InvalidKey {
                key: s.to_string(),
                reason: "expected `<kind>:<suffix>`",
            });
        };
        let kind = ResourceKind::parse(kind).ok_or_else(|| GenError::InvalidKey {
            key: s.to_string(),
            reason: "unknown resource kind",
        })?;
        Self::new(kind, suffix)
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The suffix as a Rust identifier, raw-escaped when it is a keyword.
    pub fn ident(&self) -> String {
        rust_ident(&self.suffix)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.suffix)
    }
}

fn validate_suffix(kind: ResourceKind, suffix: &str) -> Result<()> {
    let invalid = |reason| GenError::InvalidKey {
        key: format!("{kind}:{suffix}"),
        reason,
    };

    if suffix.is_empty() {
        return Err(invalid("empty name"));
    }
    if !SUFFIX_RE.is_match(suffix) {
        return Err(invalid("name must match [A-Za-z_][A-Za-z0-9_]*"));
    }
    if FORBIDDEN_IDENTS.contains(&suffix) {
        return Err(invalid("name is a reserved identifier"));
    }
    Ok(())
}

pub(crate) fn rust_ident(name: &str) -> String {
    if RAW_KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

/// One file backing a resource under a qualifier set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceItem {
    qualifiers: &'static [&'static str],
    path: &'static str,
}

impl ResourceItem {
    pub const fn new(qualifiers: &'static [&'static str], path: &'static str) -> Self {
        Self { qualifiers, path }
    }

    pub const fn qualifiers(&self) -> &'static [&'static str] {
        self.qualifiers
    }

    pub const fn path(&self) -> &'static str {
        self.path
    }
}

/// Immutable handle to one resource and all of its variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    key: &'static str,
    kind: ResourceKind,
    items: &'static [ResourceItem],
}

impl ResourceHandle {
    pub const fn new(
        key: &'static str,
        kind: ResourceKind,
        items: &'static [ResourceItem],
    ) -> Self {
        Self { key, kind, items }
    }

    /// Full key string, `<kind>:<suffix>`.
    pub const fn key(&self) -> &'static str {
        self.key
    }

    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Variants in the order they were scanned.
    pub const fn items(&self) -> &'static [ResourceItem] {
        self.items
    }

    pub fn suffix(&self) -> &'static str {
        self.key.split_once(':').map_or(self.key, |(_, s)| s)
    }

    /// The unqualified variant, if there is one.
    pub fn default_item(&self) -> Option<&'static ResourceItem> {
        self.items.iter().find(|i| i.qualifiers.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_display_is_kind_prefixed() {
        let key = ResourceKey::new(ResourceKind::Drawable, "icon_5949").unwrap();
        assert_eq!(key.to_string(), "drawable:icon_5949");
        assert_eq!(ResourceKey::parse("drawable:icon_5949").unwrap(), key);
    }

    #[test]
    fn parse_rejects_malformed_keys() {
        assert!(matches!(
            ResourceKey::parse("icon_6"),
            Err(GenError::InvalidKey { .. })
        ));
        assert!(matches!(
            ResourceKey::parse("sprite:icon_6"),
            Err(GenError::InvalidKey { .. })
        ));
        assert!(matches!(
            ResourceKey::parse("drawable:6icon"),
            Err(GenError::InvalidKey { .. })
        ));
        assert!(matches!(
            ResourceKey::parse("drawable:icon-6"),
            Err(GenError::InvalidKey { .. })
        ));
        assert!(matches!(
            ResourceKey::parse("drawable:self"),
            Err(GenError::InvalidKey { .. })
        ));
    }

    #[test]
    fn keywords_become_raw_identifiers() {
        let key = ResourceKey::new(ResourceKind::String, "type").unwrap();
        assert_eq!(key.ident(), "r#type");
        let key = ResourceKey::new(ResourceKind::String, "title").unwrap();
        assert_eq!(key.ident(), "title");
    }

    #[test]
    fn keys_order_by_kind_then_suffix_bytes() {
        let mut keys = vec![
            ResourceKey::new(ResourceKind::String, "a").unwrap(),
            ResourceKey::new(ResourceKind::Drawable, "icon_600").unwrap(),
            ResourceKey::new(ResourceKind::Drawable, "icon_6").unwrap(),
            ResourceKey::new(ResourceKind::Drawable, "icon_60").unwrap(),
        ];
        keys.sort();
        let shown: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(
            shown,
            [
                "drawable:icon_6",
                "drawable:icon_60",
                "drawable:icon_600",
                "string:a"
            ]
        );
    }

    static ITEMS: [ResourceItem; 2] = [
        ResourceItem::new(&["night"], "drawable-night/logo.xml"),
        ResourceItem::new(&[], "drawable/logo.xml"),
    ];
    static LOGO: ResourceHandle =
        ResourceHandle::new("drawable:logo", ResourceKind::Drawable, &ITEMS);

    #[test]
    fn handle_is_static_constructible() {
        assert_eq!(LOGO.suffix(), "logo");
        assert_eq!(LOGO.kind(), ResourceKind::Drawable);
        assert_eq!(LOGO.items().len(), 2);
        assert_eq!(LOGO.default_item().unwrap().path(), "drawable/logo.xml");
    }
}
