//! Template lookup.
//!
//! [`TemplateStore`] is the seam between the simulation and whatever owns the
//! stat blocks. [`Bestiary`] is the in-memory implementation shipped with the
//! crate; it can be filled by hand or seeded with the built-in catalog.
//!
//! Keys follow the `"Name LvN"` convention: `"Fighter Lv5"` asks for the
//! level-5 fighter, a bare `"Goblin"` asks for the lowest-level goblin on file.
//!
//! # Example
//!
//! ```
//! use bestiary::{Bestiary, TemplateKey, TemplateStore};
//!
//! let bestiary = Bestiary::with_standard_catalog();
//! let fighter = bestiary.lookup(&TemplateKey::parse("Fighter Lv5")).unwrap();
//! assert_eq!(fighter.level, 5);
//!
//! assert!(bestiary.lookup(&TemplateKey::parse("Unknown Class")).is_err());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::template::StatTemplate;

/// A (name, level) request for a stat block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateKey {
    /// Class or creature name
    pub name: String,
    /// Requested level; `None` takes the lowest level on file
    pub level: Option<u8>,
}

impl TemplateKey {
    /// Creates a key for an exact level.
    #[must_use]
    pub fn new(name: &str, level: u8) -> Self {
        Self {
            name: name.to_string(),
            level: Some(level),
        }
    }

    /// Creates a key without a level.
    #[must_use]
    pub fn any_level(name: &str) -> Self {
        Self {
            name: name.to_string(),
            level: None,
        }
    }

    /// Parses `"Name LvN"`; anything without a trailing `LvN` is a bare name.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if let Some((name, suffix)) = input.rsplit_once(char::is_whitespace) {
            let level = suffix
                .strip_prefix("Lv")
                .or_else(|| suffix.strip_prefix("lv"))
                .and_then(|n| n.parse::<u8>().ok());
            if let Some(level) = level {
                return Self::new(name.trim_end(), level);
            }
        }
        Self::any_level(input)
    }

    fn normalized_name(&self) -> String {
        self.name.to_lowercase()
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            Some(level) => write!(f, "{} Lv{}", self.name, level),
            None => f.write_str(&self.name),
        }
    }
}

impl From<&str> for TemplateKey {
    fn from(input: &str) -> Self {
        Self::parse(input)
    }
}

/// No stat block matches the requested key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no stat template found for `{key}`")]
pub struct TemplateNotFoundError {
    /// The key that failed to resolve
    pub key: TemplateKey,
}

/// Source of immutable stat blocks.
///
/// Implementations must be shareable across worker threads; the simulation
/// only ever reads from them.
pub trait TemplateStore: Send + Sync {
    /// Looks up a template by name and level.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateNotFoundError`] when no template matches.
    fn lookup(&self, key: &TemplateKey) -> Result<Arc<StatTemplate>, TemplateNotFoundError>;
}

/// In-memory template store keyed by lower-cased name and level.
#[derive(Debug, Clone, Default)]
pub struct Bestiary {
    templates: BTreeMap<(String, u8), Arc<StatTemplate>>,
}

impl Bestiary {
    /// Creates an empty bestiary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bestiary holding the built-in classes and creatures.
    #[must_use]
    pub fn with_standard_catalog() -> Self {
        let mut bestiary = Self::new();
        for template in crate::catalog::standard() {
            bestiary.insert(template);
        }
        bestiary
    }

    /// Adds or replaces a template. Returns the replaced one, if any.
    pub fn insert(&mut self, template: StatTemplate) -> Option<Arc<StatTemplate>> {
        let key = (template.name.to_lowercase(), template.level);
        self.templates.insert(key, Arc::new(template))
    }

    /// Number of templates on file.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the bestiary is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// All templates in (name, level) order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<StatTemplate>> {
        self.templates.values()
    }
}

impl TemplateStore for Bestiary {
    fn lookup(&self, key: &TemplateKey) -> Result<Arc<StatTemplate>, TemplateNotFoundError> {
        let name = key.normalized_name();
        let found = match key.level {
            Some(level) => self.templates.get(&(name, level)),
            None => self
                .templates
                .range((name.clone(), u8::MIN)..=(name, u8::MAX))
                .next()
                .map(|(_, template)| template),
        };

        match found {
            Some(template) => Ok(Arc::clone(template)),
            None => {
                tracing::debug!(%key, "stat template lookup failed");
                Err(TemplateNotFoundError { key: key.clone() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str, level: u8) -> StatTemplate {
        StatTemplate::builder(name, level).hit_points(10).build()
    }

    mod key_tests {
        use super::*;

        #[test]
        fn parses_level_suffix() {
            let key = TemplateKey::parse("Fighter Lv5");
            assert_eq!(key, TemplateKey::new("Fighter", 5));
            assert_eq!(key.to_string(), "Fighter Lv5");
        }

        #[test]
        fn multi_word_names_keep_their_spaces() {
            assert_eq!(
                TemplateKey::parse("Giant Crocodile"),
                TemplateKey::any_level("Giant Crocodile")
            );
            assert_eq!(
                TemplateKey::parse("Swarm of Bats lv2"),
                TemplateKey::new("Swarm of Bats", 2)
            );
        }

        #[test]
        fn malformed_suffix_is_part_of_the_name() {
            assert_eq!(
                TemplateKey::parse("Fighter Lvx"),
                TemplateKey::any_level("Fighter Lvx")
            );
        }
    }

    mod lookup_tests {
        use super::*;

        #[test]
        fn exact_level_lookup() {
            let mut bestiary = Bestiary::new();
            bestiary.insert(template("Fighter", 5));
            bestiary.insert(template("Fighter", 3));

            let found = bestiary.lookup(&TemplateKey::new("fighter", 3)).unwrap();
            assert_eq!(found.level, 3);
        }

        #[test]
        fn bare_name_takes_lowest_level() {
            let mut bestiary = Bestiary::new();
            bestiary.insert(template("Ogre", 4));
            bestiary.insert(template("Ogre", 2));

            let found = bestiary.lookup(&TemplateKey::any_level("OGRE")).unwrap();
            assert_eq!(found.level, 2);
        }

        #[test]
        fn missing_template_reports_key() {
            let bestiary = Bestiary::new();
            let err = bestiary
                .lookup(&TemplateKey::parse("Unknown Class"))
                .unwrap_err();
            assert_eq!(err.key, TemplateKey::any_level("Unknown Class"));
            assert!(err.to_string().contains("Unknown Class"));
        }

        #[test]
        fn missing_level_is_not_found() {
            let mut bestiary = Bestiary::new();
            bestiary.insert(template("Fighter", 5));
            assert!(bestiary.lookup(&TemplateKey::new("Fighter", 6)).is_err());
        }

        #[test]
        fn insert_replaces_same_key() {
            let mut bestiary = Bestiary::new();
            assert!(bestiary.insert(template("Wolf", 1)).is_none());
            assert!(bestiary.insert(template("wolf", 1)).is_some());
            assert_eq!(bestiary.len(), 1);
        }

        #[test]
        fn lookups_share_the_same_template() {
            let mut bestiary = Bestiary::new();
            bestiary.insert(template("Wolf", 1));
            let a = bestiary.lookup(&"Wolf".into()).unwrap();
            let b = bestiary.lookup(&"Wolf".into()).unwrap();
            assert!(Arc::ptr_eq(&a, &b));
        }
    }
}
