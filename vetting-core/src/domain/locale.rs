// vetting-core/src/domain/locale.rs

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Locale qualifier of a formset: language, country and variant, each
/// optional. The empty locale is the root (default) tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    language: Option<String>,
    country: Option<String>,
    variant: Option<String>,
}

impl Locale {
    pub fn new(language: &str, country: &str, variant: &str) -> Self {
        Self {
            language: non_empty(language).map(|s| s.to_lowercase()),
            country: non_empty(country).map(|s| s.to_uppercase()),
            variant: non_empty(variant).map(str::to_string),
        }
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.language.is_none() && self.country.is_none() && self.variant.is_none()
    }

    /// Key of the formset tier, e.g. `en_US_TEST1`. The root tier is `""`.
    pub fn key(&self) -> String {
        [&self.language, &self.country, &self.variant]
            .iter()
            .filter_map(|part| part.as_deref())
            .collect::<Vec<_>>()
            .join("_")
    }

    /// The next less specific tier: variant -> country -> language -> root.
    pub fn parent(&self) -> Option<Locale> {
        if self.variant.is_some() {
            Some(Self {
                variant: None,
                ..self.clone()
            })
        } else if self.country.is_some() {
            Some(Self {
                country: None,
                ..self.clone()
            })
        } else if self.language.is_some() {
            Some(Self::root())
        } else {
            None
        }
    }

    /// All tiers searched for this locale, most specific first, ending
    /// with the root tier.
    pub fn fallback_chain(&self) -> Vec<Locale> {
        let mut chain = vec![self.clone()];
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            chain.push(parent.clone());
            current = parent;
        }
        chain
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "default")
        } else {
            write!(f, "{}", self.key())
        }
    }
}

impl FromStr for Locale {
    type Err = std::convert::Infallible;

    /// Accepts `en`, `en_US`, `en-US`, `en_US_TEST1`. Empty or `default`
    /// yields the root tier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("default") {
            return Ok(Self::root());
        }
        let mut parts = s.splitn(3, ['_', '-']);
        let language = parts.next().unwrap_or_default();
        let country = parts.next().unwrap_or_default();
        let variant = parts.next().unwrap_or_default();
        Ok(Self::new(language, country, variant))
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .map(|s| s.parse().unwrap_or_default())
            .unwrap_or_default())
    }
}
