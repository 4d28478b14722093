// src/server/policy.rs

use std::{collections::BTreeSet, fmt};

/// Decides which category names may be used as a tab selector.
#[derive(Debug, Clone, Default)]
pub struct CategoryPolicy {
    allowed: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryRejection {
    Blank,
    /// Carries a character that means something in A1 notation.
    RangeSyntax(char),
    NotListed(String),
}

impl fmt::Display for CategoryRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => f.write_str("category name is blank"),
            Self::RangeSyntax(c) => write!(f, "category name contains {:?}", c),
            Self::NotListed(name) => write!(f, "category {:?} is not configured", name),
        }
    }
}

impl std::error::Error for CategoryRejection {}

impl CategoryPolicy {
    /// An empty list only applies the syntactic checks.
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn check(&self, name: &str) -> Result<(), CategoryRejection> {
        if name.trim().is_empty() {
            return Err(CategoryRejection::Blank);
        }
        if let Some(c) = name
            .chars()
            .find(|c| matches!(c, '!' | ':') || c.is_control())
        {
            return Err(CategoryRejection::RangeSyntax(c));
        }
        if !self.allowed.is_empty() && !self.allowed.contains(name) {
            return Err(CategoryRejection::NotListed(name.to_owned()));
        }
        Ok(())
    }
}
