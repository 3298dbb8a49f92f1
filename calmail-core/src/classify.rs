//! Message classification.
//!
//! Which reconciler entry point runs for a message is decided here, from its
//! subject line. The keywords are supplied by the caller (see
//! [`crate::config::KeywordsConfig`]) so nothing locale-specific is baked in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What a calendar message asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Create => write!(f, "create"),
            Intent::Update => write!(f, "update"),
            Intent::Delete => write!(f, "delete"),
        }
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Intent::Create),
            "update" => Ok(Intent::Update),
            "delete" | "cancel" => Ok(Intent::Delete),
            other => Err(format!("unknown intent '{}' (expected create, update or delete)", other)),
        }
    }
}

pub trait Classifier {
    /// `None` means the message is not a calendar message we act on.
    fn classify(&self, subject: &str) -> Option<Intent>;
}

impl<F> Classifier for F
where
    F: Fn(&str) -> Option<Intent>,
{
    fn classify(&self, subject: &str) -> Option<Intent> {
        self(subject)
    }
}

/// Case-insensitive substring matching on the subject.
///
/// Delete keywords are checked first, then update, then create, so an
/// "Updated invitation" is not mistaken for a plain invitation.
#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier {
    create: Vec<String>,
    update: Vec<String>,
    delete: Vec<String>,
}

impl KeywordClassifier {
    pub fn new(create: &[String], update: &[String], delete: &[String]) -> Self {
        let lower = |words: &[String]| -> Vec<String> {
            words
                .iter()
                .map(|w| w.to_lowercase())
                .filter(|w| !w.is_empty())
                .collect()
        };

        KeywordClassifier {
            create: lower(create),
            update: lower(update),
            delete: lower(delete),
        }
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, subject: &str) -> Option<Intent> {
        let subject = subject.to_lowercase();
        let hit = |words: &[String]| words.iter().any(|w| subject.contains(w.as_str()));

        if hit(&self.delete) {
            Some(Intent::Delete)
        } else if hit(&self.update) {
            Some(Intent::Update)
        } else if hit(&self.create) {
            Some(Intent::Create)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn classifier() -> KeywordClassifier {
        KeywordClassifier::new(
            &words(&["Invitation:"]),
            &words(&["Updated invitation"]),
            &words(&["Canceled", "Cancelled"]),
        )
    }

    #[test]
    fn test_keyword_priority() {
        let c = classifier();

        assert_eq!(c.classify("Invitation: Standup @ Mon"), Some(Intent::Create));
        assert_eq!(c.classify("Updated invitation: Standup"), Some(Intent::Update));
        assert_eq!(
            c.classify("Canceled event: Invitation: Standup"),
            Some(Intent::Delete)
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classifier().classify("CANCELLED: standup"), Some(Intent::Delete));
    }

    #[test]
    fn test_unrelated_subject() {
        assert_eq!(classifier().classify("Lunch tomorrow?"), None);
    }

    #[test]
    fn test_empty_keywords_never_match() {
        let c = KeywordClassifier::new(&words(&[""]), &[], &[]);
        assert_eq!(c.classify("anything"), None);
    }

    #[test]
    fn test_closure_classifier() {
        let always_delete = |_: &str| Some(Intent::Delete);
        assert_eq!(always_delete.classify("x"), Some(Intent::Delete));
    }

    #[test]
    fn test_intent_from_str() {
        assert_eq!("Create".parse::<Intent>(), Ok(Intent::Create));
        assert_eq!("cancel".parse::<Intent>(), Ok(Intent::Delete));
        assert!("patch".parse::<Intent>().is_err());
    }
}
