//! Even bill splitting between the user and a list of friends.

use std::fmt;

use crate::CoreError;

/// Name used for the person running the application.
pub const CURRENT_USER: &str = "Me";

/// The people a bill is shared with. The current user is always included.
#[derive(Debug, Clone, Default)]
pub struct SplitPlan {
    friends: Vec<String>,
}

impl SplitPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_friends<I, S>(friends: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut plan = Self::new();
        for friend in friends {
            plan.add_friend(friend);
        }
        plan
    }

    /// Adds a friend unless the name is blank or already present.
    pub fn add_friend(&mut self, name: impl Into<String>) -> bool {
        let name = name.into().trim().to_string();
        if name.is_empty() || name == CURRENT_USER || self.friends.contains(&name) {
            return false;
        }
        self.friends.push(name);
        true
    }

    pub fn remove_friend(&mut self, name: &str) -> bool {
        let before = self.friends.len();
        self.friends.retain(|friend| friend != name);
        self.friends.len() != before
    }

    pub fn friends(&self) -> &[String] {
        &self.friends
    }

    pub fn participants(&self) -> Vec<&str> {
        std::iter::once(CURRENT_USER)
            .chain(self.friends.iter().map(String::as_str))
            .collect()
    }

    pub fn split(&self, total: f64, payer: &str) -> Result<SplitResult, CoreError> {
        if !total.is_finite() || total < 0.0 {
            return Err(CoreError::Validation(
                "bill amount must be a non-negative number".into(),
            ));
        }
        let participants = self.participants();
        if !participants.contains(&payer) {
            return Err(CoreError::NotFound(format!("participant `{payer}`")));
        }
        let share = total / participants.len() as f64;
        let lines = participants
            .iter()
            .map(|person| {
                let settlement = if *person == payer {
                    Settlement::Pays {
                        total,
                        gets_back: total - share,
                    }
                } else {
                    Settlement::Owes {
                        to: payer.to_string(),
                        amount: share,
                    }
                };
                SplitLine {
                    person: person.to_string(),
                    settlement,
                }
            })
            .collect();
        Ok(SplitResult {
            total,
            share,
            lines,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitResult {
    pub total: f64,
    pub share: f64,
    pub lines: Vec<SplitLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitLine {
    pub person: String,
    pub settlement: Settlement,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    Pays { total: f64, gets_back: f64 },
    Owes { to: String, amount: f64 },
}

impl fmt::Display for SplitLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.settlement {
            Settlement::Pays { total, gets_back } => write!(
                f,
                "{} pays total ${:.2} (gets back ${:.2})",
                self.person, total, gets_back
            ),
            Settlement::Owes { to, amount } => {
                write!(f, "{} owes {} ${:.2}", self.person, to, amount)
            }
        }
    }
}
