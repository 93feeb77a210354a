use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a visual stimulus, e.g. the symbol drawn on screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StimulusId(pub String);

impl StimulusId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StimulusId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for StimulusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the three response options. Serialized as its number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Action {
    One = 1,
    Two = 2,
    Three = 3,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::One, Action::Two, Action::Three];

    pub fn number(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidAction(pub u8);

impl fmt::Display for InvalidAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action must be 1, 2 or 3, got {}", self.0)
    }
}

impl std::error::Error for InvalidAction {}

impl TryFrom<u8> for Action {
    type Error = InvalidAction;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Action::One),
            2 => Ok(Action::Two),
            3 => Ok(Action::Three),
            other => Err(InvalidAction(other)),
        }
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> u8 {
        action.number()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_map_to_their_numbers() {
        for (n, action) in (1u8..=3).zip(Action::ALL) {
            assert_eq!(Action::try_from(n), Ok(action));
            assert_eq!(action.number(), n);
        }
        assert_eq!(Action::try_from(0), Err(InvalidAction(0)));
        assert_eq!(Action::try_from(4), Err(InvalidAction(4)));
    }

    #[test]
    fn action_serializes_as_number() {
        let json = serde_json::to_string(&Action::Two).unwrap();
        assert_eq!(json, "2");
        assert!(serde_json::from_str::<Action>("7").is_err());
    }
}
