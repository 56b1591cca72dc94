//! Display preferences.
//!
//! These are plain values: the application resolves them once at start-up
//! and hands them in, nothing in this crate reads the environment.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the operating system setting.
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Motion {
    #[default]
    Full,
    Reduced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Grid,
    List,
}

/// Resolved user preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: Theme,
    pub motion: Motion,
    pub layout: Layout,
}

fn invalid(name: &'static str, value: &str) -> DirectoryError {
    DirectoryError::InvalidPreference {
        name,
        value: value.to_string(),
    }
}

impl FromStr for Theme {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(invalid("theme", s)),
        }
    }
}

impl FromStr for Motion {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Motion::Full),
            "reduced" => Ok(Motion::Reduced),
            _ => Err(invalid("motion", s)),
        }
    }
}

impl FromStr for Layout {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(Layout::Grid),
            "list" => Ok(Layout::List),
            _ => Err(invalid("layout", s)),
        }
    }
}
