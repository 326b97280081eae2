//! Mobile vs desktop classification
//!
//! A heuristic, not a capability probe: narrow viewports and a handful of
//! user-agent markers count as mobile. Some tablets will be misclassified.

use crate::config::{EmissionProfile, ViewportConfig};

/// Device tier used to pick an emission profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Desktop,
    Mobile,
}

impl DeviceClass {
    /// Pick the matching profile from a desktop/mobile pair
    pub fn select(self, desktop: EmissionProfile, mobile: EmissionProfile) -> EmissionProfile {
        match self {
            DeviceClass::Desktop => desktop,
            DeviceClass::Mobile => mobile,
        }
    }
}

/// What the caller knows about the display at mount time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub user_agent: Option<String>,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            user_agent: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Classify using the configured breakpoint and markers
    pub fn classify(&self, config: &ViewportConfig) -> DeviceClass {
        if self.width < config.mobile_breakpoint {
            return DeviceClass::Mobile;
        }
        let mobile_agent = self.user_agent.as_deref().is_some_and(|ua| {
            config
                .mobile_markers
                .iter()
                .any(|marker| !marker.is_empty() && ua.contains(marker.as_str()))
        });
        if mobile_agent {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}
