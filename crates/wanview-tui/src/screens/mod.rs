//! Screen implementations. Each screen is a top-level Component.

pub mod controls;
pub mod dashboard;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create screen components for the tab bar.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Dashboard,
            Box::new(dashboard::DashboardScreen::new()),
        ),
        (
            ScreenId::Controls,
            Box::new(controls::ControlsScreen::new()),
        ),
    ]
}
