// Control-surface state: values that exist both as a software setting
// and as a physical control on the device.

use wanview_api::{BrightnessStatus, DisplayPowerStatus};

/// Display brightness: software-effective level plus the physical pot
/// position (0–15 each).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessLevels {
    pub effective: u8,
    pub pot: u8,
}

impl BrightnessLevels {
    pub const MAX: u8 = 15;

    /// True when software has overridden the physical pot (or vice
    /// versa) and the two positions diverge.
    pub fn is_override(self) -> bool {
        self.effective != self.pot
    }

    /// The state after a local adjustment, before server confirmation.
    /// The pot position is physical and unaffected.
    pub fn with_effective(self, effective: u8) -> Self {
        Self {
            effective: effective.min(Self::MAX),
            pot: self.pot,
        }
    }
}

impl From<BrightnessStatus> for BrightnessLevels {
    fn from(wire: BrightnessStatus) -> Self {
        Self {
            effective: wire.brightness.min(Self::MAX),
            pot: wire.pot_level.min(Self::MAX),
        }
    }
}

/// Display power: effective on/off plus the physical switch position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPower {
    pub on: bool,
    pub switch_position: bool,
}

impl DisplayPower {
    pub fn is_override(self) -> bool {
        self.on != self.switch_position
    }

    pub fn with_on(self, on: bool) -> Self {
        Self {
            on,
            switch_position: self.switch_position,
        }
    }
}

impl From<DisplayPowerStatus> for DisplayPower {
    fn from(wire: DisplayPowerStatus) -> Self {
        Self {
            on: wire.on,
            switch_position: wire.switch_position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_override_detection() {
        let synced = BrightnessLevels { effective: 8, pot: 8 };
        assert!(!synced.is_override());

        let overridden = synced.with_effective(12);
        assert!(overridden.is_override());
        assert_eq!(overridden.pot, 8);
    }

    #[test]
    fn brightness_clamps_to_hardware_range() {
        let levels = BrightnessLevels { effective: 0, pot: 0 }.with_effective(200);
        assert_eq!(levels.effective, 15);

        let from_wire = BrightnessLevels::from(BrightnessStatus {
            brightness: 99,
            pot_level: 3,
        });
        assert_eq!(from_wire.effective, 15);
        assert_eq!(from_wire.pot, 3);
    }

    #[test]
    fn power_override_detection() {
        let state = DisplayPower {
            on: true,
            switch_position: true,
        };
        assert!(!state.is_override());
        assert!(state.with_on(false).is_override());
    }
}
