//! Input fusion
//!
//! Merges keyboard state and polled gamepad snapshots into one normalized
//! control signal per ship. The shell fills these plain-data snapshots once
//! per frame; nothing here touches the platform, so the fusion rules stay
//! testable on any target.

use crate::consts::STICK_DEAD_ZONE;

/// Standard-mapping button indices (browser Gamepad API layout)
pub const BUTTON_PRIMARY: usize = 0;
pub const BUTTON_LEFT_TRIGGER: usize = 6;
pub const BUTTON_RIGHT_TRIGGER: usize = 7;
pub const BUTTON_START: usize = 9;
pub const PAD_BUTTON_COUNT: usize = 17;

/// Left-stick axes
pub const AXIS_STICK_X: usize = 0;
pub const AXIS_STICK_Y: usize = 1;

/// One button of a polled controller
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PadButton {
    pub pressed: bool,
    /// Analog depth in [0, 1] where the hardware reports it
    pub value: f32,
}

/// Snapshot of one controller, taken at the top of a tick
///
/// A disconnected pad is all zeros and fuses to nothing, so device absence
/// degrades silently to keyboard-only control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadSnapshot {
    pub connected: bool,
    pub axes: [f32; 4],
    pub buttons: [PadButton; PAD_BUTTON_COUNT],
}

impl Default for PadSnapshot {
    fn default() -> Self {
        Self {
            connected: false,
            axes: [0.0; 4],
            buttons: [PadButton::default(); PAD_BUTTON_COUNT],
        }
    }
}

impl PadSnapshot {
    fn button(&self, index: usize) -> PadButton {
        self.buttons.get(index).copied().unwrap_or_default()
    }

    /// Left-stick horizontal with the dead zone applied; analog values past
    /// the dead zone pass through proportionally
    fn stick_rotate(&self) -> f32 {
        let raw = self.axes[AXIS_STICK_X];
        if raw.abs() > STICK_DEAD_ZONE { raw } else { 0.0 }
    }

    /// Stick pushed forward (up reports negative on the standard mapping)
    fn stick_thrust(&self) -> bool {
        self.axes[AXIS_STICK_Y] < -0.2
    }

    /// Trigger held, by digital press or analog depth
    fn trigger_held(&self, index: usize) -> bool {
        let b = self.button(index);
        b.pressed || b.value > 0.1
    }
}

/// Held keyboard flags; the shell keeps these current from key events.
/// The keyboard always drives ship 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeyboardState {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust: bool,
    pub fire: bool,
}

impl KeyboardState {
    /// Discrete keys folded to a -1/0/+1 rotation axis
    fn rotate_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.rotate_left {
            axis -= 1.0;
        }
        if self.rotate_right {
            axis += 1.0;
        }
        axis
    }
}

/// Frame-local control signal for one ship
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShipControls {
    /// Keyboard axis and analog stick combined additively
    pub rotate: f32,
    pub thrust: bool,
    /// Level state of the fire binding; the tick applies cooldown gating
    /// (single-ship) or edge-triggering (dual-ship) on top
    pub fire_held: bool,
}

/// Everything the simulation reads from the devices for one tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub keyboard: KeyboardState,
    /// Pad `i` drives ship `i`
    pub pads: [PadSnapshot; 2],
    /// One-shot pause request from the keyboard (set by the shell on keydown)
    pub pause_key: bool,
}

/// Fuse device state into the control signal for one ship.
///
/// Bindings differ by mode:
/// - single ship: thrust on keys or stick-forward; fire on key, primary
///   button, or right trigger (level-triggered, gated by cooldown)
/// - dual ship: thrust on the left trigger; fire on the right trigger,
///   edge-triggered by the caller via the per-ship was-held flag
pub fn fuse(input: &TickInput, ship: usize, multiplayer: bool) -> ShipControls {
    let keyboard = if ship == 0 { input.keyboard } else { KeyboardState::default() };
    let pad = input.pads.get(ship).copied().unwrap_or_default();

    let mut rotate = keyboard.rotate_axis();
    if pad.connected {
        rotate += pad.stick_rotate();
    }

    let (thrust, fire_held) = if multiplayer {
        let pad_thrust = pad.connected && pad.trigger_held(BUTTON_LEFT_TRIGGER);
        let pad_fire = pad.connected && pad.button(BUTTON_RIGHT_TRIGGER).pressed;
        (keyboard.thrust || pad_thrust, keyboard.fire || pad_fire)
    } else {
        let pad_thrust = pad.connected && pad.stick_thrust();
        let pad_fire = pad.connected
            && (pad.button(BUTTON_PRIMARY).pressed || pad.button(BUTTON_RIGHT_TRIGGER).pressed);
        (keyboard.thrust || pad_thrust, keyboard.fire || pad_fire)
    };

    ShipControls { rotate, thrust, fire_held }
}

/// Level state of the pause binding across all sources; the tick debounces it
pub fn pause_requested(input: &TickInput) -> bool {
    input.pause_key
        || input
            .pads
            .iter()
            .any(|p| p.connected && p.button(BUTTON_START).pressed)
}
