//! Named input bindings the camera responds to.

/// Continuous inputs, fed every frame with the current axis value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAxis {
    TranslateForward,
    TranslateRight,
    TranslateUp,
    Roll,
    Pitch,
    Yaw,
    Throttle,
}

impl InputAxis {
    pub const ALL: [InputAxis; 7] = [
        InputAxis::TranslateForward,
        InputAxis::TranslateRight,
        InputAxis::TranslateUp,
        InputAxis::Roll,
        InputAxis::Pitch,
        InputAxis::Yaw,
        InputAxis::Throttle,
    ];

    /// Name used in input binding tables.
    pub fn binding_name(self) -> &'static str {
        match self {
            InputAxis::TranslateForward => "OPTranslateForward",
            InputAxis::TranslateRight => "OPTranslateRight",
            InputAxis::TranslateUp => "OPTranslateUp",
            InputAxis::Roll => "OPRoll",
            InputAxis::Pitch => "OPPitch",
            InputAxis::Yaw => "OPYaw",
            InputAxis::Throttle => "OPThrottle",
        }
    }

    pub fn from_binding_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|axis| axis.binding_name() == name)
    }
}

/// Discrete press/release inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Held to lock the cursor and enable mouse look.
    CamLock,
}

impl InputAction {
    pub fn binding_name(self) -> &'static str {
        match self {
            InputAction::CamLock => "OPCamLock",
        }
    }

    pub fn from_binding_name(name: &str) -> Option<Self> {
        (name == "OPCamLock").then_some(InputAction::CamLock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_names_resolve_back() {
        for axis in InputAxis::ALL {
            assert_eq!(InputAxis::from_binding_name(axis.binding_name()), Some(axis));
        }
        assert_eq!(InputAxis::from_binding_name("OPJump"), None);
        assert_eq!(
            InputAction::from_binding_name("OPCamLock"),
            Some(InputAction::CamLock)
        );
    }
}
