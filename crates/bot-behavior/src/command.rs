use bot_mobility::MoveCommand;

/// Trigger and reload requests for one tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponCommand {
    pub fire:   bool,
    pub reload: bool,
}

/// Everything a bot asks of its body this tick.  The host applies it.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BotCommand {
    pub movement: MoveCommand,
    pub weapon:   WeaponCommand,
}

impl BotCommand {
    /// Stand still, hold fire.
    pub fn idle() -> Self {
        Self { movement: MoveCommand::stop(), weapon: WeaponCommand::default() }
    }
}

impl Default for BotCommand {
    fn default() -> Self {
        Self::idle()
    }
}
