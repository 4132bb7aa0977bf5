use crate::consts;
use crate::game::{Density, GameMode, GridSize, Rules, Speed};
use crate::theme::Theme;
use enum_dispatch::enum_dispatch;
use enum_map::Enum;
use std::fmt;

/// Everything the player can adjust while the game is running
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Settings {
    pub(crate) grid_size: GridSize,
    pub(crate) speed: Speed,
    pub(crate) obstacle_density: Density,
    pub(crate) mode: GameMode,
    pub(crate) sound: bool,
    pub(crate) haptic: bool,
    pub(crate) show_grid: bool,
    pub(crate) theme: Theme,
}

impl Settings {
    /// The subset of the settings that the game itself cares about
    pub(crate) fn rules(&self) -> Rules {
        Rules {
            mode: self.mode,
            grid_size: self.grid_size,
            obstacle_density: self.obstacle_density,
            speed: self.speed,
        }
    }

    pub(crate) fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::GridSize => self.grid_size.into(),
            SettingKey::Speed => self.speed.into(),
            SettingKey::Obstacles => self.obstacle_density.into(),
            SettingKey::Mode => self.mode.into(),
            SettingKey::Sound => self.sound.into(),
            SettingKey::Haptic => self.haptic.into(),
            SettingKey::GridLines => self.show_grid.into(),
        }
    }

    pub(crate) fn adjust(&mut self, key: SettingKey, adjustment: Adjustment) {
        match key {
            SettingKey::GridSize => adjustment.apply(&mut self.grid_size),
            SettingKey::Speed => adjustment.apply(&mut self.speed),
            SettingKey::Obstacles => adjustment.apply(&mut self.obstacle_density),
            SettingKey::Mode => adjustment.apply(&mut self.mode),
            SettingKey::Sound => adjustment.apply(&mut self.sound),
            SettingKey::Haptic => adjustment.apply(&mut self.haptic),
            SettingKey::GridLines => adjustment.apply(&mut self.show_grid),
        }
    }
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            grid_size: GridSize::default(),
            speed: Speed::default(),
            obstacle_density: Density::default(),
            mode: GameMode::default(),
            sound: true,
            haptic: true,
            show_grid: true,
            theme: Theme::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Enum, Eq, PartialEq)]
pub(crate) enum SettingKey {
    #[default]
    GridSize,
    Speed,
    Obstacles,
    Mode,
    Sound,
    Haptic,
    GridLines,
}

impl SettingKey {
    pub(crate) const DISPLAY_WIDTH: u16 = 10;

    pub(crate) fn iter() -> impl Iterator<Item = SettingKey> {
        (0..Self::LENGTH).map(Self::from_usize)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            SettingKey::GridSize => "Grid Size",
            SettingKey::Speed => "Speed",
            SettingKey::Obstacles => "Obstacles",
            SettingKey::Mode => "Mode",
            SettingKey::Sound => "Sound",
            SettingKey::Haptic => "Haptic",
            SettingKey::GridLines => "Grid Lines",
        }
    }

    /// The following key, looping around after the last
    pub(crate) fn next(self) -> SettingKey {
        Self::from_usize((self.into_usize() + 1) % Self::LENGTH)
    }

    /// The preceding key, looping around before the first
    pub(crate) fn prev(self) -> SettingKey {
        Self::from_usize((self.into_usize() + Self::LENGTH - 1) % Self::LENGTH)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Adjustment {
    Increase,
    Decrease,
    Toggle,
}

impl Adjustment {
    fn apply<A: Adjustable>(self, target: &mut A) {
        match self {
            Adjustment::Increase => target.increase(),
            Adjustment::Decrease => target.decrease(),
            Adjustment::Toggle => target.toggle(),
        }
    }
}

#[enum_dispatch]
pub(crate) trait Adjustable {
    fn increase(&mut self);
    fn decrease(&mut self);
    fn toggle(&mut self);
    fn can_increase(&self) -> bool;
    fn can_decrease(&self) -> bool;
}

#[enum_dispatch(Adjustable)] // This also gives us From and TryInto
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SettingValue {
    Bool(bool),
    GridSize,
    Speed,
    Density,
    GameMode,
}

impl SettingValue {
    pub(crate) const DISPLAY_WIDTH: u16 = 12;
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let left = if self.can_decrease() { '◀' } else { '◁' };
        let right = if self.can_increase() { '▶' } else { '▷' };
        match *self {
            SettingValue::Bool(false) => write!(f, "{:^12}", "[ ]"),
            SettingValue::Bool(true) => write!(f, "{:^12}", "[✓]"),
            SettingValue::GridSize(size) => write!(f, "{left}{size:^10}{right}"),
            SettingValue::Speed(speed) => write!(f, "{left}{speed:^10}{right}"),
            SettingValue::Density(density) => write!(f, "{left}{density:^10}{right}"),
            SettingValue::GameMode(mode) => write!(f, "{left}{mode:^10}{right}"),
        }
    }
}

impl Adjustable for bool {
    fn increase(&mut self) {
        *self = true;
    }

    fn decrease(&mut self) {
        *self = false;
    }

    fn toggle(&mut self) {
        *self = !*self;
    }

    fn can_increase(&self) -> bool {
        !*self
    }

    fn can_decrease(&self) -> bool {
        *self
    }
}

impl Adjustable for GridSize {
    fn increase(&mut self) {
        *self = GridSize::clamped(self.get().saturating_add(1));
    }

    fn decrease(&mut self) {
        *self = GridSize::clamped(self.get().saturating_sub(1));
    }

    fn toggle(&mut self) {}

    fn can_increase(&self) -> bool {
        *self < GridSize::MAXIMUM
    }

    fn can_decrease(&self) -> bool {
        *self > GridSize::MINIMUM
    }
}

impl Adjustable for Speed {
    fn increase(&mut self) {
        *self = self.faster();
    }

    fn decrease(&mut self) {
        *self = self.slower();
    }

    fn toggle(&mut self) {}

    fn can_increase(&self) -> bool {
        *self < Speed::MAXIMUM
    }

    fn can_decrease(&self) -> bool {
        *self > Speed::MINIMUM
    }
}

impl Adjustable for Density {
    fn increase(&mut self) {
        *self = Density::clamped(self.get().saturating_add(consts::DENSITY_STEP));
    }

    fn decrease(&mut self) {
        *self = Density::clamped(self.get().saturating_sub(consts::DENSITY_STEP));
    }

    fn toggle(&mut self) {}

    fn can_increase(&self) -> bool {
        *self < Density::MAXIMUM
    }

    fn can_decrease(&self) -> bool {
        *self > Density::MINIMUM
    }
}

/// Modes form a loop, so there is always somewhere to go
impl Adjustable for GameMode {
    fn increase(&mut self) {
        *self = self.cycle();
    }

    fn decrease(&mut self) {
        *self = self.cycle_back();
    }

    fn toggle(&mut self) {
        *self = self.cycle();
    }

    fn can_increase(&self) -> bool {
        true
    }

    fn can_decrease(&self) -> bool {
        true
    }
}
