//! Базовые ECS компоненты для симуляции
//!
//! Архитектура: Required Components (Bevy 0.16)
//! - Actor требует Health автоматически
//! - Все компоненты table storage для детерминизма

use bevy::prelude::*;

/// Актор (алиен, выживший, игрок) — базовый компонент для живых существ
///
/// Автоматически добавляет Health через Required Components.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(Health)]
pub struct Actor {
    /// Stable ID фракции (алиен vs выжившие)
    pub faction_id: u64,
}

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max.
/// Источники урона вне этого core (engine bridge, скрипты уровня) —
/// симуляция только наблюдает переход в 0 как сигнал смерти.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = (self.current + amount).min(self.max);
    }
}
