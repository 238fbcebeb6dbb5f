//! Hearing ingestion — звуковые события → HeardSound + переход в Hunting

use bevy::prelude::*;

use crate::ai::{AlienConfig, AlienState, HeardSound, SoundEvent, SoundSnapshot};

/// Система: ingest звуковых событий
///
/// Каждый алиен слышит каждый SoundEvent громче min_loudness:
/// - копирует поля в свой HeardSound,
/// - переходит в Hunting из любого состояния кроме PrepareAttack/Attacking/Dead
///   (инвариант: звук не перенаправляет начатую атаку),
/// - уже в Hunting — только обновляет данные, без exit/enter цикла.
pub fn alien_hear_sounds(
    mut sounds: EventReader<SoundEvent>,
    mut aliens: Query<(Entity, &mut AlienState, &mut HeardSound, &AlienConfig)>,
) {
    for sound in sounds.read() {
        for (entity, mut state, mut heard, config) in aliens.iter_mut() {
            if sound.loudness < config.min_loudness {
                continue;
            }
            if state.is_committed() || matches!(*state, AlienState::Dead) {
                continue;
            }

            heard.sound = Some(SoundSnapshot {
                position: sound.position,
                velocity: sound.velocity,
                loudness: sound.loudness,
                quality: sound.quality,
            });

            if !matches!(*state, AlienState::Hunting) {
                crate::log(&format!(
                    "🔊 {:?} {} → Hunting (heard {:.2} at {:?})",
                    entity,
                    state.name(),
                    sound.loudness,
                    sound.position
                ));
                *state = AlienState::Hunting;
            }
            // Hunting re-enter: данные обновлены, destination подтянет
            // alien_movement_from_state на этом же тике
        }
    }
}
