#[cfg(test)]
mod tests {
    use crate::commands::{SessionCommand, WorldSignal};
    use crate::constants::*;
    use crate::enums::*;
    use crate::events::ProgressionEvent;
    use crate::state::ProgressionSnapshot;
    use crate::types::{SimTime, StreamId, WaveId};

    #[test]
    fn test_field_categories() {
        let enemy: Vec<_> = UpgradeField::ALL
            .iter()
            .filter(|f| f.category() == UpgradeCategory::Enemy)
            .collect();
        assert_eq!(enemy.len(), 5);
        assert_eq!(UpgradeField::MoverSpeed.category(), UpgradeCategory::Mover);
        assert_eq!(UpgradeField::WeaponRate.category(), UpgradeCategory::Weapon);
        assert_eq!(UpgradeField::EnemyCount.category(), UpgradeCategory::Enemy);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..TICK_RATE {
            time.advance();
        }
        assert_eq!(time.tick, TICK_RATE as u64);
        assert!((time.elapsed_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sim_time_reached_absorbs_drift() {
        let mut time = SimTime::default();
        // 0.1s is three ticks at 30 Hz; accumulated dt lands just under 0.1.
        for _ in 0..3 {
            time.advance();
        }
        assert!(time.reached(0.1));
        assert!(!time.reached(0.2));
    }

    #[test]
    fn test_event_is_tagged() {
        let event = ProgressionEvent::WaveSpawned {
            level: 3,
            stream: Some(StreamId(1)),
            wave: WaveId(7),
            layer: 2,
            enemies: 12,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "WaveSpawned");
        assert_eq!(json["wave"], 7);
        assert_eq!(json["stream"], 1);
        let back: ProgressionEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_signal_from_json() {
        let signal: WorldSignal =
            serde_json::from_str(r#"{"type":"WaveDestroyed","wave":4}"#).unwrap();
        assert_eq!(signal, WorldSignal::WaveDestroyed { wave: WaveId(4) });
        let command: SessionCommand = serde_json::from_str(r#"{"type":"EndSession"}"#).unwrap();
        assert_eq!(command, SessionCommand::EndSession);
    }

    #[test]
    fn test_default_snapshot() {
        let snap = ProgressionSnapshot::default();
        assert_eq!(snap.phase, SessionPhase::Idle);
        assert_eq!(snap.mode, SchedulerMode::Infinite);
        assert!(snap.events.is_empty());
        let json = serde_json::to_string(&snap).unwrap();
        let back: ProgressionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
