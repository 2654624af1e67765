#[cfg(test)]
mod tests {
    use barrage_core::enums::{StreamState, UpgradeCategory, UpgradeField};
    use barrage_core::types::StreamId;

    use crate::clear::LevelClearDetector;
    use crate::plan::LevelPlan;
    use crate::stream::{compact, Stream, StreamConfig, StreamSlot, WaveTemplate};
    use crate::upgrade::UpgradeFormula;
    use crate::upgrade_set::StreamUpgradeSet;

    fn make_stream(id: u32, start: i32, end: i32, period: i32) -> Stream {
        Stream::new(
            StreamId(id),
            StreamConfig {
                name: format!("s{id}"),
                wave_templates: vec![WaveTemplate::new("grunt", 0, 1.0)],
                start_level: start,
                end_level: end,
                period,
                ..Default::default()
            },
        )
    }

    /// Run a stream across levels the way the scheduler does, consuming a
    /// use on every GoAhead.
    fn drive(stream: &mut Stream, levels: std::ops::RangeInclusive<i32>) -> Vec<(i32, StreamState)> {
        let mut trace = Vec::new();
        for level in levels {
            let state = stream.evaluate(level);
            if state == StreamState::GoAhead {
                stream.consume_use(level);
                stream.advance();
            }
            trace.push((level, state));
        }
        trace
    }

    // ---- Stream state machine ----

    #[test]
    fn test_bounded_stream_exhausts_after_four_uses() {
        let mut stream = make_stream(0, 2, 8, 2);
        assert_eq!(stream.uses(), 4);
        assert!(!stream.is_unbounded());

        let trace = drive(&mut stream, 1..=20);
        let go: Vec<i32> = trace
            .iter()
            .filter(|(_, s)| *s == StreamState::GoAhead)
            .map(|(l, _)| *l)
            .collect();
        assert_eq!(go, vec![2, 4, 6, 8]);

        for (level, state) in &trace {
            if *level > 8 {
                assert_eq!(*state, StreamState::NoMore, "level {level}");
            } else if *level % 2 == 1 {
                assert_eq!(*state, StreamState::NotYet, "level {level}");
            }
        }
        assert_eq!(stream.remaining_uses(), 0);
        assert_eq!(stream.upgrades().spawn_count(), 4);
    }

    #[test]
    fn test_unbounded_stream_recurs_forever() {
        let mut stream = make_stream(0, 3, 0, 5);
        assert!(stream.is_unbounded());

        let trace = drive(&mut stream, 1..=60);
        for (level, state) in trace {
            let expected = if level >= 3 && (level - 3) % 5 == 0 {
                StreamState::GoAhead
            } else {
                StreamState::NotYet
            };
            assert_eq!(state, expected, "level {level}");
        }
        // 3, 8, ..., 58
        assert_eq!(stream.upgrades().spawn_count(), 12);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let stream = make_stream(0, 2, 8, 2);
        for level in 0..12 {
            let first = stream.evaluate(level);
            assert_eq!(stream.evaluate(level), first);
            assert_eq!(stream.evaluate(level), first);
        }
    }

    #[test]
    fn test_period_clamped_to_one() {
        let stream = make_stream(0, 1, 3, 0);
        assert_eq!(stream.period(), 1);
        assert_eq!(stream.uses(), 3);

        let negative = make_stream(1, 1, 3, -4);
        assert_eq!(negative.period(), 1);
    }

    #[test]
    fn test_stream_ending_before_start_never_spawns() {
        let stream = make_stream(0, 5, 3, 1);
        assert_eq!(stream.uses(), 0);
        assert_eq!(stream.evaluate(5), StreamState::NoMore);
        assert_eq!(stream.evaluate(1), StreamState::NoMore);
    }

    #[test]
    fn test_single_use_stream() {
        let mut stream = make_stream(0, 1, 1, 1);
        assert_eq!(stream.uses(), 1);
        assert_eq!(stream.evaluate(1), StreamState::GoAhead);
        stream.consume_use(1);
        assert_eq!(stream.remaining_uses(), 0);
        assert_eq!(stream.evaluate(2), StreamState::NoMore);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "consumed twice"))]
    fn test_double_consume_is_rejected() {
        let mut stream = make_stream(0, 1, 5, 1);
        stream.consume_use(1);
        stream.consume_use(1);
        // Release builds ignore the second call.
        assert_eq!(stream.remaining_uses(), 4);
    }

    #[test]
    fn test_fast_forward_spends_missed_uses() {
        let mut stream = make_stream(0, 2, 8, 2);
        stream.fast_forward(5);
        // Levels 2 and 4 were skipped over.
        assert_eq!(stream.remaining_uses(), 2);
        assert_eq!(stream.upgrades().spawn_count(), 2);
        assert_eq!(stream.evaluate(6), StreamState::GoAhead);

        let mut unbounded = make_stream(1, 3, 0, 5);
        unbounded.fast_forward(14);
        assert_eq!(unbounded.upgrades().spawn_count(), 3);
        assert_eq!(unbounded.evaluate(18), StreamState::GoAhead);
    }

    // ---- Slots and compaction ----

    #[test]
    fn test_compact_drops_tombstones_and_keeps_order() {
        let mut slots: Vec<StreamSlot> = (0..5)
            .map(|i| StreamSlot::Active(make_stream(i, 1, 4, 1)))
            .collect();
        slots[0].tombstone();
        slots[3].tombstone();
        slots[3].tombstone();

        let removed = compact(&mut slots);
        assert_eq!(removed, 2);
        let ids: Vec<u32> = slots.iter().map(|s| s.id().0).collect();
        assert_eq!(ids, vec![1, 2, 4]);
        assert!(slots.iter().all(StreamSlot::is_active));
    }

    #[test]
    fn test_plan_marks_highest_go_ahead_last() {
        let slots = vec![
            StreamSlot::Active(make_stream(0, 1, 5, 1)),
            StreamSlot::Active(make_stream(1, 2, 5, 1)),
            StreamSlot::Active(make_stream(2, 1, 5, 1)),
            StreamSlot::Tombstoned { id: StreamId(3) },
            StreamSlot::Active(make_stream(4, 3, 5, 1)),
        ];
        let plan = LevelPlan::build(1, &slots);
        assert_eq!(plan.go_ahead_count(), 2);
        assert!(plan.is_last_active_stream(2));
        assert!(!plan.is_last_active_stream(0));
        assert!(!plan.is_last_active_stream(4));
        assert_eq!(plan.state(1), Some(StreamState::NotYet));
        assert_eq!(plan.state(3), None);

        let empty = LevelPlan::build(1, &[]);
        assert!(empty.is_empty());
        assert!(!empty.is_last_active_stream(0));
    }

    // ---- Level clear ----

    #[test]
    fn test_clear_waves_then_agents() {
        let mut detector = LevelClearDetector::new();
        assert!(!detector.subscribe());
        assert!(!detector.on_waves_empty());
        assert!(detector.on_agents_empty());
        assert!(detector.is_level_clear());
    }

    #[test]
    fn test_clear_agents_then_waves() {
        let mut detector = LevelClearDetector::new();
        assert!(!detector.subscribe());
        assert!(!detector.on_agents_empty());
        assert!(detector.on_waves_empty());
        assert!(detector.has_fired());
    }

    #[test]
    fn test_repeated_agents_signal_never_completes() {
        let mut detector = LevelClearDetector::new();
        detector.subscribe();
        assert!(!detector.on_agents_empty());
        assert!(!detector.on_agents_empty());
        assert!(!detector.is_level_clear());
    }

    #[test]
    fn test_clear_fires_once() {
        let mut detector = LevelClearDetector::new();
        detector.subscribe();
        detector.on_agents_empty();
        assert!(detector.on_waves_empty());
        assert!(!detector.on_waves_empty());
        assert!(!detector.on_agents_empty());
    }

    #[test]
    fn test_clear_ignores_unsubscribed_signals() {
        let mut detector = LevelClearDetector::new();
        assert!(!detector.on_waves_empty());
        assert!(!detector.on_agents_empty());
        assert!(!detector.waves_clear());
        detector.subscribe();
        detector.unsubscribe();
        detector.unsubscribe();
        assert!(!detector.on_agents_empty());
        assert!(!detector.agents_clear());
    }

    #[test]
    fn test_primed_detector_completes_on_subscribe() {
        let mut detector = LevelClearDetector::new();
        detector.prime(true, true);
        assert!(detector.subscribe());

        detector.reset();
        assert!(!detector.is_level_clear());
        detector.prime(true, false);
        assert!(!detector.subscribe());
        assert!(detector.on_agents_empty());
    }

    // ---- Upgrade set ----

    #[test]
    fn test_disabled_category_returns_base() {
        let mut set = StreamUpgradeSet::default()
            .with(UpgradeField::Health, UpgradeFormula::new(10.0, 50.0))
            .with(UpgradeField::MoverSpeed, UpgradeFormula::new(1.0, 0.0));
        set.upgrade_mover = false;
        set.advance();
        set.advance();

        assert!(set.category_enabled(UpgradeCategory::Enemy));
        // 100 + 2 * (50 + 10)
        assert_eq!(set.get(UpgradeField::Health, 100.0), 220.0);
        assert_eq!(set.get(UpgradeField::MoverSpeed, 4.0), 4.0);
        assert_eq!(set.get(UpgradeField::WeaponDamage, 9.0), 9.0);
    }

    #[test]
    fn test_enemy_count_truncates() {
        let mut set = StreamUpgradeSet::default()
            .with(UpgradeField::EnemyCount, UpgradeFormula::new(0.5, 0.0));
        assert_eq!(set.get_count(UpgradeField::EnemyCount, 4), 4);
        set.advance();
        assert_eq!(set.get_count(UpgradeField::EnemyCount, 4), 4);
        set.advance();
        assert_eq!(set.get_count(UpgradeField::EnemyCount, 4), 5);
        assert_eq!(set.get_int(UpgradeField::EnemyCount, -4), -3);
    }

    #[test]
    fn test_stream_config_from_json() {
        let json = r#"{
            "name": "swarm",
            "wave_templates": [{ "source": "drone", "layer": 2, "delay_secs": 1.5 }],
            "start_level": 2,
            "end_level": 8,
            "period": 2,
            "upgrades": {
                "enemy": { "health": { "additive": 5.0, "percentage": 400.0 } },
                "upgrade_enemy": true
            }
        }"#;
        let config: StreamConfig = serde_json::from_str(json).unwrap();
        let stream = Stream::new(StreamId(9), config);
        assert_eq!(stream.name(), "swarm");
        assert_eq!(stream.uses(), 4);
        assert_eq!(stream.wave_templates()[0].layer, 2);
        assert_eq!(stream.upgrades().enemy.health.percentage, 100.0);
        assert_eq!(stream.upgrades().enemy.health.additive, 5.0);
        assert!(!stream.upgrades().upgrade_weapon);
    }

    #[test]
    fn test_template_delay_never_negative() {
        assert_eq!(WaveTemplate::new("a", 0, -3.0).delay(), 0.0);
        assert_eq!(WaveTemplate::new("a", 0, f64::NAN).delay(), 0.0);
        assert_eq!(WaveTemplate::new("a", 0, 2.5).delay(), 2.5);
        assert!(WaveTemplate::new("  ", 0, 1.0).is_empty());
    }
}
