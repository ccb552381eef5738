use super::*;
use crate::reveal::{RevealController, RevealThreshold};

fn section_with(children: usize, base_ms: u64, stagger_ms: u64) -> Section {
    let config = StaggerConfig::new(
        Duration::from_millis(base_ms),
        Duration::from_millis(stagger_ms),
    )
    .expect("config");
    let mut section = Section::new(SectionId::new("skills"), config);
    for index in 0..children {
        section.push_child(format!("card-{index}"));
    }
    section
}

#[test]
fn delay_is_base_plus_order_times_stagger() {
    let section = section_with(6, 200, 50);
    let schedule = StaggeredSequencer.schedule(&section);

    assert_eq!(schedule.len(), 6);
    for (k, slot) in schedule.iter().enumerate() {
        assert_eq!(slot.order, k);
        assert_eq!(
            slot.delay,
            Duration::from_millis(200) + Duration::from_millis(50) * k as u32
        );
        assert_eq!(
            section.children[k].reveal_delay(&section.stagger),
            slot.delay
        );
    }
}

#[test]
fn schedule_is_deterministic() {
    let section = section_with(4, 600, 100);
    let first = StaggeredSequencer.schedule(&section);
    let second = StaggeredSequencer.schedule(&section);
    assert_eq!(first, second);
}

#[test]
fn zero_stagger_is_rejected() {
    assert_eq!(
        StaggerConfig::new(Duration::from_millis(10), Duration::ZERO),
        Err(StaggerError)
    );
}

#[test]
fn visible_card_delays_follow_index() {
    assert_eq!(
        delays_for_visible(3, GRID_ENTRANCE_STAGGER),
        vec![
            Duration::ZERO,
            Duration::from_millis(100),
            Duration::from_millis(200)
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn children_start_concurrently_after_their_own_delay() {
    let section = section_with(3, 0, 150);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let started_at = tokio::time::Instant::now();

    let handles = StaggeredSequencer.play(&section.id, StaggeredSequencer.schedule(&section), tx);

    let mut offsets = Vec::new();
    for _ in 0..3 {
        let started = rx.recv().await.expect("entrance");
        offsets.push((started.order, started_at.elapsed()));
    }
    for handle in handles {
        handle.await.expect("entrance task");
    }

    let expected = [0u64, 150, 300];
    for ((order, offset), (k, expected_ms)) in offsets.iter().zip(expected.iter().enumerate()) {
        assert_eq!(*order, k);
        let expected = Duration::from_millis(*expected_ms);
        assert!(
            *offset >= expected && *offset < expected + Duration::from_millis(5),
            "child {k} started at {offset:?}, expected ~{expected:?}"
        );
    }
}

#[test]
fn reveal_event_feeds_the_sequencer() {
    let mut controller = RevealController::new();
    let config = StaggerConfig::new(Duration::from_millis(100), Duration::from_millis(100))
        .expect("config");
    controller.mount_section(SectionId::new("education"), config, ["a", "b"]);
    let mut rx = controller.subscribe();
    controller.observe(
        &SectionId::new("education"),
        0.4,
        RevealThreshold::default(),
    );

    let crate::reveal::RevealEvent::Revealed { section } = rx.try_recv().expect("event");
    let delays: Vec<Duration> = StaggeredSequencer
        .schedule(&section)
        .into_iter()
        .map(|slot| slot.delay)
        .collect();
    assert_eq!(
        delays,
        vec![Duration::from_millis(100), Duration::from_millis(200)]
    );
}
