use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn clears_after_duration() {
    let feedback = EphemeralFeedback::new("copied");
    assert!(!feedback.is_active());

    feedback.arm(COPY_FEEDBACK_DURATION);
    assert!(feedback.is_active());

    sleep(Duration::from_millis(1999)).await;
    assert!(feedback.is_active());

    sleep(Duration::from_millis(2)).await;
    assert!(!feedback.is_active());
}

#[tokio::test(start_paused = true)]
async fn rearm_restarts_the_timer() {
    let feedback = EphemeralFeedback::new("copied");
    feedback.arm(Duration::from_millis(2000));

    sleep(Duration::from_millis(500)).await;
    feedback.arm(Duration::from_millis(2000));
    let second_arm = feedback.armed_at().expect("armed");

    // 2200ms after the first arm, the first timer would already have fired.
    sleep(Duration::from_millis(1700)).await;
    assert!(feedback.is_active());

    sleep(Duration::from_millis(301)).await;
    assert!(second_arm.elapsed() >= Duration::from_millis(2001));
    assert!(!feedback.is_active());
}

#[tokio::test(start_paused = true)]
async fn follow_up_runs_once_for_the_latest_arm() {
    let feedback = EphemeralFeedback::new("banner");
    let calls = Arc::new(AtomicUsize::new(0));

    for _ in 0..3 {
        let calls = Arc::clone(&calls);
        feedback.arm_then(SUCCESS_BANNER_DURATION, async move {
            calls.fetch_add(1, Ordering::SeqCst);
        });
        sleep(Duration::from_millis(1000)).await;
    }

    sleep(SUCCESS_BANNER_DURATION).await;
    assert!(!feedback.is_active());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn disarm_cancels_pending_follow_up() {
    let feedback = EphemeralFeedback::new("banner");
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    feedback.arm_then(Duration::from_millis(100), async move {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    feedback.disarm();
    assert!(!feedback.is_active());

    sleep(Duration::from_millis(500)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn default_durations_match_banner_timings() {
    let durations = FeedbackDurations::default();
    assert_eq!(durations.copy, Duration::from_millis(2000));
    assert_eq!(durations.success_banner, Duration::from_millis(3000));
}
