//! Behaviour of the starfield layer driven through an [`Animator`].

use starfall_background::effects::starfield::{Starfield, WRAP_MARGIN, point_count};
use starfall_background::{Animator, Blend, CellSurface, Lifecycle, MAX_FRAME_DT, Point, Surface};
use starfall_core::{Motion, Rgba, Size, StarfieldParams};

/// Surface that only counts what is drawn on it.
#[derive(Debug, Default)]
struct RecordingSurface {
    size: Size,
    clears: usize,
    circles: usize,
    segments: usize,
    radials: usize,
}

impl RecordingSurface {
    fn draws(&self) -> usize {
        self.circles + self.segments + self.radials
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn fill_circle(&mut self, _: Point, _: f32, _: Rgba, _: Blend) {
        self.circles += 1;
    }

    fn stroke_segment(&mut self, _: Point, _: Point, _: f32, _: Rgba, _: Rgba, _: Blend) {
        self.segments += 1;
    }

    fn fill_radial(&mut self, _: Point, _: f32, _: &[(f32, Rgba)], _: Blend) {
        self.radials += 1;
    }
}

const SIZE: Size = Size {
    width: 800.0,
    height: 600.0,
};

fn animator(params: StarfieldParams, seed: u64) -> Animator<Starfield, RecordingSurface> {
    let mut animator = Animator::seeded(Starfield::new(params), RecordingSurface::default(), seed);
    animator.mount(SIZE);
    animator
}

fn quiet() -> StarfieldParams {
    StarfieldParams {
        shoot_rate: 0.0,
        ..StarfieldParams::default()
    }
}

fn stormy() -> StarfieldParams {
    StarfieldParams {
        shoot_rate: 1.0,
        ..StarfieldParams::default()
    }
}

#[test]
fn initial_point_count_is_area_times_density() {
    for (size, density) in [
        (Size::new(800.0, 600.0), 0.00016),
        (Size::new(1920.0, 1080.0), 0.00016),
        (Size::new(333.0, 77.0), 0.001),
        (Size::new(50.0, 50.0), 0.0),
    ] {
        let params = StarfieldParams {
            density,
            ..quiet()
        };
        let mut a = Animator::seeded(Starfield::new(params), RecordingSurface::default(), 1);
        a.mount(size);
        let expected = (size.width * size.height * density).floor() as usize;
        assert_eq!(a.effect().points().len(), expected);
        assert_eq!(point_count(size, density), expected);
    }
}

#[test]
fn points_stay_within_wrap_margin() {
    let params = StarfieldParams {
        drift_speed: 3.7,
        ..quiet()
    };
    let mut a = animator(params, 5);
    for _ in 0..2_000 {
        a.tick(0.016);
        for p in a.effect().points() {
            assert!(p.y >= -WRAP_MARGIN && p.y <= SIZE.height + WRAP_MARGIN);
        }
    }
}

#[test]
fn wrapped_points_keep_their_column() {
    let params = StarfieldParams {
        drift_speed: 50.0,
        ..quiet()
    };
    let mut a = animator(params, 9);
    let before: Vec<f32> = a.effect().points().iter().map(|p| p.x).collect();
    for _ in 0..100 {
        a.tick(0.016);
    }
    let after: Vec<f32> = a.effect().points().iter().map(|p| p.x).collect();
    assert_eq!(before, after);
}

#[test]
fn live_meteors_are_capped_with_fifo_eviction() {
    let mut a = animator(stormy(), 2);
    // Zero elapsed time: nothing moves or ages, so only the cap removes meteors.
    for _ in 0..100 {
        a.tick(0.0);
        assert!(a.effect().meteors().len() <= 24);
    }
    let ids: Vec<u64> = a.effect().meteors().iter().map(|m| m.id).collect();
    assert_eq!(ids, (76..100).collect::<Vec<u64>>());
}

#[test]
fn custom_cap_is_honoured() {
    let params = StarfieldParams {
        max_meteors: 3,
        ..stormy()
    };
    let mut a = animator(params, 2);
    for _ in 0..10 {
        a.tick(0.0);
    }
    let ids: Vec<u64> = a.effect().meteors().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![7, 8, 9]);
}

#[test]
fn trail_is_bounded_and_newest_first() {
    let params = StarfieldParams {
        trail_length: 5,
        ..stormy()
    };
    let mut a = animator(params, 4);
    for _ in 0..30 {
        a.tick(0.005);
        for m in a.effect().meteors() {
            assert!(m.trail.len() <= 5);
            let head = m.trail.front().copied();
            assert_eq!(head, Some(Point::new(m.x, m.y)));
        }
    }
}

#[test]
fn meteors_are_removed_once_spent() {
    let mut a = animator(stormy(), 8);
    a.tick(0.016);
    assert_eq!(a.effect().meteors().len(), 1);

    a.effect_mut().set_params(quiet());
    for _ in 0..200 {
        a.tick(0.033);
        for m in a.effect().meteors() {
            assert!(!m.is_spent(SIZE), "meteor {} outlived its tick", m.id);
        }
    }
    // The longest lifetime is under 1.7 s, far less than 200 ticks.
    assert!(a.effect().meteors().is_empty());
}

#[test]
fn fixed_seed_without_meteors_is_reproducible() {
    let mut a = animator(quiet(), 42);
    let mut b = animator(quiet(), 42);
    for _ in 0..250 {
        a.tick(0.016);
        b.tick(0.016);
    }
    assert_eq!(a.effect().points(), b.effect().points());
    assert!(a.effect().meteors().is_empty());
}

#[test]
fn different_seeds_give_different_fields() {
    let a = animator(quiet(), 1);
    let b = animator(quiet(), 2);
    assert_ne!(a.effect().points(), b.effect().points());
}

#[test]
fn unmount_stops_all_surface_writes() {
    let mut a = animator(stormy(), 3);
    for _ in 0..10 {
        assert!(a.tick(0.016));
    }
    let draws = a.surface().draws();
    let clears = a.surface().clears;
    assert!(draws > 0);

    assert!(a.is_running());
    a.unmount();
    assert_eq!(a.state(), Lifecycle::Stopped);
    assert!(!a.is_running());
    for _ in 0..10 {
        assert!(!a.tick(0.016));
    }
    a.resize(Size::new(100.0, 100.0));
    assert_eq!(a.surface().draws(), draws);
    assert_eq!(a.surface().clears, clears);
}

#[test]
fn stopped_animator_cannot_be_remounted() {
    let mut a = animator(quiet(), 3);
    a.unmount();
    a.mount(SIZE);
    assert_eq!(a.state(), Lifecycle::Stopped);
}

#[test]
fn ticks_before_mount_do_nothing() {
    let mut a = Animator::seeded(Starfield::new(quiet()), RecordingSurface::default(), 0);
    assert_eq!(a.state(), Lifecycle::Uninitialized);
    a.resize(SIZE);
    assert!(!a.tick(0.016));
    assert_eq!(a.surface().draws(), 0);
    assert!(a.effect().points().is_empty());
}

#[test]
fn zero_sized_surface_is_a_silent_no_op() {
    let mut a = Animator::seeded(Starfield::new(stormy()), RecordingSurface::default(), 0);
    a.mount(Size::ZERO);
    assert_eq!(a.state(), Lifecycle::Running);
    assert!(!a.tick(0.016));
    assert_eq!(a.surface().draws(), 0);
    assert_eq!(a.surface().clears, 0);
}

#[test]
fn every_tick_clears_then_draws_each_point() {
    let mut a = animator(quiet(), 6);
    let points = a.effect().points().len();
    a.tick(0.016);
    assert_eq!(a.surface().clears, 1);
    assert_eq!(a.surface().circles, points);
}

#[test]
fn reduced_motion_renders_a_static_frame() {
    let mut a = animator(stormy(), 12);
    a.set_motion(Motion::Reduced);
    let before = a.effect().points().to_vec();
    for _ in 0..20 {
        a.tick(0.016);
    }
    assert_eq!(a.effect().points(), before.as_slice());
    assert!(a.effect().meteors().is_empty());
    assert_eq!(a.surface().circles, before.len() * 20);
}

#[test]
fn resize_regenerates_points_but_keeps_meteors() {
    let mut a = animator(stormy(), 21);
    for _ in 0..5 {
        a.tick(0.0);
    }
    let meteors = a.effect().meteors().clone();
    a.resize(Size::new(400.0, 300.0));
    assert_eq!(a.effect().points().len(), 19);
    assert_eq!(a.effect().meteors(), &meteors);
    assert_eq!(a.state(), Lifecycle::Running);
}

#[test]
fn elapsed_time_is_clamped_through_frames() {
    use std::time::Duration;

    let params = StarfieldParams {
        max_meteors: 1,
        ..stormy()
    };
    let mut a = animator(params, 30);
    a.frame(Duration::from_secs(0));
    let first = a.effect().meteors().back().cloned();
    assert_eq!(first.as_ref().map(|m| m.age), Some(0.0));

    a.effect_mut().set_params(StarfieldParams {
        shoot_rate: 0.0,
        max_meteors: 1,
        ..StarfieldParams::default()
    });
    a.frame(Duration::from_secs(60));
    let m = &a.effect().meteors()[0];
    assert!((m.age - 0.033).abs() < 1e-6);
}

#[test]
fn reduced_motion_freezes_meteors_but_they_still_expire() {
    let mut a = animator(stormy(), 8);
    a.tick(0.016);
    assert_eq!(a.effect().meteors().len(), 1);
    let (x, y, life) = {
        let m = &a.effect().meteors()[0];
        (m.x, m.y, m.life)
    };

    a.set_motion(Motion::Reduced);
    a.tick(0.033);
    let m = &a.effect().meteors()[0];
    assert_eq!((m.x, m.y), (x, y));

    let ticks = (life / 0.033).ceil() as usize + 1;
    for _ in 0..ticks {
        a.tick(0.033);
    }
    assert!(a.effect().meteors().is_empty());
}

#[test]
fn direct_ticks_are_clamped() {
    let mut a = animator(stormy(), 30);
    a.tick(0.0);
    a.effect_mut().set_params(quiet());
    a.tick(5.0);
    let m = &a.effect().meteors()[0];
    assert!((m.age - MAX_FRAME_DT).abs() < 1e-6);
}

#[test]
fn huge_meteor_speed_still_draws_and_culls() {
    let params = StarfieldParams {
        meteor_speed: 1.0e12,
        ..stormy()
    };
    let mut a = Animator::seeded(Starfield::new(params), CellSurface::new(8.0, 16.0), 5);
    a.mount(SIZE);
    a.tick(0.0);
    assert_eq!(a.effect().meteors().len(), 1);

    a.effect_mut().set_params(StarfieldParams {
        meteor_speed: 1.0e12,
        ..quiet()
    });
    assert!(a.tick(0.016));
    assert!(a.effect().meteors().is_empty());
}
