//! Presentation state for the voxel scene.
//!
//! The interpreter says *where* each cube should be and whether it is lit.
//! Everything here is cosmetic: cubes glide toward their targets, spin,
//! pulse, and a point light follows whichever cube is active.

use hand_gesture::{FingerCount, GestureState, Point3, SLOT_COUNT};

/// Voxels per cube edge.
pub const VOXELS_PER_EDGE: usize = 3;
pub const VOXEL_COUNT:     usize = VOXELS_PER_EDGE * VOXELS_PER_EDGE * VOXELS_PER_EDGE;
/// Centre-to-centre voxel distance, scene units.
pub const VOXEL_SPACING:   f32 = 0.5;
/// Voxel edge length at scale 1.0.
pub const VOXEL_SIZE:      f32 = 0.45;

/// Fraction of the remaining distance a cube covers each frame.
const FOLLOW_RATE: f32 = 0.2;

const ACTIVE_PULSE_BASE:  f32 = 1.2;
const ACTIVE_PULSE_DEPTH: f32 = 0.1;
const LIGHT_ACTIVE:       f32 = 15.0;
const LIGHT_IDLE_COLOR:   u32 = 0x22D3EE;

/// Local offsets of every voxel centre, cube-centred.
pub fn voxel_offsets() -> [Point3; VOXEL_COUNT] {
    let half = (VOXELS_PER_EDGE - 1) as f32 * VOXEL_SPACING / 2.0;
    std::array::from_fn(|i| {
        let x = i % VOXELS_PER_EDGE;
        let y = (i / VOXELS_PER_EDGE) % VOXELS_PER_EDGE;
        let z = i / (VOXELS_PER_EDGE * VOXELS_PER_EDGE);
        Point3::new(
            x as f32 * VOXEL_SPACING - half,
            y as f32 * VOXEL_SPACING - half,
            z as f32 * VOXEL_SPACING - half,
        )
    })
}

// ════════════════════════════════════════════════════════════════════════════
// CubeVisual
// ════════════════════════════════════════════════════════════════════════════

/// On-screen state of one slot's cube.
#[derive(Clone, Debug)]
pub struct CubeVisual {
    pub position:    Point3,
    /// Euler angles (x, y, z), radians.
    pub rotation:    [f32; 3],
    /// Per-voxel scale, animated while active.
    pub voxel_scale: [f32; VOXEL_COUNT],
    /// Self-illumination, 0.0–1.0.
    pub emissive:    f32,
    pub color:       u32,
    pub active:      bool,
}

impl CubeVisual {
    fn new(position: Point3, color: u32) -> Self {
        CubeVisual {
            position,
            rotation:    [0.0; 3],
            voxel_scale: [1.0; VOXEL_COUNT],
            emissive:    0.05,
            color,
            active:      false,
        }
    }

    fn tick_active(&mut self, target: &Point3, t_ms: f32) {
        self.position = self.position.lerp(target, FOLLOW_RATE);
        self.rotation[1] += 0.08;
        self.rotation[2] += 0.03;
        for (i, s) in self.voxel_scale.iter_mut().enumerate() {
            *s = ACTIVE_PULSE_BASE + (t_ms * 0.01 + i as f32).sin() * ACTIVE_PULSE_DEPTH;
        }
        self.emissive = 1.0;
    }

    fn tick_idle(&mut self, target: &Point3) {
        self.position = self.position.lerp(target, FOLLOW_RATE);
        self.rotation[1] += 0.01;
        self.rotation[0] *= 0.98;
        for s in self.voxel_scale.iter_mut() {
            *s += (1.0 - *s) * 0.1;
        }
        self.emissive = 0.05;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLight
// ════════════════════════════════════════════════════════════════════════════

/// Point light that rides on the active cube.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLight {
    pub position:  Point3,
    pub intensity: f32,
    pub color:     u32,
    /// Distance at which the light's contribution reaches zero.
    pub range:     f32,
}

impl Default for HandLight {
    fn default() -> Self {
        HandLight { position: Point3::ORIGIN, intensity: 10.0, color: LIGHT_IDLE_COLOR, range: 25.0 }
    }
}

impl HandLight {
    /// Light reaching `p`, 0.0 at `range` or beyond, normalized so an active
    /// light touching `p` gives 1.0.
    pub fn falloff_at(&self, p: &Point3) -> f32 {
        let d = self.position.distance(p);
        let reach = (1.0 - d / self.range).clamp(0.0, 1.0);
        reach * reach * (self.intensity / LIGHT_ACTIVE)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SceneState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct SceneState {
    pub cubes: [CubeVisual; SLOT_COUNT],
    pub light: HandLight,
}

impl SceneState {
    /// Cubes start wherever the snapshot parks their slots.
    pub fn new(initial: &GestureState) -> Self {
        SceneState {
            cubes: std::array::from_fn(|i| {
                CubeVisual::new(initial.slots[i].position, initial.slots[i].color)
            }),
            light: HandLight::default(),
        }
    }

    /// Advance one render frame toward `gesture`.  `t_ms` is wall time,
    /// used only for the pulse phase.
    pub fn tick(&mut self, gesture: &GestureState, t_ms: f32) {
        for (cube, slot) in self.cubes.iter_mut().zip(gesture.slots.iter()) {
            cube.active = slot.active;
            cube.color  = slot.color;
            if slot.active {
                cube.tick_active(&slot.position, t_ms);
                self.light.position  = cube.position;
                self.light.intensity = LIGHT_ACTIVE;
                self.light.color     = slot.color;
            } else {
                cube.tick_idle(&slot.position);
            }
        }

        if gesture.finger_count == FingerCount::Zero {
            self.light.intensity += (0.0 - self.light.intensity) * 0.1;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::{synthesize_hand, FingerStates, GestureInterpreter};

    fn drive(n: usize, x: f32, frames: usize) -> (GestureInterpreter, GestureState) {
        let mut it = GestureInterpreter::new();
        let mut last = it.state().clone();
        for _ in 0..frames {
            let pts = synthesize_hand(Point3::new(x, 0.5, 0.0), FingerStates::first(n));
            last = it.update(Some(&pts));
        }
        (it, last)
    }

    #[test]
    fn offsets_are_centred() {
        let offs = voxel_offsets();
        let sum = offs.iter().fold(Point3::ORIGIN, |a, p| Point3::new(a.x + p.x, a.y + p.y, a.z + p.z));
        assert!(sum.distance(&Point3::ORIGIN) < 1e-5);
        assert!((offs[0].x + 0.5).abs() < 1e-6);
        assert!((offs[VOXEL_COUNT - 1].z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn cubes_spawn_at_slot_positions() {
        let it = GestureInterpreter::new();
        let scene = SceneState::new(it.state());
        for (c, s) in scene.cubes.iter().zip(it.state().slots.iter()) {
            assert_eq!(c.position, s.position);
            assert_eq!(c.color, s.color);
        }
    }

    #[test]
    fn active_cube_glides_and_glows() {
        let (it, g) = drive(1, 0.9, 40);
        let mut scene = SceneState::new(GestureInterpreter::new().state());
        for f in 0..60 { scene.tick(&g, f as f32 * 16.0); }
        let cube = &scene.cubes[0];
        assert!(cube.active);
        assert_eq!(cube.emissive, 1.0);
        assert!(cube.position.distance(&it.state().slots[0].position) < 1e-3);
        assert!(cube.voxel_scale.iter().all(|s| (1.09..=1.31).contains(s)));
        assert_eq!(scene.light.intensity, 15.0);
        assert_eq!(scene.light.color, g.slots[0].color);
    }

    #[test]
    fn idle_cubes_settle_and_light_fades() {
        let mut it = GestureInterpreter::new();
        let pts = synthesize_hand(Point3::new(0.2, 0.5, 0.0), FingerStates::first(2));
        let lit = it.update(Some(&pts));
        let idle = it.update(None);

        let mut scene = SceneState::new(&lit);
        scene.tick(&lit, 0.0);
        for _ in 0..100 { scene.tick(&idle, 0.0); }

        assert!(scene.cubes.iter().all(|c| !c.active && c.emissive == 0.05));
        assert!(scene.cubes[1].voxel_scale.iter().all(|s| (s - 1.0).abs() < 1e-3));
        assert!(scene.cubes[1].position.distance(&idle.slots[1].position) < 1e-3);
        assert!(scene.light.intensity < 0.01);
    }

    #[test]
    fn four_fingers_leave_light_alone() {
        let (_, g) = drive(4, 0.5, 1);
        let mut scene = SceneState::new(&g);
        scene.tick(&g, 0.0);
        assert_eq!(scene.light.intensity, HandLight::default().intensity);
    }

    #[test]
    fn falloff_fades_with_distance() {
        let light = HandLight { intensity: 15.0, ..HandLight::default() };
        assert!((light.falloff_at(&Point3::ORIGIN) - 1.0).abs() < 1e-6);
        assert_eq!(light.falloff_at(&Point3::new(30.0, 0.0, 0.0)), 0.0);
    }
}
