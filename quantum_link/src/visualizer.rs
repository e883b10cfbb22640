//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ [01 LOCKED OBJECT]                                           │
//! │ [02 LOCKED OBJECT]        ▣        ▣        ▣                │
//! │ [03 LOCKED OBJECT]      cube 0   cube 1   cube 2             │
//! │                                                              │
//! │             ── floor grid ────────────────────               │
//! │ COORDINATE X / Y                                             │
//! │ status bar · key legend                                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cubes are 3×3×3 voxels drawn as depth-sorted shaded squares; the camera
//! sits above and in front of the origin looking at it.

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};
use nalgebra::{self as na, Isometry3, Perspective3, Rotation3, Vector3};

use hand_gesture::{GestureState, Point3};

use crate::scene::{voxel_offsets, CubeVisual, HandLight, SceneState, VOXEL_SIZE};
use crate::source::{SimInput, SimKey};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:      usize = 1280;
pub const WIN_H:      usize = 720;
const BG_COLOR:       u32   = 0xFF000000;
const HUD_ACCENT:     u32   = 0xFF22D3EE;  // cyan
const HUD_DIM:        u32   = 0xFF3A3A3A;
const TILE_ACTIVE_BG: u32   = 0xFF1C2226;
const TILE_IDLE_BG:   u32   = 0xFF0A0A0A;
const TEXT_BG:        u32   = 0xFF050A10;
const STATUS_Y:       usize = WIN_H - 44;

// ── Camera ──────────────────────────────────────────────────────────────────
const CAMERA_EYE:  [f32; 3] = [0.0, 8.0, 25.0];
const FOV_Y_DEG:   f32 = 45.0;
const Z_NEAR:      f32 = 0.1;
const Z_FAR:       f32 = 1000.0;
const FOG_NEAR:    f32 = 10.0;
const FOG_FAR:     f32 = 50.0;

// ── Floor grid ──────────────────────────────────────────────────────────────
const GRID_Y:        f32 = -6.0;
const GRID_HALF:     f32 = 50.0;
const GRID_DIVS:     usize = 80;
/// Grid lines stop short of the camera plane.
const GRID_NEAR_Z:   f32 = 18.0;
const GRID_CENTER:   u32 = 0xFF1E1E1E;
const GRID_LINE:     u32 = 0xFF0E0E0E;

const VOXEL_OPACITY: f32 = 0.85;

// ════════════════════════════════════════════════════════════════════════════
// Camera
// ════════════════════════════════════════════════════════════════════════════

/// A projected point: pixel coordinates plus distance along the view axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub x:     f32,
    pub y:     f32,
    pub depth: f32,
}

pub struct Camera {
    view:     Isometry3<f32>,
    proj:     Perspective3<f32>,
    /// Pixels per scene unit at depth 1.
    focal_px: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        let eye  = na::Point3::new(CAMERA_EYE[0], CAMERA_EYE[1], CAMERA_EYE[2]);
        let view = Isometry3::look_at_rh(&eye, &na::Point3::origin(), &Vector3::y());
        let fovy = FOV_Y_DEG.to_radians();
        let proj = Perspective3::new(WIN_W as f32 / WIN_H as f32, fovy, Z_NEAR, Z_FAR);
        let focal_px = (WIN_H as f32 / 2.0) / (fovy / 2.0).tan();
        Camera { view, proj, focal_px }
    }

    /// Project a scene point to the window.  `None` if it is behind the near
    /// plane.
    pub fn project(&self, p: &Point3) -> Option<Projected> {
        let v = self.view.transform_point(&na::Point3::new(p.x, p.y, p.z));
        let depth = -v.z;
        if depth <= Z_NEAR {
            return None;
        }
        let ndc = self.proj.project_point(&v);
        Some(Projected {
            x:     (ndc.x + 1.0) * 0.5 * WIN_W as f32,
            y:     (1.0 - ndc.y) * 0.5 * WIN_H as f32,
            depth,
        })
    }

    /// On-screen size in pixels of `size` scene units at `depth`.
    pub fn pixels(&self, size: f32, depth: f32) -> f32 {
        size * self.focal_px / depth
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

/// One voxel ready for painter's-order drawing.
struct VoxelQuad {
    x:     f32,
    y:     f32,
    depth: f32,
    half:  f32,
    color: u32,
}

pub struct Visualizer {
    window:  Window,
    buf:     Vec<u32>,
    camera:  Camera,
    offsets: [Point3; crate::scene::VOXEL_COUNT],
    /// Present only in simulation mode.
    sim_tx:  Option<Sender<SimInput>>,
    last_pointer: Option<(f32, f32)>,
}

impl Visualizer {
    pub fn new(title: &str, sim_tx: Option<Sender<SimInput>>) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            title,
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            camera: Camera::new(),
            offsets: voxel_offsets(),
            sim_tx,
            last_pointer: None,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    pub fn is_simulated(&self) -> bool { self.sim_tx.is_some() }

    /// Poll keyboard and mouse.  Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        if one_shot(Key::Q) || one_shot(Key::Escape) {
            self.send(SimInput::KeyDown(SimKey::Quit));
            return false;
        }
        if self.sim_tx.is_none() { return true; }

        let finger_keys = [
            (Key::Key0, 0), (Key::Key1, 1), (Key::Key2, 2), (Key::Key3, 3), (Key::Key4, 4),
            (Key::NumPad0, 0), (Key::NumPad1, 1), (Key::NumPad2, 2), (Key::NumPad3, 3), (Key::NumPad4, 4),
        ];
        let mut pressed: Vec<SimInput> = finger_keys.iter()
            .filter(|(k, _)| one_shot(*k))
            .map(|(_, n)| SimInput::KeyDown(SimKey::Fingers(*n)))
            .collect();
        if one_shot(Key::H) {
            pressed.push(SimInput::KeyDown(SimKey::ToggleHand));
        }

        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Discard) {
            let p = (mx / WIN_W as f32, my / WIN_H as f32);
            if self.last_pointer != Some(p) {
                self.last_pointer = Some(p);
                pressed.push(SimInput::PointerMoved { x: p.0, y: p.1 });
            }
        }
        if let Some((_, dy)) = self.window.get_scroll_wheel() {
            if dy != 0.0 {
                pressed.push(SimInput::Depth(dy.signum()));
            }
        }

        for input in pressed { self.send(input); }
        true
    }

    fn send(&self, input: SimInput) {
        if let Some(tx) = &self.sim_tx {
            let _ = tx.send(input);
        }
    }

    /// Render one frame.
    pub fn render(
        &mut self,
        scene:   &SceneState,
        gesture: &GestureState,
        status:  &str,
        hud:     bool,
    ) {
        self.buf.fill(BG_COLOR);

        self.draw_grid();
        self.draw_cubes(scene);
        if gesture.hand_detected {
            self.draw_reticle(&gesture.hand_pos);
        }

        if hud {
            self.draw_slot_tiles(gesture);
            self.draw_readout(gesture);
        }

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, WIN_H - STATUS_Y, TEXT_BG);
        self.draw_text(status, 12, STATUS_Y + 8, 0xFFEEEEEE, 2);

        let legend = if self.is_simulated() {
            "0-4=fingers  H=hide hand  mouse=move  wheel=depth  Q/Esc=quit"
        } else {
            "Q/Esc=quit"
        };
        self.draw_text(legend, 12, WIN_H - 14, 0xFF777777, 1);

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Floor grid ────────────────────────────────────────────────────────

    fn draw_grid(&mut self) {
        let step = 2.0 * GRID_HALF / GRID_DIVS as f32;
        for i in 0..=GRID_DIVS {
            let c = -GRID_HALF + i as f32 * step;
            let color = if i == GRID_DIVS / 2 { GRID_CENTER } else { GRID_LINE };

            // Receding line (constant x).
            self.draw_segment(
                &Point3::new(c, GRID_Y, -GRID_HALF),
                &Point3::new(c, GRID_Y, GRID_NEAR_Z),
                color,
            );
            // Cross line (constant z), only in front of the camera.
            if c <= GRID_NEAR_Z {
                self.draw_segment(
                    &Point3::new(-GRID_HALF, GRID_Y, c),
                    &Point3::new(GRID_HALF, GRID_Y, c),
                    color,
                );
            }
        }
    }

    fn draw_segment(&mut self, a: &Point3, b: &Point3, color: u32) {
        let (Some(pa), Some(pb)) = (self.camera.project(a), self.camera.project(b)) else {
            return;
        };
        let color = fog(color, (pa.depth + pb.depth) / 2.0);
        self.draw_line(pa.x, pa.y, pb.x, pb.y, color);
    }

    // ── Cubes ─────────────────────────────────────────────────────────────

    fn draw_cubes(&mut self, scene: &SceneState) {
        let mut quads: Vec<VoxelQuad> = Vec::with_capacity(scene.cubes.len() * self.offsets.len());
        for cube in &scene.cubes {
            self.collect_voxels(cube, &scene.light, &mut quads);
        }

        // Far to near.
        quads.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        for q in &quads {
            let x0 = (q.x - q.half).round() as isize;
            let y0 = (q.y - q.half).round() as isize;
            let side = (q.half * 2.0).round().max(1.0) as isize;
            self.blend_rect(x0, y0, side, side, q.color, VOXEL_OPACITY);
            self.draw_border_i(x0, y0, side, side, scale_rgb(q.color, 0.55));
        }
    }

    fn collect_voxels(&self, cube: &CubeVisual, light: &HandLight, out: &mut Vec<VoxelQuad>) {
        let [rx, ry, rz] = cube.rotation;
        let rot = Rotation3::from_euler_angles(rx, ry, rz);

        for (i, off) in self.offsets.iter().enumerate() {
            let r = rot * Vector3::new(off.x, off.y, off.z);
            let world = Point3::new(cube.position.x + r.x, cube.position.y + r.y, cube.position.z + r.z);
            let Some(p) = self.camera.project(&world) else { continue };

            let half = self.camera.pixels(VOXEL_SIZE * cube.voxel_scale[i], p.depth) / 2.0;
            out.push(VoxelQuad {
                x: p.x,
                y: p.y,
                depth: p.depth,
                half,
                color: shade_voxel(cube, &world, light, r.y, p.depth),
            });
        }
    }

    // ── Hand reticle ──────────────────────────────────────────────────────

    fn draw_reticle(&mut self, hand: &Point3) {
        let Some(p) = self.camera.project(hand) else { return };
        let (cx, cy) = (p.x, p.y);
        self.draw_line(cx - 10.0, cy, cx - 4.0, cy, HUD_ACCENT);
        self.draw_line(cx + 4.0, cy, cx + 10.0, cy, HUD_ACCENT);
        self.draw_line(cx, cy - 10.0, cx, cy - 4.0, HUD_ACCENT);
        self.draw_line(cx, cy + 4.0, cx, cy + 10.0, HUD_ACCENT);
    }

    // ── HUD ───────────────────────────────────────────────────────────────

    fn draw_slot_tiles(&mut self, gesture: &GestureState) {
        for slot in &gesture.slots {
            let active = slot.active;
            let y = 40 + slot.id * 52;
            let x = if active { 56 } else { 40 };
            let bg = if active { TILE_ACTIVE_BG } else { TILE_IDLE_BG };
            let edge = if active { HUD_ACCENT } else { HUD_DIM };
            let text = if active { 0xFFFFFFFF } else { 0xFF4A4A4A };

            self.fill_rect(x, y, 260, 40, bg);
            self.fill_rect(x, y, 4, 40, edge);
            self.draw_text(&format!("0{}", slot.finger_count()), x + 16, y + 10, text, 4);
            self.fill_rect(x + 58, y + 12, 2, 16, HUD_DIM);
            self.draw_text("LOCKED OBJECT", x + 72, y + 15, text, 2);
            self.fill_rect(x + 232, y + 14, 12, 12, 0xFF000000 | slot.color);
        }
    }

    fn draw_readout(&mut self, gesture: &GestureState) {
        let y = STATUS_Y - 52;
        let p = gesture.hand_pos;
        self.draw_text(&format!("COORDINATE X: {:.3}", p.x), 40, y, 0xFF5A5A5A, 2);
        self.draw_text(&format!("COORDINATE Y: {:.3}", p.y), 40, y + 14, 0xFF5A5A5A, 2);
        self.draw_text(
            &format!("FINGERS: {}  FRAME: {}", gesture.finger_count, gesture.frame),
            40, y + 28, 0xFF1F8A99, 2,
        );
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    /// Alpha-composite a rectangle that may hang off any edge.
    fn blend_rect(&mut self, x: isize, y: isize, w: isize, h: isize, color: u32, alpha: f32) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x + w).clamp(0, WIN_W as isize) as usize;
        let y1 = (y + h).clamp(0, WIN_H as isize) as usize;
        for row in y0..y1 {
            for col in x0..x1 {
                let px = &mut self.buf[row * WIN_W + col];
                *px = blend(*px, color, alpha);
            }
        }
    }

    fn draw_border_i(&mut self, x: isize, y: isize, w: isize, h: isize, color: u32) {
        for col in x..x + w {
            self.set_pixel_i(col, y, color);
            self.set_pixel_i(col, y + h - 1, color);
        }
        for row in y..y + h {
            self.set_pixel_i(x, row, color);
            self.set_pixel_i(x + w - 1, row, color);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn set_pixel_i(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    /// DDA line, clipped per pixel.
    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: u32) {
        let (dx, dy) = (x1 - x0, y1 - y0);
        let steps = dx.abs().max(dy.abs()).ceil().min(8192.0) as usize;
        if steps == 0 {
            self.set_pixel_i(x0 as isize, y0 as isize, color);
            return;
        }
        let (sx, sy) = (dx / steps as f32, dy / steps as f32);
        for i in 0..=steps {
            let x = x0 + sx * i as f32;
            let y = y0 + sy * i as f32;
            self.set_pixel_i(x.round() as isize, y.round() as isize, color);
        }
    }

    /// 3×5 bitmap font, each font pixel drawn as a `scale`×`scale` block.
    fn draw_text(&mut self, text: &str, x: usize, y: usize, color: u32, scale: usize) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > WIN_W { break; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Shading
// ════════════════════════════════════════════════════════════════════════════

/// Voxel colour: ambient + hemisphere + emissive + hand light, then fog.
///
/// `up` is the voxel's rotated local height, which the hemisphere term uses
/// to brighten upper voxels.
fn shade_voxel(cube: &CubeVisual, world: &Point3, light: &HandLight, up: f32, depth: f32) -> u32 {
    let ambient  = 0.1;
    let hemi     = 0.5 * (0.5 + up.clamp(-0.5, 0.5));
    let emissive = 0.6 * cube.emissive;
    let lamp     = light.falloff_at(world);

    let body = scale_rgb(cube.color, (ambient + hemi + emissive + 0.4 * lamp).min(1.6));
    let tinted = blend(body, 0xFF000000 | light.color, (0.25 * lamp).min(0.5));
    fog(tinted, depth)
}

/// Linear fog toward the background between `FOG_NEAR` and `FOG_FAR`.
fn fog(color: u32, depth: f32) -> u32 {
    let t = ((depth - FOG_NEAR) / (FOG_FAR - FOG_NEAR)).clamp(0.0, 1.0);
    blend(color, BG_COLOR, t)
}

/// Multiply RGB by `k`, saturating.
fn scale_rgb(c: u32, k: f32) -> u32 {
    let ch = |shift: u32| (((c >> shift) & 0xFF) as f32 * k).clamp(0.0, 255.0) as u32;
    0xFF000000 | (ch(16) << 16) | (ch(8) << 8) | ch(0)
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_to_screen_centre() {
        let p = Camera::new().project(&Point3::ORIGIN).unwrap();
        assert!((p.x - WIN_W as f32 / 2.0).abs() < 0.5);
        assert!((p.y - WIN_H as f32 / 2.0).abs() < 0.5);
        let eye_dist = (8.0f32 * 8.0 + 25.0 * 25.0).sqrt();
        assert!((p.depth - eye_dist).abs() < 1e-3);
    }

    #[test]
    fn behind_camera_is_culled() {
        assert!(Camera::new().project(&Point3::new(0.0, 8.0, 40.0)).is_none());
    }

    #[test]
    fn scene_right_is_screen_right_and_up_is_up() {
        let cam = Camera::new();
        let c = cam.project(&Point3::ORIGIN).unwrap();
        let r = cam.project(&Point3::new(4.0, 0.0, 0.0)).unwrap();
        let u = cam.project(&Point3::new(0.0, 4.0, 0.0)).unwrap();
        assert!(r.x > c.x);
        assert!(u.y < c.y);
    }

    #[test]
    fn nearer_things_look_bigger() {
        let cam = Camera::new();
        assert!(cam.pixels(1.0, 10.0) > cam.pixels(1.0, 20.0));
    }

    #[test]
    fn fog_limits() {
        assert_eq!(fog(0xFFFFFFFF, 5.0), 0xFFFFFFFF);
        assert_eq!(fog(0xFFFFFFFF, 80.0), BG_COLOR);
    }

    #[test]
    fn scale_rgb_saturates() {
        assert_eq!(scale_rgb(0xFF808080, 4.0), 0xFFFFFFFF);
        assert_eq!(scale_rgb(0xFF808080, 0.0), 0xFF000000);
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF102030, 0xFFA0B0C0, 0.0), 0xFF102030);
        assert_eq!(blend(0xFF102030, 0xFFA0B0C0, 1.0), 0xFFA0B0C0);
    }
}
