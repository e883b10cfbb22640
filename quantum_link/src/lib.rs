//! # quantum_link
//!
//! Hand-gesture voxel controller.  A landmark source (simulated hand,
//! recorded session, or external detector) feeds the `hand_gesture`
//! interpreter on its own thread; three voxel cubes follow the result in a
//! software-rendered scene.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Action |
//! |---|---|
//! | Index finger | Grab cube 01 and move it with the hand |
//! | Index + middle | Grab cube 02 |
//! | Index + middle + ring | Grab cube 03 |
//! | Fist, open hand, no hand | Release; cubes stay where they were left |
//!
//! ## Sources
//!
//! * (default) **Simulation**: keyboard and mouse drive a synthetic hand.
//! * `--replay FILE`: a JSON-lines recording, paced at `--replay-fps`.
//! * `--detector PROGRAM`: an external landmark model streaming JSON lines.
//!
//! ### Simulation controls
//!
//! | Input | Effect |
//! |---|---|
//! | `0`–`4` | Hold up that many fingers (index first) |
//! | `H` | Show / hide the hand |
//! | Mouse | Move the palm |
//! | Scroll wheel | Move the palm toward / away from the camera |
//! | `Q` / `Escape` | Quit |

pub mod source;
pub mod inference;
pub mod scene;
pub mod visualizer;
pub mod app;
