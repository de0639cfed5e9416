#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelscope
//!
//! An interactively explorable renderer of the Mandelbrot set.  The
//! set lives on the complex plane: a point c belongs to it when the
//! orbit of z = z² + c, iterated from zero, stays bounded forever.
//! Points near the boundary take many iterations to reveal themselves,
//! and the number of iterations a point survives before escaping is
//! what gets colored.
//!
//! The crate is the plane-to-pixel core of such an explorer: the
//! mapping between the pixel grid and the window of the plane on
//! display (`planes`), the escape-time kernel (`escape`), the
//! count-to-color mapping (`color`), a row-partitioned parallel
//! render pass (`render`), and the zoom/recenter state machine that
//! ties them together (`explorer`).  Opening a window, polling input,
//! and drawing text are the host's job; the host feeds pixel
//! coordinates in and draws the buffer and status text the explorer
//! hands back.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod color;
pub mod escape;
pub mod explorer;
pub mod planes;
pub mod render;

pub use color::{iterations_to_rgb, Rgb};
pub use escape::escape_count;
pub use explorer::{Explorer, RenderState};
pub use planes::{Pixel, PixelGrid, PlaneError, PlaneView, ViewWindow};
pub use render::{render_frame, FrameSnapshot, PixelCell};
