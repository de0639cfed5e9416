// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The parallel render pass.  A frame is a full sweep of the pixel
//! grid: map each pixel to its plane coordinate, iterate the kernel,
//! color the count.  Rows are split into contiguous spans, one per
//! worker, and each worker writes its span's slice of a single
//! scratch allocation.  The slices are disjoint, so the workers need
//! no synchronization on the buffer; the caller blocks until every
//! worker has joined and receives the finished buffer whole.

use crossbeam;
use std::ops::Range;

use color::{iterations_to_rgb, Rgb};
use escape::escape_count;
use planes::{Pixel, PlaneView};

/// One rendered pixel: where it sits on the grid, and the color the
/// current view gives it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelCell {
    /// The position on the pixel grid, row-major order.
    pub position: Pixel,
    /// The rendered color.
    pub color: Rgb,
}

/// Everything a render worker needs to do its rows, copied by value
/// when the pass starts.  Workers hold this copy, never a reference
/// into the explorer, so a view mutation after the pass begins cannot
/// reach them.
#[derive(Copy, Clone, Debug)]
pub struct FrameSnapshot {
    /// The pixel grid and the plane window it looks onto.
    pub view: PlaneView,
    /// The iteration budget in force for this frame.
    pub budget: u32,
}

/// Renders one full frame for the snapshot, fanning the rows out over
/// `workers` scoped threads.  The worker count is clamped to at least
/// one and at most one per row; the result does not depend on it.
/// Cells come back in row-major order, `index = x + y * width`.
pub fn render_frame(snapshot: FrameSnapshot, workers: usize) -> Vec<PixelCell> {
    let rows = snapshot.view.grid.height();
    let columns = snapshot.view.grid.width();
    let workers = workers.max(1).min(rows);
    trace!(
        "begin render pass: {}x{} pixels, budget {}, {} workers",
        columns,
        rows,
        snapshot.budget,
        workers
    );
    let mut buffer = vec![PixelCell::default(); snapshot.view.grid.len()];
    crossbeam::scope(|spawner| {
        let mut remainder = &mut buffer[..];
        for span in row_spans(rows, workers) {
            let (slice, rest) = remainder.split_at_mut(span.len() * columns);
            remainder = rest;
            spawner.spawn(move |_| render_rows(snapshot, span, slice));
        }
    })
    .unwrap();
    trace!("end render pass");
    buffer
}

// Splits `rows` into `workers` contiguous spans, as even as possible:
// the first `rows % workers` spans carry one extra row, so no two
// spans differ by more than one.
fn row_spans(rows: usize, workers: usize) -> Vec<Range<usize>> {
    let each = rows / workers;
    let extra = rows % workers;
    let mut spans = Vec::with_capacity(workers);
    let mut start = 0;
    for worker in 0..workers {
        let length = each + if worker < extra { 1 } else { 0 };
        spans.push(start..start + length);
        start += length;
    }
    spans
}

// One worker's share: fills `slice` with the cells for the rows of
// `span`, in row-major order.
fn render_rows(snapshot: FrameSnapshot, span: Range<usize>, slice: &mut [PixelCell]) {
    let width = snapshot.view.grid.width();
    let first = span.start;
    for row in span {
        for column in 0..width {
            let position = Pixel(column, row);
            let point = snapshot.view.pixel_to_point(position);
            let count = escape_count(point, snapshot.budget);
            slice[(row - first) * width + column] = PixelCell {
                position,
                color: iterations_to_rgb(count, snapshot.budget),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;
    use planes::{PixelGrid, ViewWindow};

    fn snapshot(pixels: usize, span: f64, budget: u32) -> FrameSnapshot {
        FrameSnapshot {
            view: PlaneView {
                grid: PixelGrid::new(pixels, pixels).unwrap(),
                window: ViewWindow {
                    center: Complex::new(0.0, 0.0),
                    width: span,
                    height: span,
                },
            },
            budget,
        }
    }

    #[test]
    fn row_spans_cover_the_rows_exactly_once() {
        for (rows, workers) in &[(480, 8), (480, 7), (5, 5), (1, 1), (100, 3)] {
            let spans = row_spans(*rows, *workers);
            assert_eq!(spans.len(), *workers);
            let mut next = 0;
            for span in &spans {
                assert_eq!(span.start, next);
                next = span.end;
            }
            assert_eq!(next, *rows);
        }
    }

    #[test]
    fn row_spans_never_differ_by_more_than_one_row() {
        let spans = row_spans(487, 8);
        let longest = spans.iter().map(|s| s.len()).max().unwrap();
        let shortest = spans.iter().map(|s| s.len()).min().unwrap();
        assert!(longest - shortest <= 1);
        // The remainder rows land on the first workers.
        assert_eq!(spans[0].len(), 61);
        assert_eq!(spans[6].len(), 61);
        assert_eq!(spans[7].len(), 60);
    }

    #[test]
    fn the_buffer_is_row_major_and_full() {
        let frame = snapshot(8, 4.0, 16);
        let buffer = render_frame(frame, 3);
        assert_eq!(buffer.len(), 64);
        for (index, cell) in buffer.iter().enumerate() {
            assert_eq!(cell.position, Pixel(index % 8, index / 8));
        }
    }

    #[test]
    fn the_worker_count_never_changes_the_frame() {
        let frame = snapshot(32, 4.0, 64);
        let alone = render_frame(frame, 1);
        for workers in &[2, 3, 5, 31, 32, 500] {
            assert_eq!(render_frame(frame, *workers), alone);
        }
    }

    #[test]
    fn a_budget_of_one_paints_everything_black() {
        // The loop body always runs its one permitted step, so every
        // count equals the budget and every pixel is interior.
        let buffer = render_frame(snapshot(4, 4.0, 1), 2);
        assert!(buffer.iter().all(|cell| cell.color == Rgb(0, 0, 0)));
    }

    #[test]
    fn the_interior_is_black_and_the_outside_is_not() {
        // Center pixel sits on the origin, which never escapes; the
        // corner pixel sits at -2-2i, which escapes immediately.
        let buffer = render_frame(snapshot(4, 4.0, 64), 2);
        assert_eq!(buffer[2 + 2 * 4].color, Rgb(0, 0, 0));
        assert_ne!(buffer[0].color, Rgb(0, 0, 0));
    }
}
