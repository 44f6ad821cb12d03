// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stencil operations: square-neighbourhood filters evaluated against a
// read-only snapshot.
//
// Every output pixel is computed from the snapshot taken before the pass, never
// from a neighbour written earlier in the same pass, so rows can be processed
// in parallel without changing the result.

use image::RgbaImage;
use rayon::prelude::*;

use super::buffer::{CHANNELS, PixelBuffer};

/// What to do with windows that reach past the image edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderPolicy {
    /// Evaluate every pixel; taps outside the image are simply absent.
    SkipMissingTaps,
    /// Only evaluate pixels whose full window lies inside the image. The outer
    /// ring of width `radius` keeps its original values.
    InteriorOnly,
}

/// One in-range neighbour of the pixel being computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tap {
    pub dx: i32,
    pub dy: i32,
    pub rgb: [u8; 3],
}

/// The neighbourhood of a single output pixel, read from the snapshot.
pub struct Window<'a> {
    snapshot: &'a RgbaImage,
    x: u32,
    y: u32,
    radius: u32,
}

impl Window<'_> {
    /// Colour channels of the centre pixel.
    pub fn center(&self) -> [u8; 3] {
        let p = self.snapshot.get_pixel(self.x, self.y).0;
        [p[0], p[1], p[2]]
    }

    /// In-range taps, row-major from the top-left of the window.
    pub fn taps(&self) -> impl Iterator<Item = Tap> + '_ {
        let r = self.radius as i64;
        let (w, h) = (self.snapshot.width() as i64, self.snapshot.height() as i64);
        let (cx, cy) = (self.x as i64, self.y as i64);
        (-r..=r)
            .flat_map(move |dy| (-r..=r).map(move |dx| (dx, dy)))
            .filter_map(move |(dx, dy)| {
                let (nx, ny) = (cx + dx, cy + dy);
                if nx < 0 || ny < 0 || nx >= w || ny >= h {
                    return None;
                }
                let p = self.snapshot.get_pixel(nx as u32, ny as u32).0;
                Some(Tap {
                    dx: dx as i32,
                    dy: dy as i32,
                    rgb: [p[0], p[1], p[2]],
                })
            })
    }

    /// Per-channel fold over the in-range taps.
    pub fn fold_channels(&self, init: u8, f: impl Fn(u8, u8) -> u8) -> [u8; 3] {
        self.taps().fold([init; 3], |acc, tap| {
            [
                f(acc[0], tap.rgb[0]),
                f(acc[1], tap.rgb[1]),
                f(acc[2], tap.rgb[2]),
            ]
        })
    }
}

/// Replace the colour channels of every eligible pixel with `reducer(window)`.
///
/// Alpha is never touched. A radius of zero hands the reducer a window holding
/// only the centre pixel.
pub fn apply<F>(buffer: &mut PixelBuffer, radius: u32, policy: BorderPolicy, reducer: F)
where
    F: Fn(&Window<'_>) -> [u8; 3] + Sync,
{
    let (width, height) = buffer.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let snapshot = buffer.image.clone();
    let row_len = width as usize * CHANNELS;

    let in_interior = |v: u32, extent: u32| v >= radius && v + radius < extent;

    buffer
        .raw_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            if policy == BorderPolicy::InteriorOnly && !in_interior(y, height) {
                return;
            }
            for x in 0..width {
                if policy == BorderPolicy::InteriorOnly && !in_interior(x, width) {
                    continue;
                }
                let window = Window {
                    snapshot: &snapshot,
                    x,
                    y,
                    radius,
                };
                let rgb = reducer(&window);
                let i = x as usize * CHANNELS;
                row[i..i + 3].copy_from_slice(&rgb);
            }
        });
}
