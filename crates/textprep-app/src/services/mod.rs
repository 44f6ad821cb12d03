// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer: bridges the command line to the textprep backend crates.
//
// File I/O is async; the CPU-bound pipeline runs on tokio's blocking pool.

pub mod config_dir;
pub mod preprocess;
