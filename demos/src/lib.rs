// Copyright 2025 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runnable demos for the Reveal crates. See the `examples/` directory of this crate.
