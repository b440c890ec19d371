// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Editing model and interaction

pub mod drop;
pub mod input;
pub mod navigation;
pub mod pointer;
pub mod selection;
pub mod session;
pub mod viewport;

pub use drop::DropOutcome;
pub use input::{Key, KeyEvent, Modifiers, PointerTarget};
pub use navigation::Direction;
pub use pointer::{DragEnv, PointerEffect, PointerEvent, PointerState};
pub use selection::Selection;
pub use session::{MapSession, SessionUpdate, TextEdit};
pub use viewport::ViewPort;
