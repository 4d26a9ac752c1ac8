//! UI rendering module for the viewer.
//!
//! This module provides the components, theme and runtime loop.

pub mod components;
pub mod labels;
pub mod runtime;
pub mod theme;
