//! examforge-render — Exam sheet and answer key rendering.
//!
//! Turns generated variants into printable artifacts. Rendering is a
//! presentation concern layered on already-selected questions; nothing here
//! feeds back into selection or sequencing.

pub mod html;
pub mod markdown;
