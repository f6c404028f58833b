//! Command handlers organized by category.
//!
//! | Module | Commands |
//! |--------|----------|
//! | `connection` | Connect, Status, Disconnect |
//! | `documents` | Load, Save, History |

pub mod connection;
pub mod documents;
