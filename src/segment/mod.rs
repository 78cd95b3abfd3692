//! Segment planning module
//!
//! This module handles the pure part of splitting:
//! - Dividing a probed duration into N equal time windows
//! - Naming the output file for each window

pub mod planner;

pub use planner::{output_file_name, plan_segments, MediaDuration, Segment};
