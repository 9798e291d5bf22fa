//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Crop
//!
//! ```text
//! Crop
//!     Source: image/png file (48213 bytes)
//!     Size: 1200x900 (4:3)
//!     Encoded: 183421 bytes image/jpeg
//!     Output: cropped-image.jpg
//! ```
//!
//! ## Capture
//!
//! ```text
//! Camera: requesting (user, 1280x960)
//! Camera: active (1600x900)
//! Camera: idle
//! ```
//!
//! ## Stages
//!
//! ```text
//! Stages (2/6)
//!     [x] 001 Analyzing facial features
//!     [x] 002 Smoothing skin texture
//!     [>] 003 Enhancing natural glow
//!     [ ] 004 Perfecting complexion
//! ```
//!
//! ## Compare
//!
//! ```text
//! Compare at 37.5%
//!     Before: 0-150 of 400
//!     Divider: x=149.5
//!     Labels: Before, After
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::capture::{SessionState, StreamConstraints, StreamSettings};
use crate::compare::{CompareLayout, Labels};
use crate::stages::{Stage, StageProgress, StageStatus};
use crate::types::NormalizedImage;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Reduced `w:h` ratio, e.g. `1200x900` → `4:3`.
fn ratio_label(width: u32, height: u32) -> String {
    match gcd(width, height) {
        0 => "0:0".to_string(),
        g => format!("{}:{}", width / g, height / g),
    }
}

// ============================================================================
// Crop
// ============================================================================

pub fn format_crop_result(
    source: &str,
    image: &NormalizedImage,
    output: Option<&Path>,
) -> Vec<String> {
    let mut lines = vec![
        "Crop".to_string(),
        format!("{}Source: {}", indent(1), source),
        format!(
            "{}Size: {}x{} ({})",
            indent(1),
            image.width(),
            image.height(),
            ratio_label(image.width(), image.height())
        ),
        format!(
            "{}Encoded: {} bytes {}",
            indent(1),
            image.binary().len(),
            image.mime_type()
        ),
    ];
    if let Some(path) = output {
        lines.push(format!("{}Output: {}", indent(1), path.display()));
    }
    lines
}

pub fn print_crop_result(source: &str, image: &NormalizedImage, output: Option<&Path>) {
    for line in format_crop_result(source, image, output) {
        println!("{}", line);
    }
}

// ============================================================================
// Capture
// ============================================================================

pub fn format_capture_state(
    state: SessionState,
    constraints: &StreamConstraints,
    settings: Option<StreamSettings>,
) -> String {
    match (state, settings) {
        (SessionState::Requesting, _) => format!(
            "Camera: requesting ({}, {}x{})",
            constraints.facing.as_str(),
            constraints.width,
            constraints.height
        ),
        (SessionState::Active, Some(s)) => {
            format!("Camera: active ({}x{})", s.width, s.height)
        }
        (state, _) => format!("Camera: {}", state.as_str()),
    }
}

pub fn print_capture_state(
    state: SessionState,
    constraints: &StreamConstraints,
    settings: Option<StreamSettings>,
) {
    println!("{}", format_capture_state(state, constraints, settings));
}

// ============================================================================
// Stages
// ============================================================================

fn status_marker(status: StageStatus) -> &'static str {
    match status {
        StageStatus::Done => "[x]",
        StageStatus::Running => "[>]",
        StageStatus::Pending => "[ ]",
    }
}

pub fn format_stage_progress(stages: &[Stage], progress: StageProgress) -> Vec<String> {
    let mut lines = vec![format!(
        "Stages ({}/{})",
        progress.completed(),
        progress.total
    )];
    for (i, stage) in stages.iter().enumerate() {
        lines.push(format!(
            "{}{} {} {}",
            indent(1),
            status_marker(progress.status(i)),
            format_index(i + 1),
            stage.name
        ));
    }
    lines
}

pub fn print_stage_progress(stages: &[Stage], progress: StageProgress) {
    for line in format_stage_progress(stages, progress) {
        println!("{}", line);
    }
}

// ============================================================================
// Compare
// ============================================================================

pub fn format_compare_layout(layout: &CompareLayout, labels: &Labels, width: f64) -> Vec<String> {
    let mut shown = Vec::new();
    if layout.show_before_label {
        shown.push(labels.before.as_str());
    }
    if layout.show_after_label {
        shown.push(labels.after.as_str());
    }
    let shown = if shown.is_empty() {
        "none".to_string()
    } else {
        shown.join(", ")
    };

    vec![
        format!("Compare at {:.1}%", layout.position),
        format!(
            "{}{}: 0-{} of {}",
            indent(1),
            labels.before,
            layout.clip_width,
            width
        ),
        format!("{}Divider: x={}", indent(1), layout.divider.x),
        format!("{}Labels: {}", indent(1), shown),
    ]
}

pub fn print_compare_layout(layout: &CompareLayout, labels: &Labels, width: f64) {
    for line in format_compare_layout(layout, labels, width) {
        println!("{}", line);
    }
}
